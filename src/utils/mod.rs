pub mod csv;
pub mod password;
pub mod random;
pub mod validate;

pub use random::generate_random_password;
