use crate::config::{AppConfig, Argon2Config};
use crate::errors::AcademicError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use once_cell::sync::Lazy;

/// 用户不存在时用于比对的哈希，保证两种失败路径耗时一致
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("dummy-password-for-timing").ok());

/// 哈希密码（使用全局配置的 Argon2 参数）
pub fn hash_password(password: &str) -> Result<String, AcademicError> {
    hash_password_with(password, &AppConfig::get().argon2)
}

/// 使用指定参数哈希密码
pub fn hash_password_with(password: &str, config: &Argon2Config) -> Result<String, AcademicError> {
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        None,
    )
    .map_err(|e| AcademicError::validation(format!("Invalid Argon2 parameters: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AcademicError::validation(format!("Failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// 启动时预先生成比对用哈希，避免首次未知用户登录多一次哈希耗时
pub fn init_dummy_hash() -> bool {
    Lazy::force(&DUMMY_HASH).is_some()
}

/// 对不存在的用户执行一次等价的验证，结果恒为 false
pub fn verify_against_dummy(password: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_ref() {
        let _ = verify_password(password, hash);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> Argon2Config {
        Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_with("secret", &fast_params()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret", &hash));
        assert!(!verify_password("Secret", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password_with("secret", &fast_params()).unwrap();
        let b = hash_password_with("secret", &fast_params()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("secret", "not-a-phc-string"));
        assert!(!verify_password("secret", ""));
    }

    #[test]
    fn test_dummy_hash_initialised_eagerly() {
        assert!(init_dummy_hash());
        assert!(Lazy::get(&DUMMY_HASH).is_some());
    }

    #[test]
    fn test_dummy_never_matches() {
        assert!(!verify_against_dummy("dummy-password-for-timing"));
    }
}
