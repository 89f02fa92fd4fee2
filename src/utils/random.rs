use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";

/// 生成随机密码
pub fn generate_random_password(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_and_charset() {
        let pwd = generate_random_password(16);
        assert_eq!(pwd.len(), 16);
        assert!(pwd.bytes().all(|b| CHARSET.contains(&b)));
    }
}
