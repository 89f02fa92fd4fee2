use once_cell::sync::Lazy;
use regex::Regex;

static PERSON_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("Invalid person id regex"));

static COURSE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3,4}[A-Z]?$").expect("Invalid course number regex"));

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9+()\-. ]{7,20}$").expect("Invalid phone regex"));

/// 学号、教师编号等（同时作为登录用户名）
pub fn validate_person_id(id: &str) -> Result<(), &'static str> {
    if !PERSON_ID_RE.is_match(id) {
        return Err("ID must be 1-32 letters, digits, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_course_number(number: &str) -> Result<(), &'static str> {
    if !COURSE_NUMBER_RE.is_match(number) {
        return Err("Course number must be 3-4 digits with an optional letter suffix");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone) {
        return Err("Phone number format is invalid");
    }
    Ok(())
}

/// 学分范围校验（闭区间）
pub fn validate_credits(credits: i32, min: i32, max: i32) -> Result<(), String> {
    if credits < min || credits > max {
        return Err(format!("Credits must be between {min} and {max}"));
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 管理员密码策略：至少 8 个字符，且包含大写字母、小写字母和数字
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let checks: [(bool, &'static str); 4] = [
        (
            password.chars().count() >= 8,
            "Password must be at least 8 characters long",
        ),
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            "Password must contain at least one uppercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_lowercase()),
            "Password must contain at least one lowercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            "Password must contain at least one digit",
        ),
    ];

    let errors: Vec<&'static str> = checks
        .iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, msg)| *msg)
        .collect();

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_id() {
        assert!(validate_person_id("S1001").is_ok());
        assert!(validate_person_id("staff_01").is_ok());
        assert!(validate_person_id("").is_err());
        assert!(validate_person_id("has space").is_err());
    }

    #[test]
    fn test_course_number() {
        assert!(validate_course_number("101").is_ok());
        assert!(validate_course_number("4350").is_ok());
        assert!(validate_course_number("101L").is_ok());
        assert!(validate_course_number("10").is_err());
        assert!(validate_course_number("ABC").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("555-123-4567").is_ok());
        assert!(validate_phone("(555) 123 4567").is_ok());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_credits_range() {
        assert!(validate_credits(3, 1, 6).is_ok());
        assert!(validate_credits(0, 1, 6).is_err());
        assert!(validate_credits(7, 1, 6).is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("SecurePass123").is_valid);
        let result = validate_password("abc");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
        assert!(
            !validate_password("abcd1234")
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );
    }
}
