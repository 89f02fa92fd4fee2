use serde::Serialize;

/// 人员档案保存结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonSaved {
    pub user_id: i64,
    /// 是否新建了用户记录（否则复用已有用户）
    pub created_user: bool,
}

// 导师名下学生
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Advisee {
    pub student_id: String,
    pub gender: Option<String>,
    pub major: Option<String>,
    pub department_id: String,
    pub gpa: f64,
}

// 学业进度
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentProgress {
    pub student_id: String,
    pub major: Option<String>,
    pub hours_required: Option<i32>,
    pub credits_earned: i32,
    pub courses_taken: usize,
    pub gpa: f64,
}

impl StudentProgress {
    /// 完成百分比，未知要求学时返回 None
    pub fn percent_complete(&self) -> Option<f64> {
        match self.hours_required {
            Some(required) if required > 0 => {
                Some((self.credits_earned as f64 / required as f64 * 100.0).min(100.0))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(earned: i32, required: Option<i32>) -> StudentProgress {
        StudentProgress {
            student_id: "S1".to_string(),
            major: Some("CS".to_string()),
            hours_required: required,
            credits_earned: earned,
            courses_taken: 0,
            gpa: 0.0,
        }
    }

    #[test]
    fn test_percent_complete() {
        assert_eq!(progress(60, Some(120)).percent_complete(), Some(50.0));
        assert_eq!(progress(150, Some(120)).percent_complete(), Some(100.0));
        assert_eq!(progress(10, None).percent_complete(), None);
        assert_eq!(progress(10, Some(0)).percent_complete(), None);
    }
}
