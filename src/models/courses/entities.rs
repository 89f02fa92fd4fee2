use serde::{Deserialize, Serialize};

use crate::models::academics::{Grade, Term};

// 课程
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Course {
    pub course_id: i64,
    pub course_prefix: String,
    pub course_number: String,
    pub credits: i32,
}

impl Course {
    pub fn code(&self) -> String {
        format!("{} {}", self.course_prefix, self.course_number)
    }
}

/// 开课记录，`instructor_id` 为空表示教师待定（TBA）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseSection {
    pub id: i64,
    pub instructor_id: Option<String>,
    pub course_prefix: String,
    pub course_number: String,
    pub semester: String,
    pub year: i32,
}

impl CourseSection {
    pub fn code(&self) -> String {
        format!("{} {}", self.course_prefix, self.course_number)
    }

    pub fn term(&self) -> Option<Term> {
        Term::from_parts(&self.semester, self.year)
    }

    pub fn instructor_label(&self) -> &str {
        self.instructor_id.as_deref().unwrap_or("TBA")
    }
}

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: String,
    pub course_prefix: String,
    pub course_number: String,
    pub semester: String,
    pub year: i32,
    pub grade: Option<String>,
}

impl Enrollment {
    pub fn code(&self) -> String {
        format!("{} {}", self.course_prefix, self.course_number)
    }

    pub fn term(&self) -> Option<Term> {
        Term::from_parts(&self.semester, self.year)
    }

    /// 已评分返回成绩；空值、空串与无法识别的成绩均返回 None
    pub fn parsed_grade(&self) -> Result<Option<Grade>, String> {
        Grade::parse_optional(self.grade.as_deref())
    }

    pub fn is_graded(&self) -> bool {
        self.grade.as_deref().is_some_and(|g| !g.trim().is_empty())
    }
}

/// 选课状态（相对当前学期）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EnrollmentStatus {
    Completed,
    Current,
    Future,
}

impl EnrollmentStatus {
    pub fn relative_to(term: Term, current: Term) -> Self {
        match term.cmp(&current) {
            std::cmp::Ordering::Less => EnrollmentStatus::Completed,
            std::cmp::Ordering::Equal => EnrollmentStatus::Current,
            std::cmp::Ordering::Greater => EnrollmentStatus::Future,
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrollmentStatus::Completed => write!(f, "Completed"),
            EnrollmentStatus::Current => write!(f, "Current"),
            EnrollmentStatus::Future => write!(f, "Future"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::academics::Semester;

    fn enrollment(grade: Option<&str>) -> Enrollment {
        Enrollment {
            id: 1,
            student_id: "S1".to_string(),
            course_prefix: "CS".to_string(),
            course_number: "101".to_string(),
            semester: "F".to_string(),
            year: 2024,
            grade: grade.map(str::to_string),
        }
    }

    #[test]
    fn test_enrollment_graded() {
        assert!(enrollment(Some("A")).is_graded());
        assert!(!enrollment(Some(" ")).is_graded());
        assert!(!enrollment(None).is_graded());
        assert_eq!(enrollment(Some("b")).parsed_grade().unwrap(), Some(Grade::B));
    }

    #[test]
    fn test_enrollment_term() {
        assert_eq!(
            enrollment(None).term(),
            Some(Term::new(Semester::Fall, 2024))
        );
    }

    #[test]
    fn test_status_relative_to_current() {
        let current = Term::new(Semester::Summer, 2025);
        assert_eq!(
            EnrollmentStatus::relative_to(Term::new(Semester::Spring, 2025), current),
            EnrollmentStatus::Completed
        );
        assert_eq!(
            EnrollmentStatus::relative_to(current, current),
            EnrollmentStatus::Current
        );
        assert_eq!(
            EnrollmentStatus::relative_to(Term::new(Semester::Fall, 2025), current),
            EnrollmentStatus::Future
        );
    }
}
