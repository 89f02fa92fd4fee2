use crate::models::academics::Term;

// 课程创建请求
#[derive(Debug, Clone)]
pub struct CreateCourseRequest {
    pub course_prefix: String,
    pub course_number: String,
    pub credits: i32,
}

// 课程更新请求
#[derive(Debug, Clone, Default)]
pub struct UpdateCourseRequest {
    pub course_number: Option<String>,
    pub credits: Option<i32>,
}

// 开课请求
#[derive(Debug, Clone)]
pub struct ScheduleSectionRequest {
    pub course_prefix: String,
    pub course_number: String,
    pub term: Term,
    pub instructor_id: Option<String>,
}

// 选课请求
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub student_id: String,
    pub course_prefix: String,
    pub course_number: String,
    pub term: Term,
}
