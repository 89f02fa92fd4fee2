//! 预导入模块，方便使用

pub use super::advisor_departments::{
    ActiveModel as AdvisorDepartmentActiveModel, Entity as AdvisorDepartments,
    Model as AdvisorDepartmentModel,
};
pub use super::advisors::{
    ActiveModel as AdvisorActiveModel, Entity as Advisors, Model as AdvisorModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::department_majors::{
    ActiveModel as DepartmentMajorActiveModel, Entity as DepartmentMajors,
    Model as DepartmentMajorModel,
};
pub use super::departments::{
    ActiveModel as DepartmentActiveModel, Entity as Departments, Model as DepartmentModel,
};
pub use super::instructor_courses::{
    ActiveModel as InstructorCourseActiveModel, Entity as InstructorCourses,
    Model as InstructorCourseModel,
};
pub use super::instructors::{
    ActiveModel as InstructorActiveModel, Entity as Instructors, Model as InstructorModel,
};
pub use super::majors::{ActiveModel as MajorActiveModel, Entity as Majors, Model as MajorModel};
pub use super::operation_logs::{
    ActiveModel as OperationLogActiveModel, Entity as OperationLogs, Model as OperationLogModel,
};
pub use super::staff::{ActiveModel as StaffActiveModel, Entity as Staff, Model as StaffModel};
pub use super::student_courses::{
    ActiveModel as StudentCourseActiveModel, Entity as StudentCourses,
    Model as StudentCourseModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
