use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .extra(
                                "CHECK (role IN ('student', 'instructor', 'advisor', 'staff', 'admin'))",
                            ),
                    )
                    .col(ColumnDef::new(Users::RoleDescription).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建院系表
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::DepartmentId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Departments::Building).string().null())
                    .col(ColumnDef::new(Departments::Office).string().null())
                    .to_owned(),
            )
            .await?;

        // 创建专业表
        manager
            .create_table(
                Table::create()
                    .table(Majors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Majors::MajorName)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Majors::DefaultHoursReq)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Students::StudentId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Gender).string().null())
                    .col(ColumnDef::new(Students::Major).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建教师表
        manager
            .create_table(
                Table::create()
                    .table(Instructors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Instructors::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Instructors::InstructorId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Instructors::Phone).string().null())
                    .col(ColumnDef::new(Instructors::DepartmentId).string().null())
                    .col(ColumnDef::new(Instructors::HiredSemester).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Instructors::Table, Instructors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建导师表
        manager
            .create_table(
                Table::create()
                    .table(Advisors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Advisors::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Advisors::AdvisorId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Advisors::Phone).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Advisors::Table, Advisors::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建教务人员表
        manager
            .create_table(
                Table::create()
                    .table(Staff::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Staff::UserId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Staff::StaffId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Staff::DepartmentId).string().null())
                    .col(ColumnDef::new(Staff::Phone).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Staff::Table, Staff::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建院系专业关联表
        manager
            .create_table(
                Table::create()
                    .table(DepartmentMajors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DepartmentMajors::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DepartmentMajors::DepartmentId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentMajors::MajorName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DepartmentMajors::HoursReq)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DepartmentMajors::Table, DepartmentMajors::DepartmentId)
                            .to(Departments::Table, Departments::DepartmentId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DepartmentMajors::Table, DepartmentMajors::MajorName)
                            .to(Majors::Table, Majors::MajorName)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建导师院系关联表
        manager
            .create_table(
                Table::create()
                    .table(AdvisorDepartments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdvisorDepartments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdvisorDepartments::AdvisorId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdvisorDepartments::DepartmentId)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::CourseId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::CoursePrefix).string().not_null())
                    .col(ColumnDef::new(Courses::CourseNumber).string().not_null())
                    .col(ColumnDef::new(Courses::Credits).integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建教师授课表（instructor_id 为空表示待定）
        manager
            .create_table(
                Table::create()
                    .table(InstructorCourses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InstructorCourses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InstructorCourses::InstructorId)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(InstructorCourses::CoursePrefix)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstructorCourses::CourseNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstructorCourses::Semester)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstructorCourses::YearTaught)
                            .integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生选课表
        manager
            .create_table(
                Table::create()
                    .table(StudentCourses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentCourses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentCourses::StudentId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentCourses::CoursePrefix)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentCourses::CourseNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentCourses::Semester).string().not_null())
                    .col(
                        ColumnDef::new(StudentCourses::YearTaken)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentCourses::Grade).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentCourses::Table, StudentCourses::StudentId)
                            .to(Students::Table, Students::StudentId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一约束索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_department_majors_unique")
                    .table(DepartmentMajors::Table)
                    .col(DepartmentMajors::DepartmentId)
                    .col(DepartmentMajors::MajorName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_advisor_departments_unique")
                    .table(AdvisorDepartments::Table)
                    .col(AdvisorDepartments::AdvisorId)
                    .col(AdvisorDepartments::DepartmentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_prefix_number")
                    .table(Courses::Table)
                    .col(Courses::CoursePrefix)
                    .col(Courses::CourseNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_student_courses_student_id")
                    .table(StudentCourses::Table)
                    .col(StudentCourses::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_instructor_courses_instructor_id")
                    .table(InstructorCourses::Table)
                    .col(InstructorCourses::InstructorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(StudentCourses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InstructorCourses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdvisorDepartments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DepartmentMajors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Staff::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Advisors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Instructors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Majors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    RoleDescription,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    UserId,
    StudentId,
    Gender,
    Major,
}

#[derive(DeriveIden)]
enum Instructors {
    #[sea_orm(iden = "instructors")]
    Table,
    UserId,
    InstructorId,
    Phone,
    DepartmentId,
    HiredSemester,
}

#[derive(DeriveIden)]
enum Advisors {
    #[sea_orm(iden = "advisors")]
    Table,
    UserId,
    AdvisorId,
    Phone,
}

#[derive(DeriveIden)]
enum Staff {
    #[sea_orm(iden = "staff")]
    Table,
    UserId,
    StaffId,
    DepartmentId,
    Phone,
}

#[derive(DeriveIden)]
enum Departments {
    #[sea_orm(iden = "departments")]
    Table,
    DepartmentId,
    Building,
    Office,
}

#[derive(DeriveIden)]
enum Majors {
    #[sea_orm(iden = "majors")]
    Table,
    MajorName,
    DefaultHoursReq,
}

#[derive(DeriveIden)]
enum DepartmentMajors {
    #[sea_orm(iden = "department_majors")]
    Table,
    Id,
    DepartmentId,
    MajorName,
    HoursReq,
}

#[derive(DeriveIden)]
enum AdvisorDepartments {
    #[sea_orm(iden = "advisor_departments")]
    Table,
    Id,
    AdvisorId,
    DepartmentId,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    CourseId,
    CoursePrefix,
    CourseNumber,
    Credits,
}

#[derive(DeriveIden)]
enum InstructorCourses {
    #[sea_orm(iden = "instructor_courses")]
    Table,
    Id,
    InstructorId,
    CoursePrefix,
    CourseNumber,
    Semester,
    YearTaught,
}

#[derive(DeriveIden)]
enum StudentCourses {
    #[sea_orm(iden = "student_courses")]
    Table,
    Id,
    StudentId,
    CoursePrefix,
    CourseNumber,
    Semester,
    YearTaken,
    Grade,
}
