//! 交互式控制台
//!
//! 每个角色一组命令，命令行拆分后交给对应角色的服务执行。

pub mod admin;
pub mod advisor;
pub mod args;
pub mod instructor;
pub mod login;
pub mod repl;
pub mod staff;
pub mod student;
pub mod table;

use tracing::{error, warn};

use crate::errors::{AcademicError, Result};
use crate::models::audit::entities::OperationKind;
use crate::models::users::entities::UserRole;
use crate::services::{
    AdminService, AdvisorService, AuthService, DashboardContext, InstructorService, StaffService,
    StudentService,
};

pub use login::prompt_login;
pub use repl::run_shell;

/// 命令执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum ShellOutcome {
    Output(String),
    Logout,
    Exit,
}

enum RoleCommands {
    Student(StudentService),
    Instructor(InstructorService),
    Advisor(AdvisorService),
    Staff(StaffService),
    Admin(AdminService),
}

pub struct Shell {
    ctx: DashboardContext,
    commands: RoleCommands,
}

const COMMON_HELP: &str = "\
  help                      Show this help
  whoami                    Show the signed-in user
  logout                    Sign out and return to the login prompt
  exit                      Sign out and quit";

impl Shell {
    pub fn new(ctx: DashboardContext) -> Self {
        let commands = match ctx.session.role {
            UserRole::Student => RoleCommands::Student(StudentService::new(ctx.clone())),
            UserRole::Instructor => RoleCommands::Instructor(InstructorService::new(ctx.clone())),
            UserRole::Advisor => RoleCommands::Advisor(AdvisorService::new(ctx.clone())),
            UserRole::Staff => RoleCommands::Staff(StaffService::new(ctx.clone())),
            UserRole::Admin => RoleCommands::Admin(AdminService::new(ctx.clone())),
        };
        Self { ctx, commands }
    }

    pub fn context(&self) -> &DashboardContext {
        &self.ctx
    }

    pub fn prompt(&self) -> String {
        format!("{}@{}> ", self.ctx.identity(), self.ctx.session.role)
    }

    pub fn help(&self) -> String {
        let role_help = match &self.commands {
            RoleCommands::Student(_) => student::HELP,
            RoleCommands::Instructor(_) => instructor::HELP,
            RoleCommands::Advisor(_) => advisor::HELP,
            RoleCommands::Staff(_) => staff::HELP,
            RoleCommands::Admin(_) => admin::HELP,
        };
        format!(
            "{} dashboard commands:\n{role_help}\n{COMMON_HELP}",
            self.ctx.session.role.label()
        )
    }

    /// 执行一行命令，错误转为 `Error:` 输出
    pub async fn execute(&self, line: &str) -> ShellOutcome {
        let words = match args::split_line(line) {
            Ok(words) => words,
            Err(e) => return ShellOutcome::Output(format!("Error: {}", e.message())),
        };
        let Some((command, rest)) = words.split_first() else {
            return ShellOutcome::Output(String::new());
        };
        let command = command.to_lowercase();

        match command.as_str() {
            "help" | "?" => return ShellOutcome::Output(self.help()),
            "whoami" => {
                return ShellOutcome::Output(format!(
                    "{} ({}) user #{}",
                    self.ctx.identity(),
                    self.ctx.session.role.label(),
                    self.ctx.session.user_id
                ));
            }
            "logout" => return ShellOutcome::Logout,
            "exit" | "quit" => return ShellOutcome::Exit,
            _ => {}
        }

        match self.dispatch(&command, rest).await {
            Ok(Some(output)) => ShellOutcome::Output(output),
            Ok(None) => ShellOutcome::Output(format!(
                "Unknown command: {command}. Type 'help' for a list of commands."
            )),
            Err(e) => ShellOutcome::Output(self.report_error(&command, e).await),
        }
    }

    async fn dispatch(&self, command: &str, rest: &[String]) -> Result<Option<String>> {
        match &self.commands {
            RoleCommands::Student(service) => student::dispatch(service, command, rest).await,
            RoleCommands::Instructor(service) => {
                instructor::dispatch(service, command, rest).await
            }
            RoleCommands::Advisor(service) => advisor::dispatch(service, command, rest).await,
            RoleCommands::Staff(service) => staff::dispatch(service, command, rest).await,
            RoleCommands::Admin(service) => admin::dispatch(service, command, rest).await,
        }
    }

    /// 输入校验错误只提示；其他错误同时写入审计日志
    async fn report_error(&self, command: &str, e: AcademicError) -> String {
        if matches!(e, AcademicError::Validation(_)) {
            return format!("Error: {}", e.message());
        }

        error!("Command '{}' failed for {}: {}", command, self.ctx.identity(), e);
        match self.ctx.audit.log_error(command, &e).await {
            Ok(_) => format!("Error: {e}"),
            Err(log_err) => {
                warn!("Failed to record error in audit log: {}", log_err);
                format!("Error: {e}\nError: could not record the error: {log_err}")
            }
        }
    }

    /// 结束会话并写入登出或退出记录
    pub async fn end(&self, auth: &AuthService, kind: OperationKind) -> Result<()> {
        auth.end_session(&self.ctx.audit, kind).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::audit::requests::LogFilter;
    use crate::models::people::requests::ProfileDetails;
    use crate::services::test_support::{context, seed_person};
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::temp_storage;

    async fn student_shell() -> (Arc<dyn Storage>, Shell, tempfile::TempDir) {
        let (storage, dir) = temp_storage().await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let session = seed_person(
            &storage,
            "S1",
            "pw",
            ProfileDetails::Student {
                gender: Some("F".to_string()),
                major: Some("History".to_string()),
            },
        )
        .await;
        let shell = Shell::new(context(&storage, session));
        (storage, shell, dir)
    }

    #[tokio::test]
    async fn test_builtin_commands() {
        let (_storage, shell, _dir) = student_shell().await;
        assert_eq!(shell.execute("logout").await, ShellOutcome::Logout);
        assert_eq!(shell.execute("EXIT").await, ShellOutcome::Exit);
        assert_eq!(shell.execute("   ").await, ShellOutcome::Output(String::new()));

        let ShellOutcome::Output(help) = shell.execute("help").await else {
            panic!("help should produce output");
        };
        assert!(help.contains("Student dashboard commands"));
        assert!(help.contains("target"));
    }

    #[tokio::test]
    async fn test_unknown_and_invalid_commands() {
        let (storage, shell, _dir) = student_shell().await;
        let ShellOutcome::Output(out) = shell.execute("schedule 101").await else {
            panic!("expected output");
        };
        assert!(out.starts_with("Unknown command"));

        let ShellOutcome::Output(out) = shell.execute("target 9").await else {
            panic!("expected output");
        };
        assert!(out.starts_with("Error:"));
        // 校验错误不写审计日志
        assert_eq!(storage.count_logs().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_end_session_logs_logout() {
        let (storage, shell, _dir) = student_shell().await;
        let auth = AuthService::new(storage.clone());
        shell.end(&auth, OperationKind::Logout).await.unwrap();

        let logs = storage.list_logs(LogFilter::All).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].log.operation_type, "student_logout");
    }

    #[tokio::test]
    async fn test_student_info_command() {
        let (_storage, shell, _dir) = student_shell().await;
        let ShellOutcome::Output(out) = shell.execute("info").await else {
            panic!("expected output");
        };
        assert!(out.contains("History"));
    }
}
