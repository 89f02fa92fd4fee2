//! 登录提示

use tokio::io::{AsyncBufRead, Lines};
use tracing::{debug, warn};

use super::repl::print_prompt;
use crate::errors::{AcademicError, Result};
use crate::models::users::entities::Session;
use crate::runtime::lifetime::shutdown::listen_for_shutdown;
use crate::services::AuthService;

/// 登录循环，输入结束或 Ctrl+C 时返回 None
///
/// 命令行给出的用户名与密码只用于第一次尝试。`read_password`
/// 在阻塞线程中执行。
pub async fn prompt_login<R, P>(
    auth: &AuthService,
    lines: &mut Lines<R>,
    mut username: Option<String>,
    mut password: Option<String>,
    read_password: P,
) -> Result<Option<Session>>
where
    R: AsyncBufRead + Unpin,
    P: Fn() -> std::io::Result<String> + Clone + Send + 'static,
{
    loop {
        let name = match username.take() {
            Some(name) => name,
            None => {
                print_prompt("Username: ");
                let line = tokio::select! {
                    line = lines.next_line() => line?,
                    _ = listen_for_shutdown() => {
                        println!();
                        debug!("Interrupted at the username prompt");
                        return Ok(None);
                    }
                };
                match line {
                    Some(line) => line.trim().to_string(),
                    None => return Ok(None),
                }
            }
        };
        if name.is_empty() {
            continue;
        }

        let secret = match password.take() {
            Some(secret) => secret,
            None => {
                let reader = read_password.clone();
                let task = tokio::task::spawn_blocking(move || reader());
                tokio::select! {
                    joined = task => joined
                        .map_err(|e| AcademicError::authentication(format!("Password prompt failed: {e}")))?
                        .map_err(|e| AcademicError::authentication(format!("Cannot read password: {e}")))?,
                    _ = listen_for_shutdown() => {
                        println!();
                        debug!("Interrupted at the password prompt");
                        return Ok(None);
                    }
                }
            }
        };

        match auth.login(&name, &secret).await? {
            Some(session) => {
                println!("Welcome, {} ({})", session.identity, session.role.label());
                return Ok(Some(session));
            }
            None => {
                warn!("Failed login attempt for {}", name);
                println!("Invalid username or password.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::io::{AsyncBufReadExt, BufReader};

    use super::*;
    use crate::models::audit::requests::LogFilter;
    use crate::models::people::requests::ProfileDetails;
    use crate::services::test_support::seed_person;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::temp_storage;

    async fn setup() -> (Arc<dyn Storage>, AuthService, tempfile::TempDir) {
        let (storage, dir) = temp_storage().await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        seed_person(
            &storage,
            "S100",
            "secret-pass",
            ProfileDetails::Student {
                gender: None,
                major: None,
            },
        )
        .await;
        let auth = AuthService::new(storage.clone());
        (storage, auth, dir)
    }

    fn typed_password() -> std::io::Result<String> {
        Ok("secret-pass".to_string())
    }

    #[tokio::test]
    async fn test_login_retries_until_success() {
        let (storage, auth, _dir) = setup().await;
        let mut lines = BufReader::new(&b"\n  \nnobody\nS100\n"[..]).lines();

        let session = prompt_login(&auth, &mut lines, None, None, typed_password)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.identity, "S100");

        let logs = storage.list_logs(LogFilter::All).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].log.operation_type, "student_login");
    }

    #[tokio::test]
    async fn test_end_of_input_stops_login() {
        let (_storage, auth, _dir) = setup().await;
        let mut lines = BufReader::new(&b"nobody\n"[..]).lines();

        let session = prompt_login(&auth, &mut lines, None, None, typed_password)
            .await
            .unwrap();
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_command_line_credentials_used_once() {
        let (_storage, auth, _dir) = setup().await;
        let mut lines = BufReader::new(&b""[..]).lines();

        let session = prompt_login(
            &auth,
            &mut lines,
            Some("S100".to_string()),
            Some("wrong".to_string()),
            typed_password,
        )
        .await
        .unwrap();
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn test_password_reader_error_is_reported() {
        let (_storage, auth, _dir) = setup().await;
        let mut lines = BufReader::new(&b"S100\n"[..]).lines();

        let result = prompt_login(&auth, &mut lines, None, None, || {
            Err(std::io::Error::other("no terminal"))
        })
        .await;
        assert!(matches!(result, Err(AcademicError::Authentication(_))));
    }
}
