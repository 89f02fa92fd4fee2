//! 读取-执行循环

use std::io::Write;

use tokio::io::{AsyncBufRead, Lines};
use tracing::{debug, warn};

use super::{Shell, ShellOutcome};
use crate::errors::Result;
use crate::models::audit::entities::OperationKind;
use crate::runtime::lifetime::shutdown::listen_for_shutdown;
use crate::services::AuthService;

pub fn print_prompt(prompt: &str) {
    print!("{prompt}");
    if let Err(e) = std::io::stdout().flush() {
        debug!("Failed to flush stdout: {}", e);
    }
}

/// 运行一个登录会话，返回登出或退出
///
/// 输入结束与 Ctrl+C 都按退出处理，命令执行中按 Ctrl+C 会中断该命令。
pub async fn run_shell<R>(
    shell: &Shell,
    auth: &AuthService,
    lines: &mut Lines<R>,
) -> Result<ShellOutcome>
where
    R: AsyncBufRead + Unpin,
{
    println!("{}", shell.help());

    loop {
        print_prompt(&shell.prompt());

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = listen_for_shutdown() => {
                println!();
                warn!("Interrupted, ending session for {}", shell.context().identity());
                None
            }
        };

        let outcome = match line {
            Some(line) => tokio::select! {
                outcome = shell.execute(&line) => outcome,
                _ = listen_for_shutdown() => {
                    println!();
                    warn!("Interrupted while running '{}', ending session", line.trim());
                    ShellOutcome::Exit
                }
            },
            None => ShellOutcome::Exit,
        };

        match outcome {
            ShellOutcome::Output(text) => {
                if !text.is_empty() {
                    println!("{text}");
                }
            }
            ShellOutcome::Logout => {
                shell.end(auth, OperationKind::Logout).await?;
                println!("Signed out.");
                return Ok(ShellOutcome::Logout);
            }
            ShellOutcome::Exit => {
                shell.end(auth, OperationKind::Exit).await?;
                return Ok(ShellOutcome::Exit);
            }
        }
    }
}
