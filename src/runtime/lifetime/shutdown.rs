use tokio::signal;
use tracing::{error, warn};

/// 等待 Ctrl+C
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => warn!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for Ctrl+C: {}", e);
            // 无法监听信号时保持挂起，交由输入流结束会话
            std::future::pending::<()>().await;
        }
    }
}
