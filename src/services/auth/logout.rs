use tracing::info;

use crate::errors::Result;
use crate::models::audit::entities::OperationKind;
use crate::services::AuditLogger;

pub async fn end_session(audit: &AuditLogger, kind: OperationKind) -> Result<()> {
    audit.log_session(kind).await?;
    info!("User {} ended session ({})", audit.user_id(), kind);
    Ok(())
}
