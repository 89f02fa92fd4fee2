use serde_json::json;
use tracing::{info, warn};

use super::AdminService;
use crate::errors::Result;
use crate::models::audit::{
    entities::{OperationKind, OperationLog, OperationLogView},
    requests::{LogFilter, NewOperationLog},
};

pub async fn list_logs(service: &AdminService) -> Result<Vec<OperationLogView>> {
    service.ctx().storage.list_logs(LogFilter::All).await
}

pub async fn list_actors(service: &AdminService) -> Result<Vec<i64>> {
    service.ctx().storage.list_log_actors().await
}

pub async fn filter_logs(
    service: &AdminService,
    filter: LogFilter,
) -> Result<Vec<OperationLogView>> {
    let ctx = service.ctx();
    if filter == LogFilter::All {
        return ctx.storage.list_logs(filter).await;
    }

    // 先记录再查询，筛选结果里包含本次筛选
    ctx.audit
        .log(
            OperationKind::Filter,
            "Filtered operation logs",
            Some(&json!({ "filter": filter.describe() })),
        )
        .await?;
    ctx.storage.list_logs(filter).await
}

pub async fn clear_logs(service: &AdminService) -> Result<OperationLog> {
    let ctx = service.ctx();
    let record = ctx
        .storage
        .clear_logs(NewOperationLog {
            user_id: ctx.session.user_id,
            operation_type: OperationKind::Clear.stored_for(ctx.session.role),
            details: format!("Operation logs cleared by {}", ctx.identity()),
        })
        .await?;

    warn!("Operation logs cleared by {}", ctx.identity());
    info!("Clear record: {}", record.details);
    Ok(record)
}
