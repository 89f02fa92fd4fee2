pub mod logs;

use crate::errors::Result;
use crate::models::audit::{
    entities::{OperationLog, OperationLogView},
    requests::LogFilter,
};
use crate::services::DashboardContext;

pub struct AdminService {
    ctx: DashboardContext,
}

impl AdminService {
    pub fn new(ctx: DashboardContext) -> Self {
        Self { ctx }
    }

    pub(crate) fn ctx(&self) -> &DashboardContext {
        &self.ctx
    }

    // 全部日志，最新在前
    pub async fn list_logs(&self) -> Result<Vec<OperationLogView>> {
        logs::list_logs(self).await
    }

    // 出现过的操作者
    pub async fn list_actors(&self) -> Result<Vec<i64>> {
        logs::list_actors(self).await
    }

    // 按条件筛选日志，筛选操作本身也会被记录
    pub async fn filter_logs(&self, filter: LogFilter) -> Result<Vec<OperationLogView>> {
        logs::filter_logs(self, filter).await
    }

    // 清空日志，仅保留一条清空记录
    pub async fn clear_logs(&self) -> Result<OperationLog> {
        logs::clear_logs(self).await
    }
}
