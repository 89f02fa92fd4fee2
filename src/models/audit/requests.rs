use chrono::NaiveDate;

// 新日志记录
#[derive(Debug, Clone)]
pub struct NewOperationLog {
    pub user_id: i64,
    pub operation_type: String,
    pub details: String,
}

/// 日志筛选条件
#[derive(Debug, Clone, PartialEq)]
pub enum LogFilter {
    All,
    /// 本地日期当天
    Date(NaiveDate),
    Actor(i64),
    /// 操作类型前缀，大小写不敏感
    KindPrefix(String),
}

impl LogFilter {
    pub fn describe(&self) -> String {
        match self {
            LogFilter::All => "all".to_string(),
            LogFilter::Date(date) => format!("date={}", date.format("%Y-%m-%d")),
            LogFilter::Actor(id) => format!("user={id}"),
            LogFilter::KindPrefix(prefix) => format!("type={prefix}"),
        }
    }
}
