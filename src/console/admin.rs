use chrono::NaiveDate;

use super::args::{arg, parse_id};
use super::table::Table;
use crate::errors::{AcademicError, Result};
use crate::models::audit::{entities::OperationLogView, requests::LogFilter};
use crate::services::AdminService;

pub const HELP: &str = "\
  logs                      List all operation logs, newest first
  actors                    List user ids that appear in the log
  filter date <YYYY-MM-DD>  Logs of one local day
  filter user <id>          Logs of one user
  filter type <prefix>      Logs whose operation type starts with prefix
  clear --yes               Delete all logs, keeping a single clear record";

pub async fn dispatch(
    service: &AdminService,
    command: &str,
    args: &[String],
) -> Result<Option<String>> {
    let output = match command {
        "logs" => log_table(&service.list_logs().await?).render(),
        "actors" => {
            let actors = service.list_actors().await?;
            if actors.is_empty() {
                "No actors".to_string()
            } else {
                actors
                    .iter()
                    .map(i64::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        "filter" => {
            let filter = parse_filter(args)?;
            log_table(&service.filter_logs(filter).await?).render()
        }
        "clear" => {
            if args.first().map(String::as_str) != Some("--yes") {
                return Ok(Some(
                    "This deletes every operation log. Run 'clear --yes' to confirm.".to_string(),
                ));
            }
            let record = service.clear_logs().await?;
            format!("Logs cleared. {}", record.details)
        }
        _ => return Ok(None),
    };
    Ok(Some(output))
}

fn parse_filter(args: &[String]) -> Result<LogFilter> {
    let kind = arg(args, 0, "date|user|type")?.to_lowercase();
    match kind.as_str() {
        "all" => Ok(LogFilter::All),
        "date" => {
            let raw = arg(args, 1, "YYYY-MM-DD")?;
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AcademicError::validation(format!("Invalid date: {raw}")))?;
            Ok(LogFilter::Date(date))
        }
        "user" => Ok(LogFilter::Actor(parse_id(arg(args, 1, "id")?, "user id")?)),
        "type" => Ok(LogFilter::KindPrefix(arg(args, 1, "prefix")?.to_string())),
        other => Err(AcademicError::validation(format!(
            "Unknown filter {other}, expected date, user or type"
        ))),
    }
}

fn log_table(logs: &[OperationLogView]) -> Table {
    let mut table = Table::new(["ID", "Timestamp", "User", "Role", "Operation", "Details"]);
    for view in logs {
        table.push([
            view.log.id.to_string(),
            view.log.local_timestamp(),
            view.log.user_id.to_string(),
            view.role_label().to_string(),
            view.log.operation_type.clone(),
            view.log.details.clone(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter(&words(&["user", "7"])).unwrap(),
            LogFilter::Actor(7)
        );
        assert_eq!(
            parse_filter(&words(&["type", "advisor_"])).unwrap(),
            LogFilter::KindPrefix("advisor_".to_string())
        );
        assert!(matches!(
            parse_filter(&words(&["date", "2025-02-30"])),
            Err(AcademicError::Validation(_))
        ));
        assert!(parse_filter(&words(&["color", "red"])).is_err());
    }
}
