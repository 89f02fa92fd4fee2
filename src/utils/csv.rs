//! 导入数据用的 CSV 读取
//!
//! 逗号分隔，第一行为表头，字段值去除首尾空白。

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::errors::{AcademicError, Result};

/// 按表头索引的一行数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRow {
    fields: HashMap<String, String>,
}

impl CsvRow {
    /// 取字段值，缺失或为空时返回 None
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn get_owned(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }
}

/// 读取 CSV 文件，第一行为表头
pub fn read_csv_file<P: AsRef<Path>>(path: P) -> Result<Vec<CsvRow>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        AcademicError::file_operation(format!("Cannot read {}: {e}", path.display()))
    })?;
    parse_csv(&content)
}

/// 解析 CSV 文本
pub fn parse_csv(content: &str) -> Result<Vec<CsvRow>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| AcademicError::import(format!("Failed to read header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    rdr.records()
        .map(|record| {
            let record = record.map_err(|e| AcademicError::import(format!("Failed to parse row: {e}")))?;
            let fields = headers
                .iter()
                .cloned()
                .zip(
                    record
                        .iter()
                        .map(str::to_string)
                        .chain(std::iter::repeat(String::new())),
                )
                .collect();
            Ok(CsvRow { fields })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_header() {
        let rows = parse_csv("StudentID,Gender,Major\nS1,F,CS\nS2,M,\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("StudentID"), Some("S1"));
        assert_eq!(rows[0].get("Major"), Some("CS"));
        assert_eq!(rows[1].get("Major"), None);
        assert_eq!(rows[1].get("Missing"), None);
    }

    #[test]
    fn test_quoted_fields() {
        let rows = parse_csv("Name,Office\n\"Hall, East\",\"Room \"\"12\"\"\"\n").unwrap();
        assert_eq!(rows[0].get("Name"), Some("Hall, East"));
        assert_eq!(rows[0].get("Office"), Some("Room \"12\""));
    }

    #[test]
    fn test_short_rows_and_bom() {
        let rows = parse_csv("\u{feff}A,B,C\r\n1\r\n").unwrap();
        assert_eq!(rows[0].get("A"), Some("1"));
        assert_eq!(rows[0].get("C"), None);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_csv("").unwrap().is_empty());
    }
}
