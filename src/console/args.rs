//! 命令行拆分与参数解析

use std::collections::HashMap;

use crate::errors::{AcademicError, Result};
use crate::models::academics::{Grade, Term};
use crate::services::gpa::HypotheticalCourse;

/// 按空白拆分，双引号内的空白保留
pub fn split_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_word = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_word = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            c => {
                current.push(c);
                has_word = true;
            }
        }
    }

    if in_quotes {
        return Err(AcademicError::validation("Unclosed quote in command"));
    }
    if has_word {
        words.push(current);
    }
    Ok(words)
}

pub fn arg<'a>(args: &'a [String], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| AcademicError::validation(format!("Missing argument <{name}>")))
}

pub fn parse_id(raw: &str, name: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| AcademicError::validation(format!("Invalid {name}: {raw}")))
}

pub fn parse_term(raw: &str) -> Result<Term> {
    raw.parse().map_err(AcademicError::validation)
}

/// `none` 或 `-` 表示清除成绩
pub fn parse_grade(raw: &str) -> Result<Option<Grade>> {
    match raw.trim() {
        "-" => Ok(None),
        s if s.eq_ignore_ascii_case("none") => Ok(None),
        s => s.parse().map(Some).map_err(AcademicError::validation),
    }
}

/// 解析 `3:A 4:B` 形式的假设课程
pub fn parse_hypothetical(args: &[String]) -> Result<Vec<HypotheticalCourse>> {
    args.iter()
        .map(|raw| {
            let (credits, grade) = raw.split_once(':').ok_or_else(|| {
                AcademicError::validation(format!("Expected <credits>:<grade>, got {raw}"))
            })?;
            let credits: i32 = credits
                .trim()
                .parse()
                .map_err(|_| AcademicError::validation(format!("Invalid credits: {credits}")))?;
            let grade: Grade = grade.parse().map_err(AcademicError::validation)?;
            HypotheticalCourse::new(credits, grade)
        })
        .collect()
}

/// 解析 `key=value` 形式的字段，键名统一小写
pub fn parse_assignments(args: &[String], allowed: &[&str]) -> Result<HashMap<String, String>> {
    let mut fields = HashMap::new();
    for raw in args {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| AcademicError::validation(format!("Expected key=value, got {raw}")))?;
        let key = key.trim().to_lowercase();
        if !allowed.contains(&key.as_str()) {
            return Err(AcademicError::validation(format!(
                "Unknown field {key}, expected one of: {}",
                allowed.join(", ")
            )));
        }
        fields.insert(key, value.trim().to_string());
    }
    if fields.is_empty() {
        return Err(AcademicError::validation(format!(
            "Nothing to update, use {}",
            allowed
                .iter()
                .map(|k| format!("{k}=..."))
                .collect::<Vec<_>>()
                .join(" ")
        )));
    }
    Ok(fields)
}
