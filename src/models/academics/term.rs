use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// 学期代码：S 春季（1-5 月），U 夏季（6-8 月），F 秋季（9-12 月）
///
/// 枚举顺序即同一年内的时间顺序。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Semester {
    #[serde(rename = "S")]
    Spring,
    #[serde(rename = "U")]
    Summer,
    #[serde(rename = "F")]
    Fall,
}

impl Semester {
    pub fn code(&self) -> &'static str {
        match self {
            Semester::Spring => "S",
            Semester::Summer => "U",
            Semester::Fall => "F",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Semester::Spring => "Spring",
            Semester::Summer => "Summer",
            Semester::Fall => "Fall",
        }
    }

    /// 月份所在学期
    pub fn from_month(month: u32) -> Self {
        match month {
            1..=5 => Semester::Spring,
            6..=8 => Semester::Summer,
            _ => Semester::Fall,
        }
    }
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Semester {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "spring" => Ok(Semester::Spring),
            "u" | "summer" => Ok(Semester::Summer),
            "f" | "fall" => Ok(Semester::Fall),
            _ => Err(format!("Invalid semester: {s}. Expected S, U or F")),
        }
    }
}

/// 学期 + 年份
///
/// 字段顺序决定排序：先比较年份，再比较学期。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term {
    pub year: i32,
    pub semester: Semester,
}

impl Term {
    pub fn new(semester: Semester, year: i32) -> Self {
        Self { year, semester }
    }

    /// 根据数据库中的学期代码与年份构造
    pub fn from_parts(semester: &str, year: i32) -> Option<Self> {
        semester.parse().ok().map(|s| Self::new(s, year))
    }

    /// 指定日期所在学期
    pub fn containing(date: NaiveDate) -> Self {
        Self::new(Semester::from_month(date.month()), date.year())
    }

    /// 当前学期（本地时间）
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn next(&self) -> Self {
        match self.semester {
            Semester::Spring => Self::new(Semester::Summer, self.year),
            Semester::Summer => Self::new(Semester::Fall, self.year),
            Semester::Fall => Self::new(Semester::Spring, self.year + 1),
        }
    }

    /// 可排课/选课的学期：本学期起至下一个春季学期（含）
    pub fn upcoming(&self) -> Vec<Term> {
        let mut terms = vec![*self];
        let mut term = *self;
        loop {
            term = term.next();
            terms.push(term);
            if term.semester == Semester::Spring {
                break;
            }
        }
        terms
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.semester.code(), self.year)
    }
}

impl std::str::FromStr for Term {
    type Err = String;

    /// 接受 `S2025`、`S 2025`、`S-2025` 与 `Spring2025` 等形式
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| format!("Invalid term: {s}. Expected e.g. F2025"))?;
        let (sem, year) = trimmed.split_at(split);
        let semester: Semester = sem.trim_end_matches([' ', '-']).parse()?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Invalid term year: {year}"))?;
        Ok(Self::new(semester, year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_term_ordering_is_chronological() {
        let spring = Term::new(Semester::Spring, 2025);
        let summer = Term::new(Semester::Summer, 2025);
        let fall = Term::new(Semester::Fall, 2025);
        let next_spring = Term::new(Semester::Spring, 2026);
        assert!(spring < summer);
        assert!(summer < fall);
        assert!(fall < next_spring);
    }

    #[test]
    fn test_containing() {
        assert_eq!(
            Term::containing(date(2025, 3, 1)),
            Term::new(Semester::Spring, 2025)
        );
        assert_eq!(
            Term::containing(date(2025, 7, 15)),
            Term::new(Semester::Summer, 2025)
        );
        assert_eq!(
            Term::containing(date(2025, 12, 31)),
            Term::new(Semester::Fall, 2025)
        );
    }

    #[test]
    fn test_upcoming_from_each_semester() {
        let from_spring = Term::new(Semester::Spring, 2025).upcoming();
        assert_eq!(
            from_spring,
            vec![
                Term::new(Semester::Spring, 2025),
                Term::new(Semester::Summer, 2025),
                Term::new(Semester::Fall, 2025),
                Term::new(Semester::Spring, 2026),
            ]
        );

        let from_summer = Term::new(Semester::Summer, 2025).upcoming();
        assert_eq!(from_summer.len(), 3);
        assert_eq!(from_summer[2], Term::new(Semester::Spring, 2026));

        let from_fall = Term::new(Semester::Fall, 2025).upcoming();
        assert_eq!(
            from_fall,
            vec![
                Term::new(Semester::Fall, 2025),
                Term::new(Semester::Spring, 2026),
            ]
        );
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!(
            "F2025".parse::<Term>().unwrap(),
            Term::new(Semester::Fall, 2025)
        );
        assert_eq!(
            "s 2024".parse::<Term>().unwrap(),
            Term::new(Semester::Spring, 2024)
        );
        assert_eq!(
            "Summer-2023".parse::<Term>().unwrap(),
            Term::new(Semester::Summer, 2023)
        );
        assert_eq!(Term::new(Semester::Fall, 2025).to_string(), "F 2025");
        assert!("X2025".parse::<Term>().is_err());
        assert!("F".parse::<Term>().is_err());
    }
}
