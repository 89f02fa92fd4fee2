use serde::{Deserialize, Serialize};

/// 成绩等级
///
/// 空值或空字符串表示尚未评分（在读），不参与 GPA 计算。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
    /// Satisfactory
    S,
    /// Unsatisfactory
    U,
    /// Incomplete
    I,
}

impl Grade {
    pub fn all() -> &'static [Grade] {
        &[
            Grade::A,
            Grade::B,
            Grade::C,
            Grade::D,
            Grade::F,
            Grade::S,
            Grade::U,
            Grade::I,
        ]
    }

    /// 绩点
    pub fn points(&self) -> f64 {
        match self {
            Grade::A | Grade::S => 4.0,
            Grade::B => 3.0,
            Grade::C => 2.0,
            Grade::D => 1.0,
            Grade::F | Grade::U | Grade::I => 0.0,
        }
    }

    /// 解析数据库中的可空成绩，空字符串视为未评分
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Grade>, String> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
            Grade::S => "S",
            Grade::U => "U",
            Grade::I => "I",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "F" => Ok(Grade::F),
            "S" => Ok(Grade::S),
            "U" => Ok(Grade::U),
            "I" => Ok(Grade::I),
            _ => Err(format!("Invalid grade: {s}. Expected one of A, B, C, D, F, S, U, I")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_points() {
        assert_eq!(Grade::A.points(), 4.0);
        assert_eq!(Grade::S.points(), 4.0);
        assert_eq!(Grade::B.points(), 3.0);
        assert_eq!(Grade::C.points(), 2.0);
        assert_eq!(Grade::D.points(), 1.0);
        assert_eq!(Grade::F.points(), 0.0);
        assert_eq!(Grade::U.points(), 0.0);
        assert_eq!(Grade::I.points(), 0.0);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(" b ".parse::<Grade>().unwrap(), Grade::B);
        assert_eq!("s".parse::<Grade>().unwrap(), Grade::S);
        assert!("E".parse::<Grade>().is_err());
        assert!("A+".parse::<Grade>().is_err());
    }

    #[test]
    fn test_parse_optional() {
        assert_eq!(Grade::parse_optional(None).unwrap(), None);
        assert_eq!(Grade::parse_optional(Some("")).unwrap(), None);
        assert_eq!(Grade::parse_optional(Some("  ")).unwrap(), None);
        assert_eq!(Grade::parse_optional(Some("a")).unwrap(), Some(Grade::A));
        assert!(Grade::parse_optional(Some("Z")).is_err());
    }
}
