use chrono::{NaiveDateTime, SubsecRound, Utc};
use std::fmt;

/// MySQL `datetime` text format
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current UTC time at the precision of a MySQL `datetime` column
pub fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

/// A single positional statement argument
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlValue {
    Null,
    Text(String),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Option<NaiveDateTime>> for SqlValue {
    fn from(value: Option<NaiveDateTime>) -> Self {
        value.map_or(Self::Null, Self::Timestamp)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Text(s) => write!(f, "'{}'", s),
            Self::Timestamp(ts) => write!(f, "'{}'", ts.format(DATE_FORMAT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_now_has_second_precision() {
        assert_eq!(now_utc().nanosecond(), 0);
    }

    #[test]
    fn test_display_uses_mysql_format() {
        let ts = NaiveDate::from_ymd_opt(2019, 3, 7)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        assert_eq!(SqlValue::from(ts).to_string(), "'2019-03-07 14:05:09'");
        assert_eq!(SqlValue::from("sku-1").to_string(), "'sku-1'");
        assert_eq!(SqlValue::from(None::<NaiveDateTime>).to_string(), "NULL");
    }

    #[test]
    fn test_accessors() {
        let text = SqlValue::from("x");
        assert_eq!(text.as_text(), Some("x"));
        assert_eq!(text.as_timestamp(), None);
        assert_eq!(SqlValue::Null.as_text(), None);
    }
}
