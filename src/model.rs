use crate::core::{SqlValue, now_utc};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Name of the benchmark table
pub const TABLE_NAME: &str = "insertbench";

/// Insert column order shared by every statement
pub const COLUMNS: [&str; 6] = ["product", "sku", "attr", "value", "created", "modified"];

/// Serde adapter for optional `datetime` columns in MySQL text format
mod datetime_format {
    use crate::core::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| NaiveDateTime::parse_from_str(&s, DATE_FORMAT))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

/// One row of the `insertbench` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product: String,
    pub sku: String,
    pub attr: String,
    pub value: String,
    #[serde(with = "datetime_format", default)]
    pub created: Option<NaiveDateTime>,
    #[serde(with = "datetime_format", default)]
    pub modified: Option<NaiveDateTime>,
}

impl Product {
    pub fn new(product: String, sku: String, attr: &str, value: &str) -> Self {
        Self {
            product,
            sku,
            attr: attr.to_string(),
            value: value.to_string(),
            created: None,
            modified: None,
        }
    }

    /// Set created; `None` means the current time
    pub fn set_created(&mut self, now: Option<NaiveDateTime>) {
        self.created = Some(now.unwrap_or_else(now_utc));
    }

    /// Set modified; `None` means the current time
    pub fn set_modified(&mut self, now: Option<NaiveDateTime>) {
        self.modified = Some(now.unwrap_or_else(now_utc));
    }

    /// Stamp both dates with one reading of the clock
    pub fn set_dates(&mut self) {
        let now = now_utc();
        self.set_created(Some(now));
        self.set_modified(Some(now));
    }

    /// Value of a column by name, for named parameter binding
    pub fn column(&self, name: &str) -> Option<SqlValue> {
        let value = match name {
            "product" => SqlValue::from(self.product.as_str()),
            "sku" => SqlValue::from(self.sku.as_str()),
            "attr" => SqlValue::from(self.attr.as_str()),
            "value" => SqlValue::from(self.value.as_str()),
            "created" => SqlValue::from(self.created),
            "modified" => SqlValue::from(self.modified),
            _ => return None,
        };
        Some(value)
    }

    /// Row values in `COLUMNS` order, dated with `ts` instead of the
    /// record's own timestamps
    pub fn row_at(&self, ts: NaiveDateTime) -> Vec<SqlValue> {
        vec![
            SqlValue::from(self.product.as_str()),
            SqlValue::from(self.sku.as_str()),
            SqlValue::from(self.attr.as_str()),
            SqlValue::from(self.value.as_str()),
            SqlValue::Timestamp(ts),
            SqlValue::Timestamp(ts),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn product() -> Product {
        Product::new("p-RunningShoe-0".into(), "p-shoe-0".into(), "x", "y")
    }

    #[test]
    fn test_set_dates_uses_one_reading() {
        let mut p = product();
        assert!(p.created.is_none());
        p.set_dates();
        assert!(p.created.is_some());
        assert_eq!(p.created, p.modified);
    }

    #[test]
    fn test_set_created_explicit() {
        let ts = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let mut p = product();
        p.set_created(Some(ts));
        assert_eq!(p.created, Some(ts));
        assert!(p.modified.is_none());
    }

    #[test]
    fn test_column_lookup_follows_column_list() {
        let p = product();
        for name in COLUMNS {
            assert!(p.column(name).is_some(), "missing column {}", name);
        }
        assert_eq!(p.column("sku"), Some(SqlValue::from("p-shoe-0")));
        assert_eq!(p.column("created"), Some(SqlValue::Null));
        assert_eq!(p.column("price"), None);
    }

    #[test]
    fn test_json_shape() {
        let mut p = product();
        let ts = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        p.set_created(Some(ts));
        p.set_modified(Some(ts));

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["sku"], "p-shoe-0");
        assert_eq!(json["created"], "2020-01-02 03:04:05");

        let back: Product = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}
