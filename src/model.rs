//! Core data types: namespaces, records, insert payloads, and result rows.

use crate::error::{DayFlagError, Result};
use chrono::NaiveDate;
use rusqlite::types::ValueRef;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Row identifier column.
pub const COLUMN_ID: &str = "id";
/// Date column (`TEXT UNIQUE`).
pub const COLUMN_DATE: &str = "date";
/// State flag column.
pub const COLUMN_STATE: &str = "state";

/// Every column a namespace table carries, in schema order.
pub const COLUMNS: [&str; 3] = [COLUMN_ID, COLUMN_DATE, COLUMN_STATE];

/// Date format stored in the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One of the two independent record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Holiday,
    Workday,
}

impl Namespace {
    pub const ALL: [Self; 2] = [Self::Holiday, Self::Workday];

    /// Backing table name.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Holiday => "holiday",
            Self::Workday => "workday",
        }
    }

    /// First path segment of this namespace's address.
    #[must_use]
    pub const fn path(self) -> &'static str {
        self.table()
    }

    /// MIME-like type string reported for this namespace and its items.
    #[must_use]
    pub const fn item_type(self) -> &'static str {
        match self {
            Self::Holiday => "item/holiday",
            Self::Workday => "item/workday",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.table()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = DayFlagError;

    /// Exact, case-sensitive match on the namespace path segment.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "holiday" => Ok(Self::Holiday),
            "workday" => Ok(Self::Workday),
            _ => Err(DayFlagError::InvalidArgument { uri: s.to_string() }),
        }
    }
}

/// A stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFlag {
    pub id: i64,
    pub date: String,
    pub state: i64,
}

impl DayFlag {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            state: row.get(2)?,
        })
    }
}

/// Values for an insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFlagValues {
    pub date: String,
    pub state: i64,
}

impl DayFlagValues {
    #[must_use]
    pub fn new(date: impl Into<String>, state: i64) -> Self {
        Self {
            date: date.into(),
            state,
        }
    }

    #[must_use]
    pub fn for_day(day: NaiveDate, state: i64) -> Self {
        Self::new(day.format(DATE_FORMAT).to_string(), state)
    }
}

/// Parse a `YYYY-MM-DD` date string.
///
/// # Errors
///
/// Returns [`DayFlagError::InvalidDate`] if the input is not a valid calendar day.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| DayFlagError::InvalidDate {
        input: input.to_string(),
    })
}

/// A single column value as returned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl CellValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for CellValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(v) => Self::Integer(v),
            ValueRef::Real(v) => Self::Real(v),
            ValueRef::Text(v) => Self::Text(String::from_utf8_lossy(v).into_owned()),
            ValueRef::Blob(v) => Self::Blob(v.to_vec()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Blob(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

/// One result row: values keyed by the cursor's column names.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<CellValue>,
}

impl Row {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<CellValue>) -> Self {
        Self { columns, values }
    }

    /// Value for `column`, or `None` if the column was not projected.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_parse_is_exact() {
        assert_eq!("holiday".parse::<Namespace>().unwrap(), Namespace::Holiday);
        assert_eq!("workday".parse::<Namespace>().unwrap(), Namespace::Workday);
        for bad in ["vacation", "HOLIDAY", " workday ", "Workday", ""] {
            assert!(
                matches!(
                    bad.parse::<Namespace>(),
                    Err(DayFlagError::InvalidArgument { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn item_types_are_fixed() {
        assert_eq!(Namespace::Holiday.item_type(), "item/holiday");
        assert_eq!(Namespace::Workday.item_type(), "item/workday");
    }

    #[test]
    fn values_for_day_use_iso_dates() {
        let day = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let values = DayFlagValues::for_day(day, 1);
        assert_eq!(values.date, "2024-12-25");
        assert_eq!(values.state, 1);
    }

    #[test]
    fn parse_day_rejects_garbage() {
        assert!(parse_day("2024-02-30").is_err());
        assert!(parse_day("tomorrow").is_err());
        assert_eq!(
            parse_day("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn row_serializes_as_column_map() {
        let columns: Arc<[String]> = COLUMNS.iter().map(ToString::to_string).collect();
        let row = Row::new(
            columns,
            vec![
                CellValue::Integer(1),
                CellValue::Text("2024-12-25".to_string()),
                CellValue::Integer(1),
            ],
        );
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "date": "2024-12-25", "state": 1})
        );
        assert_eq!(row.get("date").and_then(CellValue::as_str), Some("2024-12-25"));
        assert!(row.get("missing").is_none());
    }
}
