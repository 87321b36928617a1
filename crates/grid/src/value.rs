//! Cell values and the row abstraction.
//!
//! Rows expose their fields as [`CellValue`]s keyed by column key. The
//! value enum carries a total order so any column can drive a sort:
//! numbers compare numerically (ints and floats together), text
//! lexicographically, and empty cells sort after everything else in
//! ascending order.

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;

/// Row identifier. Selection and reconciliation key off this alone.
pub type RowId = i64;

/// A dataset row the grid can render.
pub trait GridRow {
    /// Unique identity of this row within the dataset.
    fn id(&self) -> RowId;

    /// Field lookup by column key. Unknown keys return [`CellValue::Empty`].
    fn cell(&self, key: &str) -> CellValue;
}

/// One cell's worth of data, as a sortable, displayable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Int(i64),
    Float(OrderedFloat<f64>),
    Timestamp(DateTime<Utc>),
    Text(String),
    Bool(bool),
    Empty,
}

impl CellValue {
    pub fn float(v: f64) -> Self {
        CellValue::Float(OrderedFloat(v))
    }

    /// Map an optional value; `None` becomes `Empty`.
    pub fn opt<T: Into<CellValue>>(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Variant rank for cross-type comparisons. Empty ranks last so
    /// blank cells sink to the bottom of an ascending sort.
    fn rank(&self) -> u8 {
        match self {
            CellValue::Int(_) | CellValue::Float(_) => 0,
            CellValue::Timestamp(_) => 1,
            CellValue::Text(_) => 2,
            CellValue::Bool(_) => 3,
            CellValue::Empty => 4,
        }
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        match (self, other) {
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.cmp(b),
            (Int(a), Float(b)) => OrderedFloat(*a as f64).cmp(b),
            (Float(a), Int(b)) => a.cmp(&OrderedFloat(*b as f64)),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Bool(a), Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Timestamp(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M")),
            CellValue::Text(v) => write!(f, "{}", v),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::float(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(v: DateTime<Utc>) -> Self {
        CellValue::Timestamp(v)
    }
}
