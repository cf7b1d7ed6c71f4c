use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::slice::Membership;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the survey table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
/// Used as a key in `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

impl CellValue {
    /// Numeric view of the value; booleans and strings are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Missing: null, or a float NaN.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// `true`, or a non-zero number.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Bool(b) => *b,
            CellValue::Integer(i) => *i != 0,
            CellValue::Float(v) => *v != 0.0 && !v.is_nan(),
            CellValue::String(_) | CellValue::Null => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the survey table
// ---------------------------------------------------------------------------

/// A single survey respondent.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Zero-based position in the loaded table. Survives subsetting.
    pub id: usize,
    /// column_name → value. Absent columns read as null.
    pub cells: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new(id: usize, cells: BTreeMap<String, CellValue>) -> Self {
        Record { id, cells }
    }

    /// Value of `column`, or [`CellValue::Null`] when the row has no such cell.
    pub fn get(&self, column: &str) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.cells.get(column).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// Table – the loaded dataset or a subset of it
// ---------------------------------------------------------------------------

/// An immutable in-memory table with pre-computed column indices.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// All rows, in source order.
    pub records: Vec<Record>,
    /// Column names in source order.
    pub column_names: Vec<String>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Table {
    /// Build a table from positional rows. Row `i` receives id `i`.
    pub fn from_rows(column_names: Vec<String>, rows: Vec<BTreeMap<String, CellValue>>) -> Self {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(id, cells)| Record::new(id, cells))
            .collect();
        Self::from_records(column_names, records)
    }

    /// Build column indices from already-identified records.
    pub fn from_records(column_names: Vec<String>, records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = column_names
            .iter()
            .map(|c| (c.clone(), BTreeSet::new()))
            .collect();

        for rec in &records {
            for col in &column_names {
                if let Some(set) = unique_values.get_mut(col) {
                    set.insert(rec.get(col).clone());
                }
            }
        }
        Table {
            records,
            column_names,
            unique_values,
        }
    }

    /// Build a table from column-major data, handy for small fixtures.
    pub fn from_columns(columns: Vec<(&str, Vec<CellValue>)>) -> Self {
        let names: Vec<String> = columns.iter().map(|(n, _)| n.to_string()).collect();
        let n_rows = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let mut rows = vec![BTreeMap::new(); n_rows];
        for (name, values) in columns {
            for (row, value) in rows.iter_mut().zip(values) {
                row.insert(name.to_string(), value);
            }
        }
        Self::from_rows(names, rows)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// Iterate over the values of one column, row-aligned.
    pub fn column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.records.iter().map(move |r| r.get(column))
    }

    /// Rows whose membership flag is set. Row ids are kept, not renumbered.
    ///
    /// `mask` must be index-aligned with this table.
    pub fn subset(&self, mask: &Membership) -> Table {
        debug_assert_eq!(mask.len(), self.len());
        let records: Vec<Record> = self
            .records
            .iter()
            .zip(mask.iter())
            .filter(|(_, keep)| *keep)
            .map(|(rec, _)| rec.clone())
            .collect();
        Table::from_records(self.column_names.clone(), records)
    }

    /// Smallest and largest numeric value in `column`, ignoring non-numbers.
    pub fn numeric_range(&self, column: &str) -> Option<(f64, f64)> {
        self.column(column)
            .filter_map(CellValue::as_f64)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Row counts per value of `column`, optionally restricted to rows set in
    /// `within`. Sorted by count descending, then by value.
    pub fn distribution(&self, column: &str, within: Option<&Membership>) -> Vec<(CellValue, usize)> {
        let mut counts: BTreeMap<&CellValue, usize> = BTreeMap::new();
        for (idx, rec) in self.records.iter().enumerate() {
            if let Some(mask) = within {
                if !mask.get(idx) {
                    continue;
                }
            }
            *counts.entry(rec.get(column)).or_default() += 1;
        }
        let mut out: Vec<(CellValue, usize)> =
            counts.into_iter().map(|(v, n)| (v.clone(), n)).collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }
}
