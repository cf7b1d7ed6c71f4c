use super::model::{CellValue, Table};
use super::schema::IndicatorColumn;

// ---------------------------------------------------------------------------
// Long-form reason table
// ---------------------------------------------------------------------------

/// Name of the value field in the long table.
pub const AGREE_FIELD: &str = "agree";

/// Which indicator cells become rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AgreePolicy {
    /// Every non-null cell, including explicit 0s.
    #[default]
    KeepPresent,
    /// Only cells that are `true` or non-zero.
    PositiveOnly,
}

impl AgreePolicy {
    fn keeps(self, value: &CellValue) -> bool {
        match self {
            AgreePolicy::KeepPresent => !value.is_null(),
            AgreePolicy::PositiveOnly => value.is_truthy(),
        }
    }
}

/// One `(id, reason, agree)` row.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub id: usize,
    pub reason: String,
    pub agree: CellValue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongTable {
    pub rows: Vec<LongRow>,
}

impl LongTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `sum(agree)` per reason, reasons in first-seen order.
    /// Non-numeric agree cells count as `true` → 1, anything else → 0.
    pub fn agree_totals(&self) -> Vec<(String, f64)> {
        let mut totals: Vec<(String, f64)> = Vec::new();
        for row in &self.rows {
            let v = row
                .agree
                .as_f64()
                .unwrap_or(if row.agree.is_truthy() { 1.0 } else { 0.0 });
            match totals.iter_mut().find(|(reason, _)| *reason == row.reason) {
                Some((_, total)) => *total += v,
                None => totals.push((row.reason.clone(), v)),
            }
        }
        totals
    }
}

/// Reshape the `prefix`-named indicator columns of `table` into long form.
///
/// ```text
///      | why_no_vaccine_cost | why_no_vaccine_fear        id | reason | agree
///  ----+---------------------+--------------------   →   ---+--------+------
///    0 | 1                   | null                       0 | cost   | 1
///    1 | null                | 1                          1 | fear   | 1
/// ```
///
/// A prefix that matches no column yields an empty table.
pub fn to_long(table: &Table, prefix: &str) -> LongTable {
    let indicators = IndicatorColumn::discover(&table.column_names, prefix);
    to_long_with(table, &indicators, AgreePolicy::default())
}

/// Reshape with a pre-resolved indicator list.
pub fn to_long_with(table: &Table, indicators: &[IndicatorColumn], policy: AgreePolicy) -> LongTable {
    let rows = table
        .records
        .iter()
        .flat_map(|rec| {
            indicators.iter().filter_map(move |ind| {
                let value = rec.get(&ind.column);
                policy.keeps(value).then(|| LongRow {
                    id: rec.id,
                    reason: ind.label.clone(),
                    agree: value.clone(),
                })
            })
        })
        .collect();
    LongTable { rows }
}
