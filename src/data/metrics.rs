use super::model::{CellValue, Table};
use super::schema::SurveySchema;

/// Percentage (0–100) of rows whose `column` is boolean `true`.
/// `None` for an empty table.
pub fn percentage_true(table: &Table, column: &str) -> Option<f64> {
    if table.is_empty() {
        return None;
    }
    let hits = table
        .column(column)
        .filter(|v| matches!(v, CellValue::Bool(true)))
        .count();
    Some(hits as f64 / table.len() as f64 * 100.0)
}

/// Mean of the numeric cells of `column`, nulls skipped.
/// `None` for an empty table or a column without numbers.
pub fn mean(table: &Table, column: &str) -> Option<f64> {
    let (sum, n) = table
        .column(column)
        .filter_map(CellValue::as_f64)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Round to two decimals, ties to even (`round(x, 2)` in Python).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Headline numbers for one side of the slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceSummary {
    pub rows: usize,
    /// Share of respondents who received the vaccine, in percent.
    pub received_pct: f64,
    /// Mean intention; `None` when nobody answered.
    pub mean_intention: Option<f64>,
}

impl SliceSummary {
    /// `None` when `table` has no rows.
    pub fn compute(table: &Table, schema: &SurveySchema) -> Option<Self> {
        let received_pct = percentage_true(table, &schema.outcome_flag)?;
        Some(SliceSummary {
            rows: table.len(),
            received_pct: round2(received_pct),
            mean_intention: mean(table, &schema.outcome_scale).map(round2),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{RECEIVED_VACCINE, VACCINE_INTENTION};
    use crate::data::slice::Membership;

    fn outcomes() -> Table {
        Table::from_columns(vec![
            (
                RECEIVED_VACCINE,
                vec![
                    CellValue::Bool(true),
                    CellValue::Bool(false),
                    CellValue::Bool(true),
                    CellValue::Null,
                ],
            ),
            (
                VACCINE_INTENTION,
                vec![
                    CellValue::Null,
                    CellValue::Integer(5),
                    CellValue::Null,
                    CellValue::Float(2.0),
                ],
            ),
        ])
    }

    #[test]
    fn test_percentage_true() {
        assert_eq!(percentage_true(&outcomes(), RECEIVED_VACCINE), Some(50.0));
    }

    #[test]
    fn test_mean_skips_nulls() {
        assert_eq!(mean(&outcomes(), VACCINE_INTENTION), Some(3.5));
    }

    #[test]
    fn test_empty_table_has_no_metrics() {
        let empty = outcomes().subset(&Membership::from(vec![false; 4]));
        assert_eq!(percentage_true(&empty, RECEIVED_VACCINE), None);
        assert_eq!(mean(&empty, VACCINE_INTENTION), None);
        assert_eq!(SliceSummary::compute(&empty, &SurveySchema::default()), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(1.0 / 3.0 * 100.0), 33.33);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(2.125), 2.12);
        assert_eq!(round2(0.375), 0.38);
    }

    #[test]
    fn test_summary_mean_ties_to_even() {
        let mut intentions = vec![CellValue::Integer(2); 7];
        intentions.push(CellValue::Integer(3));
        let t = Table::from_columns(vec![
            (RECEIVED_VACCINE, vec![CellValue::Bool(false); 8]),
            (VACCINE_INTENTION, intentions),
        ]);
        let summary = SliceSummary::compute(&t, &SurveySchema::default()).unwrap();
        assert_eq!(summary.mean_intention, Some(2.12));
    }

    #[test]
    fn test_summary_rounds() {
        let t = Table::from_columns(vec![
            (
                RECEIVED_VACCINE,
                vec![CellValue::Bool(true), CellValue::Bool(false), CellValue::Bool(false)],
            ),
            (
                VACCINE_INTENTION,
                vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(2)],
            ),
        ]);
        let summary = SliceSummary::compute(&t, &SurveySchema::default()).unwrap();
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.received_pct, 33.33);
        assert_eq!(summary.mean_intention, Some(1.67));
    }

    #[test]
    fn test_summary_without_intentions() {
        let t = Table::from_columns(vec![
            (RECEIVED_VACCINE, vec![CellValue::Bool(true)]),
            (VACCINE_INTENTION, vec![CellValue::Null]),
        ]);
        let summary = SliceSummary::compute(&t, &SurveySchema::default()).unwrap();
        assert_eq!(summary.received_pct, 100.0);
        assert_eq!(summary.mean_intention, None);
    }
}
