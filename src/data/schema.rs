use std::collections::BTreeSet;

use crate::error::SchemaError;

use super::model::Table;

// ---------------------------------------------------------------------------
// Column names of the Household Pulse extract
// ---------------------------------------------------------------------------

pub const GENDER: &str = "gender";
pub const RACE: &str = "race";
pub const EDUCATION: &str = "education";
pub const AGE: &str = "age";
pub const RECEIVED_VACCINE: &str = "received_vaccine";
/// 1–5 scale, 5 is certain not to get the vaccine.
pub const VACCINE_INTENTION: &str = "vaccine_intention";
pub const DEFAULT_REASON_PREFIX: &str = "why_no_vaccine_";

// ---------------------------------------------------------------------------
// Slice dimensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    /// Multi-select over the column's unique values.
    Categorical,
    /// Inclusive numeric `[min, max]`.
    Range,
}

/// One filterable column.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub column: String,
    pub label: String,
    pub kind: DimensionKind,
}

impl Dimension {
    pub fn categorical(column: &str, label: &str) -> Self {
        Dimension {
            column: column.to_string(),
            label: label.to_string(),
            kind: DimensionKind::Categorical,
        }
    }

    pub fn range(column: &str, label: &str) -> Self {
        Dimension {
            column: column.to_string(),
            label: label.to_string(),
            kind: DimensionKind::Range,
        }
    }
}

// ---------------------------------------------------------------------------
// Indicator columns
// ---------------------------------------------------------------------------

/// A `prefix + reason` column and the reason label it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorColumn {
    pub column: String,
    pub label: String,
}

impl IndicatorColumn {
    /// Every column in `columns` that starts with `prefix`, in the given order.
    /// A column named exactly `prefix` carries no reason and is skipped.
    pub fn discover<S: AsRef<str>>(columns: &[S], prefix: &str) -> Vec<IndicatorColumn> {
        columns
            .iter()
            .filter_map(|c| {
                let c: &str = c.as_ref();
                let suffix = c.strip_prefix(prefix)?;
                if suffix.is_empty() {
                    return None;
                }
                Some(IndicatorColumn {
                    column: c.to_string(),
                    label: suffix.to_string(),
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// SurveySchema – everything the dashboard assumes about the table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SurveySchema {
    /// Filter dimensions, in display order.
    pub dimensions: Vec<Dimension>,
    /// Boolean outcome summarised as a percentage.
    pub outcome_flag: String,
    /// Numeric outcome summarised as a mean.
    pub outcome_scale: String,
    pub reason_prefix: String,
    /// Resolved by [`SurveySchema::resolve`]; empty until then.
    pub indicators: Vec<IndicatorColumn>,
}

impl Default for SurveySchema {
    fn default() -> Self {
        Self::household_pulse(DEFAULT_REASON_PREFIX)
    }
}

impl SurveySchema {
    /// The Household Pulse layout: gender, race, education, age.
    pub fn household_pulse(reason_prefix: &str) -> Self {
        SurveySchema {
            dimensions: vec![
                Dimension::categorical(GENDER, "Gender"),
                Dimension::categorical(RACE, "Race"),
                Dimension::categorical(EDUCATION, "Education"),
                Dimension::range(AGE, "Age"),
            ],
            outcome_flag: RECEIVED_VACCINE.to_string(),
            outcome_scale: VACCINE_INTENTION.to_string(),
            reason_prefix: reason_prefix.to_string(),
            indicators: Vec::new(),
        }
    }

    /// Add a filter dimension.
    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    pub fn dimension(&self, column: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.column == column)
    }

    /// Check the table against the declared columns and resolve the indicator
    /// family once. Returns the schema with `indicators` filled in.
    pub fn resolve(mut self, table: &Table) -> Result<Self, SchemaError> {
        let mut seen = BTreeSet::new();
        for dim in &self.dimensions {
            if !seen.insert(dim.column.as_str()) {
                return Err(SchemaError::DuplicateDimension(dim.column.clone()));
            }
        }

        let required = self
            .dimensions
            .iter()
            .map(|d| d.column.as_str())
            .chain([self.outcome_flag.as_str(), self.outcome_scale.as_str()]);
        for column in required {
            if !table.has_column(column) {
                return Err(SchemaError::MissingColumn(column.to_string()));
            }
        }

        self.indicators = IndicatorColumn::discover(&table.column_names, &self.reason_prefix);
        if self.indicators.is_empty() {
            log::warn!(
                "No columns start with '{}'; reason charts will be empty",
                self.reason_prefix
            );
        }
        Ok(self)
    }
}
