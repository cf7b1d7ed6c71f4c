use std::collections::BTreeSet;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::metrics::SliceSummary;
use crate::data::model::{CellValue, Table};
use crate::data::reshape::{AgreePolicy, LongTable, to_long_with};
use crate::data::sample::{describe_person, sample_person};
use crate::data::schema::{DimensionKind, EDUCATION, RACE, SurveySchema};
use crate::data::slice::{Constraint, Criteria, Membership, membership};

// ---------------------------------------------------------------------------
// Derived view of one side of the slice
// ---------------------------------------------------------------------------

/// Everything the charts need for one side. `summary` and `reasons` are
/// `None` when the side has no rows.
#[derive(Debug, Clone, Default)]
pub struct SideView {
    pub table: Table,
    pub summary: Option<SliceSummary>,
    pub reasons: Option<LongTable>,
}

impl SideView {
    fn compute(table: Table, schema: &SurveySchema, policy: AgreePolicy) -> Self {
        if table.is_empty() {
            return SideView {
                table,
                summary: None,
                reasons: None,
            };
        }
        let summary = SliceSummary::compute(&table, schema);
        let reasons = Some(to_long_with(&table, &schema.indicators, policy));
        SideView {
            table,
            summary,
            reasons,
        }
    }
}

/// Membership plus both sides, recomputed from scratch on each change.
#[derive(Debug, Clone)]
pub struct SliceView {
    pub membership: Membership,
    pub in_slice: SideView,
    pub out_slice: SideView,
}

impl SliceView {
    pub fn compute(table: &Table, schema: &SurveySchema, criteria: &Criteria, policy: AgreePolicy) -> Self {
        let membership = membership(table, criteria);
        let in_slice = SideView::compute(table.subset(&membership), schema, policy);
        let out_slice = SideView::compute(table.subset(&membership.complement()), schema, policy);
        log::debug!(
            "Slice: {} in, {} out ({} active constraints)",
            in_slice.table.len(),
            out_slice.table.len(),
            criteria.active_count()
        );
        SliceView {
            membership,
            in_slice,
            out_slice,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, never mutated.
    pub table: Arc<Table>,

    /// Declared dimensions and resolved indicator columns.
    pub schema: SurveySchema,

    /// The user's slice definition.
    pub criteria: Criteria,

    /// Selected bars on the overview race / education charts.
    pub race_brush: BTreeSet<CellValue>,
    pub education_brush: BTreeSet<CellValue>,

    /// Cached derived view for the current `criteria`.
    pub view: SliceView,

    pub agree_policy: AgreePolicy,

    /// One colour per reason, shared by both reason charts.
    pub reason_colors: ColorMap,

    /// Text of the last sampled respondent.
    pub sampled_person: Option<String>,

    /// Status / info message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: Arc<Table>, schema: SurveySchema) -> Self {
        let criteria = Criteria::full_range(&schema.dimensions, &table);
        let agree_policy = AgreePolicy::default();
        let view = SliceView::compute(&table, &schema, &criteria, agree_policy);
        let reason_colors = ColorMap::new(schema.indicators.iter().map(|i| i.label.clone()));
        Self {
            table,
            schema,
            criteria,
            race_brush: BTreeSet::new(),
            education_brush: BTreeSet::new(),
            view,
            agree_policy,
            reason_colors,
            sampled_person: None,
            status_message: None,
        }
    }

    /// Recompute the slice view after a criteria or policy change.
    pub fn refresh(&mut self) {
        self.view = SliceView::compute(&self.table, &self.schema, &self.criteria, self.agree_policy);
    }

    /// Toggle a single category in a categorical dimension.
    pub fn toggle_category(&mut self, column: &str, value: &CellValue) {
        self.criteria.toggle_category(column, value);
        self.refresh();
    }

    /// Set an inclusive range on a range dimension. Bounds are swapped if reversed.
    pub fn set_range(&mut self, column: &str, min: f64, max: f64) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.criteria.set(column, Constraint::Range { min, max });
        self.refresh();
    }

    /// Drop the constraint on one dimension (range dimensions go back to the full data range).
    pub fn clear_dimension(&mut self, column: &str) {
        self.criteria.clear(column);
        if let Some((min, max)) = self.full_range_of(column) {
            self.criteria.set(column, Constraint::Range { min, max });
        }
        self.refresh();
    }

    /// Back to the unfiltered state.
    pub fn reset(&mut self) {
        self.criteria = Criteria::full_range(&self.schema.dimensions, &self.table);
        self.race_brush.clear();
        self.education_brush.clear();
        self.sampled_person = None;
        self.refresh();
    }

    pub fn set_agree_policy(&mut self, policy: AgreePolicy) {
        if self.agree_policy != policy {
            self.agree_policy = policy;
            self.refresh();
        }
    }

    /// Data range of `column` if it is a declared range dimension.
    pub fn full_range_of(&self, column: &str) -> Option<(f64, f64)> {
        let dim = self.schema.dimension(column)?;
        if dim.kind != DimensionKind::Range {
            return None;
        }
        self.table.numeric_range(column)
    }

    // -- overview brushes --

    pub fn toggle_brush(&mut self, column: &str, value: &CellValue) {
        let brush = match column {
            RACE => &mut self.race_brush,
            EDUCATION => &mut self.education_brush,
            other => {
                log::warn!("No brush for column '{other}'");
                return;
            }
        };
        if !brush.remove(value) {
            brush.insert(value.clone());
        }
    }

    /// Counts for an overview chart of `column`, restricted to rows matching
    /// the *other* chart's brush.
    pub fn brushed_distribution(&self, column: &str) -> Vec<(CellValue, usize)> {
        let (other_col, other_brush) = match column {
            RACE => (EDUCATION, &self.education_brush),
            EDUCATION => (RACE, &self.race_brush),
            _ => return self.table.distribution(column, None),
        };
        let criteria = Criteria::new().with_categories(other_col, other_brush.iter().cloned());
        let within = membership(&self.table, &criteria);
        self.table.distribution(column, Some(&within))
    }

    // -- person sampling --

    /// Draw a random respondent from the current slice and describe them.
    pub fn sample_person(&mut self) {
        let mut rng = rand::rng();
        self.sampled_person = match sample_person(&self.view.in_slice.table, &mut rng) {
            Some(rec) => Some(describe_person(rec, &self.schema)),
            None => Some("The slice is empty; nobody to sample.".to_string()),
        };
    }
}
