use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, Table};
use super::schema::{Dimension, DimensionKind};

// ---------------------------------------------------------------------------
// Constraint: the predicate for one column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Row value must be one of these. An empty set means "no restriction".
    Categories(BTreeSet<CellValue>),
    /// Row value must be numeric and within `[min, max]`, both ends inclusive.
    Range { min: f64, max: f64 },
}

impl Constraint {
    /// Whether this constraint restricts anything at all.
    pub fn is_active(&self) -> bool {
        match self {
            Constraint::Categories(allowed) => !allowed.is_empty(),
            Constraint::Range { .. } => true,
        }
    }

    /// Per-row test. Inactive constraints accept every value.
    pub fn accepts(&self, value: &CellValue) -> bool {
        match self {
            Constraint::Categories(allowed) => allowed.is_empty() || allowed.contains(value),
            Constraint::Range { min, max } => value
                .as_f64()
                .is_some_and(|v| *min <= v && v <= *max),
        }
    }
}

// ---------------------------------------------------------------------------
// Criteria: the user's slice definition
// ---------------------------------------------------------------------------

/// Per-column constraints, combined with logical AND.
/// A column that is absent is unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    constraints: BTreeMap<String, Constraint>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict `column` to the given values.
    pub fn with_categories<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let allowed = values.into_iter().map(Into::into).collect();
        self.set(column, Constraint::Categories(allowed));
        self
    }

    /// Restrict `column` to `[min, max]`.
    pub fn with_range(mut self, column: &str, min: f64, max: f64) -> Self {
        self.set(column, Constraint::Range { min, max });
        self
    }

    pub fn set(&mut self, column: &str, constraint: Constraint) {
        self.constraints.insert(column.to_string(), constraint);
    }

    pub fn clear(&mut self, column: &str) {
        self.constraints.remove(column);
    }

    pub fn get(&self, column: &str) -> Option<&Constraint> {
        self.constraints.get(column)
    }

    /// Add `value` to the selected categories of `column`, or remove it if
    /// already selected. A range constraint on `column` is replaced.
    pub fn toggle_category(&mut self, column: &str, value: &CellValue) {
        match self.constraints.get_mut(column) {
            Some(Constraint::Categories(selected)) => {
                if !selected.remove(value) {
                    selected.insert(value.clone());
                }
            }
            _ => self.set(column, Constraint::Categories(BTreeSet::from([value.clone()]))),
        }
    }

    /// Active constraints, keyed by column.
    pub fn active(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.constraints
            .iter()
            .filter(|(_, c)| c.is_active())
            .map(|(col, c)| (col.as_str(), c))
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// Default criteria for a set of dimensions: categorical ones unrestricted,
    /// range ones spanning the full data range of `table`.
    pub fn full_range(dimensions: &[Dimension], table: &Table) -> Self {
        let mut criteria = Criteria::new();
        for dim in dimensions {
            if dim.kind == DimensionKind::Range {
                if let Some((min, max)) = table.numeric_range(&dim.column) {
                    criteria.set(&dim.column, Constraint::Range { min, max });
                }
            }
        }
        criteria
    }
}

// ---------------------------------------------------------------------------
// Membership vector
// ---------------------------------------------------------------------------

/// One flag per table row, index-aligned with the table it was computed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership(Vec<bool>);

impl From<Vec<bool>> for Membership {
    fn from(flags: Vec<bool>) -> Self {
        Membership(flags)
    }
}

impl Membership {
    /// Every one of `len` rows is a member.
    pub fn all(len: usize) -> Self {
        Membership(vec![true; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of members.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|m| **m).count()
    }

    /// Flag of row `idx`; out-of-range rows are not members.
    pub fn get(&self, idx: usize) -> bool {
        self.0.get(idx).copied().unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// The rows outside the slice.
    pub fn complement(&self) -> Membership {
        Membership(self.0.iter().map(|m| !m).collect())
    }

    /// AND the per-row test of `constraint` on `column` into this vector.
    pub fn intersect(&mut self, table: &Table, column: &str, constraint: &Constraint) {
        if !constraint.is_active() {
            return;
        }
        for (flag, rec) in self.0.iter_mut().zip(&table.records) {
            *flag = *flag && constraint.accepts(rec.get(column));
        }
    }
}

/// Which rows of `table` satisfy every active constraint in `criteria`.
pub fn membership(table: &Table, criteria: &Criteria) -> Membership {
    let mut labels = Membership::all(table.len());
    for (column, constraint) in criteria.active() {
        labels.intersect(table, column, constraint);
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{AGE, EDUCATION, GENDER, RACE};

    fn s(v: &str) -> CellValue {
        CellValue::from(v)
    }

    fn ints(v: &[i64]) -> Vec<CellValue> {
        v.iter().map(|i| CellValue::Integer(*i)).collect()
    }

    fn survey() -> Table {
        Table::from_columns(vec![
            (GENDER, vec![s("Male"), s("Female"), s("Female"), s("Male"), s("Transgender")]),
            (RACE, vec![s("White"), s("Black"), s("White"), s("Asian"), s("White")]),
            (
                EDUCATION,
                vec![s("Bachelor"), s("High school"), s("Graduate"), s("Bachelor"), s("Bachelor")],
            ),
            (AGE, ints(&[25, 40, 67, 33, 19])),
        ])
    }

    #[test]
    fn test_no_constraints_all_members() {
        let t = survey();
        let m = membership(&t, &Criteria::new());
        assert_eq!(m.len(), t.len());
        assert_eq!(m.count(), t.len());
    }

    #[test]
    fn test_empty_category_set_is_no_restriction() {
        let t = survey();
        let criteria = Criteria::new().with_categories::<_, &str>(GENDER, []);
        assert_eq!(criteria.active_count(), 0);
        assert_eq!(membership(&t, &criteria).count(), t.len());
    }

    #[test]
    fn test_single_gender() {
        let t = Table::from_columns(vec![(GENDER, vec![s("M"), s("F"), s("M")])]);
        let m = membership(&t, &Criteria::new().with_categories(GENDER, ["F"]));
        assert_eq!(m.as_slice(), &[false, true, false]);
    }

    #[test]
    fn test_age_bounds_inclusive() {
        let t = Table::from_columns(vec![(AGE, ints(&[17, 18, 65, 66]))]);
        let m = membership(&t, &Criteria::new().with_range(AGE, 18.0, 65.0));
        assert_eq!(m.as_slice(), &[false, true, true, false]);
    }

    #[test]
    fn test_range_rejects_null_and_text() {
        let t = Table::from_columns(vec![(AGE, vec![CellValue::Null, s("forty"), CellValue::Integer(40)])]);
        let m = membership(&t, &Criteria::new().with_range(AGE, 0.0, 100.0));
        assert_eq!(m.as_slice(), &[false, false, true]);
    }

    #[test]
    fn test_conjunction_of_dimensions() {
        let t = survey();
        let criteria = Criteria::new()
            .with_categories(RACE, ["White"])
            .with_categories(EDUCATION, ["Bachelor"])
            .with_range(AGE, 18.0, 30.0);
        let m = membership(&t, &criteria);
        assert_eq!(m.as_slice(), &[true, false, false, false, true]);
    }

    #[test]
    fn test_adding_constraints_never_grows_slice() {
        let t = survey();
        let steps = [
            Criteria::new(),
            Criteria::new().with_categories(GENDER, ["Male", "Female"]),
            Criteria::new()
                .with_categories(GENDER, ["Male", "Female"])
                .with_categories(RACE, ["White", "Asian"]),
            Criteria::new()
                .with_categories(GENDER, ["Male", "Female"])
                .with_categories(RACE, ["White", "Asian"])
                .with_range(AGE, 20.0, 50.0),
        ];
        let counts: Vec<usize> = steps.iter().map(|c| membership(&t, c).count()).collect();
        assert!(counts.windows(2).all(|w| w[1] <= w[0]), "{counts:?}");
        assert_eq!(counts, vec![5, 4, 3, 2]);
    }

    #[test]
    fn test_order_independent() {
        let t = survey();
        let constraints = vec![
            (GENDER, Constraint::Categories([s("Male"), s("Female")].into())),
            (RACE, Constraint::Categories([s("White")].into())),
            (AGE, Constraint::Range { min: 20.0, max: 70.0 }),
        ];
        let expected = {
            let mut criteria = Criteria::new();
            for (col, c) in &constraints {
                criteria.set(col, c.clone());
            }
            membership(&t, &criteria)
        };

        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            let mut m = Membership::all(t.len());
            for i in order {
                let (col, c) = &constraints[i];
                m.intersect(&t, col, c);
            }
            assert_eq!(m, expected, "order {order:?}");
        }
    }

    #[test]
    fn test_complement() {
        let m = Membership::from(vec![true, false, true]);
        assert_eq!(m.complement().as_slice(), &[false, true, false]);
        assert_eq!(m.complement().count(), 1);
    }

    #[test]
    fn test_null_category_can_be_selected() {
        let t = Table::from_columns(vec![(RACE, vec![s("White"), CellValue::Null])]);
        let criteria = Criteria::new().with_categories(RACE, [CellValue::Null]);
        assert_eq!(membership(&t, &criteria).as_slice(), &[false, true]);
    }

    #[test]
    fn test_toggle_category_replaces_range() {
        let mut criteria = Criteria::new().with_range(AGE, 1.0, 2.0);
        criteria.toggle_category(AGE, &CellValue::Integer(40));
        assert!(matches!(criteria.get(AGE), Some(Constraint::Categories(set)) if set.len() == 1));
    }

    #[test]
    fn test_toggle_category_twice_deactivates() {
        let mut criteria = Criteria::new();
        criteria.toggle_category(GENDER, &s("F"));
        criteria.toggle_category(GENDER, &s("M"));
        assert_eq!(criteria.active_count(), 1);
        criteria.toggle_category(GENDER, &s("F"));
        criteria.toggle_category(GENDER, &s("M"));
        assert_eq!(criteria.active_count(), 0);
        assert_eq!(criteria.get(GENDER), Some(&Constraint::Categories(BTreeSet::new())));
    }

    #[test]
    fn test_full_range_defaults() {
        let t = survey();
        let dims = vec![Dimension::categorical(GENDER, "Gender"), Dimension::range(AGE, "Age")];
        let criteria = Criteria::full_range(&dims, &t);
        assert_eq!(criteria.get(AGE), Some(&Constraint::Range { min: 19.0, max: 67.0 }));
        assert!(criteria.get(GENDER).is_none());
        assert_eq!(membership(&t, &criteria).count(), t.len());
    }
}
