use rand::Rng;
use rand::seq::IndexedRandom;

use super::model::{CellValue, Record, Table};
use super::schema::{AGE, DimensionKind, EDUCATION, SurveySchema};

/// Pick one respondent uniformly at random. `None` when the table is empty.
pub fn sample_person<'a, R: Rng + ?Sized>(table: &'a Table, rng: &mut R) -> Option<&'a Record> {
    table.records.choose(rng)
}

/// One-sentence description of a respondent built from the schema's
/// dimensions and outcomes, e.g.
/// "Respondent #12: a 34-year-old Female, White, with Bachelor's degree or higher education;
/// received the vaccine. Reasons given for not getting vaccinated: cost, fear."
pub fn describe_person(record: &Record, schema: &SurveySchema) -> String {
    let known = |col: &str| -> Option<String> {
        match record.get(col) {
            v if v.is_null() => None,
            CellValue::Float(v) if v.fract() == 0.0 => Some(format!("{v:.0}")),
            other => Some(other.to_string()),
        }
    };

    let mut age = None;
    let mut identity = Vec::new();
    let mut details = Vec::new();
    for dim in &schema.dimensions {
        let Some(value) = known(&dim.column) else {
            continue;
        };
        match (dim.kind, dim.column.as_str()) {
            (DimensionKind::Range, AGE) => age = Some(value),
            (_, EDUCATION) => details.push(format!("{value} education")),
            (DimensionKind::Categorical, _) => identity.push(value),
            (DimensionKind::Range, _) => {
                details.push(format!("{} {value}", dim.label.to_lowercase()))
            }
        }
    }

    let mut who = vec![match age {
        Some(age) => format!("a {age}-year-old"),
        None => "a respondent of unknown age".to_string(),
    }];
    if !identity.is_empty() {
        who.push(identity.join(", "));
    }
    let mut text = format!("Respondent #{}: {}", record.id, who.join(" "));
    if !details.is_empty() {
        text.push_str(&format!(", with {}", details.join(" and ")));
    }

    let vaccine = match record.get(&schema.outcome_flag) {
        CellValue::Bool(true) => "received the vaccine".to_string(),
        CellValue::Bool(false) => match known(&schema.outcome_scale) {
            Some(intent) => format!("has not received the vaccine (intention {intent} of 5)"),
            None => "has not received the vaccine".to_string(),
        },
        _ => "vaccination status unknown".to_string(),
    };
    text.push_str("; ");
    text.push_str(&vaccine);
    text.push('.');

    let reasons: Vec<&str> = schema
        .indicators
        .iter()
        .filter(|ind| record.get(&ind.column).is_truthy())
        .map(|ind| ind.label.as_str())
        .collect();
    if !reasons.is_empty() {
        text.push_str(&format!(
            " Reasons given for not getting vaccinated: {}.",
            reasons.join(", ")
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{
        Dimension, GENDER, IndicatorColumn, RACE, RECEIVED_VACCINE, VACCINE_INTENTION,
    };
    use crate::data::slice::Membership;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn people() -> Table {
        people_with(Vec::new())
    }

    fn people_with(extra: Vec<(&str, Vec<CellValue>)>) -> Table {
        let mut columns = vec![
            (GENDER, vec![CellValue::from("Female"), CellValue::from("Male")]),
            (RACE, vec![CellValue::from("White"), CellValue::Null]),
            (EDUCATION, vec![CellValue::from("Bachelor's degree or higher"), CellValue::Null]),
            (AGE, vec![CellValue::Integer(34), CellValue::Float(51.0)]),
            (RECEIVED_VACCINE, vec![CellValue::Bool(true), CellValue::Bool(false)]),
            (VACCINE_INTENTION, vec![CellValue::Null, CellValue::Integer(4)]),
            ("why_no_vaccine_cost", vec![CellValue::Null, CellValue::Integer(1)]),
            ("why_no_vaccine_fear", vec![CellValue::Null, CellValue::Integer(0)]),
        ];
        columns.extend(extra);
        Table::from_columns(columns)
    }

    fn schema(table: &Table) -> SurveySchema {
        SurveySchema {
            indicators: IndicatorColumn::discover(&table.column_names, "why_no_vaccine_"),
            ..SurveySchema::default()
        }
    }

    #[test]
    fn test_sample_from_empty_table() {
        let t = people().subset(&Membership::from(vec![false, false]));
        let mut rng = StdRng::seed_from_u64(7);
        assert!(sample_person(&t, &mut rng).is_none());
    }

    #[test]
    fn test_sample_stays_in_subset() {
        let t = people().subset(&Membership::from(vec![false, true]));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10 {
            assert_eq!(sample_person(&t, &mut rng).map(|r| r.id), Some(1));
        }
    }

    #[test]
    fn test_describe_vaccinated() {
        let t = people();
        let text = describe_person(&t.records[0], &schema(&t));
        assert_eq!(
            text,
            "Respondent #0: a 34-year-old Female, White, with Bachelor's degree or higher education; \
             received the vaccine."
        );
    }

    #[test]
    fn test_describe_unvaccinated_lists_reasons() {
        let t = people();
        let text = describe_person(&t.records[1], &schema(&t));
        assert!(text.starts_with("Respondent #1: a 51-year-old Male;"), "{text}");
        assert!(text.contains("intention 4 of 5"));
        assert!(text.ends_with("Reasons given for not getting vaccinated: cost."));
    }

    #[test]
    fn test_describe_includes_added_dimensions() {
        let t = people_with(vec![
            ("state", vec![CellValue::from("Ohio"), CellValue::Null]),
            ("income", vec![CellValue::Integer(52000), CellValue::Null]),
        ]);
        let schema = SurveySchema {
            indicators: IndicatorColumn::discover(&t.column_names, "why_no_vaccine_"),
            ..SurveySchema::default()
                .with_dimension(Dimension::categorical("state", "State"))
                .with_dimension(Dimension::range("income", "Income"))
        };
        let text = describe_person(&t.records[0], &schema);
        assert!(
            text.starts_with(
                "Respondent #0: a 34-year-old Female, White, Ohio, with Bachelor's degree or higher \
                 education and income 52000;"
            ),
            "{text}"
        );
    }

    #[test]
    fn test_describe_without_age_dimension() {
        let t = people();
        let mut schema = SurveySchema::default();
        schema.dimensions.retain(|d| d.column != AGE);
        let text = describe_person(&t.records[1], &schema);
        assert!(text.starts_with("Respondent #1: a respondent of unknown age Male;"), "{text}");
    }
}
