//! Writes a synthetic `pulse39.csv` with the Household Pulse layout so the
//! explorer can run without the real extract.
//!
//! ```bash
//! cargo run --bin generate_sample -- [rows] [output.csv]
//! ```

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const GENDERS: &[(&str, u32)] = &[("Female", 52), ("Male", 46), ("Transgender", 1), ("None of these", 1)];
const RACES: &[(&str, u32)] = &[
    ("White", 62),
    ("Hispanic", 17),
    ("Black", 12),
    ("Asian", 6),
    ("Other/multiple", 3),
];
const EDUCATIONS: &[(&str, u32)] = &[
    ("Less than high school", 8),
    ("High school or GED", 27),
    ("Some college/associate's degree", 30),
    ("Bachelor's degree or higher", 35),
];

#[derive(Debug, Serialize)]
struct PulseRow {
    gender: &'static str,
    race: &'static str,
    education: &'static str,
    age: u32,
    received_vaccine: bool,
    /// Only asked of the unvaccinated.
    vaccine_intention: Option<u8>,
    why_no_vaccine_concerned_side_effects: Option<u8>,
    why_no_vaccine_wait_and_see: Option<u8>,
    why_no_vaccine_dont_trust_vaccine: Option<u8>,
    why_no_vaccine_dont_trust_government: Option<u8>,
    why_no_vaccine_dont_need: Option<u8>,
    why_no_vaccine_cost: Option<u8>,
    why_no_vaccine_other: Option<u8>,
}

fn weighted(rng: &mut StdRng, choices: &[(&'static str, u32)]) -> &'static str {
    choices
        .choose_weighted(rng, |(_, w)| *w)
        .map(|(name, _)| *name)
        .unwrap_or(choices[0].0)
}

/// Checked box → 1, occasionally an explicit 0, otherwise left blank.
fn reason(rng: &mut StdRng, p: f64) -> Option<u8> {
    let roll: f64 = rng.random();
    if roll < p {
        Some(1)
    } else if roll < p + 0.05 {
        Some(0)
    } else {
        None
    }
}

fn generate_row(rng: &mut StdRng) -> PulseRow {
    let age = rng.random_range(18..=88);
    let education = weighted(rng, EDUCATIONS);

    // Older and more educated respondents are more likely vaccinated.
    let mut p_vaccinated = 0.55 + (age as f64 - 18.0) / 70.0 * 0.3;
    if education == "Bachelor's degree or higher" {
        p_vaccinated += 0.08;
    }
    let received_vaccine = rng.random_bool(p_vaccinated.min(0.97));

    let (vaccine_intention, reasons) = if received_vaccine {
        (None, [None; 7])
    } else {
        let intention = rng.random_range(1..=5);
        let hesitancy = intention as f64 / 5.0;
        (
            Some(intention),
            [
                reason(rng, 0.3 + 0.3 * hesitancy),
                reason(rng, 0.2 + 0.2 * (1.0 - hesitancy)),
                reason(rng, 0.1 + 0.4 * hesitancy),
                reason(rng, 0.1 + 0.3 * hesitancy),
                reason(rng, 0.05 + 0.3 * hesitancy),
                reason(rng, 0.05),
                reason(rng, 0.1),
            ],
        )
    };

    PulseRow {
        gender: weighted(rng, GENDERS),
        race: weighted(rng, RACES),
        education,
        age,
        received_vaccine,
        vaccine_intention,
        why_no_vaccine_concerned_side_effects: reasons[0],
        why_no_vaccine_wait_and_see: reasons[1],
        why_no_vaccine_dont_trust_vaccine: reasons[2],
        why_no_vaccine_dont_trust_government: reasons[3],
        why_no_vaccine_dont_need: reasons[4],
        why_no_vaccine_cost: reasons[5],
        why_no_vaccine_other: reasons[6],
    }
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("row count '{n}' is not a number"))?,
        None => 2000,
    };
    let output_path = args.next().unwrap_or_else(|| "pulse39.csv".to_string());

    let mut rng = StdRng::seed_from_u64(39);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    for _ in 0..rows {
        writer.serialize(generate_row(&mut rng)).context("writing row")?;
    }
    writer.flush().context("flushing CSV")?;

    println!("Wrote {rows} respondents to {output_path}");
    Ok(())
}
