use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::reshape::AgreePolicy;
use crate::data::schema::DimensionKind;
use crate::data::slice::Constraint;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – slice controls
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Custom slicing");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Reset").clicked() {
            state.reset();
        }
        ui.label(format!(
            "{} / {} in slice",
            state.view.membership.count(),
            state.table.len()
        ));
    });
    ui.separator();

    // Clone what we need so we can mutate state inside the loop.
    let dimensions = state.schema.dimensions.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in &dimensions {
                match dim.kind {
                    DimensionKind::Categorical => categorical_filter(ui, state, &dim.column, &dim.label),
                    DimensionKind::Range => range_filter(ui, state, &dim.column, &dim.label),
                }
            }

            ui.separator();
            ui.strong("Reason rows");
            let mut policy = state.agree_policy;
            ui.radio_value(&mut policy, AgreePolicy::KeepPresent, "Every answered reason")
                .on_hover_text("Rows with an explicit 0 are kept; they add nothing to the sums.");
            ui.radio_value(&mut policy, AgreePolicy::PositiveOnly, "Endorsed reasons only");
            state.set_agree_policy(policy);
        });
}

/// Multi-select over one column's unique values. Nothing checked = no restriction.
fn categorical_filter(ui: &mut Ui, state: &mut AppState, column: &str, label: &str) {
    let Some(all_values) = state.table.unique_values.get(column).cloned() else {
        return;
    };

    let n_selected = match state.criteria.get(column) {
        Some(Constraint::Categories(set)) => set.len(),
        _ => 0,
    };
    let header_text = if n_selected == 0 {
        format!("{label}  (all)")
    } else {
        format!("{label}  ({n_selected}/{})", all_values.len())
    };

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            if ui.small_button("Clear").clicked() {
                state.clear_dimension(column);
            }

            for val in &all_values {
                let mut checked = matches!(
                    state.criteria.get(column),
                    Some(Constraint::Categories(set)) if set.contains(val)
                );
                if ui.checkbox(&mut checked, val.to_string()).changed() {
                    state.toggle_category(column, val);
                }
            }
        });
}

/// Two sliders for an inclusive `[min, max]`, bounded by the data range.
fn range_filter(ui: &mut Ui, state: &mut AppState, column: &str, label: &str) {
    let Some((lo, hi)) = state.full_range_of(column) else {
        ui.label(format!("{label}: no numeric values"));
        return;
    };
    let (mut min, mut max) = match state.criteria.get(column) {
        Some(Constraint::Range { min, max }) => (*min, *max),
        _ => (lo, hi),
    };

    egui::CollapsingHeader::new(RichText::new(format!("{label}  ({min:.0}–{max:.0})")).strong())
        .id_salt(column)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            let changed_min = ui
                .add(egui::Slider::new(&mut min, lo..=hi).text("min").integer())
                .changed();
            let changed_max = ui
                .add(egui::Slider::new(&mut max, lo..=hi).text("max").integer())
                .changed();
            if changed_min || changed_max {
                state.set_range(column, min, max);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Household Pulse Explorable");
        ui.separator();

        ui.label(format!(
            "{} respondents, {} columns, {} reasons",
            state.table.len(),
            state.table.column_names.len(),
            state.schema.indicators.len()
        ));

        ui.separator();

        let active = state.criteria.active_count();
        ui.label(format!(
            "{} in slice, {} outside",
            state.view.in_slice.table.len(),
            state.view.out_slice.table.len()
        ))
        .on_hover_text(format!("{active} active constraints"));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::GRAY));
        }
    });
}
