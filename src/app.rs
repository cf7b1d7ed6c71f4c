use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color::{EDUCATION_BRUSH, RACE_BRUSH};
use crate::data::schema::{EDUCATION, RACE};
use crate::state::{AppState, SideView};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PulseExplorerApp {
    pub state: AppState,
}

impl PulseExplorerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PulseExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: dataset summary ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: slice controls ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: overview, slice comparison, sampling ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    overview(ui, &mut self.state);
                    ui.add_space(12.0);
                    slice_comparison(ui, &self.state);
                    ui.add_space(12.0);
                    person_sampling(ui, &mut self.state);
                });
        });
    }
}

fn overview(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Overview");
    egui::CollapsingHeader::new("Raw data")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            table::raw_table(ui, "raw_table", &state.table);
        });

    ui.label(RichText::new("Click a bar to brush; each chart counts only rows matching the other's brush.").weak());

    for (column, highlight) in [(RACE, RACE_BRUSH), (EDUCATION, EDUCATION_BRUSH)] {
        ui.horizontal(|ui: &mut Ui| {
            ui.strong(column);
            if ui.small_button("Clear brush").clicked() {
                match column {
                    RACE => state.race_brush.clear(),
                    _ => state.education_brush.clear(),
                }
            }
        });
        let counts = state.brushed_distribution(column);
        let brush = match column {
            RACE => &state.race_brush,
            _ => &state.education_brush,
        };
        let clicked = plot::distribution_chart(ui, column, &counts, brush, highlight);
        if let Some(value) = clicked {
            state.toggle_brush(column, &value);
        }
    }
}

fn slice_comparison(ui: &mut Ui, state: &AppState) {
    ui.heading("Slice comparison");
    ui.columns(2, |cols: &mut [Ui]| {
        side_column(&mut cols[0], "In slice", "reasons_in", &state.view.in_slice, state);
        side_column(&mut cols[1], "Out of slice", "reasons_out", &state.view.out_slice, state);
    });
}

/// Metrics and reason chart for one side, or a note when the side is empty.
fn side_column(ui: &mut Ui, title: &str, chart_id: &str, side: &SideView, state: &AppState) {
    ui.strong(format!("{title} ({} rows)", side.table.len()));
    let (Some(summary), Some(reasons)) = (&side.summary, &side.reasons) else {
        ui.label("No respondents on this side.");
        return;
    };

    ui.label(format!("Percentage received vaccine: {:.2}", summary.received_pct));
    match summary.mean_intention {
        Some(m) => ui.label(format!("Mean intention (5 is certain not to get vaccine): {m:.2}")),
        None => ui.label("Mean intention: no answers"),
    };
    plot::reason_chart(ui, chart_id, reasons, &state.reason_colors);
}

fn person_sampling(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Person sampling");
    if ui.button("Sample a person from the slice").clicked() {
        state.sample_person();
    }
    if let Some(text) = &state.sampled_person {
        ui.label(text);
    }
}
