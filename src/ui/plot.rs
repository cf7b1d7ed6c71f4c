use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Plot};

use crate::color::{ColorMap, brush_color};
use crate::data::model::CellValue;
use crate::data::reshape::{AGREE_FIELD, LongTable};

const BAR_ROW_HEIGHT: f32 = 22.0;
const MIN_PLOT_HEIGHT: f32 = 120.0;

/// Horizontal bars, one per `(label, value, colour)`, top to bottom in the
/// given order. Returns the index of a clicked bar, if any.
fn horizontal_bars(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    bars: Vec<(String, f64, Color32)>,
) -> Option<usize> {
    let n = bars.len();
    // Bar i sits at y = n - 1 - i so the first entry is drawn on top.
    let labels: Vec<String> = bars.iter().rev().map(|(l, _, _)| l.clone()).collect();
    let chart_bars: Vec<Bar> = bars
        .into_iter()
        .enumerate()
        .map(|(i, (label, value, color))| {
            Bar::new((n - 1 - i) as f64, value)
                .name(label)
                .fill(color)
                .width(0.7)
        })
        .collect();
    let chart = BarChart::new(chart_bars).horizontal();

    let height = (n as f32 * BAR_ROW_HEIGHT).max(MIN_PLOT_HEIGHT);
    let response = Plot::new(id)
        .height(height)
        .x_axis_label(x_label)
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            plot_ui.pointer_coordinate()
        });

    if !response.response.clicked() {
        return None;
    }
    let y = response.inner?.y.round();
    if y < 0.0 || y >= n as f64 {
        return None;
    }
    Some(n - 1 - y as usize)
}

/// Axis text for a grid mark: the category at an integer position, blank elsewhere.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Overview: categorical distributions with brushing
// ---------------------------------------------------------------------------

/// `count()` per category. Bars in `brush` are highlighted; when the brush is
/// empty every bar is. Returns the category of a clicked bar.
pub fn distribution_chart(
    ui: &mut Ui,
    id: &str,
    counts: &[(CellValue, usize)],
    brush: &BTreeSet<CellValue>,
    highlight: Color32,
) -> Option<CellValue> {
    let bars = counts
        .iter()
        .map(|(value, n)| {
            let color = brush_color(brush.contains(value), !brush.is_empty(), highlight);
            (value.to_string(), *n as f64, color)
        })
        .collect();
    let clicked = horizontal_bars(ui, id, "count", bars)?;
    counts.get(clicked).map(|(v, _)| v.clone())
}

// ---------------------------------------------------------------------------
// Reason endorsement
// ---------------------------------------------------------------------------

/// `sum(agree)` per reason.
pub fn reason_chart(ui: &mut Ui, id: &str, reasons: &LongTable, colors: &ColorMap) {
    let totals = reasons.agree_totals();
    if totals.is_empty() {
        ui.label("No reasons recorded.");
        return;
    }
    let bars = totals
        .into_iter()
        .map(|(reason, total)| {
            let color = colors.color_for(&reason);
            (reason, total, color)
        })
        .collect();
    horizontal_bars(ui, id, &format!("sum({AGREE_FIELD})"), bars);
}
