use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{CellValue, Table};

const ROW_HEIGHT: f32 = 18.0;
const MAX_TABLE_HEIGHT: f32 = 280.0;

/// Raw table view: an `id` column then every source column.
pub fn raw_table(ui: &mut Ui, id: &str, table: &Table) {
    let columns = &table.column_names;
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(MAX_TABLE_HEIGHT)
            .column(Column::auto().at_least(40.0))
            .columns(Column::auto().at_least(60.0).clip(true), columns.len())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("id");
                });
                for name in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.len(), |mut row| {
                    let rec = &table.records[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(rec.id.to_string());
                    });
                    for name in columns {
                        row.col(|ui: &mut Ui| match rec.get(name) {
                            CellValue::Null => {
                                ui.label(RichText::new("null").weak());
                            }
                            value => {
                                ui.label(value.to_string());
                            }
                        });
                    }
                });
            });
    });
}
