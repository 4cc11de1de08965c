use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::NormalizedTable;

// ---------------------------------------------------------------------------
// Raw data preview (bottom panel)
// ---------------------------------------------------------------------------

/// Show the cleaned survey as a scrollable table.
pub fn data_table(ui: &mut Ui, table: &NormalizedTable) {
    if table.is_empty() {
        ui.label("The survey has no rows.");
        return;
    }

    let row_count = table.row_count();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(90.0), table.columns.len())
        .min_scrolled_height(160.0)
        .header(20.0, |mut header| {
            for column in &table.columns {
                header.col(|ui| {
                    ui.strong(&column.name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, row_count, |mut row| {
                let idx = row.index();
                for column in &table.columns {
                    row.col(|ui| {
                        ui.label(column.cells[idx].to_string());
                    });
                }
            });
        });
}
