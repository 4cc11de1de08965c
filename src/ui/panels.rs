use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::export::html::HtmlExporter;
use crate::export::png::PngExporter;
use crate::export::ChartExporter;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – measurement selector
// ---------------------------------------------------------------------------

/// Render the left measurement panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Measurements");
    ui.separator();

    if !state.has_survey() {
        ui.label("No survey loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the loop.
    let rows: Vec<(String, String, Color32)> = state
        .available_measurements()
        .iter()
        .map(|m| (m.key.clone(), m.label.clone(), state.colors.color_for(&m.key)))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if rows.is_empty() {
                ui.label("The survey has none of the known measurement columns.");
            }
            for (key, label, color) in &rows {
                let is_selected = state.selected.as_deref() == Some(key.as_str());
                if ui
                    .selectable_label(is_selected, RichText::new(label).color(*color))
                    .clicked()
                {
                    state.select_measurement(key);
                }
            }

            ui.separator();
            if let Some(source) = &state.source {
                let name = source
                    .path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("survey");
                ui.label(format!("File: {name}"));
            }
            if let Some(table) = &state.table {
                ui.label(format!(
                    "{} stations, {} columns",
                    table.row_count(),
                    table.columns.len()
                ));
            }
            ui.label(format!(
                "{} of {} catalog measurements present",
                rows.len(),
                state.catalog.len()
            ));
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload_survey();
                ui.close_menu();
            }
        });

        ui.separator();

        let exportable = state.chart.is_some();
        if ui
            .add_enabled(exportable, egui::Button::new("Export PNG…"))
            .clicked()
        {
            save_chart_dialog(state, &PngExporter::default());
        }
        if ui
            .add_enabled(exportable, egui::Button::new("Export HTML…"))
            .clicked()
        {
            save_chart_dialog(state, &HtmlExporter);
        }

        ui.separator();

        if ui
            .selectable_label(state.show_table, "Data table")
            .clicked()
        {
            state.show_table = !state.show_table;
        }

        if let Some(table) = &state.table {
            ui.separator();
            ui.label(format!(
                "{} stations, {} measurements",
                table.row_count(),
                state.available_measurements().len()
            ));
        }

        if let Some(status) = &state.status {
            ui.separator();
            let mut text = RichText::new(status.text());
            if status.is_error() {
                text = text.color(Color32::RED);
            }
            ui.label(text);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open survey data")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_survey(&path);
    }
}

pub fn save_chart_dialog(state: &mut AppState, exporter: &dyn ChartExporter) {
    let default_name = match state.selected_measurement() {
        Some(m) => format!("{}.{}", file_stem(&m.label), exporter.extension()),
        None => return,
    };
    let title = format!("Export chart as {}", exporter.label());

    let file = rfd::FileDialog::new()
        .set_title(title.as_str())
        .set_file_name(default_name.as_str())
        .add_filter(exporter.label(), &[exporter.extension()])
        .save_file();

    if let Some(path) = file {
        state.export_chart(exporter, &path);
    }
}

/// Turn a measurement label into a safe default file stem,
/// e.g. `OFF PSP (-ve Volt)` → `off-psp-ve-volt`.
fn file_stem(label: &str) -> String {
    let mut stem = String::new();
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            stem.push(ch.to_ascii_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('-') {
            stem.push('-');
        }
    }
    stem.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stems_are_filesystem_friendly() {
        assert_eq!(file_stem("OFF PSP (-ve Volt)"), "off-psp-ve-volt");
        assert_eq!(file_stem("Hoop Stress (% of SMYS)"), "hoop-stress-of-smys");
        assert_eq!(file_stem("Soil Resistivity (Ω-cm)"), "soil-resistivity-cm");
        assert_eq!(file_stem("Pipe Age"), "pipe-age");
    }
}
