use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct StationViewApp {
    pub state: AppState,
}

impl Default for StationViewApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for StationViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: measurement picker ----
        egui::SidePanel::left("measurement_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: raw data preview ----
        if self.state.show_table {
            if let Some(survey) = self.state.table.clone() {
                egui::TopBottomPanel::bottom("data_table")
                    .resizable(true)
                    .default_height(220.0)
                    .show(ctx, |ui| {
                        table::data_table(ui, &survey);
                    });
            }
        }

        // ---- Central panel: stationing chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::survey_plot(ui, &self.state);
        });
    }
}
