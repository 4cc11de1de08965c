use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, LineStyle, Plot, PlotPoints, Points};

use crate::data::catalog::STATIONING_COLUMN;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Survey chart (central panel)
// ---------------------------------------------------------------------------

/// Render the stationing chart in the central panel.
pub fn survey_plot(ui: &mut Ui, state: &AppState) {
    let Some(chart) = &state.chart else {
        let hint = if state.has_survey() {
            "Pick a measurement on the left"
        } else {
            "Open a survey to view charts  (File → Open…)"
        };
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(hint);
        });
        return;
    };

    Plot::new("survey_plot")
        .legend(Legend::default())
        .x_axis_label(STATIONING_COLUMN)
        .y_axis_label(chart.series.label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let points: PlotPoints = chart
                .series
                .x
                .iter()
                .zip(chart.series.y.iter())
                .map(|(&xi, &yi)| [xi, yi])
                .collect();
            plot_ui.line(
                Line::new(points)
                    .name(&chart.series.label)
                    .color(chart.color)
                    .width(1.5),
            );

            // Markers on top of the line, mirroring the exported charts.
            let markers: PlotPoints = chart
                .series
                .x
                .iter()
                .zip(chart.series.y.iter())
                .map(|(&xi, &yi)| [xi, yi])
                .collect();
            plot_ui.points(Points::new(markers).color(chart.color).radius(2.5));

            // Threshold lines span exactly the surveyed stationing range.
            // They carry no name, so the legend stays a single entry.
            for line in &chart.thresholds {
                let segment: PlotPoints =
                    vec![[line.x_min, line.y], [line.x_max, line.y]].into();
                plot_ui.line(
                    Line::new(segment)
                        .color(Color32::RED)
                        .width(2.0)
                        .style(LineStyle::dashed_loose()),
                );
            }
        });
}
