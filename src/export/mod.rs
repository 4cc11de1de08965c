/// Chart export: pluggable strategies that turn the assembled series into
/// shareable files.
///
/// Two strategies ship. [`png::PngExporter`] rasterizes through plotters'
/// bitmap backend; [`html::HtmlExporter`] writes a self-contained page with
/// an inline SVG and a hover readout. Both draw through the same
/// [`chart::draw_chart`] routine so a measurement looks the same everywhere.
mod backend;

pub mod chart;
pub mod html;
pub mod png;

use std::path::Path;

use crate::data::model::{Series, ThresholdSet};

/// A file export strategy for the current chart.
pub trait ChartExporter {
    /// Short name for menus and logs, e.g. `"PNG"`.
    fn label(&self) -> &'static str;

    /// Default file extension, without the dot.
    fn extension(&self) -> &'static str;

    /// Render the series and its threshold lines to `path`. `line_rgb` is
    /// the measurement's colour.
    fn export(
        &self,
        series: &Series,
        thresholds: &ThresholdSet,
        line_rgb: (u8, u8, u8),
        path: &Path,
    ) -> anyhow::Result<()>;
}
