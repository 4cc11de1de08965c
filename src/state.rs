use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui::Color32;

use crate::color::{rgb_components, MeasurementColors};
use crate::data::cache::{NormalizedCache, SourceId};
use crate::data::catalog::{ColumnCatalog, Measurement};
use crate::data::loader;
use crate::data::model::{NormalizedTable, Series, ThresholdSet};
use crate::data::normalize::normalize;
use crate::data::series::build_series;
use crate::export::ChartExporter;

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

/// One-line feedback shown at the top of the window.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusLine {
    Info(String),
    Error(String),
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        StatusLine::Info(text.into())
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusLine::Error(text.into())
    }

    pub fn text(&self) -> &str {
        match self {
            StatusLine::Info(s) | StatusLine::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusLine::Error(_))
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The survey currently on screen and where it came from.
#[derive(Debug, Clone)]
pub struct SurveySource {
    pub id: SourceId,
    pub path: PathBuf,
}

/// The assembled chart for the selected measurement, ready for both the
/// live plot and the file exporters.
#[derive(Debug, Clone)]
pub struct ChartView {
    pub key: String,
    pub series: Series,
    pub thresholds: ThresholdSet,
    pub color: Color32,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Fixed measurement catalog driving the selector and threshold rules.
    pub catalog: ColumnCatalog,

    /// Normalized tables memoized per source for this session.
    pub cache: NormalizedCache,

    /// Stable per-measurement colours.
    pub colors: MeasurementColors,

    /// Source of the survey on screen (None until a file is opened).
    pub source: Option<SurveySource>,

    /// The normalized survey on screen, shared with the cache.
    pub table: Option<Arc<NormalizedTable>>,

    /// Catalog key of the selected measurement.
    pub selected: Option<String>,

    /// Chart built from the current table and selection.
    pub chart: Option<ChartView>,

    /// Whether the data preview table is shown.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status: Option<StatusLine>,
}

impl Default for AppState {
    fn default() -> Self {
        let catalog = ColumnCatalog::standard();
        let colors = MeasurementColors::for_catalog(&catalog);
        Self {
            catalog,
            cache: NormalizedCache::new(),
            colors,
            source: None,
            table: None,
            selected: None,
            chart: None,
            show_table: false,
            status: None,
        }
    }
}

impl AppState {
    /// Open a survey file. Already-seen sources come out of the cache without
    /// touching the disk; a failure leaves the current survey on screen.
    pub fn open_survey(&mut self, path: &Path) {
        let id = SourceId::from_path(path);
        let result = self.cache.get_or_try_insert_with(id.clone(), || {
            let raw = loader::load_file(path)?;
            normalize(&raw)
        });

        match result {
            Ok(table) => {
                log::info!(
                    "Loaded survey {} ({} stations)",
                    path.display(),
                    table.row_count()
                );
                // The load message goes in first so a failed chart rebuild
                // below replaces it with its error.
                self.status = Some(StatusLine::info(format!(
                    "Loaded {} stations from {}",
                    table.row_count(),
                    file_label(path)
                )));
                self.table = Some(table);
                self.source = Some(SurveySource {
                    id,
                    path: path.to_path_buf(),
                });
                self.ensure_selection();
                self.rebuild_chart();
            }
            Err(err) => {
                log::error!("Failed to load {}: {err}", path.display());
                self.status = Some(StatusLine::error(err.to_string()));
            }
        }
    }

    /// Re-read the current survey from disk, bypassing the cache.
    pub fn reload_survey(&mut self) {
        let Some(source) = self.source.clone() else {
            self.status = Some(StatusLine::error("No survey to reload"));
            return;
        };
        self.cache.invalidate(&source.id);
        self.open_survey(&source.path);
    }

    /// Select a measurement by catalog key and rebuild the chart. The status
    /// line starts clean, so only a failed rebuild leaves a message behind.
    pub fn select_measurement(&mut self, key: &str) {
        self.selected = Some(key.to_string());
        self.status = None;
        self.rebuild_chart();
    }

    /// Rebuild the chart from the current table and selection. Assembly
    /// failures clear the chart and surface the reason in the status line.
    pub fn rebuild_chart(&mut self) {
        let (Some(table), Some(key)) = (self.table.as_ref(), self.selected.as_ref()) else {
            self.chart = None;
            return;
        };

        match build_series(table, key, &self.catalog) {
            Ok((series, thresholds)) => {
                self.chart = Some(ChartView {
                    key: key.clone(),
                    series,
                    thresholds,
                    color: self.colors.color_for(key),
                });
            }
            Err(err) => {
                log::error!("Cannot chart '{key}': {err}");
                self.status = Some(StatusLine::error(err.to_string()));
                self.chart = None;
            }
        }
    }

    /// Write the current chart to `path` with the given exporter.
    pub fn export_chart(&mut self, exporter: &dyn ChartExporter, path: &Path) {
        let Some(chart) = &self.chart else {
            self.status = Some(StatusLine::error("Nothing to export yet"));
            return;
        };

        match exporter.export(
            &chart.series,
            &chart.thresholds,
            rgb_components(chart.color),
            path,
        ) {
            Ok(()) => {
                log::info!("Exported {} chart to {}", exporter.label(), path.display());
                self.status = Some(StatusLine::info(format!("Saved {}", file_label(path))));
            }
            Err(err) => {
                log::error!("Export failed: {err:#}");
                self.status = Some(StatusLine::error(format!("Export failed: {err:#}")));
            }
        }
    }

    /// Catalog entries whose column exists in the loaded survey, in selector
    /// order.
    pub fn available_measurements(&self) -> Vec<&Measurement> {
        let Some(table) = &self.table else {
            return Vec::new();
        };
        self.catalog
            .entries()
            .iter()
            .filter(|m| table.has_column(&m.key))
            .collect()
    }

    /// The catalog entry behind the current selection, if any.
    pub fn selected_measurement(&self) -> Option<&Measurement> {
        self.selected.as_ref().and_then(|key| self.catalog.get(key))
    }

    pub fn has_survey(&self) -> bool {
        self.table.is_some()
    }

    /// Keep the selection if the new survey still carries its column,
    /// otherwise fall back to the first available measurement.
    fn ensure_selection(&mut self) {
        let available: Vec<String> = self
            .available_measurements()
            .iter()
            .map(|m| m.key.clone())
            .collect();
        match &self.selected {
            Some(key) if available.iter().any(|k| k == key) => {}
            _ => self.selected = available.first().cloned(),
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
