use std::fmt;

use serde::Serialize;

use super::error::{Result, SurveyError};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the survey table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common spreadsheet dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Float(f64),
    Integer(i64),
    Bool(bool),
    Text(String),
    Null,
}

impl CellValue {
    /// Try to interpret the cell as an `f64`.
    ///
    /// Float and Integer coerce directly; Text is trimmed and parsed, so a
    /// cell stored as `"1.05"` still counts as numeric. Bool and Null do not
    /// coerce.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => s.trim().parse().ok(),
            CellValue::Bool(_) | CellValue::Null => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

// ---------------------------------------------------------------------------
// Column / RawTable / NormalizedTable
// ---------------------------------------------------------------------------

/// One named column of cells, ordered by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            cells,
        }
    }

    /// Coerce every cell to `f64`, failing on the first cell that cannot be
    /// read as a number. The error names this column, the offending row and
    /// the cell's text.
    pub fn numeric_values(&self) -> Result<Vec<f64>> {
        self.cells
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.to_f64().ok_or_else(|| SurveyError::Conversion {
                    column: self.name.clone(),
                    row,
                    value: cell.to_string(),
                })
            })
            .collect()
    }
}

/// The survey exactly as loaded: ordered named columns whose names may still
/// carry stray whitespace. Never mutated after loading.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub columns: Vec<Column>,
}

impl RawTable {
    pub fn new(columns: Vec<Column>) -> Self {
        RawTable { columns }
    }

    /// Number of data rows (all columns are loaded to equal length).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// Derived from [`RawTable`]: trimmed column names, and the two known
/// measurement columns coerced to canonical numeric form.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub columns: Vec<Column>,
}

impl NormalizedTable {
    /// Look up a column by its (trimmed) name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

// ---------------------------------------------------------------------------
// Series / thresholds – what the chart renderers consume
// ---------------------------------------------------------------------------

/// An (x, y) series ready for charting: stationing on x, the selected
/// measurement on y, aligned by row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Series {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// A horizontal reference line spanning the series' x extent. Renderers draw
/// these red and dashed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdLine {
    pub y: f64,
    pub x_min: f64,
    pub x_max: f64,
}

/// Zero or more reference lines applicable to one measurement.
pub type ThresholdSet = Vec<ThresholdLine>;
