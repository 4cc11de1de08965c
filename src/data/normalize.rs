use super::catalog::{HOOP_STRESS_COLUMN, OFF_PSP_COLUMN};
use super::error::{Result, SurveyError};
use super::model::{CellValue, Column, NormalizedTable, RawTable};

/// Hoop-stress columns whose maximum sits below this value are assumed to be
/// recorded as 0–1 fractions and are rescaled to percent. Real percent
/// readings sit well above it, fractions well below.
const FRACTION_SCALE_CUTOFF: f64 = 10.0;

// ---------------------------------------------------------------------------
// normalize – RawTable → NormalizedTable
// ---------------------------------------------------------------------------

/// Clean a freshly loaded survey table.
///
/// * Every column name is trimmed; a collision between trimmed names is
///   fatal, since later lookups would silently pick the wrong column.
/// * `OFF PSP (VE V)`, when present, becomes strictly non-negative floats:
///   the sign is a measurement-polarity convention, not data.
/// * `Hoop stress% of SMYS`, when present, loses any literal `%` suffixes
///   and, if the whole column's maximum is below [`FRACTION_SCALE_CUTOFF`],
///   is rescaled ×100 in one dataset-wide step. Never per-row.
///
/// Either known column being absent is fine; that normalization step is
/// skipped. A cell that will not coerce to a number is a hard error naming
/// the column and row. The input table is left untouched.
pub fn normalize(raw: &RawTable) -> Result<NormalizedTable> {
    let mut columns: Vec<Column> = raw
        .columns
        .iter()
        .map(|c| Column::new(c.name.trim(), c.cells.clone()))
        .collect();

    for (i, col) in columns.iter().enumerate() {
        if columns[..i].iter().any(|prev| prev.name == col.name) {
            return Err(SurveyError::DuplicateColumn {
                column: col.name.clone(),
            });
        }
    }

    if let Some(col) = columns.iter_mut().find(|c| c.name == OFF_PSP_COLUMN) {
        let values = col.numeric_values()?;
        col.cells = values.into_iter().map(|v| CellValue::Float(v.abs())).collect();
    } else {
        log::debug!("'{OFF_PSP_COLUMN}' absent, skipping PSP normalization");
    }

    if let Some(col) = columns.iter_mut().find(|c| c.name == HOOP_STRESS_COLUMN) {
        let mut values = percent_values(col)?;
        if needs_fraction_rescale(&values) {
            for v in &mut values {
                *v *= 100.0;
            }
        }
        col.cells = values.into_iter().map(CellValue::Float).collect();
    } else {
        log::debug!("'{HOOP_STRESS_COLUMN}' absent, skipping stress normalization");
    }

    Ok(NormalizedTable { columns })
}

/// Read a stress column as floats, tolerating percent-formatted text cells
/// (`"45.2%"`).
fn percent_values(col: &Column) -> Result<Vec<f64>> {
    col.cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            let parsed = match cell {
                CellValue::Text(s) => s.replace('%', "").trim().parse::<f64>().ok(),
                other => other.to_f64(),
            };
            parsed.ok_or_else(|| SurveyError::Conversion {
                column: col.name.clone(),
                row,
                value: cell.to_string(),
            })
        })
        .collect()
}

/// One global observation decides the rescale: the maximum finite value.
/// The heuristic is undefined for an empty column, or one with no finite
/// values; such columns are left as is.
fn needs_fraction_rescale(values: &[f64]) -> bool {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    max.is_finite() && max < FRACTION_SCALE_CUTOFF
}
