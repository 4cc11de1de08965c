use super::catalog::{ColumnCatalog, STATIONING_COLUMN};
use super::error::{Result, SurveyError};
use super::model::{NormalizedTable, Series, ThresholdSet};

// ---------------------------------------------------------------------------
// build_series – NormalizedTable + selection → (Series, ThresholdSet)
// ---------------------------------------------------------------------------

/// Extract the chart series for one selected measurement.
///
/// x is the stationing column, y the selected column, aligned by row; both
/// must coerce cleanly to numbers. The measurement's threshold rule is
/// materialized over `[min(x), max(x)]`, computed over finite x values only.
/// An empty table yields an empty series and no thresholds.
pub fn build_series(
    table: &NormalizedTable,
    key: &str,
    catalog: &ColumnCatalog,
) -> Result<(Series, ThresholdSet)> {
    let entry = catalog
        .get(key)
        .ok_or_else(|| SurveyError::UnknownColumn {
            key: key.to_string(),
        })?;

    let x_col = table
        .column(STATIONING_COLUMN)
        .ok_or_else(|| SurveyError::MissingColumn {
            column: STATIONING_COLUMN.to_string(),
        })?;
    let y_col = table
        .column(&entry.key)
        .ok_or_else(|| SurveyError::MissingColumn {
            column: entry.key.clone(),
        })?;

    let x = x_col.numeric_values()?;
    let y = y_col.numeric_values()?;

    let thresholds = entry.rule.lines_over(finite_span(&x));
    let series = Series {
        label: entry.label.clone(),
        x,
        y,
    };
    Ok((series, thresholds))
}

/// Min and max over the finite values; `None` when there are none, in which
/// case thresholds cannot be placed.
fn finite_span(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied().filter(|v| v.is_finite());
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::catalog::{HOOP_STRESS_COLUMN, OFF_PSP_COLUMN};
    use crate::data::model::{CellValue, Column, ThresholdLine};

    fn floats(name: &str, values: &[f64]) -> Column {
        Column::new(name, values.iter().map(|&v| CellValue::Float(v)).collect())
    }

    fn normalized(columns: Vec<Column>) -> NormalizedTable {
        NormalizedTable { columns }
    }

    #[test]
    fn psp_selection_yields_the_protection_pair() {
        let table = normalized(vec![
            floats(STATIONING_COLUMN, &[0.0, 2500.0, 5000.0]),
            floats(OFF_PSP_COLUMN, &[0.9, 1.1, 0.95]),
        ]);
        let (series, thresholds) =
            build_series(&table, OFF_PSP_COLUMN, &ColumnCatalog::standard()).unwrap();
        assert_eq!(series.label, "OFF PSP (-ve Volt)");
        assert_eq!(series.x, vec![0.0, 2500.0, 5000.0]);
        assert_eq!(series.y, vec![0.9, 1.1, 0.95]);
        assert_eq!(
            thresholds,
            vec![
                ThresholdLine {
                    y: 0.85,
                    x_min: 0.0,
                    x_max: 5000.0
                },
                ThresholdLine {
                    y: 1.2,
                    x_min: 0.0,
                    x_max: 5000.0
                },
            ]
        );
    }

    #[test]
    fn hoop_stress_selection_yields_one_line_at_sixty() {
        let table = normalized(vec![
            floats(STATIONING_COLUMN, &[100.0, 400.0]),
            floats(HOOP_STRESS_COLUMN, &[45.0, 62.0]),
        ]);
        let (_, thresholds) =
            build_series(&table, HOOP_STRESS_COLUMN, &ColumnCatalog::standard()).unwrap();
        assert_eq!(
            thresholds,
            vec![ThresholdLine {
                y: 60.0,
                x_min: 100.0,
                x_max: 400.0
            }]
        );
    }

    #[test]
    fn unruled_measurement_yields_no_thresholds() {
        let table = normalized(vec![
            floats(STATIONING_COLUMN, &[0.0, 100.0]),
            floats("Depth (mm)", &[2.4, 2.9]),
        ]);
        let (series, thresholds) =
            build_series(&table, "Depth (mm)", &ColumnCatalog::standard()).unwrap();
        assert_eq!(series.label, "Depth (mm)");
        assert!(thresholds.is_empty());
    }

    #[test]
    fn span_ignores_row_order() {
        let table = normalized(vec![
            floats(STATIONING_COLUMN, &[300.0, 0.0, 150.0]),
            floats(OFF_PSP_COLUMN, &[1.0, 1.0, 1.0]),
        ]);
        let (_, thresholds) =
            build_series(&table, OFF_PSP_COLUMN, &ColumnCatalog::standard()).unwrap();
        assert!(thresholds
            .iter()
            .all(|t| t.x_min == 0.0 && t.x_max == 300.0));
    }

    #[test]
    fn empty_table_omits_thresholds_instead_of_crashing() {
        let table = normalized(vec![
            floats(STATIONING_COLUMN, &[]),
            floats(OFF_PSP_COLUMN, &[]),
        ]);
        let (series, thresholds) =
            build_series(&table, OFF_PSP_COLUMN, &ColumnCatalog::standard()).unwrap();
        assert!(series.is_empty());
        assert!(thresholds.is_empty());
    }

    #[test]
    fn nan_stations_do_not_poison_the_span() {
        let table = normalized(vec![
            floats(STATIONING_COLUMN, &[f64::NAN, 50.0, 250.0]),
            floats(HOOP_STRESS_COLUMN, &[40.0, 41.0, 42.0]),
        ]);
        let (_, thresholds) =
            build_series(&table, HOOP_STRESS_COLUMN, &ColumnCatalog::standard()).unwrap();
        assert_eq!(
            thresholds,
            vec![ThresholdLine {
                y: 60.0,
                x_min: 50.0,
                x_max: 250.0
            }]
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        let table = normalized(vec![floats(STATIONING_COLUMN, &[0.0])]);
        let err = build_series(&table, "Wall Loss", &ColumnCatalog::standard()).unwrap_err();
        assert!(matches!(err, SurveyError::UnknownColumn { key } if key == "Wall Loss"));
    }

    #[test]
    fn missing_stationing_is_fatal() {
        let table = normalized(vec![floats("Depth (mm)", &[2.4])]);
        let err = build_series(&table, "Depth (mm)", &ColumnCatalog::standard()).unwrap_err();
        assert!(matches!(
            err,
            SurveyError::MissingColumn { column } if column == STATIONING_COLUMN
        ));
    }

    #[test]
    fn missing_requested_column_is_fatal() {
        let table = normalized(vec![floats(STATIONING_COLUMN, &[0.0])]);
        let err = build_series(&table, "Depth (mm)", &ColumnCatalog::standard()).unwrap_err();
        assert!(matches!(
            err,
            SurveyError::MissingColumn { column } if column == "Depth (mm)"
        ));
    }

    #[test]
    fn non_numeric_selection_is_a_conversion_error() {
        let table = normalized(vec![
            floats(STATIONING_COLUMN, &[0.0]),
            Column::new("CoatingType", vec![CellValue::Text("FBE".into())]),
        ]);
        let err = build_series(&table, "CoatingType", &ColumnCatalog::standard()).unwrap_err();
        assert!(matches!(
            err,
            SurveyError::Conversion { column, .. } if column == "CoatingType"
        ));
    }
}
