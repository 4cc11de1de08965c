use std::path::PathBuf;

use thiserror::Error;

/// All errors produced by the survey data pipeline.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// The survey file could not be read or decoded.
    #[error("cannot load survey data from {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The file extension is not one of the supported table formats.
    #[error("unsupported survey file extension: .{extension}")]
    UnsupportedFormat { extension: String },

    /// A column the pipeline needs is absent from the table.
    #[error("column '{column}' is not present in the survey")]
    MissingColumn { column: String },

    /// Two column names collide once their whitespace is trimmed.
    #[error("duplicate column name '{column}' after header cleanup")]
    DuplicateColumn { column: String },

    /// A cell could not be coerced to the numeric form its column requires.
    #[error("column '{column}', row {row}: cannot convert '{value}' to a number")]
    Conversion {
        column: String,
        row: usize,
        value: String,
    },

    /// A selection key that is not part of the measurement catalog.
    /// Unreachable through the UI, which only offers catalog keys.
    #[error("'{key}' is not a known measurement")]
    UnknownColumn { key: String },
}

impl SurveyError {
    pub(crate) fn source_unavailable(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SurveyError::SourceUnavailable {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Convenience alias used throughout the data layer.
pub type Result<T> = std::result::Result<T, SurveyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_unavailable_names_path_and_cause() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = SurveyError::source_unavailable("/data/survey.csv", io_err);
        let msg = err.to_string();
        assert!(msg.contains("cannot load survey data"));
        assert!(msg.contains("/data/survey.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn conversion_names_column_row_and_value() {
        let err = SurveyError::Conversion {
            column: "OFF PSP (VE V)".to_string(),
            row: 7,
            value: "n/a".to_string(),
        };
        let msg = err.to_string();
        assert_eq!(
            msg,
            "column 'OFF PSP (VE V)', row 7: cannot convert 'n/a' to a number"
        );
    }

    #[test]
    fn missing_column_display() {
        let err = SurveyError::MissingColumn {
            column: "Stationing (m)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "column 'Stationing (m)' is not present in the survey"
        );
    }

    #[test]
    fn duplicate_column_display() {
        let err = SurveyError::DuplicateColumn {
            column: "Depth (mm)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate column name 'Depth (mm)' after header cleanup"
        );
    }

    #[test]
    fn unknown_column_display() {
        let err = SurveyError::UnknownColumn {
            key: "Wall Loss".to_string(),
        };
        assert_eq!(err.to_string(), "'Wall Loss' is not a known measurement");
    }

    #[test]
    fn unsupported_format_display() {
        let err = SurveyError::UnsupportedFormat {
            extension: "xls".to_string(),
        };
        assert_eq!(err.to_string(), "unsupported survey file extension: .xls");
    }
}
