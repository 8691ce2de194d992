use crate::config::ClassificationAxis;
use formula::FormulaError;
use sheets::SheetsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Type error: `{field}` must be {expected}")]
    Type {
        field: String,
        expected: &'static str,
    },

    #[error("Label universe at axis index {axis_index} ({axis}) is not an array")]
    Shape {
        axis_index: usize,
        axis: ClassificationAxis,
    },

    #[error("maxLength must be a positive integer, got {value}")]
    MaxLength { value: String },

    #[error("Invalid tab title: {title:?} (expected e.g. \"Mar 4, 2024\")")]
    InvalidTabTitle { title: String },

    #[error("Both sourcePageId and destinationTabId must be provided.")]
    MissingTabId,

    #[error("Failed to construct header report")]
    HeaderReport {
        #[source]
        source: Box<ReportError>,
    },

    #[error("Error building weekly copy-paste payload.")]
    WeeklyPayload {
        #[source]
        source: Box<ReportError>,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),

    #[error("Spreadsheet error: {0}")]
    Sheets(#[from] SheetsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;

impl ReportError {
    pub(crate) fn type_error(field: impl Into<String>, expected: &'static str) -> Self {
        Self::Type {
            field: field.into(),
            expected,
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
