//! Reporter configuration
//!
//! Label universes, field limits and speed thresholds are loaded once at
//! startup (TOML file plus environment overrides) and passed by reference
//! into every builder. Nothing mutates them afterwards.

use crate::error::{ReportError, ReportResult};
use crate::truncate::MaxLength;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sheets::SheetsConfig;
use std::collections::HashSet;
use std::path::Path;

/// Environment variable overriding `max_field_length`
pub const MAX_FIELD_LENGTH_ENV: &str = "REPORTER_MAX_FIELD_LENGTH";

/// A labelling dimension of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationAxis {
    Type,
    Category,
    Team,
}

impl ClassificationAxis {
    pub const ALL: [ClassificationAxis; 3] = [
        ClassificationAxis::Type,
        ClassificationAxis::Category,
        ClassificationAxis::Team,
    ];

    /// Column holding this axis in a report row
    pub fn column_index(self) -> usize {
        match self {
            ClassificationAxis::Type => 3,
            ClassificationAxis::Category => 4,
            ClassificationAxis::Team => 5,
        }
    }

    /// The axis that closes the header block
    pub fn is_final(self) -> bool {
        self == ClassificationAxis::Team
    }

    /// Key of the universe in a label document
    pub fn key(self) -> &'static str {
        match self {
            ClassificationAxis::Type => "types",
            ClassificationAxis::Category => "categories",
            ClassificationAxis::Team => "teams",
        }
    }
}

impl std::fmt::Display for ClassificationAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ClassificationAxis::Type => "type",
            ClassificationAxis::Category => "category",
            ClassificationAxis::Team => "team",
        };
        f.write_str(name)
    }
}

/// Anything that can hand out the label universe of an axis
pub trait LabelSource {
    fn labels(&self, axis: ClassificationAxis) -> ReportResult<Vec<String>>;
}

/// Known label universes, case-sensitive and ordered
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClassificationConfig {
    pub types: Vec<String>,
    pub categories: Vec<String>,
    pub teams: Vec<String>,
}

impl ClassificationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_teams<I, S>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.teams = teams.into_iter().map(Into::into).collect();
        self
    }

    pub fn labels_for(&self, axis: ClassificationAxis) -> &[String] {
        match axis {
            ClassificationAxis::Type => &self.types,
            ClassificationAxis::Category => &self.categories,
            ClassificationAxis::Team => &self.teams,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for axis in ClassificationAxis::ALL {
            let mut seen = HashSet::new();
            for label in self.labels_for(axis) {
                if label.trim().is_empty() {
                    return Err(format!("{} labels cannot be empty", axis));
                }
                if !seen.insert(label.as_str()) {
                    return Err(format!("Duplicate {} label: {}", axis, label));
                }
            }
        }
        Ok(())
    }
}

impl LabelSource for ClassificationConfig {
    fn labels(&self, axis: ClassificationAxis) -> ReportResult<Vec<String>> {
        Ok(self.labels_for(axis).to_vec())
    }
}

/// A raw label document such as `{"types": [...], "categories": [...], "teams": [...]}`
impl LabelSource for Value {
    fn labels(&self, axis: ClassificationAxis) -> ReportResult<Vec<String>> {
        let axis_index = ClassificationAxis::ALL
            .iter()
            .position(|a| *a == axis)
            .unwrap_or_default();
        let items = self
            .get(axis.key())
            .and_then(Value::as_array)
            .ok_or(ReportError::Shape { axis_index, axis })?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ReportError::type_error(format!("{}[{}]", axis.key(), i), "a string")
                })
            })
            .collect()
    }
}

/// Duration cut-offs for the `speed` column, in milliseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SpeedThresholds {
    pub medium_ms: u64,
    pub slow_ms: u64,
}

impl Default for SpeedThresholds {
    fn default() -> Self {
        Self {
            medium_ms: 5_000,
            slow_ms: 15_000,
        }
    }
}

impl SpeedThresholds {
    pub fn classify(&self, duration_ms: f64) -> &'static str {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            ""
        } else if duration_ms < self.medium_ms as f64 {
            "fast"
        } else if duration_ms < self.slow_ms as f64 {
            "medium"
        } else {
            "slow"
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReporterConfig {
    pub max_field_length: usize,
    pub classification: ClassificationConfig,
    pub speed: SpeedThresholds,
    pub sheets: SheetsConfig,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            max_field_length: MaxLength::DEFAULT.get(),
            classification: ClassificationConfig::default(),
            speed: SpeedThresholds::default(),
            sheets: SheetsConfig::default(),
        }
    }
}

impl ReporterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classification(mut self, classification: ClassificationConfig) -> Self {
        self.classification = classification;
        self
    }

    pub fn with_max_field_length(mut self, max_field_length: usize) -> Self {
        self.max_field_length = max_field_length;
        self
    }

    pub fn max_length(&self) -> ReportResult<MaxLength> {
        MaxLength::try_from(self.max_field_length)
    }

    pub fn from_toml_str(input: &str) -> ReportResult<Self> {
        let config: Self = toml::from_str(input)?;
        config
            .validate()
            .map_err(|message| ReportError::InvalidConfig { message })?;
        Ok(config)
    }

    /// Read a TOML file, then apply environment overrides
    pub fn load(path: &Path) -> ReportResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> ReportResult<()> {
        if let Ok(raw) = std::env::var(MAX_FIELD_LENGTH_ENV) {
            self.max_field_length =
                raw.trim()
                    .parse()
                    .map_err(|_| ReportError::InvalidConfig {
                        message: format!("{} must be a positive integer, got {:?}", MAX_FIELD_LENGTH_ENV, raw),
                    })?;
        }
        self.validate()
            .map_err(|message| ReportError::InvalidConfig { message })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_field_length == 0 {
            return Err("Max field length must be greater than 0".to_string());
        }

        if self.speed.medium_ms >= self.speed.slow_ms {
            return Err("Medium speed threshold must be below the slow threshold".to_string());
        }

        self.classification.validate()?;
        self.sheets.validate()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ReporterConfig::default();
        assert_eq!(config.max_field_length, 500);
        assert_eq!(config.speed.medium_ms, 5_000);
        assert!(config.classification.teams.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_axis_layout() {
        assert_eq!(ClassificationAxis::Type.column_index(), 3);
        assert_eq!(ClassificationAxis::Category.column_index(), 4);
        assert_eq!(ClassificationAxis::Team.column_index(), 5);
        assert!(ClassificationAxis::Team.is_final());
        assert!(!ClassificationAxis::Type.is_final());
        assert_eq!(ClassificationAxis::Category.to_string(), "category");
    }

    #[test]
    fn test_config_validation() {
        let mut config = ReporterConfig::default();

        config.max_field_length = 0;
        assert!(config.validate().is_err());

        config.max_field_length = 500;
        config.speed = SpeedThresholds {
            medium_ms: 10,
            slow_ms: 10,
        };
        assert!(config.validate().is_err());

        config.speed = SpeedThresholds::default();
        config.classification = ClassificationConfig::new().with_teams(["Payments", "Payments"]);
        assert!(config.validate().is_err());

        config.classification = ClassificationConfig::new().with_types(["e2e", ""]);
        assert!(config.validate().is_err());

        config.classification = ClassificationConfig::new().with_teams(["Payments", "payments"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_speed_classification() {
        let speed = SpeedThresholds::default();
        assert_eq!(speed.classify(0.0), "fast");
        assert_eq!(speed.classify(4_999.9), "fast");
        assert_eq!(speed.classify(5_000.0), "medium");
        assert_eq!(speed.classify(15_000.0), "slow");
        assert_eq!(speed.classify(-1.0), "");
        assert_eq!(speed.classify(f64::NAN), "");
    }

    #[test]
    fn test_from_toml_str() {
        let config = ReporterConfig::from_toml_str(
            r#"
            max_field_length = 120

            [classification]
            types = ["e2e", "api"]
            teams = ["Payments", "Search"]

            [speed]
            slow_ms = 30000

            [sheets]
            weekly_summary_title = "QA Weekly"
            "#,
        )
        .unwrap();

        assert_eq!(config.max_field_length, 120);
        assert_eq!(config.classification.types, vec!["e2e", "api"]);
        assert!(config.classification.categories.is_empty());
        assert_eq!(config.speed.medium_ms, 5_000);
        assert_eq!(config.speed.slow_ms, 30_000);
        assert_eq!(config.sheets.weekly_summary_title, "QA Weekly");
    }

    #[test]
    fn test_from_toml_str_rejects_invalid() {
        let err = ReporterConfig::from_toml_str("max_field_length = 0").unwrap_err();
        assert!(matches!(err, ReportError::InvalidConfig { .. }));

        let err = ReporterConfig::from_toml_str("max_field_length = \"long\"").unwrap_err();
        assert!(matches!(err, ReportError::ConfigParse(_)));
    }

    #[test]
    #[serial]
    fn test_load_with_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[classification]\nteams = [\"Payments\"]").unwrap();

        std::env::set_var(MAX_FIELD_LENGTH_ENV, "64");
        let config = ReporterConfig::load(file.path());
        std::env::remove_var(MAX_FIELD_LENGTH_ENV);

        let config = config.unwrap();
        assert_eq!(config.max_field_length, 64);
        assert_eq!(config.classification.teams, vec!["Payments"]);
    }

    #[test]
    #[serial]
    fn test_invalid_env_override() {
        std::env::set_var(MAX_FIELD_LENGTH_ENV, "-3");
        let result = ReporterConfig::default().apply_env_overrides();
        std::env::remove_var(MAX_FIELD_LENGTH_ENV);

        assert!(matches!(result, Err(ReportError::InvalidConfig { .. })));
    }

    #[test]
    fn test_json_label_source() {
        let document = json!({
            "types": ["e2e"],
            "categories": "smoke",
            "teams": ["Payments", 7]
        });

        assert_eq!(document.labels(ClassificationAxis::Type).unwrap(), vec!["e2e"]);

        match document.labels(ClassificationAxis::Category) {
            Err(ReportError::Shape { axis_index, axis }) => {
                assert_eq!(axis_index, 1);
                assert_eq!(axis, ClassificationAxis::Category);
            }
            other => panic!("unexpected result: {other:?}"),
        }

        match document.labels(ClassificationAxis::Team) {
            Err(ReportError::Type { field, .. }) => assert_eq!(field, "teams[1]"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
