use serde::{Deserialize, Serialize};

/// Names of the summary tabs a roll-up writes into
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SheetsConfig {
    pub weekly_summary_title: String,
    pub monthly_summary_title: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            weekly_summary_title: "Weekly Summary".to_string(),
            monthly_summary_title: "Monthly Summary".to_string(),
        }
    }
}

impl SheetsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weekly_summary_title(mut self, title: impl Into<String>) -> Self {
        self.weekly_summary_title = title.into();
        self
    }

    pub fn with_monthly_summary_title(mut self, title: impl Into<String>) -> Self {
        self.monthly_summary_title = title.into();
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.weekly_summary_title.trim().is_empty() {
            return Err("Weekly summary title cannot be empty".to_string());
        }

        if self.monthly_summary_title.trim().is_empty() {
            return Err("Monthly summary title cannot be empty".to_string());
        }

        if self.weekly_summary_title == self.monthly_summary_title {
            return Err("Weekly and monthly summaries must use different tabs".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SheetsConfig::default();
        assert_eq!(config.weekly_summary_title, "Weekly Summary");
        assert_eq!(config.monthly_summary_title, "Monthly Summary");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = SheetsConfig::new().with_weekly_summary_title("  ");
        assert!(config.validate().is_err());

        let config = SheetsConfig::new().with_monthly_summary_title("");
        assert!(config.validate().is_err());

        let config = SheetsConfig::new()
            .with_weekly_summary_title("Roll-up")
            .with_monthly_summary_title("Roll-up");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: SheetsConfig =
            serde_json::from_str(r#"{"weekly_summary_title": "QA Week"}"#).unwrap();
        assert_eq!(config.weekly_summary_title, "QA Week");
        assert_eq!(config.monthly_summary_title, "Monthly Summary");
    }
}
