use crate::config::ReporterConfig;
use crate::error::ReportResult;
use crate::extract;
use crate::source::{Framework, RawTestResult, TestResultSource};
use crate::truncate::{truncate_str, MaxLength};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of columns in a report row
pub const ROW_WIDTH: usize = 12;

/// Column holding the normalized `passed`/`failed` outcome
pub const STATE_COLUMN_INDEX: usize = 8;

/// Column counted for overall totals, every row has a test name
pub const TEST_NAME_COLUMN_INDEX: usize = 2;

pub const COLUMN_TITLES: [&str; ROW_WIDTH] = [
    "Area",
    "Spec",
    "Test Name",
    "Type",
    "Category",
    "Team",
    "Priority",
    "Status",
    "State",
    "Manual Test ID",
    "Error",
    "Speed",
];

/// One test rendered as a report row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRowEntry {
    pub area: String,
    pub spec: String,
    pub test_name: String,
    #[serde(rename = "type")]
    pub test_type: String,
    pub category: String,
    pub team: String,
    /// Reserved, filled in by hand in the sheet
    pub priority: String,
    pub status: String,
    pub state: String,
    pub manual_test_id: String,
    pub error: String,
    pub speed: String,
}

impl ReportRowEntry {
    pub fn from_raw(raw: &RawTestResult, config: &ReporterConfig) -> ReportResult<Self> {
        let max_length = config.max_length()?;
        let classification = &config.classification;
        let cell = |value: String| truncate_str(&value, max_length);

        Ok(Self {
            area: cell(extract::extract_area(&raw.full_file)),
            spec: cell(extract::extract_spec(&raw.full_file)),
            test_name: cell(extract::extract_test_name(&raw.full_title)),
            test_type: cell(extract::extract_type(&raw.full_file, &classification.types)),
            category: cell(extract::extract_category(
                &raw.full_title,
                &classification.categories,
            )),
            team: cell(extract::extract_team_name(
                &raw.full_title,
                &classification.teams,
            )),
            priority: String::new(),
            status: cell(extract::extract_status(raw)),
            state: cell(extract::extract_state(raw)),
            manual_test_id: cell(extract::extract_manual_test_case_id(&raw.full_title)),
            error: cell(extract::extract_error(raw.error.as_deref())),
            speed: cell(extract::extract_speed(raw.duration_ms, &config.speed)),
        })
    }

    /// Cell value for a classification or outcome column
    pub fn column(&self, index: usize) -> &str {
        match index {
            0 => &self.area,
            1 => &self.spec,
            2 => &self.test_name,
            3 => &self.test_type,
            4 => &self.category,
            5 => &self.team,
            6 => &self.priority,
            7 => &self.status,
            8 => &self.state,
            9 => &self.manual_test_id,
            10 => &self.error,
            11 => &self.speed,
            _ => "",
        }
    }

    /// Cells in sheet column order
    pub fn to_row(&self) -> Vec<String> {
        (0..ROW_WIDTH).map(|i| self.column(i).to_string()).collect()
    }

    pub fn fits(&self, max_length: MaxLength) -> bool {
        (0..ROW_WIDTH).all(|i| self.column(i).chars().count() <= max_length.get())
    }
}

/// Build one report row from the untyped records of a test run
///
/// `result` is the execution context (spec file), `test` the individual
/// test. Both must be JSON objects and `test.fullTitle` must be a string.
pub fn construct_report_payload_entry(
    result: &Value,
    test: &Value,
    framework: Framework,
    config: &ReporterConfig,
) -> ReportResult<ReportRowEntry> {
    let source = TestResultSource::from_json(result, test, framework)?;
    ReportRowEntry::from_raw(&source.normalize(), config)
}
