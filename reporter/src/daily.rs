//! Daily report assembly
//!
//! One daily tab holds the classification header, the column titles and one
//! row per test of the day's run, in that order from the top.

use crate::config::ReporterConfig;
use crate::error::{ReportError, ReportResult};
use crate::header::{construct_header_report, HeaderBlock};
use crate::row::{
    construct_report_payload_entry, ReportRowEntry, COLUMN_TITLES, ROW_WIDTH,
    STATE_COLUMN_INDEX, TEST_NAME_COLUMN_INDEX,
};
use crate::source::Framework;
use crate::tab_title::TabTitle;
use crate::window::SummaryType;
use chrono::NaiveDate;
use formula::{column_letter, get_formulas, LabelFormulas};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Caption of the overall totals cell
pub const TOTALS_CAPTION: &str = "Total";

/// A framework's raw run output: execution contexts, each carrying `tests`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultBatch {
    pub framework: Framework,
    #[serde(default)]
    pub results: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetadata {
    pub summary_type: SummaryType,
    pub date: NaiveDate,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReport {
    pub metadata: DailyMetadata,
    pub header: HeaderBlock,
    pub rows: Vec<ReportRowEntry>,
    /// Every test, counted on the test-name column
    pub totals: LabelFormulas,
}

/// What gets written to the daily tab
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPayload {
    pub metadata: DailyMetadata,
    pub header_row_index: usize,
    pub total_rows: usize,
    pub rows: Vec<ReportRowEntry>,
    pub values: Vec<Vec<String>>,
}

impl DailyReport {
    /// Build the report for every test in `batch`
    ///
    /// A single malformed test aborts the build.
    pub fn build(batch: &ResultBatch, config: &ReporterConfig, date: NaiveDate) -> ReportResult<Self> {
        let mut rows = Vec::new();
        for (index, result) in batch.results.iter().enumerate() {
            let tests = result
                .get("tests")
                .and_then(Value::as_array)
                .ok_or_else(|| ReportError::type_error(format!("results[{}].tests", index), "an array"))?;

            for test in tests {
                rows.push(construct_report_payload_entry(
                    result,
                    test,
                    batch.framework,
                    config,
                )?);
            }
            debug!("Built {} rows from results[{}]", tests.len(), index);
        }

        Self::from_rows(rows, config, date)
    }

    pub fn from_rows(
        rows: Vec<ReportRowEntry>,
        config: &ReporterConfig,
        date: NaiveDate,
    ) -> ReportResult<Self> {
        let header = construct_header_report(&rows, &config.classification)?;
        let totals = get_formulas(
            "",
            header.header_row_index,
            header.total_rows,
            rows.len(),
            &column_letter(TEST_NAME_COLUMN_INDEX),
            &column_letter(STATE_COLUMN_INDEX),
        )?;

        info!(
            "Daily report for {}: {} tests, {} header rows",
            date,
            rows.len(),
            header.rows.len()
        );

        Ok(Self {
            metadata: DailyMetadata {
                summary_type: SummaryType::Daily,
                date,
                title: TabTitle::from_date(date).title,
            },
            header,
            rows,
            totals,
        })
    }

    pub fn passed(&self) -> usize {
        self.rows.iter().filter(|row| row.state == "passed").count()
    }

    pub fn failed(&self) -> usize {
        self.rows.iter().filter(|row| row.state == "failed").count()
    }

    /// The whole tab as a grid, every row `ROW_WIDTH` cells wide
    ///
    /// The totals cell sits in the first header row; with no header rows
    /// there is nowhere to put it and it is left out.
    pub fn values(&self) -> Vec<Vec<String>> {
        let mut values = Vec::with_capacity(self.header.total_rows);
        for (index, header_row) in self.header.rows.iter().enumerate() {
            let mut row = header_row.clone();
            row.resize(ROW_WIDTH, String::new());
            if index == 0 {
                row[0] = self.totals.formulas.summary_cell(TOTALS_CAPTION);
            }
            values.push(row);
        }
        values.push(COLUMN_TITLES.iter().map(|t| t.to_string()).collect());
        values.extend(self.rows.iter().map(ReportRowEntry::to_row));
        values
    }

    pub fn to_payload(&self) -> DailyPayload {
        DailyPayload {
            metadata: self.metadata.clone(),
            header_row_index: self.header.header_row_index,
            total_rows: self.header.total_rows,
            rows: self.rows.clone(),
            values: self.values(),
        }
    }
}
