//! Weekly and monthly roll-ups
//!
//! A roll-up tab places the daily tabs of one period side by side. Each
//! daily block is copied (values and formatting) into the next free column
//! span of the summary tab, below a header row naming the source day.
//!
//! ```text
//!            | Mar 18, 2024 ...      | Mar 19, 2024 ...      |
//! row 2..    | block of Mar 18 tab   | block of Mar 19 tab   |
//! ```

use crate::copy_paste::{copy_paste_normal, DestinationParams, SourceParams};
use crate::error::{ReportError, ReportResult};
use crate::style;
use crate::tab_title::TabTitle;
use crate::window::{RollupWindow, SummaryType};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use sheets::{BatchRequest, CopyPasteInstruction, SheetsProvider, TabId, ValueRange};
use tracing::{debug, error, info, warn};

/// Rows above the pasted blocks in the summary tab
pub const SUMMARY_HEADER_ROWS: usize = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPayload {
    pub metadata: RollupWindow,
    pub destination_tab_id: TabId,
    /// Source tab titles at their column offsets
    pub header_payload: ValueRange,
    /// One copy per source tab, in date order
    pub body_payload: Vec<CopyPasteInstruction>,
    pub summary_header_style_payload: BatchRequest,
}

impl WeeklyPayload {
    /// The batch update that applies this payload
    pub fn requests(&self) -> Vec<BatchRequest> {
        self.body_payload
            .iter()
            .cloned()
            .map(BatchRequest::CopyPaste)
            .chain(std::iter::once(self.summary_header_style_payload.clone()))
            .collect()
    }

    pub fn column_count(&self) -> usize {
        self.body_payload
            .iter()
            .map(|instruction| instruction.destination.end_column_index)
            .max()
            .unwrap_or_default()
    }
}

struct SourceTab {
    title: TabTitle,
    tab_id: TabId,
    values: Vec<Vec<String>>,
}

/// Builds roll-up payloads relative to a reference date
pub struct WeeklyAssembler<'a, P: SheetsProvider + ?Sized> {
    provider: &'a P,
    reference_date: NaiveDate,
    summary_type: SummaryType,
}

impl<'a, P: SheetsProvider + ?Sized> WeeklyAssembler<'a, P> {
    /// Weekly roll-up around today's local date
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            reference_date: Local::now().date_naive(),
            summary_type: SummaryType::Weekly,
        }
    }

    pub fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = reference_date;
        self
    }

    pub fn with_summary_type(mut self, summary_type: SummaryType) -> Self {
        self.summary_type = summary_type;
        self
    }

    pub fn window(&self) -> RollupWindow {
        RollupWindow::for_date(self.reference_date, self.summary_type)
    }

    /// Plan copying every daily tab of the period into `destination_tab_title`
    ///
    /// Titles that are not daily tabs, or fall outside the period, are
    /// ignored. Any failure is reported as one
    /// [`ReportError::WeeklyPayload`] wrapping the cause.
    pub async fn construct_weekly_payload_for_copy_paste<S: AsRef<str>>(
        &self,
        source_tab_titles: &[S],
        destination_tab_title: &str,
    ) -> ReportResult<WeeklyPayload> {
        self.build_payload(source_tab_titles, destination_tab_title)
            .await
            .map_err(|e| {
                error!("Error building weekly copy-paste payload: {}", e);
                ReportError::WeeklyPayload {
                    source: Box::new(e),
                }
            })
    }

    async fn build_payload<S: AsRef<str>>(
        &self,
        source_tab_titles: &[S],
        destination_tab_title: &str,
    ) -> ReportResult<WeeklyPayload> {
        let destination_tab_id = self.provider.resolve_tab_id(destination_tab_title).await?;
        let window = self.window();

        let mut titles: Vec<TabTitle> = source_tab_titles
            .iter()
            .filter_map(|title| match TabTitle::parse(title.as_ref()) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    debug!("Skipping tab: {}", e);
                    None
                }
            })
            .filter(|title| window.contains(title.date))
            .collect();
        titles.sort();

        let mut sources = Vec::with_capacity(titles.len());
        for title in titles {
            let tab_id = self.provider.resolve_tab_id(&title.title).await?;
            let values = self.provider.fetch_tab_values(tab_id).await?;
            if values.is_empty() {
                warn!("Daily tab '{}' is empty, leaving it out of the roll-up", title);
                continue;
            }
            sources.push(SourceTab {
                title,
                tab_id,
                values,
            });
        }

        // Every block gets the width of the widest row so days line up.
        let block_width = sources
            .iter()
            .flat_map(|source| source.values.iter().map(Vec::len))
            .max()
            .unwrap_or_default();

        let mut next_available_column = 0;
        let mut header_row = Vec::new();
        let mut body_payload = Vec::with_capacity(sources.len());
        for source in &sources {
            let height = source.values.len();
            let instruction = copy_paste_normal(
                &SourceParams {
                    source_page_id: Some(source.tab_id),
                    start_row_index: 0,
                    end_row_index: height,
                    start_column_index: 0,
                    end_column_index: block_width,
                },
                &DestinationParams {
                    destination_tab_id: Some(destination_tab_id),
                    start_row_index: SUMMARY_HEADER_ROWS,
                    end_row_index: SUMMARY_HEADER_ROWS + height,
                    start_column_index: next_available_column,
                    end_column_index: next_available_column + block_width,
                },
            )?;
            body_payload.push(instruction);

            header_row.push(source.title.canonical());
            header_row.resize(next_available_column + block_width, String::new());
            next_available_column += block_width;
        }

        info!(
            "Planned {} roll-up of {} tabs ({} to {}) into '{}'",
            window.summary_type,
            body_payload.len(),
            window.start_date,
            window.end_date,
            destination_tab_title
        );

        Ok(WeeklyPayload {
            metadata: window,
            destination_tab_id,
            header_payload: ValueRange::new(destination_tab_title, 0, 0, vec![header_row]),
            body_payload,
            summary_header_style_payload: style::summary_header_style(
                destination_tab_id,
                next_available_column,
            ),
        })
    }
}
