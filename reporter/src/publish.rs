use crate::daily::DailyReport;
use crate::error::{ReportError, ReportResult};
use crate::row::ROW_WIDTH;
use crate::style;
use crate::weekly::WeeklyPayload;
use sheets::SheetsProvider;
use tracing::info;

/// Sends built payloads to a spreadsheet backend
pub struct ReportPublisher<'a, P: SheetsProvider + ?Sized> {
    provider: &'a P,
}

impl<'a, P: SheetsProvider + ?Sized> ReportPublisher<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Append the daily report to its (empty) tab and bold the column titles
    ///
    /// The header formulas address absolute rows, so the tab must not hold
    /// anything yet.
    pub async fn publish_daily(&self, report: &DailyReport) -> ReportResult<usize> {
        let title = &report.metadata.title;
        let tab_id = self.provider.resolve_tab_id(title).await?;
        let existing = self.provider.fetch_tab_values(tab_id).await?;
        if existing.iter().flatten().any(|cell| !cell.is_empty()) {
            return Err(ReportError::invalid_input(format!(
                "daily tab '{}' already has data",
                title
            )));
        }

        let appended = self.provider.append_rows(title, report.values()).await?;
        self.provider
            .batch_update(vec![style::column_titles_style(
                tab_id,
                report.header.header_row_index - 1,
                ROW_WIDTH,
            )])
            .await?;

        info!(
            "Published {} rows to '{}' via {}",
            appended,
            title,
            self.provider.provider_name()
        );
        Ok(appended)
    }

    /// Write the roll-up header, then copy every daily block in one batch
    pub async fn publish_weekly(&self, payload: &WeeklyPayload) -> ReportResult<usize> {
        self.provider
            .update_values(payload.header_payload.clone())
            .await?;
        let applied = self.provider.batch_update(payload.requests()).await?;

        info!(
            "Published {} roll-up ({} requests) via {}",
            payload.metadata.summary_type,
            applied,
            self.provider.provider_name()
        );
        Ok(applied)
    }
}
