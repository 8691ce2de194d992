use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    Daily,
    Weekly,
    Monthly,
}

impl std::fmt::Display for SummaryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SummaryType::Daily => "daily",
            SummaryType::Weekly => "weekly",
            SummaryType::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

/// Inclusive date range a summary covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupWindow {
    pub summary_type: SummaryType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl RollupWindow {
    /// Daily: that day. Weekly: Monday..Sunday around it. Monthly: the whole previous month.
    pub fn for_date(reference: NaiveDate, summary_type: SummaryType) -> Self {
        let (start_date, end_date) = match summary_type {
            SummaryType::Daily => (reference, reference),
            SummaryType::Weekly => {
                let days_since_monday = i64::from(reference.weekday().num_days_from_monday());
                let monday = reference - Duration::days(days_since_monday);
                (monday, monday + Duration::days(6))
            }
            SummaryType::Monthly => {
                let first_of_month = reference - Duration::days(i64::from(reference.day0()));
                let last_of_previous = first_of_month - Duration::days(1);
                let first_of_previous =
                    last_of_previous - Duration::days(i64::from(last_of_previous.day0()));
                (first_of_previous, last_of_previous)
            }
        };

        Self {
            summary_type,
            start_date,
            end_date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}
