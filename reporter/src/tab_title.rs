//! Daily tab titles
//!
//! Daily tabs are named after the run date, `"Mar 4, 2024"`. Titles are
//! parsed into a [`NaiveDate`] as soon as they are read; ordering and
//! filtering never look at the string.

use crate::error::{ReportError, ReportResult};
use chrono::{Datelike, Month, NaiveDate};
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

fn title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z]{3,9})\.?\s+(\d{1,2}),\s*(\d{4})\s*$").expect("tab title regex")
    })
}

/// Canonical title for a date, e.g. `Mar 4, 2024`
pub fn format_tab_title(date: NaiveDate) -> String {
    format!("{} {}, {}", date.format("%b"), date.day(), date.year())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TabTitle {
    pub date: NaiveDate,
    /// The title exactly as it appears in the workbook
    pub title: String,
}

impl TabTitle {
    pub fn parse(title: &str) -> ReportResult<Self> {
        let invalid = || ReportError::InvalidTabTitle {
            title: title.to_string(),
        };
        let captures = title_regex().captures(title).ok_or_else(invalid)?;

        let month: Month = captures[1].parse().map_err(|_| invalid())?;
        let day: u32 = captures[2].parse().map_err(|_| invalid())?;
        let year: i32 = captures[3].parse().map_err(|_| invalid())?;
        let date =
            NaiveDate::from_ymd_opt(year, month.number_from_month(), day).ok_or_else(invalid)?;

        Ok(Self {
            date,
            title: title.to_string(),
        })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            date,
            title: format_tab_title(date),
        }
    }

    pub fn canonical(&self) -> String {
        format_tab_title(self.date)
    }
}

impl PartialOrd for TabTitle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TabTitle {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.title.cmp(&other.title))
    }
}

impl std::fmt::Display for TabTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}
