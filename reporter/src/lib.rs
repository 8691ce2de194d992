pub mod config;
pub mod copy_paste;
pub mod daily;
pub mod error;
pub mod extract;
pub mod header;
pub mod publish;
pub mod row;
pub mod source;
pub mod style;
pub mod tab_title;
pub mod truncate;
pub mod weekly;
pub mod window;

pub use config::{
    ClassificationAxis, ClassificationConfig, LabelSource, ReporterConfig, SpeedThresholds,
};
pub use copy_paste::{copy_paste_normal, DestinationParams, SourceParams};
pub use daily::{DailyMetadata, DailyPayload, DailyReport, ResultBatch};
pub use error::{ReportError, ReportResult};
pub use header::{construct_header_report, AxisCount, AxisReport, HeaderBlock};
pub use publish::ReportPublisher;
pub use row::{construct_report_payload_entry, ReportRowEntry, COLUMN_TITLES, ROW_WIDTH};
pub use source::{Framework, RawTestResult, TestResultSource};
pub use tab_title::{format_tab_title, TabTitle};
pub use truncate::{enforce_max_length, MaxLength, Truncation};
pub use weekly::{WeeklyAssembler, WeeklyPayload};
pub use window::{RollupWindow, SummaryType};

pub mod prelude {
    pub use crate::config::*;
    pub use crate::copy_paste::*;
    pub use crate::daily::*;
    pub use crate::error::*;
    pub use crate::extract::*;
    pub use crate::header::*;
    pub use crate::publish::*;
    pub use crate::row::*;
    pub use crate::source::*;
    pub use crate::tab_title::*;
    pub use crate::truncate::*;
    pub use crate::weekly::*;
    pub use crate::window::*;
}
