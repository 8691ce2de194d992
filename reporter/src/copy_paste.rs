use crate::error::{ReportError, ReportResult};
use sheets::{CopyPasteInstruction, GridRange, PasteType, TabId};

/// Region to copy from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceParams {
    pub source_page_id: Option<TabId>,
    pub start_row_index: usize,
    pub end_row_index: usize,
    pub start_column_index: usize,
    pub end_column_index: usize,
}

/// Region to paste into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DestinationParams {
    pub destination_tab_id: Option<TabId>,
    pub start_row_index: usize,
    pub end_row_index: usize,
    pub start_column_index: usize,
    pub end_column_index: usize,
}

/// A `PASTE_NORMAL` copy of one region onto another
///
/// Indices are passed through untouched; the caller keeps ranges valid and
/// non-overlapping.
pub fn copy_paste_normal(
    source: &SourceParams,
    destination: &DestinationParams,
) -> ReportResult<CopyPasteInstruction> {
    let (Some(source_id), Some(destination_id)) =
        (source.source_page_id, destination.destination_tab_id)
    else {
        return Err(ReportError::MissingTabId);
    };

    Ok(CopyPasteInstruction {
        source: GridRange {
            sheet_id: source_id,
            start_row_index: source.start_row_index,
            end_row_index: source.end_row_index,
            start_column_index: source.start_column_index,
            end_column_index: source.end_column_index,
        },
        destination: GridRange {
            sheet_id: destination_id,
            start_row_index: destination.start_row_index,
            end_row_index: destination.end_row_index,
            start_column_index: destination.start_column_index,
            end_column_index: destination.end_column_index,
        },
        paste_type: PasteType::PasteNormal,
    })
}
