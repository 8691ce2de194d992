//! Formatting requests
//!
//! The report builders only need to know that a style request exists and
//! which cells it covers; the format itself is passed to the backend as is.

use serde_json::{json, Value};
use sheets::{BatchRequest, TabId};

fn bold_header_format() -> Value {
    json!({
        "backgroundColor": {"red": 0.85, "green": 0.89, "blue": 0.95},
        "horizontalAlignment": "CENTER",
        "textFormat": {"bold": true}
    })
}

/// Bold the summary header row across `column_count` columns
pub fn summary_header_style(tab_id: TabId, column_count: usize) -> BatchRequest {
    BatchRequest::RepeatCell(json!({
        "range": {
            "sheetId": tab_id,
            "startRowIndex": 0,
            "endRowIndex": 1,
            "startColumnIndex": 0,
            "endColumnIndex": column_count
        },
        "cell": {"userEnteredFormat": bold_header_format()},
        "fields": "userEnteredFormat(backgroundColor,textFormat,horizontalAlignment)"
    }))
}

/// Bold the column-title row of a daily tab
pub fn column_titles_style(tab_id: TabId, row_index: usize, column_count: usize) -> BatchRequest {
    BatchRequest::RepeatCell(json!({
        "range": {
            "sheetId": tab_id,
            "startRowIndex": row_index,
            "endRowIndex": row_index + 1,
            "startColumnIndex": 0,
            "endColumnIndex": column_count
        },
        "cell": {"userEnteredFormat": {"textFormat": {"bold": true}}},
        "fields": "userEnteredFormat.textFormat"
    }))
}
