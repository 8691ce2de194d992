use serde::{Deserialize, Serialize};

/// Numeric identifier of a tab (the Sheets API `sheetId`)
pub type TabId = i64;

/// Rectangular region of one tab, 0-based and end-exclusive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: TabId,
    pub start_row_index: usize,
    pub end_row_index: usize,
    pub start_column_index: usize,
    pub end_column_index: usize,
}

impl GridRange {
    pub fn row_count(&self) -> usize {
        self.end_row_index.saturating_sub(self.start_row_index)
    }

    pub fn column_count(&self) -> usize {
        self.end_column_index
            .saturating_sub(self.start_column_index)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PasteType {
    /// Values, formulas, formats and merges
    #[default]
    PasteNormal,
    PasteValues,
    PasteFormat,
    PasteNoBorders,
    PasteFormula,
}

/// Copy one region onto another, the body of a `copyPaste` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CopyPasteInstruction {
    pub source: GridRange,
    pub destination: GridRange,
    pub paste_type: PasteType,
}

/// One entry of a `spreadsheets.batchUpdate` call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum BatchRequest {
    CopyPaste(CopyPasteInstruction),
    /// Formatting request, passed through untouched
    RepeatCell(serde_json::Value),
}

/// Values written at an A1 anchor, e.g. `'Weekly Summary'!A1`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValueRange {
    pub range: String,
    pub values: Vec<Vec<String>>,
}

impl ValueRange {
    pub fn new(
        tab_title: &str,
        start_row_index: usize,
        start_column_index: usize,
        values: Vec<Vec<String>>,
    ) -> Self {
        Self {
            range: format!(
                "'{}'!{}{}",
                tab_title.replace('\'', "''"),
                formula::column_letter(start_column_index),
                start_row_index + 1
            ),
            values,
        }
    }

    /// Split the range into `(tab title, start row index, start column index)`
    pub fn anchor(&self) -> Option<(String, usize, usize)> {
        let (title, cell) = self.range.rsplit_once('!')?;
        let title = title
            .strip_prefix('\'')
            .and_then(|t| t.strip_suffix('\''))
            .map(|t| t.replace("''", "'"))
            .unwrap_or_else(|| title.to_string());

        let split = cell.find(|c: char| c.is_ascii_digit())?;
        let (letters, row) = cell.split_at(split);
        let column = formula::column_index(letters).ok()?;
        let row: usize = row.parse().ok().filter(|r| *r > 0)?;
        Some((title, row - 1, column))
    }
}
