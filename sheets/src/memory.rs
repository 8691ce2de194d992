//! In-memory spreadsheet
//!
//! Backs dry runs and tests. Tabs are plain string grids; `copyPaste`
//! requests are applied cell by cell and every batch request is recorded
//! so callers can inspect exactly what would have been sent.

use crate::provider::{SheetsError, SheetsProvider, SheetsResult};
use crate::types::{BatchRequest, CopyPasteInstruction, TabId, ValueRange};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Serialized form of a workbook, as read by `reporter weekly --workbook`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkbookSnapshot {
    pub tabs: Vec<TabSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub title: String,
    #[serde(default)]
    pub id: Option<TabId>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
struct WorkbookState {
    tabs: Vec<TabSnapshot>,
    requests: Vec<BatchRequest>,
    next_id: TabId,
}

impl WorkbookState {
    fn insert(&mut self, title: String, id: Option<TabId>, values: Vec<Vec<String>>) -> TabId {
        let id = id.unwrap_or(self.next_id);
        self.next_id = self.next_id.max(id + 1);
        self.tabs.push(TabSnapshot {
            title,
            id: Some(id),
            values,
        });
        id
    }

    fn by_id(&self, tab_id: TabId) -> SheetsResult<&TabSnapshot> {
        self.tabs
            .iter()
            .find(|t| t.id == Some(tab_id))
            .ok_or(SheetsError::UnknownTabId { tab_id })
    }

    fn by_id_mut(&mut self, tab_id: TabId) -> SheetsResult<&mut TabSnapshot> {
        self.tabs
            .iter_mut()
            .find(|t| t.id == Some(tab_id))
            .ok_or(SheetsError::UnknownTabId { tab_id })
    }

    fn by_title_mut(&mut self, title: &str) -> SheetsResult<&mut TabSnapshot> {
        self.tabs
            .iter_mut()
            .find(|t| t.title == title)
            .ok_or_else(|| SheetsError::TabNotFound {
                title: title.to_string(),
            })
    }

    fn copy_paste(&mut self, instruction: &CopyPasteInstruction) -> SheetsResult<()> {
        let source = instruction.source;
        let tab = self.by_id(source.sheet_id)?;
        let block: Vec<Vec<String>> = (source.start_row_index..source.end_row_index)
            .map(|row| {
                (source.start_column_index..source.end_column_index)
                    .map(|column| {
                        tab.values
                            .get(row)
                            .and_then(|r| r.get(column))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        let destination = instruction.destination;
        let tab = self.by_id_mut(destination.sheet_id)?;
        write_block(
            &mut tab.values,
            destination.start_row_index,
            destination.start_column_index,
            block,
        );
        Ok(())
    }
}

fn write_block(grid: &mut Vec<Vec<String>>, row: usize, column: usize, block: Vec<Vec<String>>) {
    for (offset, values) in block.into_iter().enumerate() {
        let target_row = row + offset;
        if grid.len() <= target_row {
            grid.resize_with(target_row + 1, Vec::new);
        }
        let target = &mut grid[target_row];
        if target.len() < column + values.len() {
            target.resize(column + values.len(), String::new());
        }
        for (i, value) in values.into_iter().enumerate() {
            target[column + i] = value;
        }
    }
}

/// A workbook held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryWorkbook {
    state: Mutex<WorkbookState>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: WorkbookSnapshot) -> Self {
        let mut state = WorkbookState::default();
        for tab in snapshot.tabs {
            state.insert(tab.title, tab.id, tab.values);
        }
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn with_tab(mut self, title: impl Into<String>, values: Vec<Vec<String>>) -> Self {
        let state = self
            .state
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.insert(title.into(), None, values);
        self
    }

    pub fn add_tab(&self, title: impl Into<String>, values: Vec<Vec<String>>) -> SheetsResult<TabId> {
        Ok(self.lock()?.insert(title.into(), None, values))
    }

    pub fn titles(&self) -> SheetsResult<Vec<String>> {
        Ok(self.lock()?.tabs.iter().map(|t| t.title.clone()).collect())
    }

    pub fn values(&self, title: &str) -> SheetsResult<Vec<Vec<String>>> {
        Ok(self.lock()?.by_title_mut(title)?.values.clone())
    }

    /// Every batch request received so far, in order
    pub fn recorded_requests(&self) -> SheetsResult<Vec<BatchRequest>> {
        Ok(self.lock()?.requests.clone())
    }

    pub fn snapshot(&self) -> SheetsResult<WorkbookSnapshot> {
        Ok(WorkbookSnapshot {
            tabs: self.lock()?.tabs.clone(),
        })
    }

    fn lock(&self) -> SheetsResult<MutexGuard<'_, WorkbookState>> {
        self.state
            .lock()
            .map_err(|_| SheetsError::ServiceUnavailable {
                message: "workbook lock poisoned".to_string(),
            })
    }
}

#[async_trait]
impl SheetsProvider for InMemoryWorkbook {
    async fn resolve_tab_id(&self, title: &str) -> SheetsResult<TabId> {
        let state = self.lock()?;
        state
            .tabs
            .iter()
            .find(|t| t.title == title)
            .and_then(|t| t.id)
            .ok_or_else(|| SheetsError::TabNotFound {
                title: title.to_string(),
            })
    }

    async fn fetch_tab_values(&self, tab_id: TabId) -> SheetsResult<Vec<Vec<String>>> {
        Ok(self.lock()?.by_id(tab_id)?.values.clone())
    }

    async fn append_rows(&self, tab_title: &str, rows: Vec<Vec<String>>) -> SheetsResult<usize> {
        let mut state = self.lock()?;
        let tab = state.by_title_mut(tab_title)?;
        while tab.values.last().is_some_and(|r| r.iter().all(String::is_empty)) {
            tab.values.pop();
        }
        let appended = rows.len();
        tab.values.extend(rows);
        debug!("Appended {} rows to '{}'", appended, tab_title);
        Ok(appended)
    }

    async fn update_values(&self, update: ValueRange) -> SheetsResult<()> {
        let (title, row, column) = update.anchor().ok_or_else(|| SheetsError::InvalidRange {
            range: update.range.clone(),
        })?;
        let mut state = self.lock()?;
        let tab = state.by_title_mut(&title)?;
        write_block(&mut tab.values, row, column, update.values);
        Ok(())
    }

    async fn batch_update(&self, requests: Vec<BatchRequest>) -> SheetsResult<usize> {
        let mut state = self.lock()?;
        for request in &requests {
            if let BatchRequest::CopyPaste(instruction) = request {
                state.copy_paste(instruction)?;
            }
        }
        let applied = requests.len();
        state.requests.extend(requests);
        debug!("Applied {} batch requests", applied);
        Ok(applied)
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GridRange, PasteType};

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn test_tab_ids_are_sequential() {
        let workbook = InMemoryWorkbook::new()
            .with_tab("Weekly Summary", vec![])
            .with_tab("Mar 18, 2024", vec![row(&["a"])]);

        assert_eq!(workbook.resolve_tab_id("Weekly Summary").await.unwrap(), 0);
        assert_eq!(workbook.resolve_tab_id("Mar 18, 2024").await.unwrap(), 1);
        assert!(matches!(
            workbook.resolve_tab_id("Mar 19, 2024").await,
            Err(SheetsError::TabNotFound { .. })
        ));
        assert_eq!(workbook.add_tab("Mar 19, 2024", vec![]).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_ids_are_kept() {
        let snapshot: WorkbookSnapshot = serde_json::from_str(
            r#"{"tabs": [
                {"title": "Weekly Summary", "id": 40},
                {"title": "Mar 18, 2024", "values": [["x", "y"]]}
            ]}"#,
        )
        .unwrap();
        let workbook = InMemoryWorkbook::from_snapshot(snapshot);

        assert_eq!(workbook.resolve_tab_id("Weekly Summary").await.unwrap(), 40);
        let id = workbook.resolve_tab_id("Mar 18, 2024").await.unwrap();
        assert_eq!(id, 41);
        assert_eq!(
            workbook.fetch_tab_values(id).await.unwrap(),
            vec![row(&["x", "y"])]
        );
    }

    #[tokio::test]
    async fn test_append_skips_trailing_blank_rows() {
        let workbook = InMemoryWorkbook::new().with_tab("Mar 18, 2024", vec![row(&["a"]), row(&["", ""])]);

        let appended = workbook
            .append_rows("Mar 18, 2024", vec![row(&["b"]), row(&["c"])])
            .await
            .unwrap();

        assert_eq!(appended, 2);
        assert_eq!(
            workbook.values("Mar 18, 2024").unwrap(),
            vec![row(&["a"]), row(&["b"]), row(&["c"])]
        );
        assert!(workbook.append_rows("missing", vec![]).await.is_err());
    }

    #[tokio::test]
    async fn test_update_values_grows_grid() {
        let workbook = InMemoryWorkbook::new().with_tab("Weekly Summary", vec![]);

        workbook
            .update_values(ValueRange::new("Weekly Summary", 1, 2, vec![row(&["x", "y"])]))
            .await
            .unwrap();

        assert_eq!(
            workbook.values("Weekly Summary").unwrap(),
            vec![vec![], row(&["", "", "x", "y"])]
        );
    }

    #[tokio::test]
    async fn test_copy_paste_applied_and_recorded() {
        let workbook = InMemoryWorkbook::new()
            .with_tab("Weekly Summary", vec![])
            .with_tab("Mar 18, 2024", vec![row(&["a", "b"]), row(&["c"])]);

        let instruction = CopyPasteInstruction {
            source: GridRange {
                sheet_id: 1,
                start_row_index: 0,
                end_row_index: 2,
                start_column_index: 0,
                end_column_index: 2,
            },
            destination: GridRange {
                sheet_id: 0,
                start_row_index: 1,
                end_row_index: 3,
                start_column_index: 2,
                end_column_index: 4,
            },
            paste_type: PasteType::PasteNormal,
        };

        let applied = workbook
            .batch_update(vec![BatchRequest::CopyPaste(instruction.clone())])
            .await
            .unwrap();
        assert_eq!(applied, 1);

        assert_eq!(
            workbook.values("Weekly Summary").unwrap(),
            vec![vec![], row(&["", "", "a", "b"]), row(&["", "", "c", ""])]
        );
        assert_eq!(
            workbook.recorded_requests().unwrap(),
            vec![BatchRequest::CopyPaste(instruction)]
        );
    }

    #[tokio::test]
    async fn test_copy_paste_unknown_tab() {
        let workbook = InMemoryWorkbook::new();
        let range = GridRange {
            sheet_id: 5,
            start_row_index: 0,
            end_row_index: 1,
            start_column_index: 0,
            end_column_index: 1,
        };
        let result = workbook
            .batch_update(vec![BatchRequest::CopyPaste(CopyPasteInstruction {
                source: range,
                destination: range,
                paste_type: PasteType::PasteNormal,
            })])
            .await;
        assert!(matches!(result, Err(SheetsError::UnknownTabId { tab_id: 5 })));
    }
}
