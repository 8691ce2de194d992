//! Classification header
//!
//! The block above the column titles of a daily tab. Each axis (type,
//! category, team) gets one cell per known label in its own column, holding
//! a live `passed / failed / total` formula over the data rows below. Axes
//! with fewer labels leave blank cells so the block stays rectangular.
//!
//! Sheet layout for `n` = longest label universe:
//!
//! ```text
//! rows 1..=n     header block
//! row  n + 1     column titles (the header row)
//! rows n + 2..   one row per test
//! ```

use crate::config::{ClassificationAxis, LabelSource};
use crate::error::{ReportError, ReportResult};
use crate::row::{ReportRowEntry, STATE_COLUMN_INDEX};
use formula::{column_letter, get_formulas, FormulaSet};
use tracing::{debug, error};

/// Counts for one label, computed from the rows and mirrored by its formulas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisCount {
    pub label: String,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    pub formulas: FormulaSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisReport {
    pub axis: ClassificationAxis,
    pub column_index: usize,
    /// The final axis closes the block's column span
    pub is_final: bool,
    pub counts: Vec<AxisCount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    pub rows: Vec<Vec<String>>,
    pub axes: Vec<AxisReport>,
    /// 1-based sheet row of the column titles
    pub header_row_index: usize,
    /// 1-based sheet row of the last test row
    pub total_rows: usize,
}

impl HeaderBlock {
    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or_default()
    }

    pub fn axis(&self, axis: ClassificationAxis) -> Option<&AxisReport> {
        self.axes.iter().find(|report| report.axis == axis)
    }
}

/// Build the header block for `rows` using the label universes of `labels`
///
/// Any failure is logged and reported as a single
/// [`ReportError::HeaderReport`] carrying the original cause.
pub fn construct_header_report(
    rows: &[ReportRowEntry],
    labels: &dyn LabelSource,
) -> ReportResult<HeaderBlock> {
    build_header_report(rows, labels).map_err(|e| {
        error!("Failed to construct header report: {}", e);
        ReportError::HeaderReport {
            source: Box::new(e),
        }
    })
}

fn build_header_report(
    rows: &[ReportRowEntry],
    labels: &dyn LabelSource,
) -> ReportResult<HeaderBlock> {
    let mut universes = Vec::with_capacity(ClassificationAxis::ALL.len());
    for (axis_index, axis) in ClassificationAxis::ALL.into_iter().enumerate() {
        let universe = labels.labels(axis).map_err(|e| {
            error!(
                "Invalid label universe at axis index {} ({}): {}",
                axis_index, axis, e
            );
            e
        })?;
        universes.push((axis, universe));
    }

    let longest = universes
        .iter()
        .map(|(_, universe)| universe.len())
        .max()
        .unwrap_or_default();
    let header_row_index = longest + 1;
    let total_rows = header_row_index + rows.len();

    let reports = universes
        .iter()
        .map(|(axis, universe)| {
            generate_axis_report(
                *axis,
                universe,
                rows,
                header_row_index,
                total_rows,
                axis.is_final(),
            )
        })
        .collect::<ReportResult<Vec<_>>>()?;

    let placeholders = generate_placeholder_rows(longest, &reports)?;
    let block = combine_header_reports(placeholders, reports, header_row_index, total_rows);
    debug!(
        "Header block: {} rows x {} columns over {} tests",
        block.rows.len(),
        block.width(),
        rows.len()
    );
    Ok(block)
}

fn generate_axis_report(
    axis: ClassificationAxis,
    universe: &[String],
    rows: &[ReportRowEntry],
    header_row_index: usize,
    total_rows: usize,
    is_final: bool,
) -> ReportResult<AxisReport> {
    let column_index = axis.column_index();
    let subject_column = column_letter(column_index);
    let state_column = column_letter(STATE_COLUMN_INDEX);

    let counts = universe
        .iter()
        .map(|label| {
            // COUNTIF is case-insensitive, the local counts follow suit.
            let wanted = label.to_lowercase();
            let matching: Vec<&ReportRowEntry> = rows
                .iter()
                .filter(|row| row.column(column_index).to_lowercase() == wanted)
                .collect();
            let report = get_formulas(
                label,
                header_row_index,
                total_rows,
                rows.len(),
                &subject_column,
                &state_column,
            )?;

            Ok(AxisCount {
                label: label.clone(),
                passed: matching.iter().filter(|r| r.state == "passed").count(),
                failed: matching.iter().filter(|r| r.state == "failed").count(),
                total: matching.len(),
                formulas: report.formulas,
            })
        })
        .collect::<ReportResult<Vec<_>>>()?;

    Ok(AxisReport {
        axis,
        column_index,
        is_final,
        counts,
    })
}

/// Blank rows spanning up to and including the final axis column
fn generate_placeholder_rows(
    longest: usize,
    reports: &[AxisReport],
) -> ReportResult<Vec<Vec<String>>> {
    let final_column = reports
        .iter()
        .find(|report| report.is_final)
        .map(|report| report.column_index)
        .ok_or_else(|| ReportError::invalid_input("no final classification axis"))?;

    Ok(vec![vec![String::new(); final_column + 1]; longest])
}

fn combine_header_reports(
    mut rows: Vec<Vec<String>>,
    reports: Vec<AxisReport>,
    header_row_index: usize,
    total_rows: usize,
) -> HeaderBlock {
    for report in &reports {
        for (row, count) in rows.iter_mut().zip(&report.counts) {
            if let Some(cell) = row.get_mut(report.column_index) {
                *cell = count.formulas.summary_cell(&count.label);
            }
        }
    }

    HeaderBlock {
        rows,
        axes: reports,
        header_row_index,
        total_rows,
    }
}
