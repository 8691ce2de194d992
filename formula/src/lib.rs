//! Spreadsheet formula helpers for test-run reports
//!
//! This crate owns the A1 arithmetic shared by the daily and weekly report
//! builders: column letters, row ranges, and the passed/failed/total
//! aggregate formulas written into report headers. It also parses those
//! ranges back out of a formula so callers can check that a header still
//! describes the rows underneath it.

use thiserror::Error;

/// Errors related to formula generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error("Invalid parameter types for formula generation: {0}")]
    InvalidParameters(String),
    #[error("Invalid column reference: {0:?}")]
    InvalidColumn(String),
    #[error("Invalid row range: {start}..{end}")]
    InvalidRowRange { start: usize, end: usize },
    #[error("Invalid A1 range: {0:?}")]
    InvalidRange(String),
    #[error("Failed to generate formulas")]
    Generation {
        #[source]
        source: Box<FormulaError>,
    },
}

pub type FormulaResult<T> = Result<T, FormulaError>;

/// Criterion matching any non-empty cell in `COUNTIF`
const NON_EMPTY: &str = "<>";

/// Convert a 0-based column index to its letter form (0 -> A, 25 -> Z, 26 -> AA)
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        letters.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Convert a column letter sequence back to its 0-based index
pub fn column_index(letters: &str) -> FormulaResult<usize> {
    if !is_column(letters) {
        return Err(FormulaError::InvalidColumn(letters.to_string()));
    }

    let mut index = 0usize;
    for byte in letters.bytes() {
        index = index
            .checked_mul(26)
            .and_then(|n| n.checked_add((byte - b'A') as usize + 1))
            .ok_or_else(|| FormulaError::InvalidColumn(letters.to_string()))?;
    }
    Ok(index - 1)
}

fn is_column(letters: &str) -> bool {
    !letters.is_empty() && letters.bytes().all(|b| b.is_ascii_uppercase())
}

/// A single-area A1 range such as `C3:C40`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    pub start_column: String,
    pub start_row: usize,
    pub end_column: String,
    pub end_row: usize,
}

impl A1Range {
    /// Build a range over one column, rows are 1-based and inclusive
    pub fn column(column: &str, start_row: usize, end_row: usize) -> FormulaResult<Self> {
        if !is_column(column) {
            return Err(FormulaError::InvalidColumn(column.to_string()));
        }
        // An empty body is written as `X{n+1}:X{n}`, which matches nothing.
        let past_end = end_row.checked_add(1);
        if start_row == 0 || past_end.map_or(true, |past_end| past_end < start_row) {
            return Err(FormulaError::InvalidRowRange {
                start: start_row,
                end: end_row,
            });
        }

        Ok(Self {
            start_column: column.to_string(),
            start_row,
            end_column: column.to_string(),
            end_row,
        })
    }
}

impl std::fmt::Display for A1Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            self.start_column, self.start_row, self.end_column, self.end_row
        )
    }
}

impl std::str::FromStr for A1Range {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_range(s)
    }
}

/// Parse a range like `A2:A10` (absolute `$` markers are accepted)
pub fn parse_range(input: &str) -> FormulaResult<A1Range> {
    let invalid = || FormulaError::InvalidRange(input.to_string());
    let (start, end) = input.trim().split_once(':').ok_or_else(invalid)?;
    let (start_column, start_row) = parse_cell(start).ok_or_else(invalid)?;
    let (end_column, end_row) = parse_cell(end).ok_or_else(invalid)?;

    Ok(A1Range {
        start_column,
        start_row,
        end_column,
        end_row,
    })
}

fn parse_cell(cell: &str) -> Option<(String, usize)> {
    let cell = cell.replace('$', "");
    let split = cell.find(|c: char| c.is_ascii_digit())?;
    let (column, row) = cell.split_at(split);
    if !is_column(column) || !row.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let row = row.parse().ok().filter(|r| *r > 0)?;
    Some((column.to_string(), row))
}

/// Every A1 range referenced by a formula, in order of appearance
///
/// Text inside string literals is never read as a reference.
pub fn ranges_in(formula: &str) -> Vec<A1Range> {
    let mut ranges = Vec::new();
    let mut token = String::new();
    let mut in_literal = false;
    for c in formula.chars().chain(std::iter::once(' ')) {
        if c == '"' {
            in_literal = !in_literal;
            token.clear();
        } else if in_literal {
            continue;
        } else if matches!(c, '(' | ')' | ',' | '=' | '&' | ' ') {
            if let Ok(range) = parse_range(&token) {
                ranges.push(range);
            }
            token.clear();
        } else {
            token.push(c);
        }
    }
    ranges
}

/// Aggregate formulas for one label of one classification column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaSet {
    pub passed: String,
    pub failed: String,
    pub total: String,
}

impl FormulaSet {
    /// Recover `(header_row_index, total_rows)` from the generated ranges
    pub fn row_bounds(&self) -> FormulaResult<(usize, usize)> {
        let range = ranges_in(&self.passed)
            .into_iter()
            .next()
            .ok_or_else(|| FormulaError::InvalidRange(self.passed.clone()))?;
        Ok((range.start_row - 1, range.end_row))
    }

    /// One cell rendering all three counts, e.g. `team-a: 3 passed / 1 failed / 4 total`
    pub fn summary_cell(&self, caption: &str) -> String {
        format!(
            "=CONCATENATE(\"{}: \", {}, \" passed / \", {}, \" failed / \", {}, \" total\")",
            escape(caption),
            strip_equals(&self.passed),
            strip_equals(&self.failed),
            strip_equals(&self.total),
        )
    }
}

fn strip_equals(formula: &str) -> &str {
    formula.strip_prefix('=').unwrap_or(formula)
}

fn escape(text: &str) -> String {
    text.replace('"', "\"\"")
}

/// Formulas for one label together with the layout they were built for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFormulas {
    pub label: String,
    pub header_row_index: usize,
    pub total_rows: usize,
    pub body_row_count: usize,
    pub formulas: FormulaSet,
}

/// Generate passed/failed/total formulas for `label`
///
/// The rows counted are `header_row_index + 1 ..= total_rows` in 1-based
/// sheet numbering. `subject_column` holds the label, `state_column` holds
/// the `passed`/`failed` outcome. An empty label counts every non-empty
/// subject cell, which is how the overall totals are written.
///
/// # Examples
///
/// ```
/// let report = formula::get_formulas("unit", 1, 10, 8, "A", "B").unwrap();
/// assert!(report.formulas.passed.contains("A2:A10"));
/// ```
pub fn get_formulas(
    label: &str,
    header_row_index: usize,
    total_rows: usize,
    body_row_count: usize,
    subject_column: &str,
    state_column: &str,
) -> FormulaResult<LabelFormulas> {
    for column in [subject_column, state_column] {
        if !is_column(column) {
            return Err(FormulaError::InvalidParameters(format!(
                "expected a column letter, got {:?}",
                column
            )));
        }
    }

    let formulas = build_formula_set(
        label,
        header_row_index,
        total_rows,
        subject_column,
        state_column,
    )
    .map_err(|e| FormulaError::Generation {
        source: Box::new(e),
    })?;

    Ok(LabelFormulas {
        label: label.to_string(),
        header_row_index,
        total_rows,
        body_row_count,
        formulas,
    })
}

fn build_formula_set(
    label: &str,
    header_row_index: usize,
    total_rows: usize,
    subject_column: &str,
    state_column: &str,
) -> FormulaResult<FormulaSet> {
    let first_row = header_row_index
        .checked_add(1)
        .ok_or(FormulaError::InvalidRowRange {
            start: header_row_index,
            end: total_rows,
        })?;
    let subject = A1Range::column(subject_column, first_row, total_rows)?;
    let state = A1Range::column(state_column, first_row, total_rows)?;
    let criterion = if label.is_empty() {
        NON_EMPTY.to_string()
    } else {
        escape(label)
    };

    Ok(FormulaSet {
        passed: format!(
            "=COUNTIFS({},\"{}\",{},\"passed\")",
            subject, criterion, state
        ),
        failed: format!(
            "=COUNTIFS({},\"{}\",{},\"failed\")",
            subject, criterion, state
        ),
        total: format!("=COUNTIF({},\"{}\")", subject, criterion),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(8), "I");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(51), "AZ");
        assert_eq!(column_letter(52), "BA");
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A").unwrap(), 0);
        assert_eq!(column_index("Z").unwrap(), 25);
        assert_eq!(column_index("AA").unwrap(), 26);
        assert_eq!(column_index("BA").unwrap(), 52);
        for index in [0, 7, 25, 26, 701, 702] {
            assert_eq!(column_index(&column_letter(index)).unwrap(), index);
        }
        assert!(column_index("").is_err());
        assert!(column_index("a").is_err());
        assert!(column_index("A1").is_err());
    }

    #[test]
    fn test_passed_formula_range() {
        let report = get_formulas("unit", 1, 10, 8, "A", "B").unwrap();
        assert!(report.formulas.passed.contains("A2:A10"));
        assert!(report.formulas.passed.contains("B2:B10"));
        assert!(report.formulas.passed.contains("\"passed\""));
        assert!(report.formulas.failed.contains("\"failed\""));
        assert_eq!(report.formulas.total, "=COUNTIF(A2:A10,\"unit\")");
        assert_eq!(report.body_row_count, 8);
        assert_eq!(report.label, "unit");
    }

    #[test]
    fn test_empty_label_counts_non_empty_cells() {
        let report = get_formulas("", 4, 20, 16, "C", "I").unwrap();
        assert_eq!(report.formulas.total, "=COUNTIF(C5:C20,\"<>\")");
    }

    #[test]
    fn test_quotes_in_label_are_escaped() {
        let report = get_formulas("say \"hi\"", 1, 3, 2, "D", "I").unwrap();
        assert!(report.formulas.total.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn test_invalid_columns_rejected_without_partial_result() {
        let err = get_formulas("unit", 1, 10, 8, "", "B").unwrap_err();
        assert!(matches!(err, FormulaError::InvalidParameters(_)));
        assert!(err
            .to_string()
            .starts_with("Invalid parameter types for formula generation"));

        let err = get_formulas("unit", 1, 10, 8, "A", "b2").unwrap_err();
        assert!(matches!(err, FormulaError::InvalidParameters(_)));
    }

    #[test]
    fn test_backwards_range_is_wrapped() {
        let err = get_formulas("unit", 10, 3, 0, "A", "B").unwrap_err();
        assert_eq!(err.to_string(), "Failed to generate formulas");
        match err {
            FormulaError::Generation { source } => {
                assert_eq!(*source, FormulaError::InvalidRowRange { start: 11, end: 3 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_row_overflow_is_an_error() {
        let err = get_formulas("unit", 1, usize::MAX, 0, "A", "B").unwrap_err();
        match err {
            FormulaError::Generation { source } => {
                assert_eq!(
                    *source,
                    FormulaError::InvalidRowRange {
                        start: 2,
                        end: usize::MAX
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = get_formulas("unit", usize::MAX, 3, 0, "A", "B").unwrap_err();
        match err {
            FormulaError::Generation { source } => {
                assert_eq!(
                    *source,
                    FormulaError::InvalidRowRange {
                        start: usize::MAX,
                        end: 3
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_range() {
        let report = get_formulas("unit", 4, 4, 0, "A", "B").unwrap();
        assert!(report.formulas.total.contains("A5:A4"));
        assert_eq!(report.formulas.row_bounds().unwrap(), (4, 4));
    }

    #[test]
    fn test_parse_range() {
        let range = parse_range("C3:C40").unwrap();
        assert_eq!(range.start_column, "C");
        assert_eq!(range.start_row, 3);
        assert_eq!(range.end_row, 40);
        assert_eq!(range.to_string(), "C3:C40");

        let absolute: A1Range = "$AB$2:$AB$9".parse().unwrap();
        assert_eq!(absolute.start_column, "AB");
        assert_eq!(absolute.end_row, 9);

        assert!(parse_range("C3").is_err());
        assert!(parse_range("C0:C4").is_err());
        assert!(parse_range("3C:C4").is_err());
    }

    #[test]
    fn test_row_bounds_round_trip() {
        for (header_row_index, total_rows) in [(1, 10), (4, 4), (12, 300)] {
            let report = get_formulas(
                "team-a",
                header_row_index,
                total_rows,
                total_rows - header_row_index,
                "F",
                "I",
            )
            .unwrap();
            assert_eq!(
                report.formulas.row_bounds().unwrap(),
                (header_row_index, total_rows)
            );
        }
    }

    #[test]
    fn test_summary_cell_keeps_ranges() {
        let report = get_formulas("Checkout", 3, 12, 9, "E", "I").unwrap();
        let cell = report.formulas.summary_cell("Checkout");
        assert!(cell.starts_with("=CONCATENATE(\"Checkout: \""));
        assert!(!cell.contains("=COUNTIF"));

        let ranges = ranges_in(&cell);
        assert_eq!(ranges.len(), 5);
        assert!(ranges.iter().all(|r| r.start_row == 4 && r.end_row == 12));
    }

    #[test]
    fn test_caption_text_is_not_a_range() {
        let report = get_formulas("A1:A3", 3, 12, 9, "E", "I").unwrap();
        let cell = report.formulas.summary_cell("x A1:A3 y");

        let ranges = ranges_in(&cell);
        assert_eq!(ranges.len(), 5);
        assert!(ranges.iter().all(|r| r.start_column == "E" || r.start_column == "I"));
    }
}
