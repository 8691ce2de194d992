//! Field extractors
//!
//! Pure functions deriving one report field each from a test title, a spec
//! path or the canonical [`RawTestResult`]. Titles carry classification in
//! bracket tokens, e.g. `checkout applies coupon [Payments] [smoke] TC-1042`.

use crate::config::SpeedThresholds;
use crate::error::ReportResult;
use crate::source::{self, RawTestResult};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::warn;

/// Written when a path matches no known type, or has no usable component
pub const UNCLASSIFIED: &str = "Unclassified";

fn bracket_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\[\]]*)\]").expect("bracket regex"))
}

fn manual_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bTC-?\d+\b").expect("manual test id regex"))
}

fn ansi_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("ansi regex"))
}

fn spec_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\.(spec|test|cy|e2e)\.[cm]?[jt]sx?$").expect("spec suffix regex")
    })
}

fn bracket_tokens(full_title: &str) -> impl Iterator<Item = &str> {
    bracket_regex()
        .captures_iter(full_title)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
}

/// First bracket token matching `universe`, with the title's casing
fn first_bracket_match(full_title: &str, universe: &[String]) -> String {
    bracket_tokens(full_title)
        .find(|token| {
            let token = token.to_lowercase();
            universe.iter().any(|label| label.to_lowercase() == token)
        })
        .map(str::to_string)
        .unwrap_or_default()
}

pub fn extract_team_name(full_title: &str, team_names: &[String]) -> String {
    if team_names.is_empty() {
        // TODO: decide whether an empty team universe should be rejected at config load.
        warn!("No team names configured, leaving team blank");
        return String::new();
    }
    first_bracket_match(full_title, team_names)
}

pub fn extract_category(full_title: &str, categories: &[String]) -> String {
    first_bracket_match(full_title, categories)
}

pub fn extract_team_name_from_test(test: &Value, team_names: &[String]) -> ReportResult<String> {
    Ok(extract_team_name(source::full_title(test)?, team_names))
}

pub fn extract_category_from_test(test: &Value, categories: &[String]) -> ReportResult<String> {
    Ok(extract_category(source::full_title(test)?, categories))
}

pub fn extract_manual_test_case_id_from_test(test: &Value) -> ReportResult<String> {
    Ok(extract_manual_test_case_id(source::full_title(test)?))
}

fn path_segments(full_file: &str) -> Vec<&str> {
    full_file
        .split(['/', '\\'])
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

/// Match a type label against the directories and file-name parts of the spec path
pub fn extract_type(full_file: &str, types: &[String]) -> String {
    let find = |part: &str| {
        let part = part.to_lowercase();
        types.iter().find(|label| label.to_lowercase() == part).cloned()
    };

    path_segments(full_file)
        .into_iter()
        .find_map(|segment| {
            find(segment).or_else(|| segment.split(['.', '-', '_']).find_map(|part| find(part)))
        })
        .unwrap_or_else(|| UNCLASSIFIED.to_string())
}

/// The directory directly containing the spec file
pub fn extract_area(full_file: &str) -> String {
    let segments = path_segments(full_file);
    match segments.len() {
        0 | 1 => UNCLASSIFIED.to_string(),
        n => segments[n - 2].to_string(),
    }
}

/// The spec file name without its test suffix (`cart.spec.ts` -> `cart`)
pub fn extract_spec(full_file: &str) -> String {
    let Some(file_name) = path_segments(full_file).pop() else {
        return UNCLASSIFIED.to_string();
    };

    if let Some(m) = spec_suffix_regex().find(file_name) {
        return file_name[..m.start()].to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

pub fn extract_manual_test_case_id(full_title: &str) -> String {
    manual_id_regex()
        .find(full_title)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// The title without bracket tokens, whitespace collapsed
pub fn extract_test_name(full_title: &str) -> String {
    bracket_regex()
        .replace_all(full_title, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn extract_speed(duration_ms: Option<f64>, thresholds: &SpeedThresholds) -> String {
    duration_ms
        .map(|d| thresholds.classify(d).to_string())
        .unwrap_or_default()
}

pub fn extract_error(error: Option<&str>) -> String {
    error
        .map(|e| ansi_regex().replace_all(e, "").trim().to_string())
        .unwrap_or_default()
}

/// Status as the framework reported it
pub fn extract_status(raw: &RawTestResult) -> String {
    raw.test_state
        .as_deref()
        .or(raw.result_state.as_deref())
        .unwrap_or_default()
        .to_string()
}

/// Outcome normalized to the values the header formulas count
pub fn extract_state(raw: &RawTestResult) -> String {
    let status = extract_status(raw);
    let normalized = match status.to_ascii_lowercase().as_str() {
        "passed" | "expected" | "flaky" => "passed",
        "failed" | "unexpected" | "timedout" | "interrupted" => "failed",
        "skipped" => "skipped",
        "pending" => "pending",
        other => return other.to_string(),
    };
    normalized.to_string()
}
