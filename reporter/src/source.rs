//! Framework-specific result records
//!
//! Playwright and Cypress describe a test run with nearly the same fields
//! but disagree on the error shape. Each variant is normalized once into a
//! [`RawTestResult`]; extractors only ever see the canonical record.

use crate::error::{ReportError, ReportResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Playwright,
    Cypress,
}

impl std::str::FromStr for Framework {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "playwright" => Ok(Framework::Playwright),
            "cypress" | "mocha" => Ok(Framework::Cypress),
            other => Err(ReportError::invalid_input(format!(
                "unknown framework: {}",
                other
            ))),
        }
    }
}

/// Execution context wrapping one or more tests (one spec file)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionContext {
    pub full_file: Option<String>,
    pub state: Option<String>,
}

/// Fields common to both frameworks' test records
#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
    pub full_title: String,
    pub duration_ms: Option<f64>,
    pub project_name: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestResultSource {
    /// `err` is a plain string
    Playwright {
        result: ExecutionContext,
        test: TestRecord,
        err: Option<String>,
    },
    /// `err` is an object carrying `message`
    Cypress {
        result: ExecutionContext,
        test: TestRecord,
        err_message: Option<String>,
    },
}

/// The canonical record every extractor works from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTestResult {
    pub full_title: String,
    pub full_file: String,
    pub duration_ms: Option<f64>,
    pub project_name: String,
    pub error: Option<String>,
    pub test_state: Option<String>,
    pub result_state: Option<String>,
}

/// The test title, which every row requires
pub fn full_title(test: &Value) -> ReportResult<&str> {
    test.get("fullTitle")
        .and_then(Value::as_str)
        .ok_or_else(|| ReportError::type_error("fullTitle", "a string"))
}

fn text_field(object: &Value, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl TestResultSource {
    /// Validate the untyped records handed over by the result parser
    pub fn from_json(result: &Value, test: &Value, framework: Framework) -> ReportResult<Self> {
        if !result.is_object() {
            return Err(ReportError::invalid_input(
                "result must be a non-null object",
            ));
        }
        if !test.is_object() {
            return Err(ReportError::invalid_input("test must be a non-null object"));
        }

        let context = ExecutionContext {
            full_file: text_field(result, "fullFile"),
            state: text_field(result, "state"),
        };
        let record = TestRecord {
            full_title: full_title(test)?.to_string(),
            duration_ms: test.get("duration").and_then(Value::as_f64),
            project_name: text_field(test, "projectName"),
            state: text_field(test, "state"),
        };

        Ok(match framework {
            Framework::Playwright => TestResultSource::Playwright {
                result: context,
                test: record,
                err: test.get("err").and_then(Value::as_str).map(str::to_string),
            },
            Framework::Cypress => TestResultSource::Cypress {
                result: context,
                test: record,
                err_message: test
                    .get("err")
                    .and_then(|err| err.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
        })
    }

    pub fn framework(&self) -> Framework {
        match self {
            TestResultSource::Playwright { .. } => Framework::Playwright,
            TestResultSource::Cypress { .. } => Framework::Cypress,
        }
    }

    pub fn normalize(&self) -> RawTestResult {
        match self {
            TestResultSource::Playwright { result, test, err } => {
                RawTestResult::from_parts(result, test, err.clone())
            }
            TestResultSource::Cypress {
                result,
                test,
                err_message,
            } => RawTestResult::from_parts(result, test, err_message.clone()),
        }
    }
}

impl RawTestResult {
    fn from_parts(result: &ExecutionContext, test: &TestRecord, error: Option<String>) -> Self {
        Self {
            full_title: test.full_title.clone(),
            full_file: result.full_file.clone().unwrap_or_default(),
            duration_ms: test.duration_ms,
            project_name: test.project_name.clone().unwrap_or_default(),
            error,
            test_state: test.state.clone(),
            result_state: result.state.clone(),
        }
    }
}
