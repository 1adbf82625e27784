//! Diagnostic messages and the issue aggregator
//!
//! Every stage of a run writes into a single [`IssueAggregator`], passed by
//! exclusive reference. The aggregator applies, in order:
//!
//! 1. the severity override for the message code, if configured,
//! 2. the allow-list (`only_issues`) and deny-list (`ignored_issues`),
//! 3. truncation once `max_issues` messages have been retained.
//!
//! Messages keep the order in which they were recorded. Nothing is sorted
//! or deduplicated.

mod codes;

pub use codes::IssueCode;

use crate::config::ValidatorConfig;
use crate::pointer::Pointer;
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Message severity, ordered by decreasing impact on conformance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    /// The document violates the format
    Error = 0,
    /// Likely problem, the document is still conformant
    Warning = 1,
    /// Advisory note
    Information = 2,
    /// Suggestion
    Hint = 3,
}

impl Severity {
    /// Lower-case name, as accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "information",
            Severity::Hint => "hint",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" | "0" => Ok(Severity::Error),
            "warning" | "1" => Ok(Severity::Warning),
            "information" | "info" | "2" => Ok(Severity::Information),
            "hint" | "3" => Ok(Severity::Hint),
            other => Err(format!("Unknown severity '{}'", other)),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// A single diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMessage {
    /// Stable identifier, e.g. `UNRESOLVED_REFERENCE`
    pub code: String,
    /// Human-readable description
    pub message: String,
    /// Severity after overrides have been applied
    pub severity: Severity,
    /// Location in the document; absent for container failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
}

impl ValidationMessage {
    /// Message for a built-in code at a document location
    pub fn new(code: IssueCode, pointer: &Pointer, message: impl Into<String>) -> Self {
        Self {
            code: code.as_str().to_string(),
            message: message.into(),
            severity: code.default_severity(),
            pointer: Some(pointer.as_str().to_string()),
        }
    }

    /// Message for a built-in code with no document location
    pub fn global(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_str().to_string(),
            message: message.into(),
            severity: code.default_severity(),
            pointer: None,
        }
    }

    /// Message with a code defined outside this crate
    pub fn custom(
        code: impl Into<String>,
        severity: Severity,
        pointer: Option<&Pointer>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
            pointer: pointer.map(|p| p.as_str().to_string()),
        }
    }
}

/// Retained messages plus per-severity counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueSet {
    /// Number of retained errors
    pub num_errors: usize,
    /// Number of retained warnings
    pub num_warnings: usize,
    /// Number of retained informational messages
    pub num_infos: usize,
    /// Number of retained hints
    pub num_hints: usize,
    /// Retained messages in recording order
    pub messages: Vec<ValidationMessage>,
    /// Whether messages were dropped because of `max_issues`
    pub truncated: bool,
}

impl IssueSet {
    /// Whether any message with this code was retained
    pub fn contains(&self, code: &str) -> bool {
        self.messages.iter().any(|m| m.code == code)
    }

    /// All retained messages with this code
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ValidationMessage> {
        self.messages.iter().filter(move |m| m.code == code)
    }

    fn count(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.num_errors += 1,
            Severity::Warning => self.num_warnings += 1,
            Severity::Information => self.num_infos += 1,
            Severity::Hint => self.num_hints += 1,
        }
    }
}

/// Single mutable sink for all messages of one run
#[derive(Debug, Default)]
pub struct IssueAggregator {
    severity_overrides: HashMap<String, Severity>,
    only_issues: Option<HashSet<String>>,
    ignored_issues: HashSet<String>,
    max_issues: usize,
    issues: IssueSet,
    finalized: bool,
}

impl IssueAggregator {
    /// Aggregator with no overrides, filters or limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregator configured from a run configuration
    pub fn from_config(config: &ValidatorConfig) -> Self {
        Self {
            severity_overrides: config.severity_overrides().clone(),
            only_issues: config.only_issues().cloned(),
            ignored_issues: config.ignored_issues().clone(),
            max_issues: config.max_issues(),
            issues: IssueSet::default(),
            finalized: false,
        }
    }

    /// Record a message, applying overrides, filters and truncation
    pub fn record(&mut self, mut message: ValidationMessage) {
        if self.finalized {
            tracing::warn!(code = %message.code, "message recorded after finalize, dropped");
            return;
        }

        if let Some(severity) = self.severity_overrides.get(&message.code) {
            message.severity = *severity;
        }

        if let Some(only) = &self.only_issues {
            if !only.contains(&message.code) {
                return;
            }
        }
        if self.ignored_issues.contains(&message.code) {
            return;
        }

        if self.max_issues > 0 && self.issues.messages.len() >= self.max_issues {
            self.issues.truncated = true;
            return;
        }

        self.issues.count(message.severity);
        self.issues.messages.push(message);
    }

    /// Record a built-in code at a document location
    pub fn add(&mut self, code: IssueCode, pointer: &Pointer, message: impl Into<String>) {
        self.record(ValidationMessage::new(code, pointer, message));
    }

    /// Record a built-in code with no document location
    pub fn add_global(&mut self, code: IssueCode, message: impl Into<String>) {
        self.record(ValidationMessage::global(code, message));
    }

    /// Number of retained errors so far
    pub fn num_errors(&self) -> usize {
        self.issues.num_errors
    }

    /// Retained messages so far
    pub fn messages(&self) -> &[ValidationMessage] {
        &self.issues.messages
    }

    /// Close the aggregator; later `record` calls are ignored
    ///
    /// Calling this more than once returns the same set.
    pub fn finalize(&mut self) -> &IssueSet {
        self.finalized = true;
        &self.issues
    }

    /// Finalize and take ownership of the result
    pub fn into_issue_set(mut self) -> IssueSet {
        self.finalize();
        self.issues
    }
}
