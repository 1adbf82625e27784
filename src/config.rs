//! Run configuration

use crate::issues::Severity;
use crate::rules::{PropertyRules, RuleRegistry, create_default_registry};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Input encoding hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatHint {
    /// Decide from the URI extension, then from the leading magic bytes
    #[default]
    Infer,
    /// JSON text (`model/gltf+json`)
    Gltf,
    /// Binary container (`model/gltf-binary`)
    Glb,
}

/// Configuration for a validation run
///
/// All settings are optional. The default configuration infers the input
/// format, reports every message at its default severity without a limit,
/// and runs the built-in property rules.
///
/// # Example
///
/// ```
/// use gltfcheck::{Severity, ValidatorConfig};
///
/// let config = ValidatorConfig::new()
///     .with_uri("scene.gltf")
///     .with_severity_override("UNUSED_OBJECT", Severity::Hint)
///     .with_max_issues(100);
/// assert_eq!(config.max_issues(), 100);
/// ```
#[derive(Clone)]
pub struct ValidatorConfig {
    uri: Option<String>,
    format: FormatHint,
    severity_overrides: HashMap<String, Severity>,
    only_issues: Option<HashSet<String>>,
    ignored_issues: HashSet<String>,
    max_issues: usize,
    rules: RuleRegistry,
}

impl std::fmt::Debug for ValidatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorConfig")
            .field("uri", &self.uri)
            .field("format", &self.format)
            .field("severity_overrides", &self.severity_overrides)
            .field("only_issues", &self.only_issues)
            .field("ignored_issues", &self.ignored_issues)
            .field("max_issues", &self.max_issues)
            .field("rules", &self.rules.names())
            .finish()
    }
}

impl ValidatorConfig {
    /// Default configuration with the built-in property rules
    pub fn new() -> Self {
        Self {
            uri: None,
            format: FormatHint::Infer,
            severity_overrides: HashMap::new(),
            only_issues: None,
            ignored_issues: HashSet::new(),
            max_issues: 0,
            rules: create_default_registry(),
        }
    }

    /// Set the document URI, echoed in the result and used for format inference
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Force the input format instead of inferring it
    pub fn with_format(mut self, format: FormatHint) -> Self {
        self.format = format;
        self
    }

    /// Report `code` at `severity` instead of its default
    pub fn with_severity_override(mut self, code: impl Into<String>, severity: Severity) -> Self {
        self.severity_overrides.insert(code.into(), severity);
        self
    }

    /// Override severities from `code -> severity name` pairs
    ///
    /// Unknown severity names are skipped with a warning in the log.
    pub fn with_severity_overrides_by_name<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        for (code, name) in overrides {
            match name.as_ref().parse::<Severity>() {
                Ok(severity) => {
                    self.severity_overrides.insert(code.into(), severity);
                }
                Err(e) => tracing::warn!("Ignoring severity override: {}", e),
            }
        }
        self
    }

    /// Retain only messages with these codes
    pub fn with_only_issues<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only_issues = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    /// Drop every message with this code
    pub fn with_ignored_issue(mut self, code: impl Into<String>) -> Self {
        self.ignored_issues.insert(code.into());
        self
    }

    /// Retain at most `max` messages; 0 means unlimited
    pub fn with_max_issues(mut self, max: usize) -> Self {
        self.max_issues = max;
        self
    }

    /// Replace the property rule registry
    pub fn with_rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self
    }

    /// Add a property rule set after the existing ones
    pub fn with_rule(mut self, rule: Arc<dyn PropertyRules>) -> Self {
        self.rules.register(rule);
        self
    }

    /// Document URI, if any
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Input format hint
    pub fn format(&self) -> FormatHint {
        self.format
    }

    /// Configured severity overrides
    pub fn severity_overrides(&self) -> &HashMap<String, Severity> {
        &self.severity_overrides
    }

    /// Allow-list of codes, if restricted
    pub fn only_issues(&self) -> Option<&HashSet<String>> {
        self.only_issues.as_ref()
    }

    /// Deny-list of codes
    pub fn ignored_issues(&self) -> &HashSet<String> {
        &self.ignored_issues
    }

    /// Message cap; 0 means unlimited
    pub fn max_issues(&self) -> usize {
        self.max_issues
    }

    /// Property rules run after graph construction
    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
