//! Validation pipeline
//!
//! A run moves through fixed stages, all writing into one
//! [`IssueAggregator`]:
//!
//! 1. container parsing (fatal failures end the run here),
//! 2. document graph construction with reference resolution,
//! 3. node hierarchy analysis,
//! 4. per-type property rules,
//! 5. buffer resolution (the only asynchronous step),
//! 6. accessor layout and data checks,
//! 7. usage tracking,
//! 8. summary statistics.
//!
//! Every stage after the first is best-effort: problems become messages
//! and the stage substitutes a safe default.

pub(crate) mod data;
pub(crate) mod hierarchy;
pub(crate) mod layout;
pub(crate) mod usage;

use serde::Serialize;

use crate::config::{FormatHint, ValidatorConfig};
use crate::container::{self, MIME_GLB, MIME_GLTF};
use crate::info::{self, ValidationInfo};
use crate::issues::{IssueAggregator, IssueSet};
use crate::parser::build_document;
use crate::resources::{self, NoLoader, ResourceLoader};

/// Outcome of one validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Document URI from the configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// `model/gltf+json` or `model/gltf-binary`
    pub mime_type: String,
    /// Version of this crate
    pub validator_version: String,
    /// Diagnostics
    pub issues: IssueSet,
    /// Summary statistics
    pub info: ValidationInfo,
}

/// Validator with an optional resource loader
///
/// # Example
///
/// ```
/// use gltfcheck::{FnLoader, LoadError, Validator, ValidatorConfig};
///
/// # tokio_test_block_on(async {
/// let validator = Validator::new(ValidatorConfig::new()).with_loader(FnLoader::new(
///     |uri: String| async move { Err::<Vec<u8>, _>(LoadError::NotFound(uri)) },
/// ));
/// let result = validator.validate(br#"{"asset":{"version":"2.0"}}"#).await;
/// assert_eq!(result.issues.num_errors, 0);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
pub struct Validator<L = NoLoader> {
    config: ValidatorConfig,
    loader: Option<L>,
}

impl Validator<NoLoader> {
    /// Validator without external resource access
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            loader: None,
        }
    }
}

impl<L: ResourceLoader> Validator<L> {
    /// Use `loader` to fetch external buffers
    pub fn with_loader<M: ResourceLoader>(self, loader: M) -> Validator<M> {
        Validator {
            config: self.config,
            loader: Some(loader),
        }
    }

    /// The run configuration
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate one document
    pub async fn validate(&self, bytes: &[u8]) -> ValidationResult {
        run(bytes, &self.config, self.loader.as_ref()).await
    }
}

impl<L> std::fmt::Debug for Validator<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("config", &self.config)
            .field("has_loader", &self.loader.is_some())
            .finish()
    }
}

pub(crate) async fn run<L: ResourceLoader>(
    bytes: &[u8],
    config: &ValidatorConfig,
    loader: Option<&L>,
) -> ValidationResult {
    let mut issues = IssueAggregator::from_config(config);

    let (container, container_messages) =
        match container::parse(bytes, config.uri(), config.format()) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::debug!(error = %err, "container rejected");
                issues.add_global(err.code(), err.description());
                let mime_type =
                    match container::detect_format(bytes, config.uri(), config.format()) {
                        FormatHint::Glb => MIME_GLB,
                        _ => MIME_GLTF,
                    };
                return finish(config, mime_type, issues, ValidationInfo::default());
            }
        };
    tracing::debug!(
        mime_type = container.mime_type,
        bin = container.bin.as_ref().map_or(0, Vec::len),
        "container parsed"
    );
    for message in container_messages {
        issues.record(message);
    }

    let doc = build_document(&container.root, &mut issues);
    hierarchy::analyze(&doc, &mut issues);
    config.rules().validate_all(&doc, &mut issues);

    let buffers =
        resources::resolve_buffers(&doc, container.is_glb, container.bin, loader, &mut issues).await;
    resources::check_image_uris(&doc, &mut issues);

    layout::check(&doc, &buffers, &mut issues);
    data::check(&doc, &buffers, &mut issues);

    let usage = usage::track(&doc);
    usage::report(&doc, &usage, &mut issues);

    let info = info::collect(&doc, &usage);
    finish(config, container.mime_type, issues, info)
}

fn finish(
    config: &ValidatorConfig,
    mime_type: &str,
    issues: IssueAggregator,
    info: ValidationInfo,
) -> ValidationResult {
    let issues = issues.into_issue_set();
    tracing::debug!(
        errors = issues.num_errors,
        warnings = issues.num_warnings,
        truncated = issues.truncated,
        "validation finished"
    );
    ValidationResult {
        uri: config.uri().map(str::to_string),
        mime_type: mime_type.to_string(),
        validator_version: env!("CARGO_PKG_VERSION").to_string(),
        issues,
        info,
    }
}
