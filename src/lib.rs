//! # gltfcheck
//!
//! A conformance validator for glTF 2.0 assets, in JSON (`.gltf`) or
//! binary (`.glb`) form.
//!
//! Validation never fails on malformed content. Every problem becomes a
//! [`ValidationMessage`] with a stable code, a severity and a JSON pointer
//! into the document, and the run returns a [`ValidationResult`] with the
//! messages plus summary statistics.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - GLB container parsing with byte-accurate chunk checks
//! - Index reference resolution across all top-level arrays
//! - Node hierarchy, cycle and skin ancestry analysis
//! - Accessor layout, alignment, sparse and data checks
//! - Usage tracking for unreferenced objects
//! - Severity overrides, code filters and message limits
//! - External buffers through an injected async [`ResourceLoader`]
//!
//! ## Example
//!
//! ```
//! use gltfcheck::{validate, ValidatorConfig};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let config = ValidatorConfig::new().with_uri("minimal.gltf");
//! let result = validate(br#"{"asset":{"version":"2.0"}}"#, &config).await;
//!
//! assert_eq!(result.mime_type, "model/gltf+json");
//! assert_eq!(result.issues.num_errors, 0);
//! assert_eq!(result.info.version.as_deref(), Some("2.0"));
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod container;
pub mod error;
mod info;
pub mod issues;
pub mod model;
pub mod parser;
pub mod pointer;
pub mod resources;
pub mod rules;
mod validator;

pub use config::{FormatHint, ValidatorConfig};
pub use error::{ContainerError, LoadError, Result};
pub use info::ValidationInfo;
pub use issues::{IssueAggregator, IssueCode, IssueSet, Severity, ValidationMessage};
pub use model::Document;
pub use pointer::Pointer;
pub use resources::{FnLoader, NoLoader, ResourceLoader};
pub use rules::{PropertyRules, RuleRegistry, create_default_registry};
pub use validator::{ValidationResult, Validator};

/// Validate a document without external resource access
///
/// External buffers are reported as skipped. Use [`Validator::with_loader`]
/// to resolve them.
pub async fn validate(bytes: &[u8], config: &ValidatorConfig) -> ValidationResult {
    validator::run::<NoLoader>(bytes, config, None).await
}
