//! Buffer resolution
//!
//! Resolves the byte source of every buffer: the GLB `BIN` chunk, an
//! inline `data:` URI, or an external reference fetched through an
//! injected [`ResourceLoader`]. The loader call is the only suspension
//! point of a validation run. Buffers are resolved one at a time in array
//! order, so messages come out in a fixed order.
//!
//! No failure here aborts the run. A buffer whose bytes cannot be obtained
//! is marked unavailable and the data-dependent checks that would read it
//! are skipped.

use std::future::Future;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use thiserror::Error;

use crate::error::LoadError;
use crate::issues::{IssueAggregator, IssueCode};
use crate::model::{ArrayKind, Document};
use crate::pointer::Pointer;

/// MIME types accepted for buffer data URIs
pub const BUFFER_MIME_TYPES: &[&str] = &["application/octet-stream", "application/gltf-buffer"];

/// A GLB `BIN` chunk may exceed the buffer by up to 3 bytes of padding
const GLB_PADDING_SLACK: u64 = 4;

/// Asynchronous source of external resource bytes
///
/// The URI is relative to the validated document and already
/// percent-decoded.
///
/// # Example
///
/// ```
/// use gltfcheck::{LoadError, ResourceLoader};
///
/// struct Empty;
///
/// impl ResourceLoader for Empty {
///     async fn load(&self, uri: &str) -> Result<Vec<u8>, LoadError> {
///         Err(LoadError::NotFound(uri.to_string()))
///     }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait ResourceLoader {
    /// Fetch the bytes behind `uri`
    async fn load(&self, uri: &str) -> Result<Vec<u8>, LoadError>;
}

/// [`ResourceLoader`] backed by an async closure
///
/// ```
/// use gltfcheck::{FnLoader, LoadError};
///
/// let loader = FnLoader::new(|uri: String| async move {
///     if uri == "data.bin" {
///         Ok(vec![0u8; 4])
///     } else {
///         Err(LoadError::NotFound(uri))
///     }
/// });
/// # let _ = loader;
/// ```
pub struct FnLoader<F> {
    func: F,
}

impl<F> FnLoader<F> {
    /// Wrap a closure taking the URI and returning a future of bytes
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, Fut> ResourceLoader for FnLoader<F>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<u8>, LoadError>>,
{
    async fn load(&self, uri: &str) -> Result<Vec<u8>, LoadError> {
        (self.func)(uri.to_string()).await
    }
}

/// Placeholder loader type for runs without external resource access
///
/// Never called; external buffers are reported as skipped instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLoader;

impl ResourceLoader for NoLoader {
    async fn load(&self, uri: &str) -> Result<Vec<u8>, LoadError> {
        Err(LoadError::NotFound(uri.to_string()))
    }
}

/// Decoded `data:` URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Declared MIME type (may be empty)
    pub mime_type: String,
    /// Decoded payload
    pub data: Vec<u8>,
}

/// Malformed `data:` URI
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataUriError {
    /// No `,` separating the header from the payload
    #[error("missing ',' before the payload")]
    MissingComma,

    /// The header is not `<mime-type>;base64`
    #[error("expected a single ';base64' encoding token, found '{0}'")]
    InvalidEncoding(String),

    /// The payload is not valid base64
    #[error("payload is not valid base64: {0}")]
    InvalidBase64(String),
}

/// Whether the URI uses the `data:` scheme
pub fn is_data_uri(uri: &str) -> bool {
    uri.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Parse a `data:<mime-type>;base64,<payload>` URI
pub fn parse_data_uri(uri: &str) -> Result<DataUri, DataUriError> {
    let rest = uri.get(5..).unwrap_or_default();
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingComma)?;
    let (mime_type, encoding) = header
        .split_once(';')
        .ok_or_else(|| DataUriError::InvalidEncoding(header.to_string()))?;
    if encoding != "base64" {
        return Err(DataUriError::InvalidEncoding(encoding.to_string()));
    }
    let data = BASE64
        .decode(payload)
        .map_err(|e| DataUriError::InvalidBase64(e.to_string()))?;
    Ok(DataUri {
        mime_type: mime_type.to_string(),
        data,
    })
}

/// Scheme of an absolute URI, if it has one
///
/// Follows RFC 3986: a letter, then letters, digits, `+`, `-` or `.`,
/// terminated by `:` before any `/`, `?` or `#`.
pub fn uri_scheme(uri: &str) -> Option<&str> {
    let end = uri.find(':')?;
    let scheme = &uri[..end];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        .then_some(scheme)
}

/// Resolved bytes of every buffer
///
/// Each entry is already clipped to the safe window, the smaller of the
/// declared `byteLength` and the number of bytes actually obtained.
#[derive(Debug, Clone, Default)]
pub struct BufferData {
    buffers: Vec<Option<Vec<u8>>>,
    safe_lengths: Vec<Option<u64>>,
}

impl BufferData {
    /// Bytes of a buffer, or `None` when unavailable
    pub fn bytes(&self, buffer: usize) -> Option<&[u8]> {
        self.buffers.get(buffer)?.as_deref()
    }

    /// Length that bounds views into this buffer
    ///
    /// The resolved length when bytes are available, otherwise the
    /// declared `byteLength`.
    pub fn safe_length(&self, buffer: usize) -> Option<u64> {
        self.safe_lengths.get(buffer).copied().flatten()
    }

    /// Number of buffers with available bytes
    pub fn available(&self) -> usize {
        self.buffers.iter().filter(|b| b.is_some()).count()
    }
}

/// Where the bytes of one buffer came from
enum Source {
    Glb,
    Inline,
    External,
}

/// Resolve every buffer of the document
///
/// `bin` is the GLB `BIN` payload, if the input was GLB and had one.
pub async fn resolve_buffers<L: ResourceLoader>(
    doc: &Document,
    is_glb: bool,
    bin: Option<Vec<u8>>,
    loader: Option<&L>,
    issues: &mut IssueAggregator,
) -> BufferData {
    let mut bin = bin;
    let mut data = BufferData::default();

    for (i, buffer) in doc.buffers.iter().enumerate() {
        let pointer = ArrayKind::Buffers.pointer(i);
        let resolved = match buffer.uri.as_deref() {
            None if is_glb && i == 0 => match bin.take() {
                Some(bytes) => Some((bytes, Source::Glb)),
                None => {
                    issues.add(
                        IssueCode::BufferMissingGlbData,
                        &pointer,
                        "Buffer refers to an unresolved GLB binary chunk.",
                    );
                    None
                }
            },
            None => {
                issues.add(
                    IssueCode::UndefinedProperty,
                    &pointer.key("uri"),
                    "Property 'uri' must be defined.",
                );
                None
            }
            Some(uri) => resolve_uri(uri, &pointer.key("uri"), loader, issues).await,
        };

        let declared = buffer.byte_length;
        match resolved {
            Some((mut bytes, source)) => {
                let actual = bytes.len() as u64;
                if let Some(declared) = declared {
                    check_length(&source, declared, actual, &pointer, issues);
                    bytes.truncate(declared.min(actual) as usize);
                }
                tracing::trace!(buffer = i, bytes = bytes.len(), "buffer resolved");
                data.safe_lengths.push(Some(bytes.len() as u64));
                data.buffers.push(Some(bytes));
            }
            None => {
                tracing::trace!(buffer = i, "buffer unavailable");
                data.safe_lengths.push(declared);
                data.buffers.push(None);
            }
        }
    }

    if bin.is_some() {
        issues.add(
            IssueCode::GlbUnusedBinChunk,
            &Pointer::root(),
            "Unused GLB binary chunk.",
        );
    }

    tracing::debug!(
        buffers = doc.buffers.len(),
        available = data.available(),
        "buffers resolved"
    );
    data
}

fn check_length(
    source: &Source,
    declared: u64,
    actual: u64,
    pointer: &Pointer,
    issues: &mut IssueAggregator,
) {
    if matches!(source, Source::Glb) && actual >= declared.saturating_add(GLB_PADDING_SLACK) {
        issues.add(
            IssueCode::BufferGlbChunkTooBig,
            pointer,
            format!(
                "GLB-stored BIN chunk contains {} extra padding byte(s).",
                actual - declared
            ),
        );
    } else if actual < declared || (!matches!(source, Source::Glb) && actual != declared) {
        issues.add(
            IssueCode::BufferByteLengthMismatch,
            &pointer.key("byteLength"),
            format!(
                "Actual data length {} is not equal to the declared buffer byteLength {}.",
                actual, declared
            ),
        );
    }
}

async fn resolve_uri<L: ResourceLoader>(
    uri: &str,
    pointer: &Pointer,
    loader: Option<&L>,
    issues: &mut IssueAggregator,
) -> Option<(Vec<u8>, Source)> {
    if is_data_uri(uri) {
        return match parse_data_uri(uri) {
            Ok(parsed) => {
                if !BUFFER_MIME_TYPES.contains(&parsed.mime_type.as_str()) {
                    issues.add(
                        IssueCode::BufferDataUriMimeTypeInvalid,
                        pointer,
                        format!(
                            "Buffer's Data URI MIME-Type must be 'application/octet-stream' or 'application/gltf-buffer'. Found '{}' instead.",
                            parsed.mime_type
                        ),
                    );
                }
                Some((parsed.data, Source::Inline))
            }
            Err(err) => {
                issues.add(
                    IssueCode::InvalidUri,
                    pointer,
                    format!("Invalid URI '{}'. Parser output: {}", short(uri), err),
                );
                None
            }
        };
    }

    if let Some(scheme) = uri_scheme(uri) {
        issues.add(
            IssueCode::UnsupportedUriScheme,
            pointer,
            format!("URI scheme '{}' is not supported.", scheme),
        );
        return None;
    }

    let decoded = match urlencoding::decode(uri) {
        Ok(decoded) => decoded.into_owned(),
        Err(err) => {
            issues.add(
                IssueCode::InvalidUri,
                pointer,
                format!("Invalid URI '{}'. Parser output: {}", short(uri), err),
            );
            return None;
        }
    };

    let Some(loader) = loader else {
        issues.add(
            IssueCode::ExternalResourceSkipped,
            pointer,
            format!("External resource '{}' was not loaded.", decoded),
        );
        return None;
    };

    match loader.load(&decoded).await {
        Ok(bytes) => Some((bytes, Source::External)),
        Err(err) => {
            tracing::warn!(uri = %decoded, error = %err, "resource loader failed");
            issues.add(
                IssueCode::IoError,
                pointer,
                format!("Could not load resource '{}': {}", decoded, err),
            );
            None
        }
    }
}

/// Syntax-check image URIs; image bytes are never decoded
pub fn check_image_uris(doc: &Document, issues: &mut IssueAggregator) {
    for (i, image) in doc.images.iter().enumerate() {
        let Some(uri) = image.uri.as_deref() else {
            continue;
        };
        let pointer = ArrayKind::Images.pointer(i).key("uri");
        if is_data_uri(uri) {
            if let Err(err) = parse_data_uri(uri) {
                issues.add(
                    IssueCode::InvalidUri,
                    &pointer,
                    format!("Invalid URI '{}'. Parser output: {}", short(uri), err),
                );
            }
        } else if let Some(scheme) = uri_scheme(uri) {
            issues.add(
                IssueCode::UnsupportedUriScheme,
                &pointer,
                format!("URI scheme '{}' is not supported.", scheme),
            );
        }
    }
}

/// URI shortened for messages; data URIs can be megabytes long
fn short(uri: &str) -> String {
    crate::parser::value_text(&serde_json::Value::String(uri.to_string()))
}
