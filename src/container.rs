//! Container handling: JSON text or GLB binary framing
//!
//! A GLB file is a 12-byte header followed by length-prefixed chunks:
//!
//! ```text
//! magic: u32 = "glTF" | version: u32 = 2 | length: u32
//! chunk: length: u32 | type: u32 | payload[length]
//! ```
//!
//! The first chunk must be JSON. A BIN chunk may follow. Everything is
//! little-endian.
//!
//! Failures that leave no JSON document to validate are returned as
//! [`ContainerError`]. Anything else found while walking the chunks is
//! returned alongside the parsed container as plain messages; the caller
//! records them only once the whole container has been accepted.

use crate::config::FormatHint;
use crate::error::{ContainerError, Result};
use crate::issues::{IssueCode, ValidationMessage};
use serde_json::{Map, Value};

/// `glTF` in little-endian
pub const GLB_MAGIC: u32 = 0x4654_6C67;

/// Supported GLB container version
pub const GLB_VERSION: u32 = 2;

/// `JSON` chunk type tag
pub const CHUNK_TYPE_JSON: u32 = 0x4E4F_534A;

/// `BIN\0` chunk type tag
pub const CHUNK_TYPE_BIN: u32 = 0x004E_4942;

/// Size of the GLB header in bytes
pub const GLB_HEADER_LENGTH: usize = 12;

/// Size of a chunk header in bytes
pub const CHUNK_HEADER_LENGTH: usize = 8;

/// Media type reported for JSON input
pub const MIME_GLTF: &str = "model/gltf+json";

/// Media type reported for GLB input
pub const MIME_GLB: &str = "model/gltf-binary";

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Parsed container: the JSON root object and the optional BIN payload
#[derive(Debug, Clone)]
pub struct Container {
    /// `model/gltf+json` or `model/gltf-binary`
    pub mime_type: &'static str,
    /// Root JSON object
    pub root: Map<String, Value>,
    /// Payload of the BIN chunk, if the input was GLB and had one
    pub bin: Option<Vec<u8>>,
    /// Whether the input was a GLB container
    pub is_glb: bool,
}

/// Parse raw input into a [`Container`]
///
/// Returns the container together with non-fatal messages collected while
/// walking GLB chunks.
pub fn parse(
    bytes: &[u8],
    uri: Option<&str>,
    hint: FormatHint,
) -> Result<(Container, Vec<ValidationMessage>)> {
    match detect_format(bytes, uri, hint) {
        FormatHint::Glb => parse_glb(bytes),
        _ => {
            let root = parse_json(bytes)?;
            Ok((
                Container {
                    mime_type: MIME_GLTF,
                    root,
                    bin: None,
                    is_glb: false,
                },
                Vec::new(),
            ))
        }
    }
}

/// Resolve `Infer` to a concrete format
///
/// A `.glb`/`.gltf` URI extension wins; otherwise the leading magic decides.
pub fn detect_format(bytes: &[u8], uri: Option<&str>, hint: FormatHint) -> FormatHint {
    if hint != FormatHint::Infer {
        return hint;
    }

    if let Some(uri) = uri {
        let path = uri.split(['?', '#']).next().unwrap_or(uri);
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".glb") {
            return FormatHint::Glb;
        }
        if lower.ends_with(".gltf") {
            return FormatHint::Gltf;
        }
    }

    match read_u32(bytes, 0) {
        Some(GLB_MAGIC) => FormatHint::Glb,
        _ => FormatHint::Gltf,
    }
}

/// Decode JSON text, stripping a leading UTF-8 byte-order mark
pub fn parse_json(bytes: &[u8]) -> Result<Map<String, Value>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes)?;
    match serde_json::from_str::<Value>(text)? {
        Value::Object(root) => Ok(root),
        _ => Err(ContainerError::InvalidRootObject),
    }
}

fn parse_glb(bytes: &[u8]) -> Result<(Container, Vec<ValidationMessage>)> {
    let total = bytes.len();

    let magic = read_u32(bytes, 0).ok_or(ContainerError::UnexpectedEndOfHeader {
        available: total,
    })?;
    if magic != GLB_MAGIC {
        return Err(ContainerError::InvalidMagic(magic));
    }

    if total < GLB_HEADER_LENGTH {
        return Err(ContainerError::UnexpectedEndOfHeader { available: total });
    }

    let version = read_u32(bytes, 4).unwrap_or_default();
    if version != GLB_VERSION {
        return Err(ContainerError::InvalidVersion(version));
    }

    let declared = read_u32(bytes, 8).unwrap_or_default() as u64;
    if declared != total as u64 {
        return Err(ContainerError::LengthMismatch {
            declared,
            actual: total as u64,
        });
    }

    let mut messages = Vec::new();
    let mut json: Option<&[u8]> = None;
    let mut bin: Option<&[u8]> = None;
    let mut offset = GLB_HEADER_LENGTH;

    while offset < total {
        if total - offset < CHUNK_HEADER_LENGTH {
            if json.is_none() {
                return Err(ContainerError::UnexpectedEndOfChunkHeader(offset));
            }
            messages.push(ValidationMessage::global(
                IssueCode::GlbUnexpectedEndOfChunkHeader,
                format!("Unexpected end of chunk header at offset {}", offset),
            ));
            break;
        }

        let length = read_u32(bytes, offset).unwrap_or_default() as usize;
        let chunk_type = read_u32(bytes, offset + 4).unwrap_or_default();
        let data_start = offset + CHUNK_HEADER_LENGTH;

        if length % 4 != 0 {
            messages.push(ValidationMessage::global(
                IssueCode::GlbChunkLengthUnaligned,
                format!(
                    "Length of 0x{:08X} chunk at offset {} is not aligned to 4-byte boundaries",
                    chunk_type, offset
                ),
            ));
        }

        let available = total - data_start;
        if length > available {
            if json.is_none() {
                return Err(ContainerError::UnexpectedEndOfChunkData {
                    offset,
                    length,
                    available,
                });
            }
            messages.push(ValidationMessage::global(
                IssueCode::GlbUnexpectedEndOfChunkData,
                format!(
                    "Chunk at offset {} declares {} bytes, only {} available",
                    offset, length, available
                ),
            ));
            break;
        }

        let payload = &bytes[data_start..data_start + length];

        if json.is_none() && chunk_type != CHUNK_TYPE_JSON {
            return Err(ContainerError::UnexpectedFirstChunk(chunk_type));
        }

        match chunk_type {
            CHUNK_TYPE_JSON => {
                if json.is_some() {
                    messages.push(duplicate_chunk("JSON", offset));
                } else {
                    json = Some(payload);
                }
            }
            CHUNK_TYPE_BIN => {
                if bin.is_some() {
                    messages.push(duplicate_chunk("BIN", offset));
                } else {
                    bin = Some(payload);
                }
            }
            other => {
                messages.push(ValidationMessage::global(
                    IssueCode::GlbUnknownChunkType,
                    format!("Unknown GLB chunk type 0x{:08X} at offset {}", other, offset),
                ));
            }
        }

        offset = data_start + length;
    }

    let json = json.ok_or(ContainerError::UnexpectedEndOfChunkHeader(GLB_HEADER_LENGTH))?;
    let root = parse_json(json)?;

    tracing::trace!(
        json_len = json.len(),
        bin_len = bin.map(<[u8]>::len),
        "GLB container parsed"
    );

    Ok((
        Container {
            mime_type: MIME_GLB,
            root,
            bin: bin.map(<[u8]>::to_vec),
            is_glb: true,
        },
        messages,
    ))
}

fn duplicate_chunk(kind: &str, offset: usize) -> ValidationMessage {
    ValidationMessage::global(
        IssueCode::GlbDuplicateChunk,
        format!("Duplicate {} chunk at offset {}", kind, offset),
    )
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let slice = bytes.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}
