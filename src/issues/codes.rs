//! Closed vocabulary of message codes
//!
//! Codes are grouped by the stage that emits them. Each code carries a
//! default severity; a run may override it through
//! [`ValidatorConfig::with_severity_override`](crate::ValidatorConfig::with_severity_override).

use super::Severity;

/// Every message code the engine itself can emit
///
/// Property rules registered from outside the crate may report codes not
/// listed here through [`ValidationMessage::custom`](super::ValidationMessage::custom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    // Container (fatal)
    /// Input shorter than the GLB header
    GlbUnexpectedEndOfHeader,
    /// Wrong GLB magic
    GlbInvalidMagic,
    /// Unsupported GLB version
    GlbInvalidVersion,
    /// Header length disagrees with the input length
    GlbLengthMismatch,
    /// First chunk is not JSON
    GlbUnexpectedFirstChunk,
    /// Truncated chunk header
    GlbUnexpectedEndOfChunkHeader,
    /// Truncated chunk payload
    GlbUnexpectedEndOfChunkData,
    /// JSON text is not UTF-8
    InvalidUtf8,
    /// JSON syntax error
    InvalidJson,
    /// JSON root is not an object
    InvalidJsonRootObject,

    // Container (recoverable)
    /// Chunk length is not a multiple of 4
    GlbChunkLengthUnaligned,
    /// A JSON or BIN chunk appears twice
    GlbDuplicateChunk,
    /// Chunk with an unrecognized type tag
    GlbUnknownChunkType,
    /// BIN chunk present but no buffer consumes it
    GlbUnusedBinChunk,

    // Structure
    /// Value has the wrong JSON type
    TypeMismatch,
    /// Value is outside the set of allowed values
    InvalidValue,
    /// Numeric value is outside its allowed range
    ValueNotInRange,
    /// Required property is missing
    UndefinedProperty,
    /// Property is not defined for this object
    UnexpectedProperty,
    /// Array contains duplicate entries
    DuplicateElements,
    /// Property requires another property to be present
    UnsatisfiedDependency,
    /// String does not match the required pattern
    PatternMismatch,

    // References and hierarchy
    /// Index points past the end of its target array
    UnresolvedReference,
    /// Node hierarchy contains a cycle
    NodeLoop,
    /// Node is claimed as a child by more than one parent
    NodeParentOverride,
    /// Scene lists a node that has a parent
    SceneNonRootNode,
    /// Skin joint is not a descendant of the skeleton node
    SkinSkeletonInvalid,
    /// Skin joints do not share a common root
    SkinNoCommonRoot,

    // Buffers and URIs
    /// Declared byteLength disagrees with the resolved bytes
    BufferByteLengthMismatch,
    /// GLB-stored buffer without a BIN chunk
    BufferMissingGlbData,
    /// BIN chunk noticeably larger than the buffer
    BufferGlbChunkTooBig,
    /// Data URI of a buffer has an unsupported media type
    BufferDataUriMimeTypeInvalid,
    /// URI cannot be parsed
    InvalidUri,
    /// URI scheme cannot be resolved
    UnsupportedUriScheme,
    /// Loader failed to produce the resource
    IoError,
    /// External resource present but no loader configured
    ExternalResourceSkipped,

    // Layout and data
    /// Buffer view extends past its buffer
    BufferViewTooLong,
    /// byteStride outside 4..=252 or not a multiple of 4
    BufferViewInvalidByteStride,
    /// Accessor offset not aligned to its component size
    AccessorOffsetAlignment,
    /// byteStride shorter than one element
    AccessorSmallByteStride,
    /// Accessor extends past its buffer view
    AccessorTooLong,
    /// normalized set on FLOAT or UNSIGNED_INT
    AccessorNormalizedInvalid,
    /// min array malformed or disagreeing with data
    AccessorMinMismatch,
    /// max array malformed or disagreeing with data
    AccessorMaxMismatch,
    /// sparse.count exceeds accessor count
    AccessorSparseCountOutOfRange,
    /// Sparse buffer view declares byteStride
    AccessorSparseStridedBufferView,
    /// Sparse indices not strictly increasing
    AccessorSparseIndicesNonIncreasing,
    /// Sparse index outside the accessor
    AccessorSparseIndexOob,
    /// Non-finite float component
    AccessorInvalidFloat,

    // Asset
    /// Asset major version is not 2
    UnknownAssetMajorVersion,
    /// Asset minor version is newer than supported
    UnknownAssetMinorVersion,
    /// minVersion is greater than version
    AssetMinVersionGreaterThanVersion,

    // Mesh
    /// Primitive has no POSITION attribute
    MeshPrimitiveNoPosition,

    // Usage
    /// Object is not reachable from any scene
    UnusedObject,
}

impl IssueCode {
    /// Stable string identifier, e.g. `"UNRESOLVED_REFERENCE"`
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::GlbUnexpectedEndOfHeader => "GLB_UNEXPECTED_END_OF_HEADER",
            IssueCode::GlbInvalidMagic => "GLB_INVALID_MAGIC",
            IssueCode::GlbInvalidVersion => "GLB_INVALID_VERSION",
            IssueCode::GlbLengthMismatch => "GLB_LENGTH_MISMATCH",
            IssueCode::GlbUnexpectedFirstChunk => "GLB_UNEXPECTED_FIRST_CHUNK",
            IssueCode::GlbUnexpectedEndOfChunkHeader => "GLB_UNEXPECTED_END_OF_CHUNK_HEADER",
            IssueCode::GlbUnexpectedEndOfChunkData => "GLB_UNEXPECTED_END_OF_CHUNK_DATA",
            IssueCode::InvalidUtf8 => "INVALID_UTF8",
            IssueCode::InvalidJson => "INVALID_JSON",
            IssueCode::InvalidJsonRootObject => "INVALID_JSON_ROOT_OBJECT",
            IssueCode::GlbChunkLengthUnaligned => "GLB_CHUNK_LENGTH_UNALIGNED",
            IssueCode::GlbDuplicateChunk => "GLB_DUPLICATE_CHUNK",
            IssueCode::GlbUnknownChunkType => "GLB_UNKNOWN_CHUNK_TYPE",
            IssueCode::GlbUnusedBinChunk => "GLB_UNUSED_BIN_CHUNK",
            IssueCode::TypeMismatch => "TYPE_MISMATCH",
            IssueCode::InvalidValue => "INVALID_VALUE",
            IssueCode::ValueNotInRange => "VALUE_NOT_IN_RANGE",
            IssueCode::UndefinedProperty => "UNDEFINED_PROPERTY",
            IssueCode::UnexpectedProperty => "UNEXPECTED_PROPERTY",
            IssueCode::DuplicateElements => "DUPLICATE_ELEMENTS",
            IssueCode::UnsatisfiedDependency => "UNSATISFIED_DEPENDENCY",
            IssueCode::PatternMismatch => "PATTERN_MISMATCH",
            IssueCode::UnresolvedReference => "UNRESOLVED_REFERENCE",
            IssueCode::NodeLoop => "NODE_LOOP",
            IssueCode::NodeParentOverride => "NODE_PARENT_OVERRIDE",
            IssueCode::SceneNonRootNode => "SCENE_NON_ROOT_NODE",
            IssueCode::SkinSkeletonInvalid => "SKIN_SKELETON_INVALID",
            IssueCode::SkinNoCommonRoot => "SKIN_NO_COMMON_ROOT",
            IssueCode::BufferByteLengthMismatch => "BUFFER_BYTE_LENGTH_MISMATCH",
            IssueCode::BufferMissingGlbData => "BUFFER_MISSING_GLB_DATA",
            IssueCode::BufferGlbChunkTooBig => "BUFFER_GLB_CHUNK_TOO_BIG",
            IssueCode::BufferDataUriMimeTypeInvalid => "BUFFER_DATA_URI_MIME_TYPE_INVALID",
            IssueCode::InvalidUri => "INVALID_URI",
            IssueCode::UnsupportedUriScheme => "UNSUPPORTED_URI_SCHEME",
            IssueCode::IoError => "IO_ERROR",
            IssueCode::ExternalResourceSkipped => "EXTERNAL_RESOURCE_SKIPPED",
            IssueCode::BufferViewTooLong => "BUFFER_VIEW_TOO_LONG",
            IssueCode::BufferViewInvalidByteStride => "BUFFER_VIEW_INVALID_BYTE_STRIDE",
            IssueCode::AccessorOffsetAlignment => "ACCESSOR_OFFSET_ALIGNMENT",
            IssueCode::AccessorSmallByteStride => "ACCESSOR_SMALL_BYTESTRIDE",
            IssueCode::AccessorTooLong => "ACCESSOR_TOO_LONG",
            IssueCode::AccessorNormalizedInvalid => "ACCESSOR_NORMALIZED_INVALID",
            IssueCode::AccessorMinMismatch => "ACCESSOR_MIN_MISMATCH",
            IssueCode::AccessorMaxMismatch => "ACCESSOR_MAX_MISMATCH",
            IssueCode::AccessorSparseCountOutOfRange => "ACCESSOR_SPARSE_COUNT_OUT_OF_RANGE",
            IssueCode::AccessorSparseStridedBufferView => "ACCESSOR_SPARSE_STRIDED_BUFFER_VIEW",
            IssueCode::AccessorSparseIndicesNonIncreasing => {
                "ACCESSOR_SPARSE_INDICES_NON_INCREASING"
            }
            IssueCode::AccessorSparseIndexOob => "ACCESSOR_SPARSE_INDEX_OOB",
            IssueCode::AccessorInvalidFloat => "ACCESSOR_INVALID_FLOAT",
            IssueCode::UnknownAssetMajorVersion => "UNKNOWN_ASSET_MAJOR_VERSION",
            IssueCode::UnknownAssetMinorVersion => "UNKNOWN_ASSET_MINOR_VERSION",
            IssueCode::AssetMinVersionGreaterThanVersion => {
                "ASSET_MIN_VERSION_GREATER_THAN_VERSION"
            }
            IssueCode::MeshPrimitiveNoPosition => "MESH_PRIMITIVE_NO_POSITION",
            IssueCode::UnusedObject => "UNUSED_OBJECT",
        }
    }

    /// Severity used unless the run overrides it
    pub fn default_severity(&self) -> Severity {
        match self {
            IssueCode::GlbUnknownChunkType
            | IssueCode::GlbUnusedBinChunk
            | IssueCode::UnexpectedProperty
            | IssueCode::BufferGlbChunkTooBig
            | IssueCode::UnknownAssetMinorVersion
            | IssueCode::MeshPrimitiveNoPosition => Severity::Warning,
            IssueCode::ExternalResourceSkipped | IssueCode::UnusedObject => Severity::Information,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
