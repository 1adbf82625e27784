//! Buffers, buffer views and accessors

/// Accessor component type (`componentType`)
///
/// Values outside the six defined GL enums are kept as `Unknown` so the
/// layout validator can report them and fall back to a safe size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// 5120, signed 8-bit
    Byte,
    /// 5121, unsigned 8-bit
    UnsignedByte,
    /// 5122, signed 16-bit
    Short,
    /// 5123, unsigned 16-bit
    UnsignedShort,
    /// 5125, unsigned 32-bit
    UnsignedInt,
    /// 5126, 32-bit float
    Float,
    /// Any other value
    Unknown(u64),
}

impl ComponentType {
    /// Map a GL enum to a component type
    pub fn from_gl(value: u64) -> Self {
        match value {
            5120 => ComponentType::Byte,
            5121 => ComponentType::UnsignedByte,
            5122 => ComponentType::Short,
            5123 => ComponentType::UnsignedShort,
            5125 => ComponentType::UnsignedInt,
            5126 => ComponentType::Float,
            other => ComponentType::Unknown(other),
        }
    }

    /// GL enum value
    pub fn gl(&self) -> u64 {
        match self {
            ComponentType::Byte => 5120,
            ComponentType::UnsignedByte => 5121,
            ComponentType::Short => 5122,
            ComponentType::UnsignedShort => 5123,
            ComponentType::UnsignedInt => 5125,
            ComponentType::Float => 5126,
            ComponentType::Unknown(v) => *v,
        }
    }

    /// Size of one component in bytes; `None` for unknown types
    pub fn size(&self) -> Option<u64> {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => Some(1),
            ComponentType::Short | ComponentType::UnsignedShort => Some(2),
            ComponentType::UnsignedInt | ComponentType::Float => Some(4),
            ComponentType::Unknown(_) => None,
        }
    }

    /// GL name, e.g. `UNSIGNED_SHORT`
    pub fn name(&self) -> String {
        match self {
            ComponentType::Byte => "BYTE".to_string(),
            ComponentType::UnsignedByte => "UNSIGNED_BYTE".to_string(),
            ComponentType::Short => "SHORT".to_string(),
            ComponentType::UnsignedShort => "UNSIGNED_SHORT".to_string(),
            ComponentType::UnsignedInt => "UNSIGNED_INT".to_string(),
            ComponentType::Float => "FLOAT".to_string(),
            ComponentType::Unknown(v) => v.to_string(),
        }
    }

    /// Whether this type may be used for sparse indices
    pub fn is_unsigned_integer(&self) -> bool {
        matches!(
            self,
            ComponentType::UnsignedByte | ComponentType::UnsignedShort | ComponentType::UnsignedInt
        )
    }
}

/// Accessor element type (`type`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// `SCALAR`
    Scalar,
    /// `VEC2`
    Vec2,
    /// `VEC3`
    Vec3,
    /// `VEC4`
    Vec4,
    /// `MAT2`
    Mat2,
    /// `MAT3`
    Mat3,
    /// `MAT4`
    Mat4,
    /// Any other string
    Unknown(String),
}

impl ElementType {
    /// Parse the `type` string
    pub fn parse(value: &str) -> Self {
        match value {
            "SCALAR" => ElementType::Scalar,
            "VEC2" => ElementType::Vec2,
            "VEC3" => ElementType::Vec3,
            "VEC4" => ElementType::Vec4,
            "MAT2" => ElementType::Mat2,
            "MAT3" => ElementType::Mat3,
            "MAT4" => ElementType::Mat4,
            other => ElementType::Unknown(other.to_string()),
        }
    }

    /// Number of components; `None` for unknown types
    pub fn component_count(&self) -> Option<u64> {
        match self {
            ElementType::Scalar => Some(1),
            ElementType::Vec2 => Some(2),
            ElementType::Vec3 => Some(3),
            ElementType::Vec4 | ElementType::Mat2 => Some(4),
            ElementType::Mat3 => Some(9),
            ElementType::Mat4 => Some(16),
            ElementType::Unknown(_) => None,
        }
    }

    /// Rows per column for matrix types
    pub fn matrix_rows(&self) -> Option<u64> {
        match self {
            ElementType::Mat2 => Some(2),
            ElementType::Mat3 => Some(3),
            ElementType::Mat4 => Some(4),
            _ => None,
        }
    }

    /// The `type` string
    pub fn as_str(&self) -> &str {
        match self {
            ElementType::Scalar => "SCALAR",
            ElementType::Vec2 => "VEC2",
            ElementType::Vec3 => "VEC3",
            ElementType::Vec4 => "VEC4",
            ElementType::Mat2 => "MAT2",
            ElementType::Mat3 => "MAT3",
            ElementType::Mat4 => "MAT4",
            ElementType::Unknown(s) => s,
        }
    }
}

/// `buffers[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buffer {
    /// `uri`; absent means GLB-stored
    pub uri: Option<String>,
    /// Declared `byteLength`
    pub byte_length: Option<u64>,
}

/// `bufferViews[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferView {
    /// Resolved `buffer`
    pub buffer: Option<usize>,
    /// `byteOffset`, default 0
    pub byte_offset: u64,
    /// `byteLength`
    pub byte_length: Option<u64>,
    /// `byteStride`
    pub byte_stride: Option<u64>,
    /// `target`
    pub target: Option<u64>,
}

/// `accessors[i].sparse.indices`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseIndices {
    /// Resolved `bufferView`
    pub buffer_view: Option<usize>,
    /// `byteOffset`, default 0
    pub byte_offset: u64,
    /// `componentType`
    pub component_type: Option<ComponentType>,
}

/// `accessors[i].sparse.values`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseValues {
    /// Resolved `bufferView`
    pub buffer_view: Option<usize>,
    /// `byteOffset`, default 0
    pub byte_offset: u64,
}

/// `accessors[i].sparse`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sparse {
    /// Number of overridden elements
    pub count: Option<u64>,
    /// Index descriptor
    pub indices: Option<SparseIndices>,
    /// Value descriptor
    pub values: Option<SparseValues>,
}

/// `accessors[i]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accessor {
    /// Resolved `bufferView`
    pub buffer_view: Option<usize>,
    /// `byteOffset`, as declared
    pub byte_offset: Option<u64>,
    /// `componentType`
    pub component_type: Option<ComponentType>,
    /// `count`
    pub count: Option<u64>,
    /// `type`
    pub element_type: Option<ElementType>,
    /// `normalized`, default false
    pub normalized: bool,
    /// `min`, if every entry is a number
    pub min: Option<Vec<f64>>,
    /// `max`, if every entry is a number
    pub max: Option<Vec<f64>>,
    /// `sparse`
    pub sparse: Option<Sparse>,
}

impl Accessor {
    /// `byteOffset`, defaulting to 0
    pub fn offset(&self) -> u64 {
        self.byte_offset.unwrap_or(0)
    }
}
