//! JSON-pointer locations for messages

use std::fmt;

/// A JSON pointer (RFC 6901) into the validated document, e.g. `/scenes/0/nodes/1`
///
/// Built incrementally while walking the document; each step returns a new
/// pointer so callers can keep the parent around.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Pointer(String);

impl Pointer {
    /// The document root (empty pointer)
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Append an object key, escaping `~` and `/`
    pub fn key(&self, key: &str) -> Self {
        let mut path = String::with_capacity(self.0.len() + key.len() + 1);
        path.push_str(&self.0);
        path.push('/');
        for c in key.chars() {
            match c {
                '~' => path.push_str("~0"),
                '/' => path.push_str("~1"),
                _ => path.push(c),
            }
        }
        Self(path)
    }

    /// Append an array index
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}/{}", self.0, index))
    }

    /// Pointer text; the root is rendered as `/`
    pub fn as_str(&self) -> &str {
        if self.0.is_empty() { "/" } else { &self.0 }
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Pointer> for String {
    fn from(pointer: Pointer) -> Self {
        pointer.as_str().to_string()
    }
}
