//! PDF object model
//!
//! The tagged value algebra produced by the object parser, per ISO 32000-1
//! Section 7.3. Objects are immutable after construction. Indirect objects
//! are a separate type so the "top level only, never nested" rule is
//! enforced by construction.

use std::collections::HashMap;
use std::fmt;

/// Identifier of an indirect object: object number plus generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    pub number: u32,
    pub generation: u16,
}

impl ObjectId {
    pub const fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.generation)
    }
}

/// PDF Name object (e.g., /Type)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PdfName(pub String);

impl PdfName {
    pub fn new(name: impl Into<String>) -> Self {
        PdfName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Whether a string was written in literal or hexadecimal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    Literal,
    Hexadecimal,
}

/// PDF String object, tagged with its source encoding
#[derive(Debug, Clone, PartialEq)]
pub struct PdfString {
    pub data: Vec<u8>,
    pub kind: StringKind,
}

impl PdfString {
    pub fn literal(data: Vec<u8>) -> Self {
        Self {
            data,
            kind: StringKind::Literal,
        }
    }

    pub fn hexadecimal(data: Vec<u8>) -> Self {
        Self {
            data,
            kind: StringKind::Hexadecimal,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get as UTF-8 text if possible
    pub fn as_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.data)
    }

    pub fn is_hex(&self) -> bool {
        self.kind == StringKind::Hexadecimal
    }
}

/// PDF Array object
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfArray(pub Vec<PdfObject>);

impl PdfArray {
    pub fn new() -> Self {
        PdfArray(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PdfObject> {
        self.0.get(index)
    }

    pub fn push(&mut self, object: PdfObject) {
        self.0.push(object);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PdfObject> {
        self.0.iter()
    }
}

/// PDF Dictionary object. Later duplicate keys overwrite earlier ones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfDictionary(pub HashMap<PdfName, PdfObject>);

impl PdfDictionary {
    pub fn new() -> Self {
        PdfDictionary(HashMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.0.get(&PdfName(key.to_string()))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PdfObject) {
        self.0.insert(PdfName(key.into()), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&PdfName(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// PDF Stream object: a dictionary followed by raw payload bytes.
///
/// The payload is exactly the declared `Length` bytes; filters are applied
/// by outer layers.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
}

impl PdfStream {
    /// The raw (possibly filtered) payload bytes.
    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }
}

/// PDF Object values
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(PdfString),
    Name(PdfName),
    Array(PdfArray),
    Dictionary(PdfDictionary),
    Stream(PdfStream),
    Reference(ObjectId),
}

impl PdfObject {
    pub fn is_null(&self) -> bool {
        matches!(self, PdfObject::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PdfObject::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PdfObject::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value widened to f64; integers qualify.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            PdfObject::Real(r) => Some(*r),
            PdfObject::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&PdfString> {
        match self {
            PdfObject::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&PdfName> {
        match self {
            PdfObject::Name(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&PdfArray> {
        match self {
            PdfObject::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Dictionary view; a stream exposes its own dictionary.
    pub fn as_dict(&self) -> Option<&PdfDictionary> {
        match self {
            PdfObject::Dictionary(d) => Some(d),
            PdfObject::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }

    pub fn as_stream(&self) -> Option<&PdfStream> {
        match self {
            PdfObject::Stream(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<ObjectId> {
        match self {
            PdfObject::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// Variant name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            PdfObject::Null => "null",
            PdfObject::Boolean(_) => "boolean",
            PdfObject::Integer(_) => "integer",
            PdfObject::Real(_) => "real",
            PdfObject::String(_) => "string",
            PdfObject::Name(_) => "name",
            PdfObject::Array(_) => "array",
            PdfObject::Dictionary(_) => "dictionary",
            PdfObject::Stream(_) => "stream",
            PdfObject::Reference(_) => "reference",
        }
    }
}

/// A numbered, versioned top-level object bracketed by `obj`/`endobj`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndirectObject {
    pub id: ObjectId,
    pub object: PdfObject,
}

impl IndirectObject {
    pub fn into_object(self) -> PdfObject {
        self.object
    }
}
