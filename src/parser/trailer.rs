//! PDF Trailer view
//!
//! Typed accessors over the trailer dictionary per ISO 32000-1 Section
//! 7.5.5. The trailer of a single cross-reference section; chaining
//! trailers across incremental updates belongs to the document layer.

use super::objects::{ObjectId, PdfDictionary, PdfObject};
use super::{ParseError, ParseResult};

/// Trailer dictionary together with the offset it was parsed at.
#[derive(Debug, Clone)]
pub struct PdfTrailer {
    dict: PdfDictionary,
    /// Byte offset of the `trailer` keyword, used in error reports.
    offset: u64,
}

impl PdfTrailer {
    pub fn from_dict(dict: PdfDictionary, offset: u64) -> Self {
        Self { dict, offset }
    }

    /// Total number of entries in the file's cross-reference table.
    pub fn size(&self) -> ParseResult<i64> {
        self.dict
            .get("Size")
            .and_then(PdfObject::as_integer)
            .ok_or_else(|| ParseError::MissingKey {
                position: self.offset,
                key: "Size".to_string(),
            })
    }

    /// Reference to the document catalog.
    pub fn root(&self) -> ParseResult<ObjectId> {
        self.dict
            .get("Root")
            .and_then(PdfObject::as_reference)
            .ok_or_else(|| ParseError::MissingKey {
                position: self.offset,
                key: "Root".to_string(),
            })
    }

    /// Reference to the document information dictionary, if any.
    pub fn info(&self) -> Option<ObjectId> {
        self.dict.get("Info").and_then(PdfObject::as_reference)
    }

    /// Byte offset of the previous cross-reference section, if any.
    pub fn prev(&self) -> Option<u64> {
        self.dict
            .get("Prev")
            .and_then(PdfObject::as_integer)
            .and_then(|i| u64::try_from(i).ok())
    }

    /// The file identifier array, if any.
    pub fn id(&self) -> Option<&PdfObject> {
        self.dict.get("ID")
    }

    pub fn is_encrypted(&self) -> bool {
        self.dict.contains_key("Encrypt")
    }

    /// Check the entries every trailer must carry.
    pub fn validate(&self) -> ParseResult<()> {
        self.size()?;
        self.root()?;
        Ok(())
    }

    pub fn dict(&self) -> &PdfDictionary {
        &self.dict
    }
}
