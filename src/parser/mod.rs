//! PDF Parser Core
//!
//! This module implements the parsing core for PDF 1.x files: a seekable
//! byte cursor, a pull-based tokenizer with push-back, an object parser
//! with lazy reference resolution, and a classic cross-reference table
//! reader. Stream payloads are returned raw; filters, encryption, and the
//! document-level API are the responsibility of outer layers.

pub mod cursor;
pub mod header;
pub mod lexer;
pub mod objects;
pub mod reader;
pub mod resolver;
pub mod trailer;
pub mod xref;

pub use self::cursor::ByteCursor;
pub use self::header::{PdfHeader, PdfVersion};
pub use self::lexer::{Keyword, Lexer, Token, TokenKind};
pub use self::objects::{
    IndirectObject, ObjectId, PdfArray, PdfDictionary, PdfName, PdfObject, PdfStream, PdfString,
    StringKind,
};
pub use self::reader::ObjectParser;
pub use self::resolver::{ReferenceResolver, ResolverFn, XRefResolver};
pub use self::trailer::PdfTrailer;
pub use self::xref::{XRefEntry, XRefTable};

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// PDF Parser errors
///
/// Every parse failure carries the byte offset at which it was detected so
/// callers can inspect the surrounding bytes.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid header at offset {position}: {message}")]
    InvalidHeader { position: u64, message: String },

    #[error("syntax error at offset {position}: {message}")]
    SyntaxError { position: u64, message: String },

    #[error("unexpected token at offset {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        position: u64,
        expected: String,
        found: String,
    },

    #[error("unexpected end of input at offset {position}")]
    UnexpectedEof { position: u64 },

    #[error("missing required key /{key} at offset {position}")]
    MissingKey { position: u64, key: String },

    #[error("invalid stream at offset {position}: {message}")]
    InvalidStream { position: u64, message: String },

    #[error("invalid cross-reference entry at offset {position}: {message}")]
    InvalidXRef { position: u64, message: String },

    #[error("unresolved reference {id} R at offset {position}")]
    UnresolvedReference { position: u64, id: ObjectId },
}

impl ParseError {
    /// Byte offset at which the error was detected, if the failure is
    /// positional (IO failures are not).
    pub fn position(&self) -> Option<u64> {
        match self {
            ParseError::Io(_) => None,
            ParseError::InvalidHeader { position, .. }
            | ParseError::SyntaxError { position, .. }
            | ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEof { position }
            | ParseError::MissingKey { position, .. }
            | ParseError::InvalidStream { position, .. }
            | ParseError::InvalidXRef { position, .. }
            | ParseError::UnresolvedReference { position, .. } => Some(*position),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_offset() {
        let err = ParseError::SyntaxError {
            position: 42,
            message: "unmatched ')'".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("42"));
        assert!(text.contains("unmatched"));
        assert_eq!(err.position(), Some(42));
    }

    #[test]
    fn test_error_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ParseError::from(io);
        assert!(matches!(err, ParseError::Io(_)));
        assert_eq!(err.position(), None);
    }

    #[test]
    fn test_unresolved_reference_display() {
        let err = ParseError::UnresolvedReference {
            position: 7,
            id: ObjectId::new(12, 0),
        };
        assert_eq!(err.to_string(), "unresolved reference 12 0 R at offset 7");
    }
}
