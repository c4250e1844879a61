//! PDF Header Reader
//!
//! Reads the `%PDF-M.N` version line and the optional binary-marker
//! comment that follows it, per ISO 32000-1 Section 7.5.2. The header is
//! the only place where the tokenizer emits comment tokens.

use super::lexer::{Lexer, Token, TokenKind};
use super::{ParseError, ParseResult};
use std::io::{Read, Seek};

/// PDF version information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfVersion {
    pub major: u8,
    pub minor: u8,
}

impl PdfVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Whether this implementation knows the version: 1.0 through 1.7,
    /// plus 2.0. The header reader itself accepts any `M.N` pair; this is
    /// advisory for callers.
    pub fn is_supported(&self) -> bool {
        matches!((self.major, self.minor), (1, 0..=7) | (2, 0))
    }
}

impl std::fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Parsed header line plus the binary-marker flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfHeader {
    pub version: PdfVersion,
    /// A comment of four or more bytes over 0x7F follows the version
    /// line, marking the file as binary.
    pub has_binary_marker: bool,
}

/// Read the header from a tokenizer positioned at the start of input.
///
/// Comment emission is enabled for the duration of the call and restored
/// on every exit path.
pub(crate) fn read_header<R: Read + Seek>(lexer: &mut Lexer<R>) -> ParseResult<PdfHeader> {
    let was_ignoring = lexer.ignores_comments();
    lexer.set_ignore_comments(false);
    let result = read_header_inner(lexer);
    lexer.set_ignore_comments(was_ignoring);
    result
}

fn read_header_inner<R: Read + Seek>(lexer: &mut Lexer<R>) -> ParseResult<PdfHeader> {
    let token = lexer.next_token()?;
    let version = match token.kind {
        TokenKind::Comment(text) => parse_version(&text, token.offset)?,
        other => {
            return Err(ParseError::InvalidHeader {
                position: token.offset,
                message: format!("expected '%PDF-' comment, found {}", other.describe()),
            })
        }
    };

    // The line after the version may carry the binary marker comment.
    let token = lexer.next_token()?;
    let has_binary_marker = match token.kind {
        TokenKind::Comment(text) => text.iter().filter(|&&b| b > 0x7F).count() >= 4,
        other => {
            lexer.push_back(Token {
                offset: token.offset,
                kind: other,
            });
            false
        }
    };

    Ok(PdfHeader {
        version,
        has_binary_marker,
    })
}

fn parse_version(comment: &[u8], position: u64) -> ParseResult<PdfVersion> {
    let invalid = |message: String| ParseError::InvalidHeader { position, message };

    let rest = comment
        .strip_prefix(b"PDF-")
        .ok_or_else(|| invalid("header comment does not start with '%PDF-'".to_string()))?;
    let text = std::str::from_utf8(rest)
        .map_err(|_| invalid("version is not ASCII".to_string()))?
        .trim_end();

    let (major, minor) = text
        .split_once('.')
        .ok_or_else(|| invalid(format!("version '{text}' is not of the form M.N")))?;
    if major.is_empty()
        || minor.is_empty()
        || !major.bytes().all(|b| b.is_ascii_digit())
        || !minor.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid(format!("version '{text}' is not of the form M.N")));
    }

    let major = major
        .parse::<u8>()
        .map_err(|_| invalid(format!("major version '{major}' out of range")))?;
    let minor = minor
        .parse::<u8>()
        .map_err(|_| invalid(format!("minor version '{minor}' out of range")))?;

    Ok(PdfVersion::new(major, minor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header_of(input: &[u8]) -> ParseResult<PdfHeader> {
        let mut lexer = Lexer::new(Cursor::new(input.to_vec()));
        read_header(&mut lexer)
    }

    #[test]
    fn test_basic_header() {
        let header = header_of(b"%PDF-1.7\n").unwrap();
        assert_eq!(header.version, PdfVersion::new(1, 7));
        assert!(!header.has_binary_marker);
    }

    #[test]
    fn test_header_with_binary_marker() {
        let header = header_of(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n1 0 obj").unwrap();
        assert_eq!(header.version, PdfVersion::new(1, 4));
        assert!(header.has_binary_marker);
    }

    #[test]
    fn test_ascii_comment_is_not_binary_marker() {
        let header = header_of(b"%PDF-1.4\n%just a comment\n").unwrap();
        assert!(!header.has_binary_marker);
    }

    #[test]
    fn test_marker_needs_four_binary_bytes() {
        let header = header_of(b"%PDF-1.4\n%\xE2\xE3\n").unwrap();
        assert!(!header.has_binary_marker);
    }

    #[test]
    fn test_non_comment_after_header_is_pushed_back() {
        let mut lexer = Lexer::new(Cursor::new(b"%PDF-1.4\n42".to_vec()));
        let header = read_header(&mut lexer).unwrap();
        assert!(!header.has_binary_marker);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Integer(42));
    }

    #[test]
    fn test_rejects_non_comment() {
        assert!(matches!(
            header_of(b"PDF-1.4\n"),
            Err(ParseError::SyntaxError { .. }) | Err(ParseError::InvalidHeader { .. })
        ));
        assert!(matches!(
            header_of(b"42"),
            Err(ParseError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn test_rejects_wrong_prefix() {
        assert!(header_of(b"%PDX-1.4\n").is_err());
    }

    #[test]
    fn test_rejects_malformed_versions() {
        assert!(header_of(b"%PDF-1\n").is_err());
        assert!(header_of(b"%PDF-1.4.2\n").is_err());
        assert!(header_of(b"%PDF-1.x\n").is_err());
        assert!(header_of(b"%PDF-.4\n").is_err());
        assert!(header_of(b"%PDF--1.4\n").is_err());
        assert!(header_of(b"%PDF-1.400\n").is_err());
    }

    #[test]
    fn test_accepts_unknown_but_well_formed_version() {
        let header = header_of(b"%PDF-9.9\n").unwrap();
        assert_eq!(header.version, PdfVersion::new(9, 9));
        assert!(!header.version.is_supported());
    }

    #[test]
    fn test_comment_skipping_restored_after_header() {
        let mut lexer = Lexer::new(Cursor::new(b"%PDF-1.4\n%note\n7".to_vec()));
        read_header(&mut lexer).unwrap();
        assert!(lexer.ignores_comments());
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Integer(7));
    }

    #[test]
    fn test_version_display_and_support() {
        assert_eq!(PdfVersion::new(1, 5).to_string(), "1.5");
        assert!(PdfVersion::new(1, 0).is_supported());
        assert!(PdfVersion::new(2, 0).is_supported());
        assert!(!PdfVersion::new(2, 1).is_supported());
        assert!(!PdfVersion::new(0, 9).is_supported());
    }
}
