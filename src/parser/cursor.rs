//! Seekable byte cursor over the PDF input
//!
//! All byte-level access goes through `ByteCursor`: single-byte reads with
//! one byte of lookahead, bulk reads for stream payloads and fixed-width
//! records, and the backward scan that locates the `startxref` offset.

use super::{ParseError, ParseResult};
use log::debug;
use std::io::{BufReader, Read, Seek, SeekFrom};

/// PDF whitespace: NUL, HT, LF, FF, CR, SP.
pub(crate) fn is_pdf_whitespace(byte: u8) -> bool {
    matches!(byte, b'\0' | b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

/// PDF delimiters.
pub(crate) fn is_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// A regular character is anything that is neither whitespace nor delimiter.
pub(crate) fn is_regular(byte: u8) -> bool {
    !is_pdf_whitespace(byte) && !is_delimiter(byte)
}

const STARTXREF: &[u8] = b"startxref";
const EOF_MARKER: &[u8] = b"%%EOF";

/// How far from the end of the input the `startxref` keyword is searched.
const STARTXREF_WINDOW: u64 = 1024;

/// Random-access view over the input with a current position.
///
/// The cursor owns the input for the parser's lifetime. `position` always
/// refers to the next byte that `read_byte` would deliver; the one-byte
/// peek slot is transparent to callers.
pub struct ByteCursor<R: Read + Seek> {
    inner: BufReader<R>,
    position: u64,
    peeked: Option<u8>,
}

impl<R: Read + Seek> ByteCursor<R> {
    /// Create a cursor positioned at the start of `input`.
    pub fn new(input: R) -> Self {
        Self {
            inner: BufReader::new(input),
            position: 0,
            peeked: None,
        }
    }

    /// Current byte offset.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Consume and return the next byte, or `None` at end of input.
    pub fn read_byte(&mut self) -> ParseResult<Option<u8>> {
        if let Some(byte) = self.peeked.take() {
            self.position += 1;
            return Ok(Some(byte));
        }
        let mut buf = [0u8; 1];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => {
                self.position += 1;
                Ok(Some(buf[0]))
            }
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Return the next byte without consuming it, or `None` at end of input.
    pub fn peek_byte(&mut self) -> ParseResult<Option<u8>> {
        if self.peeked.is_none() {
            let mut buf = [0u8; 1];
            match self.inner.read_exact(&mut buf) {
                Ok(()) => self.peeked = Some(buf[0]),
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(self.peeked)
    }

    /// Reposition the cursor to an absolute byte offset.
    pub fn seek(&mut self, offset: u64) -> ParseResult<()> {
        self.peeked = None;
        self.inner.seek(SeekFrom::Start(offset))?;
        self.position = offset;
        Ok(())
    }

    /// Read exactly `count` bytes. A short read is an error carrying the
    /// offset at which input ran out.
    pub fn read_exact(&mut self, count: usize) -> ParseResult<Vec<u8>> {
        let mut buf = vec![0u8; count];
        let mut filled = 0;
        if count > 0 {
            if let Some(byte) = self.peeked.take() {
                buf[0] = byte;
                filled = 1;
            }
        }
        if filled < count {
            self.inner.read_exact(&mut buf[filled..]).map_err(|e| {
                if e.kind() == std::io::ErrorKind::UnexpectedEof {
                    ParseError::UnexpectedEof {
                        position: self.position + filled as u64,
                    }
                } else {
                    ParseError::Io(e)
                }
            })?;
        }
        self.position += count as u64;
        Ok(buf)
    }

    /// Consume exactly one end-of-line sequence: LF, or CR LF.
    ///
    /// A lone CR is rejected; the callers that need this (the byte right
    /// after the `stream` keyword) may not treat CR alone as a terminator
    /// because the following payload byte would be misattributed.
    pub fn read_eol(&mut self) -> ParseResult<()> {
        let position = self.position;
        match self.read_byte()? {
            Some(b'\n') => Ok(()),
            Some(b'\r') => match self.peek_byte()? {
                Some(b'\n') => {
                    self.read_byte()?;
                    Ok(())
                }
                _ => Err(ParseError::SyntaxError {
                    position,
                    message: "expected line feed after carriage return".to_string(),
                }),
            },
            Some(other) => Err(ParseError::SyntaxError {
                position,
                message: format!("expected end-of-line, found byte 0x{other:02X}"),
            }),
            None => Err(ParseError::UnexpectedEof { position }),
        }
    }

    /// Total length of the input in bytes. The logical position is
    /// preserved across the call.
    pub fn len(&mut self) -> ParseResult<u64> {
        let current = self.position;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.peeked = None;
        self.inner.seek(SeekFrom::Start(current))?;
        Ok(end)
    }

    /// Whether the input is empty.
    pub fn is_empty(&mut self) -> ParseResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Locate the cross-reference offset recorded at the end of the file.
    ///
    /// Scans a bounded window at the end of the input for the last
    /// `startxref` keyword, then forward-parses a non-negative integer
    /// followed by the `%%EOF` marker and returns the integer.
    pub fn find_startxref_offset(&mut self) -> ParseResult<u64> {
        let total = self.len()?;
        let window = total.min(STARTXREF_WINDOW);
        let base = total - window;
        self.seek(base)?;
        let tail = self.read_exact(window as usize)?;

        let keyword_at = tail
            .windows(STARTXREF.len())
            .rposition(|w| w == STARTXREF)
            .ok_or_else(|| ParseError::SyntaxError {
                position: total,
                message: "'startxref' not found at end of input".to_string(),
            })?;

        let mut i = keyword_at + STARTXREF.len();
        while i < tail.len() && is_pdf_whitespace(tail[i]) {
            i += 1;
        }
        let digits_start = i;
        while i < tail.len() && tail[i].is_ascii_digit() {
            i += 1;
        }
        if i == digits_start {
            return Err(ParseError::SyntaxError {
                position: base + digits_start as u64,
                message: "expected offset after 'startxref'".to_string(),
            });
        }
        let digits = std::str::from_utf8(&tail[digits_start..i]).expect("ascii digits");
        let offset = digits.parse::<u64>().map_err(|_| ParseError::SyntaxError {
            position: base + digits_start as u64,
            message: "cross-reference offset out of range".to_string(),
        })?;

        while i < tail.len() && is_pdf_whitespace(tail[i]) {
            i += 1;
        }
        if !tail[i..].starts_with(EOF_MARKER) {
            return Err(ParseError::SyntaxError {
                position: base + i as u64,
                message: "expected '%%EOF' after cross-reference offset".to_string(),
            });
        }

        debug!(
            "startxref at offset {} points to {}",
            base + keyword_at as u64,
            offset
        );
        Ok(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cursor(data: &[u8]) -> ByteCursor<Cursor<Vec<u8>>> {
        ByteCursor::new(Cursor::new(data.to_vec()))
    }

    #[test]
    fn test_read_and_peek() {
        let mut c = cursor(b"ab");
        assert_eq!(c.peek_byte().unwrap(), Some(b'a'));
        assert_eq!(c.position(), 0);
        assert_eq!(c.read_byte().unwrap(), Some(b'a'));
        assert_eq!(c.position(), 1);
        assert_eq!(c.read_byte().unwrap(), Some(b'b'));
        assert_eq!(c.read_byte().unwrap(), None);
        assert_eq!(c.peek_byte().unwrap(), None);
    }

    #[test]
    fn test_seek_discards_peek() {
        let mut c = cursor(b"abcdef");
        assert_eq!(c.peek_byte().unwrap(), Some(b'a'));
        c.seek(3).unwrap();
        assert_eq!(c.position(), 3);
        assert_eq!(c.read_byte().unwrap(), Some(b'd'));
    }

    #[test]
    fn test_read_exact_includes_peeked_byte() {
        let mut c = cursor(b"hello world");
        assert_eq!(c.peek_byte().unwrap(), Some(b'h'));
        assert_eq!(c.read_exact(5).unwrap(), b"hello");
        assert_eq!(c.position(), 5);
        assert_eq!(c.read_exact(6).unwrap(), b" world");
    }

    #[test]
    fn test_read_exact_short_read() {
        let mut c = cursor(b"abc");
        let err = c.read_exact(5).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_read_eol_variants() {
        let mut c = cursor(b"\nX");
        c.read_eol().unwrap();
        assert_eq!(c.read_byte().unwrap(), Some(b'X'));

        let mut c = cursor(b"\r\nX");
        c.read_eol().unwrap();
        assert_eq!(c.read_byte().unwrap(), Some(b'X'));

        let mut c = cursor(b"\rX");
        assert!(c.read_eol().is_err());
    }

    #[test]
    fn test_len_preserves_position() {
        let mut c = cursor(b"abcdef");
        c.read_byte().unwrap();
        assert_eq!(c.len().unwrap(), 6);
        assert_eq!(c.position(), 1);
        assert_eq!(c.read_byte().unwrap(), Some(b'b'));
    }

    #[test]
    fn test_find_startxref_offset() {
        let mut c = cursor(b"%PDF-1.4\njunk\nstartxref\n1234\n%%EOF\n");
        assert_eq!(c.find_startxref_offset().unwrap(), 1234);
    }

    #[test]
    fn test_find_startxref_takes_last_occurrence() {
        let mut c = cursor(b"startxref\n1\n%%EOF\nstartxref\n99\n%%EOF");
        assert_eq!(c.find_startxref_offset().unwrap(), 99);
    }

    #[test]
    fn test_find_startxref_missing_keyword() {
        let mut c = cursor(b"no trailer here");
        assert!(c.find_startxref_offset().is_err());
    }

    #[test]
    fn test_find_startxref_missing_eof_marker() {
        let mut c = cursor(b"startxref\n12\n");
        let err = c.find_startxref_offset().unwrap_err();
        assert!(matches!(err, ParseError::SyntaxError { .. }));
    }

    #[test]
    fn test_find_startxref_missing_offset() {
        let mut c = cursor(b"startxref\n%%EOF");
        assert!(c.find_startxref_offset().is_err());
    }

    #[test]
    fn test_character_classes() {
        for b in [b'\0', b'\t', b'\n', b'\x0C', b'\r', b' '] {
            assert!(is_pdf_whitespace(b));
            assert!(!is_regular(b));
        }
        for b in *b"()<>[]{}/%" {
            assert!(is_delimiter(b));
            assert!(!is_regular(b));
        }
        assert!(is_regular(b'A'));
        assert!(is_regular(b'#'));
    }
}
