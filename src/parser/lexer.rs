//! PDF Lexer
//!
//! Tokenizes PDF syntax according to ISO 32000-1 Section 7.2. The lexer is
//! pull-based: callers take tokens with [`Lexer::next_token`] and may push
//! any number of them back for lookahead. Every token records the byte
//! offset of its first lexeme byte.

use super::cursor::{is_pdf_whitespace, is_regular, ByteCursor};
use super::xref::XRefEntry;
use super::{ParseError, ParseResult};
use std::io::{Read, Seek};

/// The closed set of PDF keywords.
///
/// Booleans and `null` are keywords at the token level; the object parser
/// turns them into values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Obj,
    EndObj,
    Stream,
    EndStream,
    R,
    True,
    False,
    Null,
    Xref,
    Trailer,
    StartXref,
    N,
    F,
}

impl Keyword {
    fn from_word(word: &[u8]) -> Option<Self> {
        match word {
            b"obj" => Some(Keyword::Obj),
            b"endobj" => Some(Keyword::EndObj),
            b"stream" => Some(Keyword::Stream),
            b"endstream" => Some(Keyword::EndStream),
            b"R" => Some(Keyword::R),
            b"true" => Some(Keyword::True),
            b"false" => Some(Keyword::False),
            b"null" => Some(Keyword::Null),
            b"xref" => Some(Keyword::Xref),
            b"trailer" => Some(Keyword::Trailer),
            b"startxref" => Some(Keyword::StartXref),
            b"n" => Some(Keyword::N),
            b"f" => Some(Keyword::F),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Obj => "obj",
            Keyword::EndObj => "endobj",
            Keyword::Stream => "stream",
            Keyword::EndStream => "endstream",
            Keyword::R => "R",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
            Keyword::Xref => "xref",
            Keyword::Trailer => "trailer",
            Keyword::StartXref => "startxref",
            Keyword::N => "n",
            Keyword::F => "f",
        }
    }
}

/// Token payload variants.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Bytes after `%` up to (not including) the end of line
    Comment(Vec<u8>),

    /// Whole number
    Integer(i64),

    /// Real number (no exponents in PDF syntax)
    Real(f64),

    /// Name with `#hh` escapes decoded (e.g. `/Type`)
    Name(String),

    /// Parenthesized string with escapes decoded
    LiteralString(Vec<u8>),

    /// `<...>` string with hex digits decoded, odd length padded with 0
    HexString(Vec<u8>),

    /// `[`
    ArrayOpen,

    /// `]`
    ArrayClose,

    /// `<<`
    DictOpen,

    /// `>>`
    DictClose,

    /// One of the closed keyword set
    Keyword(Keyword),

    /// One 20-byte cross-reference record decoded as a unit
    XRefEntry(XRefEntry),

    /// End of input
    Eof,
}

impl TokenKind {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Comment(_) => "comment".to_string(),
            TokenKind::Integer(n) => format!("integer {n}"),
            TokenKind::Real(r) => format!("real {r}"),
            TokenKind::Name(n) => format!("name /{n}"),
            TokenKind::LiteralString(_) => "string literal".to_string(),
            TokenKind::HexString(_) => "hex string".to_string(),
            TokenKind::ArrayOpen => "'['".to_string(),
            TokenKind::ArrayClose => "']'".to_string(),
            TokenKind::DictOpen => "'<<'".to_string(),
            TokenKind::DictClose => "'>>'".to_string(),
            TokenKind::Keyword(k) => format!("keyword '{}'", k.as_str()),
            TokenKind::XRefEntry(_) => "cross-reference record".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// A token together with the byte offset where its lexeme starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub offset: u64,
    pub kind: TokenKind,
}

/// Saved tokenizer state for nested parses at explicit offsets.
pub(crate) struct LexerState {
    position: u64,
    pushed: Vec<Token>,
}

/// PDF tokenizer over a [`ByteCursor`].
pub struct Lexer<R: Read + Seek> {
    cursor: ByteCursor<R>,
    pushed: Vec<Token>,
    ignore_comments: bool,
}

impl<R: Read + Seek> Lexer<R> {
    /// Create a lexer reading from `input`. Comments are skipped until
    /// [`Lexer::set_ignore_comments`] says otherwise.
    pub fn new(input: R) -> Self {
        Self {
            cursor: ByteCursor::new(input),
            pushed: Vec::new(),
            ignore_comments: true,
        }
    }

    /// Whether `Comment` tokens are currently suppressed.
    pub fn ignores_comments(&self) -> bool {
        self.ignore_comments
    }

    /// Toggle comment suppression. Only the header reader turns it off.
    pub fn set_ignore_comments(&mut self, ignore: bool) {
        self.ignore_comments = ignore;
    }

    /// Current byte offset of the underlying cursor.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Reposition the input. The push-back stack is cleared: pushed tokens
    /// belong to the abandoned position.
    pub fn seek(&mut self, offset: u64) -> ParseResult<()> {
        self.pushed.clear();
        self.cursor.seek(offset)
    }

    /// Restore a token so the next [`Lexer::next_token`] returns it.
    /// Strict LIFO: the last token pushed is the first returned.
    pub fn push_back(&mut self, token: Token) {
        self.pushed.push(token);
    }

    /// Locate the `startxref` offset recorded at the end of the input.
    pub fn find_startxref_offset(&mut self) -> ParseResult<u64> {
        self.cursor.find_startxref_offset()
    }

    /// Read `count` bytes directly from the cursor, bypassing tokenization.
    /// Used for stream payloads; the push-back stack must be empty.
    pub fn read_raw_bytes(&mut self, count: usize) -> ParseResult<Vec<u8>> {
        debug_assert!(self.pushed.is_empty());
        self.cursor.read_exact(count)
    }

    /// Consume the single EOL that separates the `stream` keyword from the
    /// payload (LF or CR LF).
    pub fn read_stream_eol(&mut self) -> ParseResult<()> {
        self.cursor.read_eol()
    }

    pub(crate) fn save_state(&mut self) -> LexerState {
        LexerState {
            position: self.cursor.position(),
            pushed: std::mem::take(&mut self.pushed),
        }
    }

    pub(crate) fn restore_state(&mut self, state: LexerState) -> ParseResult<()> {
        self.cursor.seek(state.position)?;
        self.pushed = state.pushed;
        Ok(())
    }

    /// Consume and classify one token.
    pub fn next_token(&mut self) -> ParseResult<Token> {
        loop {
            if let Some(token) = self.pushed.pop() {
                if self.ignore_comments && matches!(token.kind, TokenKind::Comment(_)) {
                    continue;
                }
                return Ok(token);
            }

            self.skip_whitespace()?;
            let offset = self.cursor.position();
            let byte = match self.cursor.peek_byte()? {
                Some(b) => b,
                None => {
                    return Ok(Token {
                        offset,
                        kind: TokenKind::Eof,
                    })
                }
            };

            let kind = match byte {
                b'%' => {
                    let text = self.read_comment()?;
                    if self.ignore_comments {
                        continue;
                    }
                    TokenKind::Comment(text)
                }
                b'/' => self.read_name()?,
                b'(' => self.read_literal_string(offset)?,
                b'<' => self.read_angle_bracket(offset)?,
                b'>' => {
                    self.cursor.read_byte()?;
                    if self.cursor.peek_byte()? == Some(b'>') {
                        self.cursor.read_byte()?;
                        TokenKind::DictClose
                    } else {
                        return Err(ParseError::SyntaxError {
                            position: offset,
                            message: "unmatched '>'".to_string(),
                        });
                    }
                }
                b'[' => {
                    self.cursor.read_byte()?;
                    TokenKind::ArrayOpen
                }
                b']' => {
                    self.cursor.read_byte()?;
                    TokenKind::ArrayClose
                }
                b')' => {
                    return Err(ParseError::SyntaxError {
                        position: offset,
                        message: "unmatched ')'".to_string(),
                    });
                }
                b'{' | b'}' => {
                    return Err(ParseError::SyntaxError {
                        position: offset,
                        message: format!("unexpected delimiter '{}'", byte as char),
                    });
                }
                b'+' | b'-' | b'.' | b'0'..=b'9' => self.read_number(offset)?,
                _ => self.read_keyword(offset)?,
            };

            return Ok(Token { offset, kind });
        }
    }

    /// Read one fixed-width cross-reference record and assign it
    /// `expected_id`. The record is exactly 20 bytes: a 10-digit offset, a
    /// space, a 5-digit generation, a space, an `n`/`f` marker, and two
    /// terminator bytes drawn from space/CR/LF.
    pub fn read_xref_entry(&mut self, expected_id: u32) -> ParseResult<Token> {
        self.skip_whitespace()?;
        let offset = self.cursor.position();
        let raw = self.cursor.read_exact(20)?;

        let invalid = |message: &str| ParseError::InvalidXRef {
            position: offset,
            message: message.to_string(),
        };

        if !raw[0..10].iter().all(u8::is_ascii_digit) {
            return Err(invalid("offset field must be 10 digits"));
        }
        if raw[10] != b' ' {
            return Err(invalid("expected space after offset field"));
        }
        if !raw[11..16].iter().all(u8::is_ascii_digit) {
            return Err(invalid("generation field must be 5 digits"));
        }
        if raw[16] != b' ' {
            return Err(invalid("expected space after generation field"));
        }
        let in_use = match raw[17] {
            b'n' => true,
            b'f' => false,
            _ => return Err(invalid("entry marker must be 'n' or 'f'")),
        };
        if !raw[18..20]
            .iter()
            .all(|&b| matches!(b, b' ' | b'\r' | b'\n'))
        {
            return Err(invalid("record terminator must be space, CR, or LF"));
        }

        let byte_offset = std::str::from_utf8(&raw[0..10])
            .expect("ascii digits")
            .parse::<u64>()
            .expect("10 digits fit in u64");
        let generation = std::str::from_utf8(&raw[11..16])
            .expect("ascii digits")
            .parse::<u16>()
            .map_err(|_| invalid("generation exceeds 65535"))?;

        Ok(Token {
            offset,
            kind: TokenKind::XRefEntry(XRefEntry {
                id: expected_id,
                offset: byte_offset,
                generation,
                in_use,
            }),
        })
    }

    fn skip_whitespace(&mut self) -> ParseResult<()> {
        while let Some(byte) = self.cursor.peek_byte()? {
            if is_pdf_whitespace(byte) {
                self.cursor.read_byte()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Comment body from `%` to end of line. The terminator stays in the
    /// input; whitespace skipping removes it before the next token.
    fn read_comment(&mut self) -> ParseResult<Vec<u8>> {
        self.cursor.read_byte()?; // '%'
        let mut text = Vec::new();
        while let Some(byte) = self.cursor.peek_byte()? {
            if byte == b'\n' || byte == b'\r' {
                break;
            }
            self.cursor.read_byte()?;
            text.push(byte);
        }
        Ok(text)
    }

    fn read_name(&mut self) -> ParseResult<TokenKind> {
        self.cursor.read_byte()?; // '/'
        let mut name = String::new();
        while let Some(byte) = self.cursor.peek_byte()? {
            if !is_regular(byte) {
                break;
            }
            self.cursor.read_byte()?;
            if byte == b'#' {
                let position = self.cursor.position();
                let hi = self.cursor.read_byte()?;
                let lo = self.cursor.read_byte()?;
                let decoded = match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        let pair = [hi, lo];
                        std::str::from_utf8(&pair)
                            .ok()
                            .and_then(|s| u8::from_str_radix(s, 16).ok())
                    }
                    _ => None,
                };
                match decoded {
                    Some(value) => name.push(value as char),
                    None => {
                        return Err(ParseError::SyntaxError {
                            position,
                            message: "invalid hex escape in name".to_string(),
                        });
                    }
                }
            } else {
                name.push(byte as char);
            }
        }
        Ok(TokenKind::Name(name))
    }

    fn read_literal_string(&mut self, start: u64) -> ParseResult<TokenKind> {
        self.cursor.read_byte()?; // '('
        let mut bytes = Vec::new();
        let mut depth = 1usize;

        loop {
            let byte = self
                .cursor
                .read_byte()?
                .ok_or_else(|| ParseError::SyntaxError {
                    position: start,
                    message: "unterminated string".to_string(),
                })?;

            match byte {
                b'\\' => {
                    let escaped =
                        self.cursor
                            .read_byte()?
                            .ok_or_else(|| ParseError::SyntaxError {
                                position: start,
                                message: "unterminated string".to_string(),
                            })?;
                    match escaped {
                        b'n' => bytes.push(b'\n'),
                        b'r' => bytes.push(b'\r'),
                        b't' => bytes.push(b'\t'),
                        b'b' => bytes.push(b'\x08'),
                        b'f' => bytes.push(b'\x0C'),
                        b'(' => bytes.push(b'('),
                        b')' => bytes.push(b')'),
                        b'\\' => bytes.push(b'\\'),
                        b'0'..=b'7' => {
                            let mut value = u32::from(escaped - b'0');
                            for _ in 0..2 {
                                match self.cursor.peek_byte()? {
                                    Some(digit @ b'0'..=b'7') => {
                                        self.cursor.read_byte()?;
                                        value = value * 8 + u32::from(digit - b'0');
                                    }
                                    _ => break,
                                }
                            }
                            bytes.push(value as u8);
                        }
                        // Backslash before an EOL continues the string on
                        // the next line without emitting anything.
                        b'\r' => {
                            if self.cursor.peek_byte()? == Some(b'\n') {
                                self.cursor.read_byte()?;
                            }
                        }
                        b'\n' => {}
                        other => bytes.push(other),
                    }
                }
                b'(' => {
                    depth += 1;
                    bytes.push(byte);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    bytes.push(byte);
                }
                _ => bytes.push(byte),
            }
        }

        Ok(TokenKind::LiteralString(bytes))
    }

    fn read_angle_bracket(&mut self, start: u64) -> ParseResult<TokenKind> {
        self.cursor.read_byte()?; // '<'
        if self.cursor.peek_byte()? == Some(b'<') {
            self.cursor.read_byte()?;
            return Ok(TokenKind::DictOpen);
        }

        let mut digits = Vec::new();
        loop {
            let position = self.cursor.position();
            match self.cursor.read_byte()? {
                Some(b'>') => break,
                Some(byte) if byte.is_ascii_hexdigit() => digits.push(byte),
                Some(byte) if is_pdf_whitespace(byte) => {}
                Some(_) => {
                    return Err(ParseError::SyntaxError {
                        position,
                        message: "invalid character in hex string".to_string(),
                    });
                }
                None => {
                    return Err(ParseError::SyntaxError {
                        position: start,
                        message: "unterminated hex string".to_string(),
                    });
                }
            }
        }

        if digits.len() % 2 != 0 {
            digits.push(b'0');
        }
        let mut bytes = Vec::with_capacity(digits.len() / 2);
        for pair in digits.chunks(2) {
            let hex = std::str::from_utf8(pair).expect("ascii hex digits");
            bytes.push(u8::from_str_radix(hex, 16).expect("validated hex digits"));
        }
        Ok(TokenKind::HexString(bytes))
    }

    fn read_number(&mut self, start: u64) -> ParseResult<TokenKind> {
        let mut lexeme = String::new();
        let mut has_dot = false;
        let mut has_digit = false;

        if let Some(sign @ (b'+' | b'-')) = self.cursor.peek_byte()? {
            self.cursor.read_byte()?;
            lexeme.push(sign as char);
        }

        while let Some(byte) = self.cursor.peek_byte()? {
            match byte {
                b'0'..=b'9' => {
                    self.cursor.read_byte()?;
                    lexeme.push(byte as char);
                    has_digit = true;
                }
                b'.' if !has_dot => {
                    self.cursor.read_byte()?;
                    lexeme.push('.');
                    has_dot = true;
                }
                _ => break,
            }
        }

        if !has_digit {
            return Err(ParseError::SyntaxError {
                position: start,
                message: format!("malformed number '{lexeme}'"),
            });
        }

        if has_dot {
            let value = lexeme.parse::<f64>().map_err(|_| ParseError::SyntaxError {
                position: start,
                message: format!("malformed real number '{lexeme}'"),
            })?;
            Ok(TokenKind::Real(value))
        } else {
            let value = lexeme.parse::<i64>().map_err(|_| ParseError::SyntaxError {
                position: start,
                message: format!("integer out of range '{lexeme}'"),
            })?;
            Ok(TokenKind::Integer(value))
        }
    }

    fn read_keyword(&mut self, start: u64) -> ParseResult<TokenKind> {
        let mut word = Vec::new();
        while let Some(byte) = self.cursor.peek_byte()? {
            if !is_regular(byte) {
                break;
            }
            self.cursor.read_byte()?;
            word.push(byte);
        }
        match Keyword::from_word(&word) {
            Some(keyword) => Ok(TokenKind::Keyword(keyword)),
            None => Err(ParseError::SyntaxError {
                position: start,
                message: format!("unknown keyword '{}'", String::from_utf8_lossy(&word)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn lexer(input: &[u8]) -> Lexer<Cursor<Vec<u8>>> {
        Lexer::new(Cursor::new(input.to_vec()))
    }

    fn kinds(input: &[u8]) -> Vec<TokenKind> {
        let mut lex = lexer(input);
        let mut out = Vec::new();
        loop {
            let token = lex.next_token().unwrap();
            if token.kind == TokenKind::Eof {
                return out;
            }
            out.push(token.kind);
        }
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds(b"123 -456 3.14 /Name"),
            vec![
                TokenKind::Integer(123),
                TokenKind::Integer(-456),
                TokenKind::Real(3.14),
                TokenKind::Name("Name".to_string()),
            ]
        );
    }

    #[test]
    fn test_keywords_not_booleans() {
        // true/false/null stay keywords at the token level
        assert_eq!(
            kinds(b"true false null R"),
            vec![
                TokenKind::Keyword(Keyword::True),
                TokenKind::Keyword(Keyword::False),
                TokenKind::Keyword(Keyword::Null),
                TokenKind::Keyword(Keyword::R),
            ]
        );
    }

    #[test]
    fn test_all_structural_keywords() {
        assert_eq!(
            kinds(b"obj endobj stream endstream xref trailer startxref n f"),
            vec![
                TokenKind::Keyword(Keyword::Obj),
                TokenKind::Keyword(Keyword::EndObj),
                TokenKind::Keyword(Keyword::Stream),
                TokenKind::Keyword(Keyword::EndStream),
                TokenKind::Keyword(Keyword::Xref),
                TokenKind::Keyword(Keyword::Trailer),
                TokenKind::Keyword(Keyword::StartXref),
                TokenKind::Keyword(Keyword::N),
                TokenKind::Keyword(Keyword::F),
            ]
        );
    }

    #[test]
    fn test_unknown_keyword_is_error() {
        let mut lex = lexer(b"frobnicate");
        let err = lex.next_token().unwrap_err();
        assert!(matches!(err, ParseError::SyntaxError { position: 0, .. }));
    }

    #[test]
    fn test_token_offsets() {
        let mut lex = lexer(b"  12 /A\n[");
        assert_eq!(lex.next_token().unwrap().offset, 2);
        assert_eq!(lex.next_token().unwrap().offset, 5);
        assert_eq!(lex.next_token().unwrap().offset, 8);
    }

    #[test]
    fn test_number_edge_cases() {
        assert_eq!(
            kinds(b"0 +123 -0 .5 5. -45.67"),
            vec![
                TokenKind::Integer(0),
                TokenKind::Integer(123),
                TokenKind::Integer(0),
                TokenKind::Real(0.5),
                TokenKind::Real(5.0),
                TokenKind::Real(-45.67),
            ]
        );
    }

    #[test]
    fn test_sign_without_digits_is_error() {
        assert!(lexer(b"- ").next_token().is_err());
        assert!(lexer(b". ").next_token().is_err());
    }

    #[test]
    fn test_integer_overflow_is_error() {
        assert!(lexer(b"92233720368547758080").next_token().is_err());
    }

    #[test]
    fn test_second_dot_starts_new_token() {
        assert_eq!(
            kinds(b"12.3.4"),
            vec![TokenKind::Real(12.3), TokenKind::Real(0.4)]
        );
    }

    #[test]
    fn test_literal_string_escapes() {
        assert_eq!(
            kinds(b"(Hello\\nWorld) (a\\(b\\)c) (back\\\\slash)"),
            vec![
                TokenKind::LiteralString(b"Hello\nWorld".to_vec()),
                TokenKind::LiteralString(b"a(b)c".to_vec()),
                TokenKind::LiteralString(b"back\\slash".to_vec()),
            ]
        );
    }

    #[test]
    fn test_literal_string_nesting_and_octal() {
        assert_eq!(
            kinds(b"(nested (parens) kept) (\\101\\102)"),
            vec![
                TokenKind::LiteralString(b"nested (parens) kept".to_vec()),
                TokenKind::LiteralString(b"AB".to_vec()),
            ]
        );
    }

    #[test]
    fn test_literal_string_line_continuation() {
        assert_eq!(
            kinds(b"(split\\\nline) (split\\\r\nline)"),
            vec![
                TokenKind::LiteralString(b"splitline".to_vec()),
                TokenKind::LiteralString(b"splitline".to_vec()),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_error() {
        assert!(lexer(b"(never closed").next_token().is_err());
    }

    #[test]
    fn test_hex_strings() {
        assert_eq!(
            kinds(b"<48656C6C6F> <48 65 6C> <>"),
            vec![
                TokenKind::HexString(b"Hello".to_vec()),
                TokenKind::HexString(b"Hel".to_vec()),
                TokenKind::HexString(Vec::new()),
            ]
        );
    }

    #[test]
    fn test_hex_string_odd_length_padded() {
        assert_eq!(
            kinds(b"<48656C6C6F2>"),
            vec![TokenKind::HexString(b"Hello ".to_vec())]
        );
    }

    #[test]
    fn test_hex_string_invalid_digit() {
        assert!(lexer(b"<48G0>").next_token().is_err());
    }

    #[test]
    fn test_dict_and_array_delimiters() {
        assert_eq!(
            kinds(b"<< /K [1] >>"),
            vec![
                TokenKind::DictOpen,
                TokenKind::Name("K".to_string()),
                TokenKind::ArrayOpen,
                TokenKind::Integer(1),
                TokenKind::ArrayClose,
                TokenKind::DictClose,
            ]
        );
    }

    #[test]
    fn test_lone_closing_angle_is_error() {
        assert!(lexer(b"> ").next_token().is_err());
    }

    #[test]
    fn test_name_hex_escapes() {
        assert_eq!(
            kinds(b"/A#20B /Name#2FSlash /"),
            vec![
                TokenKind::Name("A B".to_string()),
                TokenKind::Name("Name/Slash".to_string()),
                TokenKind::Name(String::new()),
            ]
        );
    }

    #[test]
    fn test_name_bad_hex_escape_is_error() {
        assert!(lexer(b"/A#G1").next_token().is_err());
    }

    #[test]
    fn test_comments_skipped_by_default() {
        assert_eq!(
            kinds(b"%one\n1 %two\r\n2"),
            vec![TokenKind::Integer(1), TokenKind::Integer(2)]
        );
    }

    #[test]
    fn test_comments_emitted_when_enabled() {
        let mut lex = lexer(b"%PDF-1.4\n42");
        lex.set_ignore_comments(false);
        assert_eq!(
            lex.next_token().unwrap().kind,
            TokenKind::Comment(b"PDF-1.4".to_vec())
        );
        assert_eq!(lex.next_token().unwrap().kind, TokenKind::Integer(42));
    }

    #[test]
    fn test_push_back_is_lifo() {
        let mut lex = lexer(b"1 2");
        let one = lex.next_token().unwrap();
        let two = lex.next_token().unwrap();
        lex.push_back(two);
        lex.push_back(one);
        assert_eq!(lex.next_token().unwrap().kind, TokenKind::Integer(1));
        assert_eq!(lex.next_token().unwrap().kind, TokenKind::Integer(2));
        assert_eq!(lex.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_seek_clears_push_back() {
        let mut lex = lexer(b"1 2 3");
        let one = lex.next_token().unwrap();
        lex.push_back(one);
        lex.seek(2).unwrap();
        assert_eq!(lex.next_token().unwrap().kind, TokenKind::Integer(2));
    }

    #[test]
    fn test_read_raw_bytes() {
        let mut lex = lexer(b"stream\nHELLO");
        assert_eq!(
            lex.next_token().unwrap().kind,
            TokenKind::Keyword(Keyword::Stream)
        );
        lex.read_stream_eol().unwrap();
        assert_eq!(lex.read_raw_bytes(5).unwrap(), b"HELLO");
    }

    #[test]
    fn test_read_xref_entry_space_terminated() {
        let mut lex = lexer(b"0000000017 00000 n \n");
        let token = lex.read_xref_entry(3).unwrap();
        match token.kind {
            TokenKind::XRefEntry(entry) => {
                assert_eq!(entry.id, 3);
                assert_eq!(entry.offset, 17);
                assert_eq!(entry.generation, 0);
                assert!(entry.in_use);
            }
            other => panic!("expected xref entry, got {other:?}"),
        }
    }

    #[test]
    fn test_read_xref_entry_crlf_terminated() {
        let mut lex = lexer(b"0000000000 65535 f\r\n");
        let token = lex.read_xref_entry(0).unwrap();
        match token.kind {
            TokenKind::XRefEntry(entry) => {
                assert_eq!(entry.generation, 65535);
                assert!(!entry.in_use);
            }
            other => panic!("expected xref entry, got {other:?}"),
        }
    }

    #[test]
    fn test_read_xref_entry_bad_marker() {
        let mut lex = lexer(b"0000000000 00000 x \n");
        let err = lex.read_xref_entry(0).unwrap_err();
        assert!(matches!(err, ParseError::InvalidXRef { .. }));
    }

    #[test]
    fn test_read_xref_entry_generation_overflow() {
        let mut lex = lexer(b"0000000000 99999 n \n");
        assert!(lex.read_xref_entry(0).is_err());
    }

    #[test]
    fn test_read_xref_entry_short_record() {
        let mut lex = lexer(b"0000000000 000");
        assert!(lex.read_xref_entry(0).is_err());
    }

    #[test]
    fn test_whitespace_set() {
        assert_eq!(
            kinds(b"\0\t\n\x0C\r 7"),
            vec![TokenKind::Integer(7)]
        );
    }

    #[test]
    fn test_tokenization_is_deterministic_with_monotonic_offsets() {
        let input: &[u8] = b"<< /K [1 0 R (s) <AF>] >> 3.5 %c\ntrailer";
        let run = |mut lex: Lexer<Cursor<Vec<u8>>>| {
            let mut tokens = Vec::new();
            loop {
                let token = lex.next_token().unwrap();
                if token.kind == TokenKind::Eof {
                    return tokens;
                }
                tokens.push(token);
            }
        };
        let first = run(lexer(input));
        let second = run(lexer(input));
        assert_eq!(first, second);
        for pair in first.windows(2) {
            assert!(pair[0].offset < pair[1].offset);
        }
    }

    #[test]
    fn test_eof_token_repeats() {
        let mut lex = lexer(b"");
        assert_eq!(lex.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(lex.next_token().unwrap().kind, TokenKind::Eof);
    }
}
