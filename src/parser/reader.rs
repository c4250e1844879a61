//! PDF Object Parser
//!
//! Consumes tokens and produces PDF object values according to ISO 32000-1
//! Section 7.3, plus the structural operations around them: the header
//! line, indirect objects with stream payloads, classic cross-reference
//! tables, and the trailer dictionary.
//!
//! Two return shapes matter throughout: `Err` is a fatal failure of the
//! current operation, while `Ok(None)` is a probe miss ("no object here")
//! after which every consumed token has been pushed back, so the caller
//! can read the same tokens again.

use super::header::{self, PdfHeader};
use super::lexer::{Keyword, Lexer, Token, TokenKind};
use super::objects::{
    IndirectObject, ObjectId, PdfArray, PdfDictionary, PdfName, PdfObject, PdfStream, PdfString,
};
use super::resolver::ReferenceResolver;
use super::xref::{self, XRefEntry};
use super::{ParseError, ParseResult};
use log::debug;
use std::io::{Read, Seek};

/// Token-to-object parser over a seekable input.
pub struct ObjectParser<R: Read + Seek> {
    lexer: Lexer<R>,
    resolver: Option<Box<dyn ReferenceResolver<R>>>,
}

impl<R: Read + Seek> ObjectParser<R> {
    /// Create a parser with no reference resolver. Streams whose `Length`
    /// is an indirect reference will fail to parse until one is set.
    pub fn new(input: R) -> Self {
        Self {
            lexer: Lexer::new(input),
            resolver: None,
        }
    }

    /// Create a parser that resolves references through `resolver`.
    pub fn with_resolver(input: R, resolver: Box<dyn ReferenceResolver<R>>) -> Self {
        Self {
            lexer: Lexer::new(input),
            resolver: Some(resolver),
        }
    }

    /// Install or replace the reference resolver.
    pub fn set_resolver(&mut self, resolver: Box<dyn ReferenceResolver<R>>) {
        self.resolver = Some(resolver);
    }

    /// Current byte offset of the underlying cursor.
    pub fn position(&self) -> u64 {
        self.lexer.position()
    }

    /// Direct access to the tokenizer, for collaborators that mix token
    /// and object level reads.
    pub fn lexer_mut(&mut self) -> &mut Lexer<R> {
        &mut self.lexer
    }

    /// Read the `%PDF-M.N` header line (and the binary-marker comment, if
    /// present). Comment tokens are emitted only for the duration of this
    /// call.
    pub fn parse_header(&mut self) -> ParseResult<PdfHeader> {
        header::read_header(&mut self.lexer)
    }

    /// Locate the cross-reference offset recorded before `%%EOF` at the
    /// end of the input.
    pub fn parse_xref_offset(&mut self) -> ParseResult<u64> {
        self.lexer.find_startxref_offset()
    }

    /// Parse a classic cross-reference table: the `xref` keyword followed
    /// by one or more sections. Stops at the `trailer` keyword, which is
    /// pushed back for [`ObjectParser::parse_trailer`].
    pub fn parse_xref(&mut self, at: Option<u64>) -> ParseResult<Vec<XRefEntry>> {
        if let Some(offset) = at {
            self.lexer.seek(offset)?;
        }
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Keyword(Keyword::Xref) => {}
            TokenKind::Eof => {
                return Err(ParseError::UnexpectedEof {
                    position: token.offset,
                })
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    position: token.offset,
                    expected: "'xref'".to_string(),
                    found: other.describe(),
                })
            }
        }
        self.parse_xref_sections()
    }

    /// Parse cross-reference sections with the `xref` keyword already
    /// consumed, up to (but not consuming) the `trailer` keyword.
    pub fn parse_xref_sections(&mut self) -> ParseResult<Vec<XRefEntry>> {
        xref::read_sections(&mut self.lexer)
    }

    /// Parse the `trailer` keyword followed by the trailer dictionary.
    pub fn parse_trailer(&mut self) -> ParseResult<PdfDictionary> {
        let token = self.lexer.next_token()?;
        let trailer_offset = token.offset;
        match token.kind {
            TokenKind::Keyword(Keyword::Trailer) => {}
            TokenKind::Eof => {
                return Err(ParseError::UnexpectedEof {
                    position: token.offset,
                })
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    position: token.offset,
                    expected: "'trailer'".to_string(),
                    found: other.describe(),
                })
            }
        }
        match self.parse_object()? {
            Some(PdfObject::Dictionary(dict)) => Ok(dict),
            Some(other) => Err(ParseError::UnexpectedToken {
                position: trailer_offset,
                expected: "trailer dictionary".to_string(),
                found: other.type_name().to_string(),
            }),
            None => {
                let token = self.lexer.next_token()?;
                Err(ParseError::UnexpectedToken {
                    position: token.offset,
                    expected: "trailer dictionary".to_string(),
                    found: token.kind.describe(),
                })
            }
        }
    }

    /// Parse an indirect object, optionally at an explicit byte offset.
    ///
    /// With `at`, the cursor position and push-back stack are saved and
    /// restored around the nested parse, so a resolver may call this from
    /// the middle of another parse. Returns `Ok(None)` (a probe miss,
    /// with all tokens pushed back) when the input at hand is not an
    /// `<id> <gen> obj` header. On error the cursor stays at the failing
    /// token.
    pub fn parse_indirect_object(
        &mut self,
        at: Option<u64>,
    ) -> ParseResult<Option<IndirectObject>> {
        match at {
            Some(offset) => {
                let state = self.lexer.save_state();
                self.lexer.seek(offset)?;
                let parsed = self.parse_indirect_object_here()?;
                self.lexer.restore_state(state)?;
                Ok(parsed)
            }
            None => self.parse_indirect_object_here(),
        }
    }

    fn parse_indirect_object_here(&mut self) -> ParseResult<Option<IndirectObject>> {
        // Probe for the `<id> <gen> obj` triple. On any mismatch, push
        // everything back in reverse so the next reads replay source order.
        let first = self.lexer.next_token()?;
        let number = match first.kind {
            TokenKind::Integer(number) => number,
            other => {
                self.lexer.push_back(Token {
                    offset: first.offset,
                    kind: other,
                });
                return Ok(None);
            }
        };

        let second = self.lexer.next_token()?;
        let generation = match second.kind {
            TokenKind::Integer(generation) => generation,
            other => {
                self.lexer.push_back(Token {
                    offset: second.offset,
                    kind: other,
                });
                self.lexer.push_back(Token {
                    offset: first.offset,
                    kind: TokenKind::Integer(number),
                });
                return Ok(None);
            }
        };

        let third = self.lexer.next_token()?;
        match third.kind {
            TokenKind::Keyword(Keyword::Obj) => {}
            other => {
                self.lexer.push_back(Token {
                    offset: third.offset,
                    kind: other,
                });
                self.lexer.push_back(Token {
                    offset: second.offset,
                    kind: TokenKind::Integer(generation),
                });
                self.lexer.push_back(Token {
                    offset: first.offset,
                    kind: TokenKind::Integer(number),
                });
                return Ok(None);
            }
        }

        let number = u32::try_from(number).map_err(|_| ParseError::SyntaxError {
            position: first.offset,
            message: format!("object number {number} out of range"),
        })?;
        let generation = u16::try_from(generation).map_err(|_| ParseError::SyntaxError {
            position: second.offset,
            message: format!("generation number {generation} out of range"),
        })?;
        let id = ObjectId::new(number, generation);

        let body = match self.parse_object()? {
            Some(body) => body,
            None => {
                let token = self.lexer.next_token()?;
                return Err(ParseError::UnexpectedToken {
                    position: token.offset,
                    expected: "indirect object body".to_string(),
                    found: token.kind.describe(),
                });
            }
        };

        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Keyword(Keyword::EndObj) => Ok(Some(IndirectObject { id, object: body })),
            TokenKind::Keyword(Keyword::Stream) => {
                let dict = match body {
                    PdfObject::Dictionary(dict) => dict,
                    other => {
                        return Err(ParseError::UnexpectedToken {
                            position: token.offset,
                            expected: "dictionary before 'stream'".to_string(),
                            found: other.type_name().to_string(),
                        })
                    }
                };
                let data = self.read_stream_payload(&dict, token.offset)?;
                self.expect_keyword(Keyword::EndObj)?;
                Ok(Some(IndirectObject {
                    id,
                    object: PdfObject::Stream(PdfStream { dict, data }),
                }))
            }
            TokenKind::Eof => Err(ParseError::UnexpectedEof {
                position: token.offset,
            }),
            other => Err(ParseError::UnexpectedToken {
                position: token.offset,
                expected: "'endobj' or 'stream'".to_string(),
                found: other.describe(),
            }),
        }
    }

    /// Parse one object value.
    ///
    /// Returns `Ok(None)` when the next token does not begin an object;
    /// the token is pushed back so the caller can inspect it.
    pub fn parse_object(&mut self) -> ParseResult<Option<PdfObject>> {
        let Token { offset, kind } = self.lexer.next_token()?;
        let object = match kind {
            TokenKind::Name(name) => PdfObject::Name(PdfName(name)),
            TokenKind::LiteralString(bytes) => PdfObject::String(PdfString::literal(bytes)),
            TokenKind::HexString(bytes) => PdfObject::String(PdfString::hexadecimal(bytes)),
            TokenKind::Keyword(Keyword::True) => PdfObject::Boolean(true),
            TokenKind::Keyword(Keyword::False) => PdfObject::Boolean(false),
            TokenKind::Keyword(Keyword::Null) => PdfObject::Null,
            TokenKind::Real(value) => PdfObject::Real(value),
            TokenKind::Integer(value) => return self.integer_or_reference(value).map(Some),
            TokenKind::ArrayOpen => return self.parse_array().map(Some),
            TokenKind::DictOpen => return self.parse_dictionary().map(Some),
            other => {
                self.lexer.push_back(Token {
                    offset,
                    kind: other,
                });
                return Ok(None);
            }
        };
        Ok(Some(object))
    }

    /// Disambiguate an integer from a reference by looking ahead for
    /// `<gen> R`. The lookahead never commits a partial read: on mismatch
    /// both speculative tokens are pushed back.
    fn integer_or_reference(&mut self, value: i64) -> ParseResult<PdfObject> {
        let second = self.lexer.next_token()?;
        let generation = match second.kind {
            TokenKind::Integer(generation) => generation,
            other => {
                self.lexer.push_back(Token {
                    offset: second.offset,
                    kind: other,
                });
                return Ok(PdfObject::Integer(value));
            }
        };

        let third = self.lexer.next_token()?;
        if matches!(third.kind, TokenKind::Keyword(Keyword::R)) {
            if let (Ok(number), Ok(generation)) =
                (u32::try_from(value), u16::try_from(generation))
            {
                return Ok(PdfObject::Reference(ObjectId::new(number, generation)));
            }
            // Out-of-range id or generation: not textually a reference.
        }
        self.lexer.push_back(third);
        self.lexer.push_back(Token {
            offset: second.offset,
            kind: TokenKind::Integer(generation),
        });
        Ok(PdfObject::Integer(value))
    }

    /// Collect elements until a child parse reports "no object here", then
    /// require the `]` that caused it.
    fn parse_array(&mut self) -> ParseResult<PdfObject> {
        let mut array = PdfArray::new();
        while let Some(element) = self.parse_object()? {
            array.push(element);
        }
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::ArrayClose => Ok(PdfObject::Array(array)),
            TokenKind::Eof => Err(ParseError::UnexpectedEof {
                position: token.offset,
            }),
            other => Err(ParseError::UnexpectedToken {
                position: token.offset,
                expected: "']'".to_string(),
                found: other.describe(),
            }),
        }
    }

    /// Collect key/value pairs until a child parse reports "no object
    /// here", then require the `>>` that caused it. Keys must be names;
    /// a key without a value is an error. Later duplicates overwrite.
    fn parse_dictionary(&mut self) -> ParseResult<PdfObject> {
        let mut dict = PdfDictionary::new();
        loop {
            let key_offset = self.lexer.position();
            let key = match self.parse_object()? {
                None => break,
                Some(PdfObject::Name(name)) => name,
                Some(other) => {
                    return Err(ParseError::UnexpectedToken {
                        position: key_offset,
                        expected: "name as dictionary key".to_string(),
                        found: other.type_name().to_string(),
                    })
                }
            };
            let value = match self.parse_object()? {
                Some(value) => value,
                None => {
                    let token = self.lexer.next_token()?;
                    return Err(ParseError::UnexpectedToken {
                        position: token.offset,
                        expected: format!("value for dictionary key /{}", key.as_str()),
                        found: token.kind.describe(),
                    });
                }
            };
            dict.0.insert(key, value);
        }
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::DictClose => Ok(PdfObject::Dictionary(dict)),
            TokenKind::Eof => Err(ParseError::UnexpectedEof {
                position: token.offset,
            }),
            other => Err(ParseError::UnexpectedToken {
                position: token.offset,
                expected: "'>>'".to_string(),
                found: other.describe(),
            }),
        }
    }

    /// Read a stream payload: resolve `Length`, consume the single EOL
    /// after the `stream` keyword, take exactly `Length` raw bytes, and
    /// require `endstream`.
    fn read_stream_payload(
        &mut self,
        dict: &PdfDictionary,
        stream_offset: u64,
    ) -> ParseResult<Vec<u8>> {
        let length = match dict.get("Length") {
            Some(PdfObject::Integer(length)) => *length,
            Some(PdfObject::Reference(id)) => {
                let resolved = self.resolve_reference(*id, stream_offset)?;
                match resolved {
                    PdfObject::Integer(length) => length,
                    other => {
                        return Err(ParseError::InvalidStream {
                            position: stream_offset,
                            message: format!(
                                "/Length reference resolved to {}, expected integer",
                                other.type_name()
                            ),
                        })
                    }
                }
            }
            Some(other) => {
                return Err(ParseError::InvalidStream {
                    position: stream_offset,
                    message: format!(
                        "/Length must be an integer or reference, found {}",
                        other.type_name()
                    ),
                })
            }
            None => {
                return Err(ParseError::MissingKey {
                    position: stream_offset,
                    key: "Length".to_string(),
                })
            }
        };
        let length = usize::try_from(length).map_err(|_| ParseError::InvalidStream {
            position: stream_offset,
            message: format!("/Length {length} is negative"),
        })?;

        self.lexer.read_stream_eol()?;
        debug!(
            "reading {length} stream payload bytes at offset {}",
            self.lexer.position()
        );
        let data = self.lexer.read_raw_bytes(length)?;
        self.expect_keyword(Keyword::EndStream)?;
        Ok(data)
    }

    /// Invoke the resolver capability for `id`. The resolver is moved out
    /// of the parser for the duration of the call so it can re-enter.
    fn resolve_reference(&mut self, id: ObjectId, position: u64) -> ParseResult<PdfObject> {
        let mut resolver = self
            .resolver
            .take()
            .ok_or(ParseError::UnresolvedReference { position, id })?;
        let outcome = resolver.resolve(self, id);
        self.resolver = Some(resolver);
        outcome?.ok_or(ParseError::UnresolvedReference { position, id })
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> ParseResult<()> {
        let token = self.lexer.next_token()?;
        match token.kind {
            TokenKind::Keyword(found) if found == keyword => Ok(()),
            TokenKind::Eof => Err(ParseError::UnexpectedEof {
                position: token.offset,
            }),
            other => Err(ParseError::UnexpectedToken {
                position: token.offset,
                expected: format!("'{}'", keyword.as_str()),
                found: other.describe(),
            }),
        }
    }
}
