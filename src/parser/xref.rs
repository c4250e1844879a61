//! PDF Cross-Reference Table Reader
//!
//! Reads classic cross-reference tables according to ISO 32000-1 Section
//! 7.5.4: sections of fixed-width 20-byte records preceded by a
//! `<first id> <count>` header, terminated by the `trailer` keyword.
//! Cross-reference streams (PDF 1.5+) are not handled here.

use super::lexer::{Keyword, Lexer, TokenKind};
use super::{ParseError, ParseResult};
use log::debug;
use std::collections::HashMap;
use std::io::{Read, Seek};

/// One cross-reference record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRefEntry {
    /// Object number the record describes
    pub id: u32,
    /// Byte offset of the object in the file (for in-use entries)
    pub offset: u64,
    /// Generation number
    pub generation: u16,
    /// `n` records are in use, `f` records are free
    pub in_use: bool,
}

/// Cross-reference index combining the entries of one or more sections.
///
/// `add_entry` keeps the first record seen for an object number, so a
/// caller feeding sections newest-first gets incremental-update semantics.
#[derive(Debug, Clone, Default)]
pub struct XRefTable {
    entries: HashMap<u32, XRefEntry>,
}

impl XRefTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = XRefEntry>) -> Self {
        let mut table = Self::new();
        for entry in entries {
            table.add_entry(entry);
        }
        table
    }

    /// Record an entry unless the object number is already present.
    pub fn add_entry(&mut self, entry: XRefEntry) {
        self.entries.entry(entry.id).or_insert(entry);
    }

    pub fn get(&self, id: u32) -> Option<&XRefEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &XRefEntry> {
        self.entries.values()
    }
}

/// Read cross-reference sections from a tokenizer positioned just past the
/// `xref` keyword, up to (but not consuming) the `trailer` keyword, which
/// is pushed back for the caller.
pub(crate) fn read_sections<R: Read + Seek>(lexer: &mut Lexer<R>) -> ParseResult<Vec<XRefEntry>> {
    let mut entries = Vec::new();

    loop {
        let token = lexer.next_token()?;
        let first = match token.kind {
            TokenKind::Keyword(Keyword::Trailer) => {
                lexer.push_back(token);
                break;
            }
            TokenKind::Integer(first) => {
                u32::try_from(first).map_err(|_| ParseError::InvalidXRef {
                    position: token.offset,
                    message: format!("section start {first} out of range"),
                })?
            }
            TokenKind::Eof => {
                return Err(ParseError::UnexpectedEof {
                    position: token.offset,
                })
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    position: token.offset,
                    expected: "cross-reference section header or 'trailer'".to_string(),
                    found: other.describe(),
                })
            }
        };

        let token = lexer.next_token()?;
        let count = match token.kind {
            TokenKind::Integer(count) => {
                u32::try_from(count).map_err(|_| ParseError::InvalidXRef {
                    position: token.offset,
                    message: format!("section entry count {count} out of range"),
                })?
            }
            TokenKind::Eof => {
                return Err(ParseError::UnexpectedEof {
                    position: token.offset,
                })
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    position: token.offset,
                    expected: "cross-reference section entry count".to_string(),
                    found: other.describe(),
                })
            }
        };

        debug!("cross-reference section: first id {first}, {count} entries");
        let count_offset = token.offset;
        for index in 0..count {
            let id = first.checked_add(index).ok_or_else(|| ParseError::InvalidXRef {
                position: count_offset,
                message: format!("entry id overflow: {first} + {index}"),
            })?;
            let token = lexer.read_xref_entry(id)?;
            match token.kind {
                TokenKind::XRefEntry(entry) => entries.push(entry),
                other => {
                    return Err(ParseError::UnexpectedToken {
                        position: token.offset,
                        expected: "cross-reference record".to_string(),
                        found: other.describe(),
                    })
                }
            }
        }
    }

    Ok(entries)
}
