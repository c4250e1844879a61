//! # papyr
//!
//! The parsing core of a PDF reader: tokenizer, object parser, and classic
//! cross-reference table reader over any seekable byte source.
//!
//! ## What this crate does
//!
//! - **Tokenization**: a pull-based lexer over PDF 1.x syntax with token
//!   push-back for lookahead, byte offsets on every token, and raw-byte
//!   reads for stream payloads
//! - **Object parsing**: the full PDF object algebra (names, strings,
//!   numbers, arrays, dictionaries, streams, references) with probe
//!   semantics that distinguish "no object here" from failure
//! - **Cross-reference tables**: classic `xref` sections and trailer
//!   dictionaries, plus `startxref` discovery at the end of the file
//! - **Lazy resolution**: a resolver capability lets a surrounding
//!   document layer satisfy indirect references (a stream's `/Length`)
//!   mid-parse, re-entering the parser at a recorded offset
//!
//! Stream payloads are returned raw. Filters, encryption, incremental
//! update assembly, and the document object model are outer layers built
//! on top of this crate.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use papyr::parser::{ObjectParser, PdfTrailer, XRefResolver, XRefTable};
//! use std::fs::File;
//!
//! # fn main() -> Result<(), papyr::ParseError> {
//! let file = File::open("document.pdf")?;
//! let mut parser = ObjectParser::new(file);
//!
//! let header = parser.parse_header()?;
//! println!("PDF version {}", header.version);
//!
//! // Locate and read the cross-reference table and trailer
//! let xref_offset = parser.parse_xref_offset()?;
//! let entries = parser.parse_xref(Some(xref_offset))?;
//! let trailer = PdfTrailer::from_dict(parser.parse_trailer()?, xref_offset);
//!
//! // Dereference the document catalog
//! let table = XRefTable::from_entries(entries);
//! let root = trailer.root()?;
//! let offset = table.get(root.number).map(|entry| entry.offset);
//! parser.set_resolver(Box::new(XRefResolver::new(table)));
//! if let Some(offset) = offset {
//!     let catalog = parser.parse_indirect_object(Some(offset))?;
//!     println!("catalog: {catalog:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod parser;

pub use parser::{
    ByteCursor, IndirectObject, Keyword, Lexer, ObjectId, ObjectParser, ParseError, ParseResult,
    PdfArray, PdfDictionary, PdfHeader, PdfName, PdfObject, PdfStream, PdfString, PdfTrailer,
    PdfVersion, ReferenceResolver, ResolverFn, StringKind, Token, TokenKind, XRefEntry,
    XRefResolver, XRefTable,
};
