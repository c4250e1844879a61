//! Reference resolution
//!
//! The parser does not know where indirect objects live; it holds a
//! [`ReferenceResolver`] capability and invokes it when it needs the value
//! behind a reference mid-parse (a stream's `Length`). The resolver
//! receives the parser back and may re-enter it via
//! [`ObjectParser::parse_indirect_object`] with an offset; such nested
//! parses save and restore the cursor position.

use super::objects::{ObjectId, PdfObject};
use super::reader::ObjectParser;
use super::xref::XRefTable;
use super::ParseResult;
use log::{debug, warn};
use std::io::{Read, Seek};

/// Capability for turning `(object number, generation)` into an object.
///
/// Returning `Ok(None)` means the reference does not resolve; for a stream
/// `Length` the parser turns that into an error.
pub trait ReferenceResolver<R: Read + Seek> {
    fn resolve(
        &mut self,
        parser: &mut ObjectParser<R>,
        id: ObjectId,
    ) -> ParseResult<Option<PdfObject>>;
}

/// Adapter turning a closure into a [`ReferenceResolver`].
pub struct ResolverFn<F>(F);

impl<F> ResolverFn<F> {
    pub fn new(resolve: F) -> Self {
        ResolverFn(resolve)
    }
}

impl<R, F> ReferenceResolver<R> for ResolverFn<F>
where
    R: Read + Seek,
    F: FnMut(&mut ObjectParser<R>, ObjectId) -> ParseResult<Option<PdfObject>>,
{
    fn resolve(
        &mut self,
        parser: &mut ObjectParser<R>,
        id: ObjectId,
    ) -> ParseResult<Option<PdfObject>> {
        (self.0)(parser, id)
    }
}

/// Resolver backed by a cross-reference table: looks up the recorded byte
/// offset and re-enters the parser there.
#[derive(Debug, Clone)]
pub struct XRefResolver {
    table: XRefTable,
}

impl XRefResolver {
    pub fn new(table: XRefTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &XRefTable {
        &self.table
    }
}

impl<R: Read + Seek> ReferenceResolver<R> for XRefResolver {
    fn resolve(
        &mut self,
        parser: &mut ObjectParser<R>,
        id: ObjectId,
    ) -> ParseResult<Option<PdfObject>> {
        let entry = match self.table.get(id.number) {
            Some(entry) => *entry,
            None => return Ok(None),
        };
        if !entry.in_use || entry.generation != id.generation {
            return Ok(None);
        }

        debug!("resolving {id} R at offset {}", entry.offset);
        let indirect = match parser.parse_indirect_object(Some(entry.offset))? {
            Some(indirect) => indirect,
            None => return Ok(None),
        };
        if indirect.id != id {
            warn!(
                "cross-reference offset {} holds object {}, expected {}",
                entry.offset, indirect.id, id
            );
            return Ok(None);
        }
        Ok(Some(indirect.object))
    }
}
