//! S3 XML response formatting for S3Mock.
//!
//! The emulator only ever writes two documents: the flat `<Error>` body and the
//! `<ListAllMyBucketsResult>` bucket listing. Both are produced by pure
//! functions returning the serialized bytes.
//!
//! # Conventions
//!
//! - Every document starts with `<?xml version="1.0" encoding="UTF-8"?>` followed
//!   by a newline.
//! - No indentation between elements.
//! - Listing namespace: `http://s3.amazonaws.com/doc/2006-03-01/`.
//! - There is no content negotiation; responses are XML regardless of `Accept`.

pub mod error;
pub mod list;

pub use error::{ErrorResponse, PLACEHOLDER_ID, format_error};
pub use list::{S3_NAMESPACE, format_bucket_list};

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

/// Write the XML declaration and the newline that follows it.
pub(crate) fn write_declaration<W: io::Write>(writer: &mut Writer<W>) -> io::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
    Ok(())
}
