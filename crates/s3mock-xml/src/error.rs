//! The S3 error document.

use std::io;

use quick_xml::Writer;
use quick_xml::events::BytesText;
use s3mock_model::S3Error;

use crate::write_declaration;

/// Value written for the request and host identifiers of every error body.
pub const PLACEHOLDER_ID: &str = "not implemented";

/// Contents of an `<Error>` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error code, e.g. `Access Denied` or `NoSuchKey`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Request identifier.
    pub request_id: String,
    /// Host identifier.
    pub host_id: String,
}

impl ErrorResponse {
    /// Build an error body with placeholder identifiers.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            request_id: PLACEHOLDER_ID.to_owned(),
            host_id: PLACEHOLDER_ID.to_owned(),
        }
    }
}

impl From<&S3Error> for ErrorResponse {
    fn from(err: &S3Error) -> Self {
        Self::new(err.code.as_str(), err.message.as_str())
    }
}

/// Format an error as XML.
///
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message><RequestId>not implemented</RequestId><hostId>not implemented</hostId></Error>
/// ```
///
/// The host identifier element really is spelled `hostId`.
#[must_use]
pub fn format_error(error: &ErrorResponse) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);
    if let Err(e) = write_error_xml(&mut buf, error) {
        tracing::error!(error = %e, "failed to serialize S3 error XML");
        buf.clear();
    }
    buf
}

fn write_error_xml(buf: &mut Vec<u8>, error: &ErrorResponse) -> io::Result<()> {
    let mut writer = Writer::new(buf);
    write_declaration(&mut writer)?;

    writer.create_element("Error").write_inner_content(|w| {
        w.create_element("Code")
            .write_text_content(BytesText::new(&error.code))?;
        w.create_element("Message")
            .write_text_content(BytesText::new(&error.message))?;
        w.create_element("RequestId")
            .write_text_content(BytesText::new(&error.request_id))?;
        w.create_element("hostId")
            .write_text_content(BytesText::new(&error.host_id))?;
        Ok(())
    })?;

    Ok(())
}
