//! Form upload fields and file, as seen by the operation layer.
//!
//! The multipart parser in `s3mock-http` drives a [`FormVisitor`]; the
//! operation layer only ever sees the resulting [`FormUpload`], so policy
//! handling can be exercised without building multipart bodies.

use std::collections::HashMap;

use bytes::Bytes;

/// One file part of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Name of the form field carrying the file.
    pub field_name: String,
    /// Client-side file name, if given.
    pub file_name: Option<String>,
    /// Declared content type of the part, if given.
    pub content_type: Option<String>,
    /// File bytes.
    pub data: Bytes,
}

/// Receives the parts of a form submission in body order.
pub trait FormVisitor {
    /// Called for every plain field.
    fn on_field(&mut self, name: &str, value: &str);

    /// Called for every file part.
    fn on_file(&mut self, file: FilePart);
}

/// A collected form upload.
///
/// Only the first file part is kept. Fields arriving after it are ignored, so
/// the fields used for authorization are exactly those that preceded the file.
#[derive(Debug, Clone, Default)]
pub struct FormUpload {
    fields: HashMap<String, String>,
    file: Option<FilePart>,
}

impl FormUpload {
    /// Create an empty upload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All fields seen before the first file.
    #[must_use]
    pub fn fields(&self) -> &HashMap<String, String> {
        &self.fields
    }

    /// A single field value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The first file part, if any.
    #[must_use]
    pub fn file(&self) -> Option<&FilePart> {
        self.file.as_ref()
    }

    /// Split into fields and file.
    #[must_use]
    pub fn into_parts(self) -> (HashMap<String, String>, Option<FilePart>) {
        (self.fields, self.file)
    }
}

impl FormVisitor for FormUpload {
    fn on_field(&mut self, name: &str, value: &str) {
        if self.file.is_none() {
            self.fields.insert(name.to_owned(), value.to_owned());
        }
    }

    fn on_file(&mut self, file: FilePart) {
        if self.file.is_none() {
            self.file = Some(file);
        }
    }
}
