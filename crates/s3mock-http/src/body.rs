//! Response body for the S3 service.
//!
//! Objects are held fully in memory by the backend, so every body is either a
//! buffered byte payload or empty.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body_util::Full;

/// S3 response body.
#[derive(Debug, Default)]
pub enum S3ResponseBody {
    /// Object bytes, XML documents and JSON health payloads.
    Buffered(Full<Bytes>),
    /// No content: bucket and object confirmations, `HEAD`, form uploads.
    #[default]
    Empty,
}

impl S3ResponseBody {
    /// Create a buffered body from bytes.
    #[must_use]
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self::Buffered(Full::new(data.into()))
    }

    /// Create an empty body.
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty
    }

    /// Create a buffered body from a static string.
    #[must_use]
    pub fn from_static(s: &'static str) -> Self {
        Self::Buffered(Full::new(Bytes::from_static(s.as_bytes())))
    }
}

impl http_body::Body for S3ResponseBody {
    type Data = Bytes;
    type Error = std::io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<http_body::Frame<Self::Data>, Self::Error>>> {
        match self.get_mut() {
            Self::Buffered(full) => Pin::new(full)
                .poll_frame(cx)
                .map_err(|never| match never {}),
            Self::Empty => Poll::Ready(None),
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            Self::Buffered(full) => full.is_end_stream(),
            Self::Empty => true,
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            Self::Buffered(full) => full.size_hint(),
            Self::Empty => http_body::SizeHint::with_exact(0),
        }
    }
}
