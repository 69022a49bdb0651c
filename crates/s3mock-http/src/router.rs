//! Operation routing.
//!
//! The operation is chosen from the HTTP method and the shape of the
//! normalized request path:
//!
//! | Method | `/` | `/{bucket}` | `/{bucket}/{key}` |
//! |--------|-----|-------------|-------------------|
//! | `GET` | `ListBuckets` | - | `GetObject` |
//! | `HEAD` | - | - | `HeadObject` |
//! | `PUT` | `CreateBucket` | `CreateBucket` | `PutObject` |
//! | `DELETE` | `DeleteBucket` | `DeleteBucket` | `DeleteObject` |
//! | `POST` | `PostObject` | `PostObject` | `PostObject` |
//!
//! Combinations marked `-` are answered with `405 MethodNotAllowed`. Routes
//! whose bucket segment is empty still resolve; the operation layer rejects
//! them with `Bucket name required`.

use http::Method;
use s3mock_model::{ParsedResource, S3Error, S3Operation};

use crate::resource::{decode_uri_component, extract_virtual_host_bucket, normalize, parse_resource};

/// Shape of a request path after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathShape {
    /// Nothing left after trimming.
    Root,
    /// A single segment.
    Bucket,
    /// Two or more segments.
    Object,
}

impl PathShape {
    /// Classify a raw request target.
    #[must_use]
    pub fn of(raw: &str) -> Self {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            Self::Root
        } else if normalized.contains('/') {
            Self::Object
        } else {
            Self::Bucket
        }
    }
}

/// Everything the dispatcher needs to know about a routed request.
#[derive(Debug, Clone)]
pub struct RoutingContext {
    /// The identified operation.
    pub operation: S3Operation,
    /// Bucket and key parsed from the request target.
    pub resource: ParsedResource,
    /// Bucket taken from the `Host` header, when virtual-hosted.
    pub virtual_bucket: Option<String>,
    /// Decoded query parameters in request order.
    pub query_params: Vec<(String, String)>,
}

impl RoutingContext {
    /// First value of a query parameter.
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Resolves requests to operations.
#[derive(Debug, Clone)]
pub struct S3Router {
    domain: String,
    virtual_hosting: bool,
}

impl S3Router {
    /// Create a router for the given virtual-hosting domain.
    #[must_use]
    pub fn new(domain: impl Into<String>, virtual_hosting: bool) -> Self {
        Self {
            domain: domain.into(),
            virtual_hosting,
        }
    }

    /// Bucket addressed through the `Host` header, if virtual hosting is on.
    #[must_use]
    pub fn virtual_bucket(&self, headers: &http::HeaderMap) -> Option<String> {
        if self.virtual_hosting {
            extract_virtual_host_bucket(headers, &self.domain)
        } else {
            None
        }
    }

    /// Resolve a request.
    ///
    /// A virtual-hosted request is routed as if its bucket were the first
    /// path segment.
    ///
    /// # Errors
    ///
    /// Returns `MethodNotAllowed` when no route matches the method and path.
    pub fn resolve(&self, parts: &http::request::Parts) -> Result<RoutingContext, S3Error> {
        let virtual_bucket = self.virtual_bucket(&parts.headers);
        let target = match &virtual_bucket {
            Some(bucket) => {
                let path_and_query = parts
                    .uri
                    .path_and_query()
                    .map_or("/", http::uri::PathAndQuery::as_str);
                format!("/{bucket}{path_and_query}")
            }
            None => parts.uri.to_string(),
        };

        let operation = identify_operation(&parts.method, PathShape::of(&target))?;
        Ok(RoutingContext {
            operation,
            resource: parse_resource(&target),
            virtual_bucket,
            query_params: parse_query_params(parts.uri.query()),
        })
    }
}

/// Map a method and path shape to an operation.
///
/// # Errors
///
/// Returns `MethodNotAllowed` for combinations without a route.
pub fn identify_operation(method: &Method, shape: PathShape) -> Result<S3Operation, S3Error> {
    let operation = match (method, shape) {
        (&Method::GET, PathShape::Root) => S3Operation::ListBuckets,
        (&Method::GET, PathShape::Object) => S3Operation::GetObject,
        (&Method::HEAD, PathShape::Object) => S3Operation::HeadObject,
        (&Method::PUT, PathShape::Root | PathShape::Bucket) => S3Operation::CreateBucket,
        (&Method::PUT, PathShape::Object) => S3Operation::PutObject,
        (&Method::DELETE, PathShape::Root | PathShape::Bucket) => S3Operation::DeleteBucket,
        (&Method::DELETE, PathShape::Object) => S3Operation::DeleteObject,
        (&Method::POST, _) => S3Operation::PostObject,
        _ => return Err(S3Error::method_not_allowed(method)),
    };
    Ok(operation)
}

/// Parse a query string into decoded key/value pairs.
///
/// A parameter without `=` gets an empty value.
#[must_use]
pub fn parse_query_params(query: Option<&str>) -> Vec<(String, String)> {
    let Some(query) = query else {
        return Vec::new();
    };

    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (
                decode_uri_component(&k.replace('+', " ")),
                decode_uri_component(&v.replace('+', " ")),
            )
        })
        .collect()
}
