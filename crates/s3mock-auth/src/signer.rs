//! AWS Signature Version 2 signing and verification.
//!
//! The `Authorization` header has the format:
//!
//! ```text
//! AWS <AWSAccessKeyId>:<Signature>
//! ```
//!
//! Where `Signature = Base64(HMAC-SHA1(SecretKey, StringToSign))` and:
//!
//! ```text
//! StringToSign = HTTP-Verb + "\n" +
//!                Content-MD5 + "\n" +
//!                Content-Type + "\n" +
//!                "" + "\n" +
//!                [CanonicalizedAmzHeaders + "\n"] +
//!                CanonicalizedResource
//! ```
//!
//! The Date slot is always signed as an empty string. Clients of this server
//! send their timestamp in `x-amz-date`, which is covered by the vendor header
//! block instead.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, KeyInit, Mac};
use percent_encoding::percent_decode_str;
use sha1::Sha1;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::AuthError;

type HmacSha1 = Hmac<Sha1>;

/// Prefix of the vendor headers that participate in signing.
const AMZ_HEADER_PREFIX: &str = "x-amz-";

/// Query parameters signed with their raw, still-encoded value.
const SUB_RESOURCES: &[&str] = &[
    "acl",
    "cors",
    "delete",
    "lifecycle",
    "location",
    "logging",
    "notification",
    "partNumber",
    "policy",
    "requestPayment",
    "restore",
    "tagging",
    "torrent",
    "uploadId",
    "uploads",
    "versionId",
    "versioning",
    "versions",
    "website",
];

/// Query parameters signed with their percent-decoded value.
const RESPONSE_OVERRIDES: &[&str] = &[
    "response-cache-control",
    "response-content-disposition",
    "response-content-encoding",
    "response-content-language",
    "response-content-type",
    "response-expires",
];

/// Builds the SigV2 string to sign for one request.
///
/// A signer borrows the request head and holds no other state, so building the
/// string twice for the same request always yields the same result.
#[derive(Debug, Clone, Copy)]
pub struct Signer<'a> {
    parts: &'a http::request::Parts,
    virtual_bucket: Option<&'a str>,
}

impl<'a> Signer<'a> {
    /// Create a signer for a path-style request.
    #[must_use]
    pub fn new(parts: &'a http::request::Parts) -> Self {
        Self {
            parts,
            virtual_bucket: None,
        }
    }

    /// Mark the request as virtual-host addressed, with the bucket taken from
    /// the `Host` header. The bucket is prefixed to the canonicalized resource.
    #[must_use]
    pub fn with_virtual_bucket(mut self, bucket: Option<&'a str>) -> Self {
        self.virtual_bucket = bucket;
        self
    }

    /// Build the string to sign.
    #[must_use]
    pub fn string_to_sign(&self) -> String {
        let mut lines: Vec<String> = vec![
            self.parts.method.as_str().to_owned(),
            header_value(self.parts, "content-md5"),
            header_value(self.parts, "content-type"),
            String::new(),
        ];

        let amz_headers = canonicalized_amz_headers(self.parts);
        if !amz_headers.is_empty() {
            lines.push(amz_headers);
        }

        lines.push(canonicalized_resource(self.parts, self.virtual_bucket));
        lines.join("\n")
    }

    /// Compute the full `Authorization` header value for this request.
    #[must_use]
    pub fn authorization(&self, credentials: &Credentials) -> String {
        let signature = sign(credentials.secret_access_key(), &self.string_to_sign());
        format!("AWS {}:{signature}", credentials.access_key_id())
    }
}

/// Compute `Base64(HMAC-SHA1(secret, string_to_sign))`.
#[must_use]
pub fn sign(secret: &str, string_to_sign: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(secret.as_bytes()).expect("HMAC can accept any key length");
    mac.update(string_to_sign.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Verify the `Authorization` header of a request against the server's credentials.
///
/// The expected header is recomputed from the request and compared with the
/// provided one in constant time.
///
/// # Errors
///
/// Returns [`AuthError::MissingAuthHeader`] when the header is absent,
/// [`AuthError::InvalidAuthHeader`] when it is not valid ASCII, and
/// [`AuthError::SignatureDoesNotMatch`] on any mismatch.
pub fn verify_authorization(
    parts: &http::request::Parts,
    virtual_bucket: Option<&str>,
    credentials: &Credentials,
) -> Result<(), AuthError> {
    let provided = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let signer = Signer::new(parts).with_virtual_bucket(virtual_bucket);
    let string_to_sign = signer.string_to_sign();
    debug!(string_to_sign = ?string_to_sign, "Built SigV2 string to sign");

    let expected = signer.authorization(credentials);

    if provided.as_bytes().ct_eq(expected.as_bytes()).into() {
        debug!(access_key_id = %credentials.access_key_id(), "SigV2 verification succeeded");
        Ok(())
    } else {
        debug!(expected = %expected, provided = %provided, "SigV2 signature mismatch");
        Err(AuthError::SignatureDoesNotMatch)
    }
}

/// Build the CanonicalizedAmzHeaders block, without a trailing newline.
///
/// Header names in an `http::HeaderMap` are already lower-cased. Values keep
/// their case; repeated headers are joined with `,`.
fn canonicalized_amz_headers(parts: &http::request::Parts) -> String {
    let mut amz_headers: BTreeMap<&str, Vec<String>> = BTreeMap::new();

    for (name, value) in &parts.headers {
        let name = name.as_str();
        if name.starts_with(AMZ_HEADER_PREFIX) {
            amz_headers
                .entry(name)
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }
    }

    amz_headers
        .iter()
        .map(|(name, values)| format!("{name}:{}", values.join(",")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the CanonicalizedResource: optional virtual-host bucket, the path, and
/// the whitelisted query parameters sorted by name.
fn canonicalized_resource(parts: &http::request::Parts, virtual_bucket: Option<&str>) -> String {
    let mut resource = String::new();
    if let Some(bucket) = virtual_bucket {
        resource.push('/');
        resource.push_str(bucket);
    }
    resource.push_str(parts.uri.path());

    let Some(query) = parts.uri.query().filter(|q| !q.is_empty()) else {
        return resource;
    };

    let mut params: Vec<(&str, Option<String>)> = query
        .split('&')
        .filter_map(|pair| {
            let (name, value) = match pair.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (pair, None),
            };
            if SUB_RESOURCES.contains(&name) {
                Some((name, value.map(str::to_owned)))
            } else if RESPONSE_OVERRIDES.contains(&name) {
                let decoded = value.map(|v| percent_decode_str(v).decode_utf8_lossy().into_owned());
                Some((name, decoded))
            } else {
                None
            }
        })
        .collect();

    if params.is_empty() {
        return resource;
    }

    // `sort_by` is stable, so repeated names keep their request order.
    params.sort_by(|a, b| a.0.cmp(b.0));

    let rendered: Vec<String> = params
        .into_iter()
        .map(|(name, value)| match value {
            Some(value) => format!("{name}={value}"),
            None => name.to_owned(),
        })
        .collect();

    resource.push('?');
    resource.push_str(&rendered.join("&"));
    resource
}

/// Extract a header value as a string, returning an empty string if missing.
fn header_value(parts: &http::request::Parts, name: &str) -> String {
    parts
        .headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}
