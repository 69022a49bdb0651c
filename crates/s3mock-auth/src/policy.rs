//! POST policy authorization for browser form uploads.
//!
//! A form upload carries no `Authorization` header. Instead the client embeds a
//! base64 policy document and its signature as form fields:
//!
//! | Field            | Content                                         |
//! |------------------|-------------------------------------------------|
//! | `key`            | object key to write                             |
//! | `AWSAccessKeyId` | access key the policy was signed with           |
//! | `policy`         | `Base64(policy JSON)`                           |
//! | `signature`      | `Base64(HMAC-SHA1(SecretKey, policy))`          |
//!
//! The server only accepts the exact write policy it would have issued itself
//! for the submitted bucket and key, so the document is rebuilt from trusted
//! values and compared rather than evaluated condition by condition.

use std::collections::HashMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::AuthError;
use crate::signer::sign;

/// Canned ACL every issued policy grants.
const POLICY_ACL: &str = "public-read";

/// A write policy for a single bucket/key pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritePolicy {
    bucket: String,
    key: String,
    expiration: DateTime<Utc>,
    max_size_bytes: u64,
}

/// A policy document together with the values a client embeds in its form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPolicy {
    /// Base64 policy document, sent as the `policy` field.
    pub policy: String,
    /// Base64 HMAC-SHA1 of `policy`, sent as the `signature` field.
    pub signature: String,
    /// Access key, sent as the `AWSAccessKeyId` field.
    pub access_key_id: String,
}

#[derive(Serialize)]
struct PolicyDocument<'a> {
    expiration: String,
    conditions: (
        BucketCondition<'a>,
        (&'a str, &'a str, &'a str),
        AclCondition,
        (&'a str, u64, u64),
        (&'a str, &'a str, &'a str),
    ),
}

#[derive(Serialize)]
struct BucketCondition<'a> {
    bucket: &'a str,
}

#[derive(Serialize)]
struct AclCondition {
    acl: &'static str,
}

#[derive(Deserialize)]
struct SubmittedPolicy {
    expiration: String,
}

impl WritePolicy {
    /// Create a policy allowing one upload of `key` into `bucket`.
    pub fn new(
        bucket: impl Into<String>,
        key: impl Into<String>,
        expiration: DateTime<Utc>,
        max_size_bytes: u64,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            expiration,
            max_size_bytes,
        }
    }

    /// Expiration timestamp of the policy.
    #[must_use]
    pub fn expiration(&self) -> DateTime<Utc> {
        self.expiration
    }

    /// Render the JSON policy document.
    ///
    /// Field order and condition order are fixed so that the same inputs always
    /// produce the same bytes.
    #[must_use]
    pub fn document(&self) -> String {
        let document = PolicyDocument {
            expiration: self
                .expiration
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
            conditions: (
                BucketCondition {
                    bucket: self.bucket.as_str(),
                },
                ("eq", "$key", self.key.as_str()),
                AclCondition { acl: POLICY_ACL },
                ("content-length-range", 0, self.max_size_bytes),
                ("starts-with", "$Content-Type", ""),
            ),
        };
        serde_json::to_string(&document).unwrap_or_default()
    }

    /// Base64 encoding of [`WritePolicy::document`].
    #[must_use]
    pub fn encode(&self) -> String {
        BASE64.encode(self.document())
    }

    /// Encode and sign the policy with the given credentials.
    #[must_use]
    pub fn signed(&self, credentials: &Credentials) -> SignedPolicy {
        let policy = self.encode();
        let signature = sign(credentials.secret_access_key(), &policy);
        SignedPolicy {
            policy,
            signature,
            access_key_id: credentials.access_key_id().to_owned(),
        }
    }
}

/// Verifies the policy fields of a form upload.
#[derive(Debug, Clone)]
pub struct PolicyAuthorizer {
    credentials: Credentials,
    validity: TimeDelta,
    max_size_bytes: u64,
}

impl PolicyAuthorizer {
    /// Create an authorizer accepting policies valid for at most
    /// `validity_secs` seconds and uploads of at most `max_size_mb` megabytes.
    #[must_use]
    pub fn new(credentials: Credentials, validity_secs: u64, max_size_mb: u64) -> Self {
        let validity = i64::try_from(validity_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            credentials,
            validity,
            max_size_bytes: max_size_mb.saturating_mul(1_000_000),
        }
    }

    /// The largest upload an issued policy allows, in bytes.
    #[must_use]
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Issue a policy for `bucket`/`key` expiring after the configured validity.
    #[must_use]
    pub fn write_policy(&self, bucket: &str, key: &str) -> WritePolicy {
        let expiration = Utc::now()
            .checked_add_signed(self.validity)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        WritePolicy::new(bucket, key, expiration, self.max_size_bytes)
    }

    /// Whether the form fields authorize an upload into `bucket`.
    #[must_use]
    pub fn is_authorized(&self, bucket: &str, fields: &HashMap<String, String>) -> bool {
        self.authorize(bucket, fields).is_ok()
    }

    /// Verify the form fields of an upload into `bucket`.
    ///
    /// # Errors
    ///
    /// Returns the first [`AuthError`] encountered.
    pub fn authorize(
        &self,
        bucket: &str,
        fields: &HashMap<String, String>,
    ) -> Result<(), AuthError> {
        self.authorize_at(bucket, fields, Utc::now())
    }

    /// Verify the form fields as of `now`.
    ///
    /// # Errors
    ///
    /// Returns the first [`AuthError`] encountered.
    pub fn authorize_at(
        &self,
        bucket: &str,
        fields: &HashMap<String, String>,
        now: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let key = required_field(fields, "key")?;
        let access_key_id = required_field(fields, "AWSAccessKeyId")?;
        let policy = required_field(fields, "policy")?;
        let signature = required_field(fields, "signature")?;

        if access_key_id != self.credentials.access_key_id() {
            return Err(AuthError::AccessKeyNotFound(access_key_id.to_owned()));
        }

        let expiration = submitted_expiration(policy)?;
        let latest = now
            .checked_add_signed(self.validity)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        if expiration <= now || expiration > latest {
            debug!(%expiration, %now, "Upload policy outside its validity window");
            return Err(AuthError::PolicyExpired);
        }

        let expected = WritePolicy::new(bucket, key, expiration, self.max_size_bytes)
            .signed(&self.credentials);

        if !bool::from(policy.as_bytes().ct_eq(expected.policy.as_bytes())) {
            debug!(bucket = %bucket, key = %key, "Upload policy document mismatch");
            return Err(AuthError::PolicyMismatch);
        }

        if bool::from(signature.as_bytes().ct_eq(expected.signature.as_bytes())) {
            debug!(bucket = %bucket, key = %key, "Upload policy verification succeeded");
            Ok(())
        } else {
            debug!(
                expected = %expected.signature,
                provided = %signature,
                "Upload policy signature mismatch"
            );
            Err(AuthError::SignatureDoesNotMatch)
        }
    }
}

fn required_field<'a>(
    fields: &'a HashMap<String, String>,
    name: &'static str,
) -> Result<&'a str, AuthError> {
    fields
        .get(name)
        .map(String::as_str)
        .ok_or(AuthError::MissingFormField(name))
}

/// Decode the submitted policy far enough to read its expiration.
fn submitted_expiration(policy: &str) -> Result<DateTime<Utc>, AuthError> {
    let raw = BASE64
        .decode(policy)
        .map_err(|e| AuthError::InvalidPolicy(e.to_string()))?;
    let submitted: SubmittedPolicy =
        serde_json::from_slice(&raw).map_err(|e| AuthError::InvalidPolicy(e.to_string()))?;
    DateTime::parse_from_rfc3339(&submitted.expiration)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AuthError::InvalidPolicy(e.to_string()))
}
