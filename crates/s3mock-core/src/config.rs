//! Server configuration.
//!
//! Provides [`S3MockConfig`], loaded from environment variables by the server
//! binary and passed explicitly to every component that needs it.

use std::fmt;

use s3mock_auth::{Credentials, PolicyAuthorizer};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// S3Mock configuration.
///
/// Defaults match the behavior clients of the emulator expect: port 7000 and
/// the `key`/`secret` credential pair.
///
/// # Examples
///
/// ```
/// use s3mock_core::config::S3MockConfig;
///
/// let config = S3MockConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:7000");
/// assert_eq!(config.access_key_id, "key");
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct S3MockConfig {
    /// Bind address (e.g. `"0.0.0.0:7000"`).
    #[builder(default = String::from("0.0.0.0:7000"))]
    pub gateway_listen: String,

    /// Access key ID accepted in `Authorization` headers and upload forms.
    #[builder(default = String::from("key"))]
    pub access_key_id: String,

    /// Secret used to sign requests and upload policies. Never serialized.
    #[serde(skip_serializing, default = "default_secret")]
    #[builder(default = default_secret())]
    pub secret_access_key: String,

    /// Domain for virtual-hosted-style bucket resolution.
    #[builder(default = String::from("s3.localhost"))]
    pub s3_domain: String,

    /// Whether `<bucket>.<s3_domain>` hosts are resolved to buckets.
    #[builder(default = true)]
    pub s3_virtual_hosting: bool,

    /// Whether header signatures are skipped entirely.
    #[builder(default = false)]
    pub s3_skip_signature_validation: bool,

    /// Maximum lifetime of an accepted upload policy, in seconds.
    #[builder(default = 60)]
    pub post_policy_validity_secs: u64,

    /// Upload size limit written into issued policies, in megabytes.
    #[builder(default = 10)]
    pub post_policy_max_size_mb: u64,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

fn default_secret() -> String {
    String::from("secret")
}

impl Default for S3MockConfig {
    fn default() -> Self {
        Self {
            gateway_listen: String::from("0.0.0.0:7000"),
            access_key_id: String::from("key"),
            secret_access_key: default_secret(),
            s3_domain: String::from("s3.localhost"),
            s3_virtual_hosting: true,
            s3_skip_signature_validation: false,
            post_policy_validity_secs: 60,
            post_policy_max_size_mb: 10,
            log_level: String::from("info"),
        }
    }
}

impl fmt::Debug for S3MockConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3MockConfig")
            .field("gateway_listen", &self.gateway_listen)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("s3_domain", &self.s3_domain)
            .field("s3_virtual_hosting", &self.s3_virtual_hosting)
            .field(
                "s3_skip_signature_validation",
                &self.s3_skip_signature_validation,
            )
            .field("post_policy_validity_secs", &self.post_policy_validity_secs)
            .field("post_policy_max_size_mb", &self.post_policy_max_size_mb)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl S3MockConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:7000` |
    /// | `PORT` (when `GATEWAY_LISTEN` is unset) | `7000` |
    /// | `ACCESS_KEY` / `AWS_ACCESS_KEY_ID` | `key` |
    /// | `SECRET_KEY` / `AWS_SECRET_ACCESS_KEY` | `secret` |
    /// | `S3_DOMAIN` | `s3.localhost` |
    /// | `S3_VIRTUAL_HOSTING` | `true` |
    /// | `S3_SKIP_SIGNATURE_VALIDATION` | `false` |
    /// | `S3_POST_POLICY_VALIDITY` | `60` |
    /// | `S3_POST_POLICY_MAX_SIZE_MB` | `10` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// # Examples
    ///
    /// ```
    /// use s3mock_core::config::S3MockConfig;
    ///
    /// let config = S3MockConfig::from_env();
    /// assert!(!config.gateway_listen.is_empty());
    /// ```
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        } else if let Some(port) = lookup("PORT") {
            config.gateway_listen = format!("0.0.0.0:{port}");
        }
        if let Some(v) = lookup("ACCESS_KEY").or_else(|| lookup("AWS_ACCESS_KEY_ID")) {
            config.access_key_id = v;
        }
        if let Some(v) = lookup("SECRET_KEY").or_else(|| lookup("AWS_SECRET_ACCESS_KEY")) {
            config.secret_access_key = v;
        }
        if let Some(v) = lookup("S3_DOMAIN") {
            config.s3_domain = v;
        }
        if let Some(v) = lookup("S3_VIRTUAL_HOSTING") {
            config.s3_virtual_hosting = parse_bool(&v);
        }
        if let Some(v) = lookup("S3_SKIP_SIGNATURE_VALIDATION") {
            config.s3_skip_signature_validation = parse_bool(&v);
        }
        if let Some(n) = lookup("S3_POST_POLICY_VALIDITY").and_then(|v| v.parse().ok()) {
            config.post_policy_validity_secs = n;
        }
        if let Some(n) = lookup("S3_POST_POLICY_MAX_SIZE_MB").and_then(|v| v.parse().ok()) {
            config.post_policy_max_size_mb = n;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config
    }

    /// The configured key pair.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.access_key_id, &self.secret_access_key)
    }

    /// A policy authorizer for form uploads using the configured key pair and limits.
    #[must_use]
    pub fn policy_authorizer(&self) -> PolicyAuthorizer {
        PolicyAuthorizer::new(
            self.credentials(),
            self.post_policy_validity_secs,
            self.post_policy_max_size_mb,
        )
    }
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
