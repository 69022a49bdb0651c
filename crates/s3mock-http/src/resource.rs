//! Bucket and key extraction from the raw request target.
//!
//! The target is normalized the same way regardless of addressing style:
//!
//! 1. remove the first occurrence of `s3.amazonaws.com`, then of `:443`, then
//!    of `http://`, then of `https://`
//! 2. drop the query string
//! 3. trim exactly one leading and one trailing `/`
//!
//! The remainder is split on `/`. The first segment is the bucket and the
//! second the key, both percent-decoded. No bucket naming rules are enforced.

use percent_encoding::percent_decode_str;
use s3mock_model::ParsedResource;

/// Strip host noise, the query string and the outer slashes from a request target.
pub(crate) fn normalize(raw: &str) -> String {
    let mut target = raw.to_owned();
    for noise in ["s3.amazonaws.com", ":443", "http://", "https://"] {
        target = target.replacen(noise, "", 1);
    }

    let without_query = target.split_once('?').map_or(target.as_str(), |(path, _)| path);
    let trimmed = without_query.strip_prefix('/').unwrap_or(without_query);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.to_owned()
}

/// Parse the bucket and key out of a raw request target.
///
/// ```
/// use s3mock_http::resource::parse_resource;
///
/// let resource = parse_resource("/photos/summer%20trip.jpg?acl");
/// assert_eq!(resource.bucket(), Some("photos"));
/// assert_eq!(resource.key(), Some("summer trip.jpg"));
/// ```
#[must_use]
pub fn parse_resource(raw: &str) -> ParsedResource {
    let normalized = normalize(raw);
    let mut segments = normalized.split('/');
    let bucket = segments.next().and_then(decode_segment);
    let key = segments.next().and_then(decode_segment);
    ParsedResource::new(bucket, key)
}

fn decode_segment(segment: &str) -> Option<String> {
    if segment.is_empty() {
        None
    } else {
        Some(decode_uri_component(segment))
    }
}

/// Decode a percent-encoded URI component.
#[must_use]
pub fn decode_uri_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

/// Extract the bucket name from a virtual-hosted-style `Host` header.
///
/// With domain `s3.localhost`, the host `mybucket.s3.localhost:7000` yields
/// `Some("mybucket")`.
#[must_use]
pub fn extract_virtual_host_bucket(headers: &http::HeaderMap, domain: &str) -> Option<String> {
    let host = headers
        .get(http::header::HOST)
        .and_then(|v| v.to_str().ok())?;

    let host_without_port = host.split(':').next().unwrap_or(host);
    let bucket = host_without_port.strip_suffix(domain)?.strip_suffix('.')?;

    if bucket.is_empty() {
        None
    } else {
        Some(bucket.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_headers(host: &str) -> http::HeaderMap {
        let mut headers = http::HeaderMap::new();
        headers.insert(http::header::HOST, host.parse().expect("valid host"));
        headers
    }

    #[test]
    fn test_should_parse_bucket_and_key() {
        let resource = parse_resource("/mybucket/file.txt");
        assert_eq!(resource.bucket(), Some("mybucket"));
        assert_eq!(resource.key(), Some("file.txt"));
    }

    #[test]
    fn test_should_parse_root_as_empty() {
        assert_eq!(parse_resource("/"), ParsedResource::default());
        assert_eq!(parse_resource(""), ParsedResource::default());
    }

    #[test]
    fn test_should_parse_bucket_only() {
        let resource = parse_resource("/mybucket/");
        assert_eq!(resource.bucket(), Some("mybucket"));
        assert_eq!(resource.key(), None);
    }

    #[test]
    fn test_should_treat_empty_bucket_segment_as_absent() {
        let resource = parse_resource("//file.txt");
        assert_eq!(resource.bucket(), None);
        assert_eq!(resource.key(), Some("file.txt"));
    }

    #[test]
    fn test_should_decode_segments() {
        let resource = parse_resource("/my%20bucket/a%2Fb%20c.txt");
        assert_eq!(resource.bucket(), Some("my bucket"));
        assert_eq!(resource.key(), Some("a/b c.txt"));
    }

    #[test]
    fn test_should_take_second_segment_as_key() {
        let resource = parse_resource("/bucket/dir/file.txt");
        assert_eq!(resource.key(), Some("dir"));
    }

    #[test]
    fn test_should_strip_query_string() {
        let resource = parse_resource("/bucket/key?response-content-disposition=a/b");
        assert_eq!(resource.bucket(), Some("bucket"));
        assert_eq!(resource.key(), Some("key"));
    }

    #[test]
    fn test_should_strip_service_host_and_scheme() {
        let resource = parse_resource("https://s3.amazonaws.com:443/bucket/key");
        assert_eq!(resource.bucket(), Some("bucket"));
        assert_eq!(resource.key(), Some("key"));

        let resource = parse_resource("http://s3.amazonaws.com/bucket");
        assert_eq!(resource.bucket(), Some("bucket"));
        assert_eq!(resource.key(), None);
    }

    #[test]
    fn test_should_extract_bucket_from_virtual_host() {
        let headers = host_headers("mybucket.s3.localhost:7000");
        assert_eq!(
            extract_virtual_host_bucket(&headers, "s3.localhost"),
            Some("mybucket".to_owned())
        );
    }

    #[test]
    fn test_should_ignore_bare_domain_and_other_hosts() {
        assert_eq!(
            extract_virtual_host_bucket(&host_headers("s3.localhost"), "s3.localhost"),
            None
        );
        assert_eq!(
            extract_virtual_host_bucket(&host_headers("localhost:7000"), "s3.localhost"),
            None
        );
        assert_eq!(
            extract_virtual_host_bucket(&host_headers("evils3.localhost"), "s3.localhost"),
            None
        );
    }
}
