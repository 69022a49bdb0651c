//! `multipart/form-data` parsing for browser form uploads.
//!
//! The body is already collected, so parsing is synchronous. Parts are handed
//! to a [`FormVisitor`] in body order; a part is a file when its field name is
//! `file` or its `Content-Disposition` carries a `filename`.

use bytes::Bytes;
use s3mock_core::{FilePart, FormUpload, FormVisitor};
use s3mock_model::S3Error;

/// Extract the boundary from a `multipart/form-data; boundary=...` content type.
///
/// # Errors
///
/// Returns `AccessDenied` if the content type is not `multipart/form-data` or
/// has no boundary.
pub fn extract_boundary(content_type: &str) -> Result<String, S3Error> {
    let mut params = content_type.split(';');
    let essence = params.next().unwrap_or_default().trim();
    if !essence.eq_ignore_ascii_case("multipart/form-data") {
        return Err(S3Error::access_denied(format!(
            "Form upload requires multipart/form-data, got: {content_type}"
        )));
    }

    params
        .filter_map(|p| p.trim().split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"').to_owned())
        .filter(|b| !b.is_empty())
        .ok_or_else(|| S3Error::access_denied("Missing boundary in Content-Type"))
}

/// Parse a multipart body, feeding each part to `visitor`.
///
/// # Errors
///
/// Returns `AccessDenied` if the body contains no boundary delimiter.
pub fn parse_form<V: FormVisitor>(
    body: &[u8],
    boundary: &str,
    visitor: &mut V,
) -> Result<(), S3Error> {
    let delimiter = format!("--{boundary}");
    let end_delimiter = format!("--{boundary}--");

    let Some(parts) = split_parts(body, delimiter.as_bytes(), end_delimiter.as_bytes()) else {
        return Err(S3Error::access_denied("Malformed multipart body"));
    };

    for part in parts {
        let Some((headers, data)) = split_headers_body(part) else {
            continue;
        };
        let headers = PartHeaders::parse(headers);
        let Some(field_name) = headers.name else {
            continue;
        };

        if field_name == "file" || headers.filename.is_some() {
            visitor.on_file(FilePart {
                field_name,
                file_name: headers.filename,
                content_type: headers.content_type,
                data: Bytes::copy_from_slice(data),
            });
        } else {
            visitor.on_field(&field_name, &String::from_utf8_lossy(data));
        }
    }

    Ok(())
}

/// Parse a form upload request body into a [`FormUpload`].
///
/// # Errors
///
/// Returns `AccessDenied` for a missing or non-multipart `Content-Type` and for
/// an unparseable body.
pub fn read_form(headers: &http::HeaderMap, body: &[u8]) -> Result<FormUpload, S3Error> {
    let content_type = headers
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| S3Error::access_denied("Missing Content-Type"))?;
    let boundary = extract_boundary(content_type)?;

    let mut form = FormUpload::new();
    parse_form(body, &boundary, &mut form)?;
    Ok(form)
}

/// Split the body into parts. `None` when the opening delimiter is absent.
fn split_parts<'a>(
    body: &'a [u8],
    delimiter: &[u8],
    end_delimiter: &[u8],
) -> Option<Vec<&'a [u8]>> {
    let start = find_bytes(body, delimiter)?;
    let mut remaining = skip_crlf(&body[start + delimiter.len()..]);
    let mut parts = Vec::new();

    loop {
        if remaining.starts_with(b"--")
            || remaining
                .strip_prefix(b"\r\n")
                .is_some_and(|r| r.starts_with(end_delimiter))
        {
            break;
        }

        if let Some(pos) = find_bytes(remaining, delimiter) {
            parts.push(strip_trailing_crlf(&remaining[..pos]));
            remaining = skip_crlf(&remaining[pos + delimiter.len()..]);
        } else {
            let part = strip_trailing_crlf(remaining);
            if !part.is_empty() {
                parts.push(part);
            }
            break;
        }
    }

    Some(parts)
}

/// Split a part at the first blank line.
fn split_headers_body(part: &[u8]) -> Option<(&[u8], &[u8])> {
    let separator = b"\r\n\r\n";
    find_bytes(part, separator).map(|pos| (&part[..pos], &part[pos + separator.len()..]))
}

#[derive(Debug, Default)]
struct PartHeaders {
    name: Option<String>,
    filename: Option<String>,
    content_type: Option<String>,
}

impl PartHeaders {
    fn parse(raw: &[u8]) -> Self {
        let text = String::from_utf8_lossy(raw);
        let mut headers = Self::default();

        for line in text.split("\r\n") {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            if name.trim().eq_ignore_ascii_case("content-disposition") {
                for param in value.split(';').skip(1) {
                    let Some((key, val)) = param.trim().split_once('=') else {
                        continue;
                    };
                    let val = val.trim().trim_matches('"').to_owned();
                    match key.trim().to_ascii_lowercase().as_str() {
                        "name" => headers.name = Some(val),
                        "filename" => headers.filename = Some(val),
                        _ => {}
                    }
                }
            } else if name.trim().eq_ignore_ascii_case("content-type") {
                headers.content_type = Some(value.trim().to_owned());
            }
        }

        headers
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn skip_crlf(data: &[u8]) -> &[u8] {
    data.strip_prefix(b"\r\n").unwrap_or(data)
}

fn strip_trailing_crlf(data: &[u8]) -> &[u8] {
    data.strip_suffix(b"\r\n").unwrap_or(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "----formboundary";

    fn body() -> String {
        [
            "------formboundary",
            "Content-Disposition: form-data; name=\"key\"",
            "",
            "photo.txt",
            "------formboundary",
            "Content-Disposition: form-data; name=\"upload\"; filename=\"photo.txt\"",
            "Content-Type: text/plain",
            "",
            "line one\r\nline two",
            "------formboundary",
            "Content-Disposition: form-data; name=\"late\"",
            "",
            "ignored",
            "------formboundary--",
            "",
        ]
        .join("\r\n")
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl FormVisitor for Recorder {
        fn on_field(&mut self, name: &str, value: &str) {
            self.0.push(format!("field {name}={value}"));
        }

        fn on_file(&mut self, file: FilePart) {
            self.0.push(format!("file {} {}", file.field_name, file.data.len()));
        }
    }

    #[test]
    fn test_should_extract_boundary() {
        assert_eq!(
            extract_boundary("multipart/form-data; boundary=abc").expect("boundary"),
            "abc"
        );
        assert_eq!(
            extract_boundary("Multipart/Form-Data; charset=utf-8; boundary=\"q r\"")
                .expect("quoted boundary"),
            "q r"
        );
    }

    #[test]
    fn test_should_reject_non_multipart_content_type() {
        let err = extract_boundary("application/json").expect_err("not multipart");
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
        assert!(extract_boundary("multipart/form-data").is_err());
        assert!(extract_boundary("multipart/form-data; boundary=").is_err());
    }

    #[test]
    fn test_should_visit_parts_in_body_order() {
        let mut recorder = Recorder::default();
        parse_form(body().as_bytes(), BOUNDARY, &mut recorder).expect("parse");
        assert_eq!(
            recorder.0,
            vec![
                "field key=photo.txt".to_owned(),
                "file upload 18".to_owned(),
                "field late=ignored".to_owned(),
            ]
        );
    }

    #[test]
    fn test_should_collect_upload_until_first_file() {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}")
                .parse()
                .expect("header"),
        );

        let form = read_form(&headers, body().as_bytes()).expect("form");
        assert_eq!(form.field("key"), Some("photo.txt"));
        assert_eq!(form.field("late"), None);

        let file = form.file().expect("file part");
        assert_eq!(file.file_name.as_deref(), Some("photo.txt"));
        assert_eq!(file.content_type.as_deref(), Some("text/plain"));
        assert_eq!(&file.data[..], b"line one\r\nline two");
    }

    #[test]
    fn test_should_treat_field_named_file_as_file() {
        let body = "--b\r\nContent-Disposition: form-data; name=\"file\"\r\n\r\ndata\r\n--b--\r\n";
        let mut recorder = Recorder::default();
        parse_form(body.as_bytes(), "b", &mut recorder).expect("parse");
        assert_eq!(recorder.0, vec!["file file 4".to_owned()]);
    }

    #[test]
    fn test_should_not_confuse_filename_with_name() {
        let headers = PartHeaders::parse(
            b"Content-Disposition: form-data; filename=\"a.txt\"; name=\"doc\"",
        );
        assert_eq!(headers.name.as_deref(), Some("doc"));
        assert_eq!(headers.filename.as_deref(), Some("a.txt"));
    }

    #[test]
    fn test_should_reject_body_without_delimiter() {
        let mut form = FormUpload::new();
        let err = parse_form(b"no parts here", "b", &mut form).expect_err("malformed");
        assert_eq!(err.status_code, http::StatusCode::FORBIDDEN);
    }
}
