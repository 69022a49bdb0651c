//! Output and error serialization.
//!
//! Every response except an object body or a form upload confirmation is
//! labelled `text/xml`, including the empty confirmations of bucket and
//! object writes.

use bytes::Bytes;
use http::header::{self, HeaderValue};
use s3mock_model::S3Error;
use s3mock_model::output::{
    CreateBucketOutput, DeleteBucketOutput, DeleteObjectOutput, GetObjectOutput,
    HeadObjectOutput, ListBucketsOutput, PostObjectOutput, PutObjectOutput,
};
use s3mock_xml::{ErrorResponse, format_bucket_list, format_error};

use crate::body::S3ResponseBody;

/// Conversion of an operation output into an HTTP response.
pub trait IntoS3Response {
    /// Convert this output into an HTTP response.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the response cannot be constructed.
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error>;
}

/// Set a header if the value is present and representable.
fn set_optional_header(
    builder: http::response::Builder,
    name: header::HeaderName,
    value: Option<&str>,
) -> http::response::Builder {
    if let Some(v) = value {
        if let Ok(hv) = HeaderValue::from_str(v) {
            return builder.header(name, hv);
        }
    }
    builder
}

fn xml_builder(status: http::StatusCode) -> http::response::Builder {
    http::Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, mime::TEXT_XML.as_ref())
}

fn build_response(
    builder: http::response::Builder,
    body: S3ResponseBody,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    builder
        .body(body)
        .map_err(|e| S3Error::internal_error(format!("failed to build HTTP response: {e}")))
}

impl IntoS3Response for ListBucketsOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let xml = format_bucket_list(&self.buckets);
        build_response(
            xml_builder(http::StatusCode::OK),
            S3ResponseBody::from_bytes(xml),
        )
    }
}

impl IntoS3Response for CreateBucketOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let builder = set_optional_header(
            xml_builder(http::StatusCode::OK),
            header::LOCATION,
            Some(self.location.as_str()),
        );
        build_response(builder, S3ResponseBody::empty())
    }
}

impl IntoS3Response for DeleteBucketOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        build_response(xml_builder(http::StatusCode::OK), S3ResponseBody::empty())
    }
}

impl IntoS3Response for GetObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let mut builder = http::Response::builder().status(http::StatusCode::OK);
        builder = set_optional_header(
            builder,
            header::CONTENT_TYPE,
            Some(self.content_type.as_str()),
        );
        builder = set_optional_header(
            builder,
            header::CONTENT_DISPOSITION,
            self.content_disposition.as_deref(),
        );
        build_response(builder, S3ResponseBody::from_bytes(self.body))
    }
}

impl IntoS3Response for HeadObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let builder = set_optional_header(
            xml_builder(http::StatusCode::OK),
            header::ETAG,
            Some(self.e_tag.as_str()),
        );
        build_response(builder, S3ResponseBody::empty())
    }
}

impl IntoS3Response for PutObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let builder = set_optional_header(
            xml_builder(http::StatusCode::OK),
            header::ETAG,
            Some(self.e_tag.as_str()),
        );
        build_response(builder, S3ResponseBody::empty())
    }
}

impl IntoS3Response for DeleteObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        build_response(xml_builder(http::StatusCode::OK), S3ResponseBody::empty())
    }
}

impl IntoS3Response for PostObjectOutput {
    fn into_s3_response(self) -> Result<http::Response<S3ResponseBody>, S3Error> {
        let mut builder = http::Response::builder().status(http::StatusCode::NO_CONTENT);
        builder = set_optional_header(builder, header::ETAG, Some(self.e_tag.as_str()));
        builder =
            set_optional_header(builder, header::LOCATION, Some(self.location.as_str()));
        build_response(builder, S3ResponseBody::empty())
    }
}

/// Convert an error into an XML error response.
#[must_use]
pub fn error_to_response(err: &S3Error) -> http::Response<S3ResponseBody> {
    let xml = format_error(&ErrorResponse::from(err));

    xml_builder(err.status_code)
        .body(S3ResponseBody::from_bytes(Bytes::from(xml)))
        .unwrap_or_else(|_| {
            http::Response::builder()
                .status(http::StatusCode::INTERNAL_SERVER_ERROR)
                .body(S3ResponseBody::empty())
                .expect("static response should be valid")
        })
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use s3mock_model::BucketSummary;

    use super::*;

    async fn body_string(resp: http::Response<S3ResponseBody>) -> String {
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    fn header_value<'a>(resp: &'a http::Response<S3ResponseBody>, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_should_render_bucket_list_as_xml() {
        let output = ListBucketsOutput {
            buckets: vec![BucketSummary::new("alpha")],
        };
        let resp = output.into_s3_response().expect("response");
        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(header_value(&resp, "content-type"), Some("text/xml"));

        let body = body_string(resp).await;
        assert!(body.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(body.contains("<Bucket><Name>alpha</Name></Bucket>"));
    }

    #[test]
    fn test_should_set_etag_on_put_and_head() {
        let resp = PutObjectOutput {
            e_tag: "\"abc\"".to_owned(),
        }
        .into_s3_response()
        .expect("response");
        assert_eq!(header_value(&resp, "etag"), Some("\"abc\""));
        assert_eq!(header_value(&resp, "content-type"), Some("text/xml"));

        let resp = HeadObjectOutput {
            e_tag: "\"abc\"".to_owned(),
        }
        .into_s3_response()
        .expect("response");
        assert_eq!(header_value(&resp, "etag"), Some("\"abc\""));
    }

    #[tokio::test]
    async fn test_should_return_object_body_with_mime_type() {
        let output = GetObjectOutput {
            body: Bytes::from_static(b"hello"),
            content_type: "text/plain".to_owned(),
            content_disposition: Some("attachment; filename=\"a.txt\"".to_owned()),
        };
        let resp = output.into_s3_response().expect("response");
        assert_eq!(header_value(&resp, "content-type"), Some("text/plain"));
        assert_eq!(
            header_value(&resp, "content-disposition"),
            Some("attachment; filename=\"a.txt\"")
        );
        assert_eq!(body_string(resp).await, "hello");
    }

    #[test]
    fn test_should_answer_form_upload_with_no_content() {
        let resp = PostObjectOutput {
            e_tag: "\"abc\"".to_owned(),
            location: "http://localhost:7000/uploads/a.txt".to_owned(),
        }
        .into_s3_response()
        .expect("response");
        assert_eq!(resp.status(), http::StatusCode::NO_CONTENT);
        assert_eq!(
            header_value(&resp, "location"),
            Some("http://localhost:7000/uploads/a.txt")
        );
    }

    #[tokio::test]
    async fn test_should_render_error_document() {
        let resp = error_to_response(&S3Error::no_such_key());
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(header_value(&resp, "content-type"), Some("text/xml"));

        let body = body_string(resp).await;
        assert!(body.contains("<Code>NoSuchKey</Code>"));
        assert!(body.contains("<Message>The specified key does not exist.</Message>"));
    }
}
