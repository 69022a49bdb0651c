//! Browser form upload integration tests.

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};
    use s3mock_auth::{PolicyAuthorizer, SignedPolicy};

    use crate::{cleanup_bucket, create_test_bucket, credentials, endpoint_url, s3_client};

    const BOUNDARY: &str = "s3mock-integration-boundary";

    fn signed_policy(bucket: &str, key: &str) -> SignedPolicy {
        PolicyAuthorizer::new(credentials(), 60, 10)
            .write_policy(bucket, key)
            .signed(&credentials())
    }

    fn form_body(key: &str, policy: &SignedPolicy, content: &str) -> String {
        let mut body = String::new();
        for (name, value) in [
            ("key", key),
            ("AWSAccessKeyId", policy.access_key_id.as_str()),
            ("policy", policy.policy.as_str()),
            ("signature", policy.signature.as_str()),
        ] {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{key}\"\r\n\
             Content-Type: text/plain\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
        ));
        body
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_upload_with_signed_policy() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "form").await;
        let policy = signed_policy(&bucket, "upload.txt");
        let content_type = format!("multipart/form-data; boundary={BOUNDARY}");

        let resp = client
            .send_unsigned(
                Method::POST,
                &format!("/{bucket}"),
                &[("content-type", content_type.as_str())],
                form_body("upload.txt", &policy, "hello"),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .expect("location header");
        assert!(location.ends_with(&format!("/{bucket}/upload.txt")));
        assert!(location.starts_with("http://"));
        assert!(endpoint_url().starts_with("http://"));

        let resp = client
            .send(Method::GET, &format!("/{bucket}/upload.txt"), &[], "")
            .await;
        assert_eq!(resp.text().await.expect("object body"), "hello");

        cleanup_bucket(&client, &bucket, &["upload.txt"]).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_tampered_policy() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "formbad").await;
        let policy = signed_policy(&bucket, "allowed.txt");
        let content_type = format!("multipart/form-data; boundary={BOUNDARY}");

        let resp = client
            .send_unsigned(
                Method::POST,
                &format!("/{bucket}"),
                &[("content-type", content_type.as_str())],
                form_body("sneaky.txt", &policy, "hello"),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        cleanup_bucket(&client, &bucket, &[]).await;
    }
}
