//! Object integration tests.

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};

    use crate::{cleanup_bucket, create_test_bucket, s3_client};

    const HELLO_ETAG: &str = "\"5d41402abc4b2a76b9719d911017c592\"";

    fn etag(resp: &reqwest::Response) -> Option<String> {
        resp.headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_put_head_get_and_delete_object() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "object").await;
        let path = format!("/{bucket}/hello.txt");

        let resp = client.send(Method::PUT, &path, &[], "hello").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(etag(&resp).as_deref(), Some(HELLO_ETAG));

        let resp = client.send(Method::HEAD, &path, &[], "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(etag(&resp).as_deref(), Some(HELLO_ETAG));

        let resp = client.send(Method::GET, &path, &[], "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("text/plain")
        );
        assert_eq!(resp.text().await.expect("object body"), "hello");

        let resp = client.send(Method::DELETE, &path, &[], "").await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = client.send(Method::GET, &path, &[], "").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        cleanup_bucket(&client, &bucket, &[]).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_echo_requested_content_disposition() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "disposition").await;
        let path = format!("/{bucket}/report.csv");
        client.send(Method::PUT, &path, &[], "a,b\n1,2\n").await;

        let resp = client
            .send(
                Method::GET,
                &format!("{path}?response-content-disposition=attachment%3B%20filename%3Dreport.csv"),
                &[],
                "",
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("content-disposition")
                .and_then(|v| v.to_str().ok()),
            Some("attachment; filename=report.csv")
        );

        cleanup_bucket(&client, &bucket, &["report.csv"]).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_sign_vendor_headers() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "amz").await;
        let path = format!("/{bucket}/meta.txt");

        let resp = client
            .send(
                Method::PUT,
                &path,
                &[
                    ("x-amz-date", "Thu, 16 Oct 2026 10:00:00 GMT"),
                    ("x-amz-meta-owner", "alice"),
                    ("content-type", "text/plain"),
                ],
                "meta",
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        cleanup_bucket(&client, &bucket, &["meta.txt"]).await;
    }
}
