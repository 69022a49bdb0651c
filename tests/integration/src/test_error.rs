//! Error response integration tests.

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};

    use crate::s3_client;

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_unsigned_request() {
        let client = s3_client();
        let resp = client.send_unsigned(Method::GET, "/", &[], "").await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body = resp.text().await.expect("error body");
        assert!(body.contains("<Code>Access Denied</Code>"));
        assert!(body.contains("<Message>Authorization failed</Message>"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_forged_signature() {
        let client = s3_client();
        let resp = client
            .send_unsigned(
                Method::GET,
                "/",
                &[("authorization", "AWS key:Zm9yZ2VkLXNpZ25hdHVyZQ==")],
                "",
            )
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_require_bucket_name() {
        let client = s3_client();
        let resp = client.send(Method::DELETE, "//orphan.txt", &[], "").await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = resp.text().await.expect("error body");
        assert!(body.contains("<Message>Bucket name required</Message>"));
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_health_without_auth() {
        let client = s3_client();
        let resp = client.send_unsigned(Method::GET, "/_health", &[], "").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.text().await.expect("health body").contains("running"));
    }
}
