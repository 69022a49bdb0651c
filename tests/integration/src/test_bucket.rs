//! Bucket lifecycle integration tests.

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::{Method, StatusCode};

    use crate::{cleanup_bucket, create_test_bucket, s3_client};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_create_and_list_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "list").await;

        let resp = client.send(Method::GET, "/", &[], Bytes::new()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = resp.text().await.expect("list body");
        assert!(body.contains(&format!("<Name>{bucket}</Name>")));

        cleanup_bucket(&client, &bucket, &[]).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_bucket_location() {
        let client = s3_client();
        let bucket = crate::test_bucket_name("location");

        let resp = client
            .send(Method::PUT, &format!("/{bucket}"), &[], Bytes::new())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get("location")
                .and_then(|v| v.to_str().ok()),
            Some(format!("/{bucket}").as_str())
        );

        cleanup_bucket(&client, &bucket, &[]).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_duplicate_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "dup").await;

        let resp = client
            .send(Method::PUT, &format!("/{bucket}"), &[], Bytes::new())
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        cleanup_bucket(&client, &bucket, &[]).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_delete_empty_bucket() {
        let client = s3_client();
        let bucket = create_test_bucket(&client, "delete").await;

        let resp = client
            .send(Method::DELETE, &format!("/{bucket}"), &[], Bytes::new())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = client
            .send(Method::DELETE, &format!("/{bucket}"), &[], Bytes::new())
            .await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
