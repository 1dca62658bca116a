#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::backends::traits::StoreBackend;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::time::Duration;

    fn create_test_api(server: &Server) -> FakeStoreApi {
        FakeStoreApi::with_retry_policy(
            &server.url(),
            Duration::from_secs(5),
            RetryPolicy::new(2).with_backoff(Duration::from_millis(1), Duration::from_millis(5)),
        )
        .unwrap()
    }

    fn create_products_response() -> serde_json::Value {
        json!([
            {
                "id": 1,
                "title": "Fjallraven - Foldsack No. 1 Backpack",
                "price": 109.95,
                "description": "Your perfect pack for everyday use and walks in the forest.",
                "category": "men's clothing",
                "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
                "rating": { "rate": 3.9, "count": 120 }
            },
            {
                "id": 2,
                "title": "Mens Casual Premium Slim Fit T-Shirts",
                "price": 22.3,
                "description": "Slim-fitting style.",
                "category": "men's clothing",
                "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg",
                "rating": { "rate": 4.1, "count": 259 }
            }
        ])
    }

    fn create_users_response() -> serde_json::Value {
        json!([
            {
                "id": 1,
                "email": "john@gmail.com",
                "username": "johnd",
                "name": { "firstname": "john", "lastname": "doe" }
            },
            {
                "id": 2,
                "email": "morrison@gmail.com",
                "username": "mor_2314",
                "name": { "firstname": "david", "lastname": "morrison" }
            }
        ])
    }

    #[tokio::test]
    async fn test_get_products_with_limit() {
        let mut server = Server::new_async().await;
        let api = create_test_api(&server);

        let m = server
            .mock("GET", "/products")
            .match_query(Matcher::UrlEncoded("limit".into(), "2".into()))
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(create_products_response().to_string())
            .create_async()
            .await;

        let products = api.get_products(Some(2)).await.unwrap();

        m.assert_async().await;
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title, "Fjallraven - Foldsack No. 1 Backpack");
        assert_eq!(products[1].rating.map(|r| r.count), Some(259));
    }

    #[tokio::test]
    async fn test_get_categories() {
        let mut server = Server::new_async().await;
        let api = create_test_api(&server);

        let _m = server
            .mock("GET", "/products/categories")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!(["electronics", "jewelery"]).to_string())
            .create_async()
            .await;

        let categories = api.get_categories().await.unwrap();

        assert_eq!(categories, vec!["electronics", "jewelery"]);
    }

    #[tokio::test]
    async fn test_get_users() {
        let mut server = Server::new_async().await;
        let api = create_test_api(&server);

        let _m = server
            .mock("GET", "/users")
            .match_query(Matcher::UrlEncoded("limit".into(), "5".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(create_users_response().to_string())
            .create_async()
            .await;

        let users = api.get_users(Some(5)).await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[1].name.full_name(), "david morrison");
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let mut server = Server::new_async().await;
        let api = create_test_api(&server);

        let m = server
            .mock("GET", "/products/categories")
            .with_status(503)
            .with_body("maintenance")
            .expect(3)
            .create_async()
            .await;

        let result = api.get_categories().await;

        m.assert_async().await;
        assert!(matches!(
            result,
            Err(StoreApiError::ServerError { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let mut server = Server::new_async().await;
        let api = create_test_api(&server);

        let m = server
            .mock("GET", "/users")
            .with_status(404)
            .with_body("not found")
            .expect(1)
            .create_async()
            .await;

        let result = api.get_users(None).await;

        m.assert_async().await;
        assert_eq!(
            result,
            Err(StoreApiError::ClientError {
                status: 404,
                message: "not found".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let mut server = Server::new_async().await;
        let api = create_test_api(&server);

        let _m = server
            .mock("GET", "/products")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{\"not\": \"a list\"}")
            .create_async()
            .await;

        let result = api.get_products(None).await;

        assert!(matches!(result, Err(StoreApiError::ParseError(_))));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = FakeStoreApi::new("not a url", Duration::from_secs(1));

        assert!(matches!(result, Err(StoreApiError::Other(_))));
    }

    #[test]
    fn test_build_url_handles_trailing_slash() {
        let api = FakeStoreApi::new("https://fakestoreapi.com/", Duration::from_secs(1)).unwrap();

        assert_eq!(
            api.build_url("/products", Some(5)),
            "https://fakestoreapi.com/products?limit=5"
        );
        assert_eq!(api.base_url(), "https://fakestoreapi.com/");
    }
}
