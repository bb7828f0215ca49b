//! Route table and middleware wiring.

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::{default_origins, AppConfig};
use crate::{auth, handlers, AppState};

/// Assemble the application router.
///
/// Only `GET /orders` sits behind the auth chain; order creation, update,
/// and deletion are deliberately reachable without a token.
pub fn app(state: AppState) -> Router {
    // Interceptors run in declaration order: log first, then verify.
    let auth_chain = ServiceBuilder::new()
        .layer(middleware::from_fn(auth::log_request))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    let protected = Router::new()
        .route("/orders", get(handlers::list_orders))
        .route_layer(auth_chain);

    Router::new()
        // Liveness
        .route("/", get(handlers::root))
        // Session routes
        .route("/jwt", post(auth::issue_token))
        .route("/logout", post(auth::logout))
        // Service catalog routes (read-only)
        .route("/services", get(handlers::list_services))
        .route("/services/:id", get(handlers::get_service))
        // Order routes
        .route("/orders", post(handlers::create_order))
        .route(
            "/orders/:id",
            patch(handlers::update_order_status).delete(handlers::delete_order),
        )
        .merge(protected)
        .layer(build_cors_layer(&state.config))
        .with_state(state)
}

/// Allow-list CORS with credentials so the browser sends the session cookie.
fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = allowed_origins(config);
    tracing::info!("CORS configured for origins: {:?}", origins);

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Parse the configured origins, keeping the fixed defaults when none of
/// them are usable.
fn allowed_origins(config: &AppConfig) -> Vec<HeaderValue> {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!(
            "CORS_ALLOWED_ORIGINS has no usable origins, using the default allow-list"
        );
        return default_origins()
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
    }

    origins
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::{json, Map, Value};
    use tower::ServiceExt;

    use crate::auth::jwt;
    use crate::db;

    const TEST_SECRET: &str = "test-secret-key-for-testing-only";

    fn test_config() -> AppConfig {
        AppConfig {
            port: 0,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            db_name: "garage_test".to_string(),
            token_secret: TEST_SECRET.to_string(),
            production: false,
            cors_origins: vec!["http://localhost:5173".to_string()],
        }
    }

    /// Router over a lazily-connecting store handle; none of these tests may
    /// reach a store call, so no deployment is needed.
    async fn test_app() -> Router {
        let store = db::connect("mongodb://localhost:27017", "garage_test")
            .await
            .expect("lazy store handle");
        app(AppState {
            store,
            config: test_config(),
        })
    }

    fn claim_map(email: &str) -> Map<String, Value> {
        let mut user = Map::new();
        user.insert("email".to_string(), json!(email));
        user
    }

    fn token_cookie(email: &str) -> String {
        let token = jwt::create_token(TEST_SECRET, &claim_map(email)).expect("token");
        format!("token={}", token)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn cors_origins_fall_back_to_defaults_when_unusable() {
        let mut config = test_config();
        let configured = allowed_origins(&config);
        assert_eq!(
            configured,
            vec![HeaderValue::from_static("http://localhost:5173")]
        );

        config.cors_origins = vec![];
        let origins = allowed_origins(&config);
        assert!(origins.contains(&HeaderValue::from_static("http://localhost:5173")));
        assert!(origins.contains(&HeaderValue::from_static("https://garage-client.web.app")));

        config.cors_origins = vec!["not a valid\norigin".to_string()];
        let origins = allowed_origins(&config);
        assert!(origins.contains(&HeaderValue::from_static("http://localhost:5173")));
    }

    #[tokio::test]
    async fn liveness_route_answers() {
        let response = test_app()
            .await
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn orders_without_cookie_is_unauthorized() {
        let response = test_app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/orders?email=alice@example.com")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "not authorized");
    }

    #[tokio::test]
    async fn orders_with_garbage_token_is_unauthorized() {
        let response = test_app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/orders")
                    .header(header::COOKIE, "token=this-is-not-a-jwt")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn orders_with_expired_token_is_unauthorized() {
        let token = jwt::create_token_with_expiry(
            TEST_SECRET,
            &claim_map("alice@example.com"),
            Utc::now() - Duration::hours(2),
        )
        .expect("token");

        let response = test_app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/orders")
                    .header(header::COOKIE, format!("token={}", token))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn orders_for_another_owner_is_forbidden() {
        let response = test_app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/orders?email=bob@example.com")
                    .header(header::COOKIE, token_cookie("alice@example.com"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error"], "forbidden");
    }

    #[tokio::test]
    async fn malformed_service_id_is_rejected_before_the_store() {
        let response = test_app()
            .await
            .oneshot(
                Request::builder()
                    .uri("/services/not-a-hex-id")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // A gated route would answer 401 here; 400 proves order mutations skip
    // the auth chain entirely.
    #[tokio::test]
    async fn order_mutations_bypass_the_auth_chain() {
        let response = test_app()
            .await
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/orders/not-a-hex-id")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = test_app()
            .await
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/orders/not-a-hex-id")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"status":"done"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn jwt_route_sets_session_cookie() {
        let response = test_app()
            .await
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/jwt")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"alice@example.com"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie set")
            .to_str()
            .expect("ascii cookie")
            .to_string();
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert_eq!(body_json(response).await["success"], true);
    }

    #[tokio::test]
    async fn issued_cookie_opens_the_auth_chain() {
        // Token minted by /jwt must pass require_token; prove it with the
        // 403 branch, which runs after verification but before any store
        // call.
        let app = test_app().await;
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/jwt")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"alice@example.com"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("session cookie set")
            .to_str()
            .expect("ascii cookie")
            .to_string();
        let cookie_pair = set_cookie.split(';').next().expect("name=value").to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/orders?email=bob@example.com")
                    .header(header::COOKIE, cookie_pair)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn logout_route_clears_session_cookie() {
        let response = test_app()
            .await
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/logout")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("clearing cookie set")
            .to_str()
            .expect("ascii cookie")
            .to_string();
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("Max-Age=0"));
        assert_eq!(body_json(response).await["success"], true);
    }
}
