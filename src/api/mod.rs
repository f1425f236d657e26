//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All resource endpoints are mounted under `/api/v1`; `/health` sits at
//! the root. With the `swagger-ui` feature the OpenAPI document is served
//! at `/api-docs/openapi.json` and browsable at `/swagger-ui`.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "ubi-gateway",
        description = "UBI claim verification for GoodDollar (G$) on Celo"
    ),
    paths(
        handlers::verification::verify_ubi,
        handlers::wallet::get_balance,
        handlers::wallet::get_activity,
        handlers::contracts::get_contracts,
        handlers::system::health_handler,
    ),
    components(schemas(
        dto::VerifyRequest,
        dto::VerificationResponse,
        dto::ActivityDto,
        dto::SummaryDto,
        dto::BalanceResponse,
        dto::ActivityListResponse,
        dto::ContractInfoResponse,
        dto::EventSignatureDto,
        handlers::system::HealthResponse,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "UBI", description = "Claim verification"),
        (name = "Wallets", description = "Balance and activity lookups"),
        (name = "Contracts", description = "Contract configuration"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::chain::JsonRpcClient;
    use crate::domain::ResultCache;
    use crate::service::{VerificationService, VerifierSettings};

    const WALLET: &str = "0xFf00A683f7bD77665754A65F2B82fdEFc4371a50";

    /// Router over a node that refuses connections.
    fn app() -> Router {
        let rpc = JsonRpcClient::with_timeouts(
            "http://127.0.0.1:9",
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        let verifier = VerificationService::new(
            Arc::new(rpc),
            Arc::new(ResultCache::new(300, 1000)),
            VerifierSettings::default(),
        );
        build_router().with_state(AppState::new(verifier))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});
        let status = response.status();
        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
            panic!("valid request");
        };
        request
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        let Ok(request) = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("valid request");
        };
        request
    }

    #[tokio::test]
    async fn health_reports_cache_size() {
        let (status, body) = send(get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["cache_size"], 0);
        assert_eq!(body["chain_id"], 42220);
    }

    #[tokio::test]
    async fn verify_rejects_malformed_address() {
        let request = post_json(
            "/api/v1/ubi/verify",
            &serde_json::json!({ "wallet_address": "0x1234" }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 1002);
    }

    #[tokio::test]
    async fn verify_with_unreachable_node_is_error_verdict() {
        let request = post_json(
            "/api/v1/ubi/verify",
            &serde_json::json!({ "wallet_address": WALLET }),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert_eq!(
            body["wallet_address"],
            "0xff00a683f7bd77665754a65f2b82fdefc4371a50"
        );
        assert!(body["summary"].is_null());
        assert_eq!(body["activities"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn balance_with_unreachable_node_is_bad_gateway() {
        let (status, body) = send(get(&format!("/api/v1/wallets/{WALLET}/balance"))).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], 5001);
    }

    #[tokio::test]
    async fn activity_rejects_malformed_contract() {
        let uri = format!("/api/v1/wallets/{WALLET}/activity?contract=nothex");
        let (status, _) = send(get(&uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn contracts_lists_event_table() {
        let (status, body) = send(get("/api/v1/contracts")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chain_id"], 42220);
        assert!(body["ubi_implementation"].is_null());
        assert_eq!(body["events"].as_array().map(Vec::len), Some(4));
        assert_eq!(
            body["ubi_proxy"],
            "0x43d72ff17701b2da814620735c39c620ce0ea4a1"
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, _) = send(get("/api/v1/unknown")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn openapi_lists_every_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/ubi/verify",
            "/api/v1/wallets/{wallet}/balance",
            "/api/v1/wallets/{wallet}/activity",
            "/api/v1/contracts",
            "/health",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
