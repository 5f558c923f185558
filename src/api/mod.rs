// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Soulbound Onboarding Service

use axum::{
    http::{header, HeaderMap},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    chain::SimulateOutcome,
    error::ApiError,
    models::{ProfilePatch, SaveResponse, UserResponse},
    state::AppState,
};

pub mod health;
pub mod mint;
pub mod users;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/users", get(users::get_user).post(users::save_user))
        .route("/mint/simulate", post(mint::simulate_mint));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Reject requests whose `Origin` header is not on the allow-list.
///
/// Requests without an `Origin` header (curl, server-to-server) pass.
pub(crate) fn check_origin(headers: &HeaderMap, allowed: &[String]) -> Result<(), ApiError> {
    if let Some(origin) = headers.get(header::ORIGIN) {
        let origin = origin
            .to_str()
            .map_err(|_| ApiError::forbidden("Unauthorized origin"))?;
        if !allowed.iter().any(|candidate| candidate == origin) {
            return Err(ApiError::forbidden("Unauthorized origin"));
        }
    }
    Ok(())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::get_user,
        users::save_user,
        mint::simulate_mint,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(schemas(
        ProfilePatch,
        UserResponse,
        SaveResponse,
        SimulateOutcome,
        mint::SimulateRequest
    )),
    tags(
        (name = "Users", description = "Profile fetch and save"),
        (name = "Mint", description = "Soulbound mint simulation"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;


#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{HeaderValue, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::testing::test_state;
    use super::*;
    use crate::chain::client::testing::FakeChain;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _dir) = test_state(FakeChain::default(), vec![]);
        let app = router(state);
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn fetch_over_http_returns_sentinel() {
        let (state, _dir) = test_state(FakeChain::default(), vec![]);
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/users?wallet_address=W1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body.as_ref(), br#"{"username":null}"#);
    }

    #[tokio::test]
    async fn fetch_without_wallet_param_is_bad_request() {
        let (state, _dir) = test_state(FakeChain::default(), vec![]);
        let app = router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn origin_check_passes_without_header() {
        let headers = HeaderMap::new();
        assert!(check_origin(&headers, &["https://app.example".into()]).is_ok());
    }

    #[test]
    fn origin_check_enforces_allow_list() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ORIGIN,
            HeaderValue::from_static("https://evil.example"),
        );

        let err = check_origin(&headers, &["https://app.example".into()]).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);

        headers.insert(
            header::ORIGIN,
            HeaderValue::from_static("https://app.example"),
        );
        assert!(check_origin(&headers, &["https://app.example".into()]).is_ok());
    }

    #[test]
    fn empty_allow_list_rejects_any_origin() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ORIGIN,
            HeaderValue::from_static("https://app.example"),
        );
        assert!(check_origin(&headers, &[]).is_err());
    }
}
