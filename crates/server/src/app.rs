//! The axum service.
//!
//! A single fallback handler owns all routing: the endpoint table, not
//! axum's router, decides which handler runs, so registration-order
//! semantics hold. Every response, success or failure, carries a
//! wide-open CORS header via a response layer; `OPTIONS` short-circuits
//! to 204 before the table is consulted.

use axum::Router;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::endpoints;
use crate::router::RouteHandler;
use crate::state::AppState;

pub fn build(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .with_state(state)
}

async fn dispatch(State(state): State<AppState>, req: Request) -> Response {
    if req.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }

    // The scrap route's token lives in the query string, so the table
    // matches against path plus query.
    let target = match req.uri().query() {
        Some(query) => format!("{}?{}", req.uri().path(), query),
        None => req.uri().path().to_string(),
    };

    let Some((endpoint, captures)) = state.endpoints.matching(req.method(), &target) else {
        tracing::debug!(method = %req.method(), %target, "No endpoint matched");
        return (StatusCode::BAD_REQUEST, "Query format error").into_response();
    };

    match endpoint.handler {
        RouteHandler::Ping => endpoints::ping::handle().await,
        RouteHandler::CleanCache => endpoints::clean_cache::handle(&state).await,
        RouteHandler::OpenApi => {
            let host = req
                .headers()
                .get(header::HOST)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            endpoints::openapi::handle(&state, host.as_deref()).await
        }
        RouteHandler::OpenApiUi => endpoints::openapi_ui::handle().await,
        RouteHandler::Scrap => endpoints::scrap::handle(&state, &captures).await,
    }
}
