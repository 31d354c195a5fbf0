// 🌐 HTTP Adapter - axum wiring for the endpoint table
//
// Routes are generated from `Endpoint::ALL`; every handler funnels into
// `api::handle`, so axum only translates requests and responses.

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{MethodFilter, MethodRouter},
    Router,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::{self, ApiRequest, ApiResponse, Endpoint, Method};
use crate::entities::InMemoryCustomerRepository;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<InMemoryCustomerRepository>,
}

impl AppState {
    /// State backed by a fresh, empty directory
    pub fn new() -> Self {
        AppState {
            repo: Arc::new(InMemoryCustomerRepository::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the full router (all endpoints + CORS + request tracing)
pub fn router(state: AppState) -> Router {
    // Several endpoints share a path (/account), so collect one
    // MethodRouter per path before registering.
    let mut by_path: BTreeMap<&'static str, MethodRouter<AppState>> = BTreeMap::new();

    for endpoint in Endpoint::ALL {
        let handler = move |State(state): State<AppState>,
                            headers: HeaderMap,
                            RawQuery(query): RawQuery,
                            body: Bytes| async move {
            serve(&state, endpoint, &headers, query.as_deref(), &body)
        };

        let methods = by_path
            .remove(endpoint.path())
            .unwrap_or_else(MethodRouter::new);
        by_path.insert(endpoint.path(), methods.on(method_filter(endpoint.method()), handler));
    }

    let mut app = Router::new();
    for (path, methods) in by_path {
        app = app.route(path, methods);
    }

    app.with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

fn method_filter(method: Method) -> MethodFilter {
    match method {
        Method::Get => MethodFilter::GET,
        Method::Post => MethodFilter::POST,
        Method::Put => MethodFilter::PUT,
        Method::Delete => MethodFilter::DELETE,
    }
}

fn serve(state: &AppState, endpoint: Endpoint, headers: &HeaderMap, query: Option<&str>, body: &[u8]) -> Response {
    let request = build_request(headers, query, body);
    render(api::handle(&*state.repo, endpoint, &request))
}

fn build_request(headers: &HeaderMap, query: Option<&str>, body: &[u8]) -> ApiRequest {
    let mut request = ApiRequest::new();

    // Non-UTF-8 header values can't carry a CPF; skip them
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }

    if let Some(query) = query {
        request = request.with_query_string(query);
    }

    request.with_raw_body(body)
}

fn render(response: ApiResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match response.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    }
}
