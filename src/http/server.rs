//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the redirect handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Resolve every request against the current route table
//! - Forward pass-through requests to the upstream origin
//! - Swap in reloaded route tables

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::request::{normalize, request_id, MakeRequestUuid};
use crate::http::response::Redirect;
use crate::observability::metrics::{self, Outcome};
use crate::routing::{RedirectResolver, RedirectResult};

/// Route table snapshot shared by all handlers; replaced whole on reload.
pub type SharedResolver = Arc<ArcSwap<RedirectResolver>>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub resolver: SharedResolver,
    pub client: Client<HttpConnector, Body>,
    pub upstream: Option<Authority>,
}

/// HTTP front end for the redirect service.
pub struct HttpServer {
    router: Router,
    resolver: SharedResolver,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let resolver: SharedResolver =
            Arc::new(ArcSwap::from_pointee(RedirectResolver::from(config.routes.clone())));

        let upstream = config.upstream.as_ref().and_then(|upstream| {
            Authority::from_str(&upstream.address)
                .map_err(|e| {
                    tracing::error!(address = %upstream.address, error = %e, "Invalid upstream address");
                })
                .ok()
        });

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            resolver: resolver.clone(),
            client,
            upstream,
        };

        let router = Self::build_router(&config, state);
        Self { router, resolver }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .fallback(redirect_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    request_id = %request_id(request),
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the live route table.
    pub fn resolver(&self) -> SharedResolver {
        self.resolver.clone()
    }

    /// Run the server, applying config updates until Ctrl+C.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        tokio::spawn(apply_config_updates(self.resolver.clone(), config_updates));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Swap in the route table of every reloaded config.
pub async fn apply_config_updates(
    resolver: SharedResolver,
    mut updates: mpsc::UnboundedReceiver<ServiceConfig>,
) {
    while let Some(config) = updates.recv().await {
        let hosts = config.routes.host_count();
        let rules = config.routes.rule_count();
        resolver.store(Arc::new(RedirectResolver::from(config.routes)));
        metrics::record_config_reload(true);
        tracing::info!(hosts, rules, "Route table reloaded");
    }
}

/// Resolve the request; redirect, forward, or fail.
async fn redirect_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let normalized = normalize(&request);

    let start = Instant::now();
    let result = state.resolver.load().resolve(&normalized);
    metrics::record_resolve_duration(start);

    match result {
        Ok(RedirectResult::Redirect(redirect)) => {
            tracing::info!(
                hostname = %normalized.hostname,
                path = %normalized.path,
                status = redirect.status_code(),
                location = %redirect.location,
                "Redirecting"
            );
            redirect_response(redirect)
        }
        Ok(RedirectResult::NoRedirect) => forward(&state, request).await,
        Err(e) => {
            tracing::error!(
                hostname = %normalized.hostname,
                path = %normalized.path,
                error = %e,
                "Route table error"
            );
            metrics::record_request(Outcome::Error, 500);
            (StatusCode::INTERNAL_SERVER_ERROR, "Route table error").into_response()
        }
    }
}

/// Render a redirect, counting it by the status actually sent.
fn redirect_response(redirect: Redirect) -> Response {
    let response = redirect.into_response();
    let outcome = if response.status().is_redirection() {
        Outcome::Redirect
    } else {
        Outcome::Error
    };
    metrics::record_request(outcome, response.status().as_u16());
    response
}

/// Pass the original request through to the upstream origin.
async fn forward(state: &AppState, request: Request<Body>) -> Response {
    let Some(authority) = state.upstream.clone() else {
        tracing::debug!(path = %request.uri().path(), "No redirect and no upstream configured");
        metrics::record_request(Outcome::Passthrough, 404);
        return (StatusCode::NOT_FOUND, "No redirect rule matched").into_response();
    };

    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(authority);
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build upstream URI");
            metrics::record_request(Outcome::Passthrough, 502);
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        }
    };

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            metrics::record_request(Outcome::Passthrough, response.status().as_u16());
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(error = %e, "Upstream error");
            metrics::record_request(Outcome::Passthrough, 502);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn test_redirect_counted_as_redirect() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        let response = ::metrics::with_local_recorder(&recorder, || {
            redirect_response(response::build("https://x/a", true))
        });

        assert_eq!(response.status(), StatusCode::FOUND);
        let rendered = handle.render();
        assert!(rendered.contains(r#"outcome="redirect""#), "{}", rendered);
        assert!(rendered.contains(r#"status="302""#), "{}", rendered);
    }

    #[test]
    fn test_invalid_location_counted_as_error() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        let response = ::metrics::with_local_recorder(&recorder, || {
            redirect_response(response::build("https://x/\nbad", false))
        });

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let rendered = handle.render();
        assert!(rendered.contains(r#"outcome="error""#), "{}", rendered);
        assert!(rendered.contains(r#"status="500""#), "{}", rendered);
        assert!(!rendered.contains(r#"outcome="redirect""#), "{}", rendered);
    }
}
