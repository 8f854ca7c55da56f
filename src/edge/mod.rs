//! Edge platform adapter.
//!
//! # Data Flow
//! ```text
//! viewer-request event (JSON)
//!     → event.rs (EdgeEvent: uri, querystring map, headers map)
//!     → NormalizedRequest (host header, uri, decoded query)
//!     → routing/ (resolve)
//!     → EdgeOutcome: redirect response object, or the request untouched
//! ```
//!
//! # Design Decisions
//! - Fields the resolver doesn't read are carried through verbatim
//! - A missing query map is an empty query
//! - A missing `host` header is the empty hostname

pub mod event;

use thiserror::Error;

use crate::routing::{self, RedirectResult, ResolveError, RouteTable};

pub use event::{EdgeEvent, EdgeOutcome, EdgeRequest, EdgeResponse, EdgeValue};

/// Errors from the JSON entry point.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("invalid event JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Resolve an edge event; pass the request through when no rule matches.
pub fn handle_event(table: &RouteTable, event: EdgeEvent) -> Result<EdgeOutcome, ResolveError> {
    let request = event.request;
    let normalized = request.normalize();

    Ok(match routing::resolve(table, &normalized)? {
        RedirectResult::Redirect(redirect) => EdgeOutcome::Response(EdgeResponse::from(redirect)),
        RedirectResult::NoRedirect => EdgeOutcome::Request(request),
    })
}

/// JSON in, JSON out.
pub fn handle_event_json(table: &RouteTable, event: &str) -> Result<String, EventError> {
    let event: EdgeEvent = serde_json::from_str(event)?;
    let outcome = handle_event(table, event)?;
    Ok(serde_json::to_string_pretty(&outcome)?)
}
