//! Redirect resolution.
//!
//! # Responsibilities
//! - Select the rule list for the request hostname
//! - Scan rules in order and stop at the first match
//! - Retain request query parameters on the destination when asked
//! - Produce a redirect or an explicit no-redirect
//!
//! # Design Decisions
//! - Pure computation over an immutable table; no locks, no I/O
//! - A `"*"` rule early in a list shadows later rules; not corrected here
//! - An invalid regex aborts the scan with an error instead of skipping

use std::sync::Arc;

use crate::http::response::{self, Redirect};
use crate::query::{self, QueryParams};
use crate::routing::error::Result;
use crate::routing::matcher::RuleMatcher;
use crate::routing::rule::{RouteTable, Rule};

/// Routing-relevant view of an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRequest {
    pub hostname: String,
    /// Path only, without the query string.
    pub path: String,
    pub query: QueryParams,
}

impl NormalizedRequest {
    pub fn new(hostname: impl Into<String>, path: impl Into<String>, query: QueryParams) -> Self {
        Self {
            hostname: hostname.into(),
            path: path.into(),
            query,
        }
    }

    /// Build from a path and a raw query string (`"a=1"` or `"?a=1"`).
    pub fn from_raw_query(hostname: impl Into<String>, path: impl Into<String>, raw_query: &str) -> Self {
        Self::new(hostname, path, query::decode(raw_query))
    }
}

/// Outcome of resolving a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectResult {
    /// No rule matched; forward the original request unchanged.
    NoRedirect,
    Redirect(Redirect),
}

impl RedirectResult {
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            RedirectResult::Redirect(redirect) => Some(redirect),
            RedirectResult::NoRedirect => None,
        }
    }
}

/// Resolver bound to one route table snapshot.
#[derive(Debug, Clone, Default)]
pub struct RedirectResolver {
    table: Arc<RouteTable>,
}

impl RedirectResolver {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn resolve(&self, request: &NormalizedRequest) -> Result<RedirectResult> {
        resolve(&self.table, request)
    }
}

impl From<RouteTable> for RedirectResolver {
    fn from(table: RouteTable) -> Self {
        Self::new(Arc::new(table))
    }
}

/// Resolve `request` against `table`.
pub fn resolve(table: &RouteTable, request: &NormalizedRequest) -> Result<RedirectResult> {
    for (index, rule) in table.rules_for(&request.hostname).iter().enumerate() {
        let Some(destination) = RuleMatcher::new(rule).evaluate(request)?.destination() else {
            continue;
        };

        tracing::debug!(
            hostname = %request.hostname,
            path = %request.path,
            rule_index = index,
            pattern = %rule.path_pattern,
            "Redirect rule matched"
        );

        let location = finalize(rule, destination, &request.query);
        return Ok(RedirectResult::Redirect(response::build(location, rule.is_temporary)));
    }

    tracing::debug!(
        hostname = %request.hostname,
        path = %request.path,
        "No redirect rule matched"
    );
    Ok(RedirectResult::NoRedirect)
}

fn finalize(rule: &Rule, destination: String, request_query: &QueryParams) -> String {
    if !rule.retain_params {
        return destination;
    }

    match destination.split_once('?') {
        Some((base, own_query)) => {
            let merged = query::merge(&query::decode(own_query), request_query);
            format!("{}{}", base, query::encode(&merged))
        }
        None => format!("{}{}", destination, query::encode(request_query)),
    }
}
