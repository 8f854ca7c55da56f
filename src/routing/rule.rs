//! Redirect rules and the per-host route table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Path pattern of the default rule; matches every request.
pub const DEFAULT_PATTERN: &str = "*";

/// Host key whose rules apply to hosts without their own entry.
pub const DEFAULT_HOST: &str = "*";

/// One redirect rule as authored in the route configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rule {
    /// Literal path (optionally with query string), a regex, or `"*"`.
    #[serde(rename = "path")]
    pub path_pattern: String,

    /// Absolute destination URL; may contain `$N` placeholders for regex rules.
    #[serde(rename = "destination")]
    pub destination_template: String,

    /// Match `path_pattern` as an unanchored regex instead of exact equality.
    #[serde(default, alias = "useRegex")]
    pub use_regex: bool,

    /// Compare against path plus encoded query string instead of path alone.
    #[serde(default, alias = "considerParams")]
    pub consider_params: bool,

    /// 302 Found instead of 301 Moved Permanently.
    #[serde(default, alias = "isTemporary")]
    pub is_temporary: bool,

    /// Carry the request's query parameters over to the destination.
    #[serde(default, alias = "retainParams")]
    pub retain_params: bool,
}

impl Rule {
    /// Literal, permanent rule with every flag off.
    pub fn new(path_pattern: impl Into<String>, destination_template: impl Into<String>) -> Self {
        Self {
            path_pattern: path_pattern.into(),
            destination_template: destination_template.into(),
            use_regex: false,
            consider_params: false,
            is_temporary: false,
            retain_params: false,
        }
    }

    pub fn regex(mut self) -> Self {
        self.use_regex = true;
        self
    }

    pub fn consider_params(mut self) -> Self {
        self.consider_params = true;
        self
    }

    pub fn temporary(mut self) -> Self {
        self.is_temporary = true;
        self
    }

    pub fn retain_params(mut self) -> Self {
        self.retain_params = true;
        self
    }

    /// True for the unconditional `"*"` rule.
    #[inline]
    pub fn is_default(&self) -> bool {
        self.path_pattern == DEFAULT_PATTERN
    }
}

/// Ordered rule lists keyed by exact hostname, hosts in authored order.
///
/// Built once (startup or reload) and only read afterwards, so it can be
/// shared across request tasks behind an `Arc`.
///
/// # Example
///
/// ```
/// use edge_redirect::routing::{RouteTable, Rule};
///
/// let table = RouteTable::new()
///     .with_host("app.domain.com", vec![Rule::new("/", "https://example.com/app/")])
///     .with_host("*", vec![Rule::new("*", "https://example.com/")]);
///
/// assert_eq!(table.rules_for("app.domain.com").len(), 1);
/// // Unknown hosts get the "*" list
/// assert_eq!(table.rules_for("other.com")[0].path_pattern, "*");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RouteTable {
    hosts: IndexMap<String, Vec<Rule>>,
}

impl RouteTable {
    /// Create an empty table; every request resolves to no redirect.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the rule list for `host`.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.hosts.insert(host.into(), rules);
        self
    }

    /// Rules for `hostname`, falling back to the `"*"` list, then to none.
    pub fn rules_for(&self, hostname: &str) -> &[Rule] {
        self.hosts
            .get(hostname)
            .or_else(|| self.hosts.get(DEFAULT_HOST))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of host entries, including `"*"`.
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Total number of rules across all hosts.
    pub fn rule_count(&self) -> usize {
        self.hosts.values().map(Vec::len).sum()
    }

    /// Iterate host entries in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.hosts
            .iter()
            .map(|(host, rules)| (host.as_str(), rules.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
