//! Rule matching logic.
//!
//! # Responsibilities
//! - Build the comparison target (path, or path + query string)
//! - Match a rule by exact string, unanchored regex, or `"*"` default
//! - Substitute `$N` capture placeholders into the destination
//!
//! # Design Decisions
//! - Regexes are compiled per evaluation; an invalid one fails the request
//! - Regex search is unanchored, a partial match anywhere succeeds
//! - Unknown or non-participating groups substitute to `""`

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::query;
use crate::routing::error::{ResolveError, Result};
use crate::routing::resolver::NormalizedRequest;
use crate::routing::rule::Rule;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\d+)").expect("placeholder regex is valid"));

/// Result of evaluating one rule against one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    NoMatch,
    Matched {
        destination_template: String,
        /// Index 0 is the whole match, index `i` is group `i`; empty for
        /// literal and default rules.
        captures: Vec<Option<String>>,
    },
}

impl MatchOutcome {
    /// Destination with placeholders substituted, or `None` on no match.
    pub fn destination(&self) -> Option<String> {
        match self {
            MatchOutcome::NoMatch => None,
            MatchOutcome::Matched {
                destination_template,
                captures,
            } => Some(substitute(destination_template, captures)),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }
}

/// Evaluates a single rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleMatcher<'a> {
    rule: &'a Rule,
}

impl<'a> RuleMatcher<'a> {
    pub fn new(rule: &'a Rule) -> Self {
        Self { rule }
    }

    /// Evaluate the rule against `request`.
    pub fn evaluate(&self, request: &NormalizedRequest) -> Result<MatchOutcome> {
        let rule = self.rule;

        if rule.is_default() {
            return Ok(self.matched(Vec::new()));
        }

        let target = if rule.consider_params {
            format!("{}{}", request.path, query::encode(&request.query))
        } else {
            request.path.clone()
        };

        if !rule.use_regex {
            return Ok(if target == rule.path_pattern {
                self.matched(Vec::new())
            } else {
                MatchOutcome::NoMatch
            });
        }

        let regex = Regex::new(&rule.path_pattern)
            .map_err(|e| ResolveError::pattern_compile(&rule.path_pattern, e))?;

        Ok(match regex.captures(&target) {
            Some(caps) => {
                let captures = caps
                    .iter()
                    .map(|group| group.map(|m| m.as_str().to_string()))
                    .collect();
                self.matched(captures)
            }
            None => MatchOutcome::NoMatch,
        })
    }

    fn matched(&self, captures: Vec<Option<String>>) -> MatchOutcome {
        MatchOutcome::Matched {
            destination_template: self.rule.destination_template.clone(),
            captures,
        }
    }
}

/// Replace every `$N` in `template` with capture `N`.
///
/// Only applies when the pattern had at least one capturing group.
fn substitute(template: &str, captures: &[Option<String>]) -> String {
    if captures.len() <= 1 {
        return template.to_string();
    }

    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| captures.get(index))
                .and_then(|group| group.as_deref())
                .unwrap_or("")
                .to_string()
        })
        .into_owned()
}
