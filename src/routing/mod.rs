//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, query)
//!     → resolver.rs (host lookup, ordered rule scan)
//!     → matcher.rs (evaluate one rule, substitute captures)
//!     → query/ (retain request params on the destination)
//!     → Return: Redirect or NoRedirect
//!
//! Route Table (at startup / reload):
//!     [routes."host"] rule lists from config
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Route table immutable at runtime, shared without locks
//! - Rule order is authored order; first match wins
//! - A `"*"` host key supplies rules for unknown hosts
//! - A `"*"` path pattern matches unconditionally

pub mod error;
pub mod matcher;
pub mod resolver;
pub mod rule;

pub use error::{ResolveError, Result};
pub use matcher::{MatchOutcome, RuleMatcher};
pub use resolver::{resolve, NormalizedRequest, RedirectResolver, RedirectResult};
pub use rule::{RouteTable, Rule, DEFAULT_PATTERN};
