//! Edge redirect service library.
//!
//! Resolves a request (hostname, path, query) against an ordered, per-host
//! table of redirect rules and yields either a 301/302 redirect or a
//! pass-through signal.
//!
//! ```
//! use edge_redirect::routing::{resolve, NormalizedRequest, RouteTable, Rule};
//!
//! let table = RouteTable::new().with_host(
//!     "app.domain.com",
//!     vec![Rule::new(r"/old/path/posts/(\d+)", "https://different-domain.com/article/$1").regex()],
//! );
//!
//! let request = NormalizedRequest::from_raw_query("app.domain.com", "/old/path/posts/42", "");
//! let result = resolve(&table, &request).unwrap();
//! assert_eq!(result.redirect().unwrap().location, "https://different-domain.com/article/42");
//! ```

pub mod config;
pub mod edge;
pub mod http;
pub mod observability;
pub mod query;
pub mod routing;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use routing::{resolve, NormalizedRequest, RedirectResolver, RedirectResult, RouteTable, Rule};
