//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, normalize host/path/query)
//!     → routing/ (resolve against the current route table)
//!     → response.rs (301/302 + Location)
//!       or forward to upstream on no redirect
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{Redirect, RedirectStatus};
pub use server::HttpServer;
