//! Query string handling.
//!
//! # Data Flow
//! ```text
//! raw query string ("?a=1&b=2")
//!     → codec.rs (decode into ordered params)
//!     → merge.rs (overlay request params onto destination params)
//!     → codec.rs (encode back to "?a=1&b=2")
//! ```
//!
//! # Design Decisions
//! - Parameters are an ordered map; key order is part of the output
//! - Decoding is lenient: malformed pairs never fail a request

pub mod codec;
pub mod merge;

use indexmap::IndexMap;

/// Ordered mapping of decoded query parameter names to values.
pub type QueryParams = IndexMap<String, String>;

pub use codec::{decode, encode};
pub use merge::merge;
