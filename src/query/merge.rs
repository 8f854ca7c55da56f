//! Query parameter merging.
//!
//! Overrides replace values in place; new keys are appended in
//! override order. Nothing is ever removed.

use super::QueryParams;

/// Merge `overrides` on top of a copy of `base`.
pub fn merge(base: &QueryParams, overrides: &QueryParams) -> QueryParams {
    let mut merged = base.clone();
    for (key, value) in overrides {
        // IndexMap::insert keeps the slot of an existing key.
        merged.insert(key.clone(), value.clone());
    }
    merged
}
