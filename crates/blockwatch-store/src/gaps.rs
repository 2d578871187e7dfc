//! Interior gap discovery over an ordered set of stored heights.
//!
//! A gap is a maximal run of missing consecutive heights strictly between
//! the minimum and maximum stored heights. Heights outside the stored range
//! are never proposed.

use blockwatch_types::BlockNumber;

/// Enumerate missing heights inside `[first, last]`, ascending, truncated
/// to `limit`.
///
/// `heights` must be sorted ascending without duplicates; both store
/// adapters guarantee that. An empty or single-element input has no
/// interior and yields nothing.
pub fn missing_in_range(heights: &[BlockNumber], limit: usize) -> Vec<BlockNumber> {
    let mut missing = Vec::new();
    if heights.len() < 2 || limit == 0 {
        return missing;
    }

    for pair in heights.windows(2) {
        let (low, high) = (pair[0], pair[1]);
        if high > low + 1 {
            for n in low + 1..high {
                missing.push(n);
                if missing.len() == limit {
                    return missing;
                }
            }
        }
    }

    missing
}
