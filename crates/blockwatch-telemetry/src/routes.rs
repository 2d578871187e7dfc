//! Route-label normalization.
//!
//! Raw request paths carry unbounded values (heights, hashes, addresses,
//! UUIDs); recording them verbatim would explode the `route` label's
//! cardinality. Path segments are rewritten most-specific-first (UUID, then
//! 0x-prefixed hex, then bare 64-hex, then bare 40-hex, then decimal), and
//! any normalized route not on the allow-list collapses to `unknown`.

use std::collections::HashSet;

use lazy_static::lazy_static;
use uuid::Uuid;

lazy_static! {
    static ref ALLOWED_ROUTES: HashSet<&'static str> = [
        "/evm/blocks/health",
        "/evm/blocks/:id/latest",
        "/evm/blocks/:id/:id",
        "/health/liveness",
        "/health/readiness",
        "/metrics",
    ]
    .into_iter()
    .collect();
}

/// Rewrite identifier-shaped path segments to placeholders.
pub fn normalize_route(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        normalized.push('/');
        normalized.push_str(classify_segment(segment));
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

/// The value recorded into the `route` label: the normalized path if it is
/// a route we serve, `unknown` otherwise.
pub fn route_label(path: &str) -> String {
    let normalized = normalize_route(path);
    if ALLOWED_ROUTES.contains(normalized.as_str()) {
        normalized
    } else {
        "unknown".to_string()
    }
}

fn classify_segment(segment: &str) -> &str {
    // Hyphenated UUID form only; a bare 32-hex segment is not id-shaped.
    if segment.len() == 36 && Uuid::parse_str(segment).is_ok() {
        return ":id";
    }

    if let Some(rest) = segment.strip_prefix("0x").or_else(|| segment.strip_prefix("0X")) {
        if !rest.is_empty() && is_hex(rest) {
            return if rest.len() == 40 { ":address" } else { ":hash" };
        }
    }

    if is_hex(segment) {
        if segment.len() == 64 {
            return ":hash";
        }
        if segment.len() == 40 {
            return ":address";
        }
    }

    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        return ":id";
    }

    segment
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}
