//! Header propagation between the two legs of an exchange.

use axum::http::{HeaderMap, HeaderName};

/// Append every header of `src` to `dst`, except the names in `skip`.
///
/// Multi-valued headers keep all their values in their original order.
pub fn copy_headers(src: &HeaderMap, dst: &mut HeaderMap, skip: &[HeaderName]) {
    for (name, value) in src.iter() {
        if skip.contains(name) {
            continue;
        }
        dst.append(name.clone(), value.clone());
    }
}
