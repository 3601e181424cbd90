//! Input sanitization and small shared helpers

use super::constants::{ADDRESS_MAX_LEN, ADDRESS_MIN_LEN, ADDRESS_PREFIX};

/// Trim and validate a classic address.
///
/// Returns `None` unless the trimmed value starts with the address prefix
/// and its length is within the accepted range.
pub fn sanitize_wallet_input(raw: &str) -> Option<String> {
    let wallet = raw.trim();
    if wallet.is_empty() || !wallet.starts_with(ADDRESS_PREFIX) {
        return None;
    }
    let len = wallet.chars().count();
    if (ADDRESS_MIN_LEN..=ADDRESS_MAX_LEN).contains(&len) {
        Some(wallet.to_string())
    } else {
        None
    }
}

/// Next index in a ring of `total` slots. A zero-sized ring behaves as size 1.
#[inline]
pub fn rotate_fallback(index: usize, total: usize) -> usize {
    (index + 1) % total.max(1)
}
