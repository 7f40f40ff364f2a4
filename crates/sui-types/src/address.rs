//! Address normalization utilities.
//!
//! Package identifiers show up in several spellings:
//! - Short form: "0x2"
//! - Full form: "0x0000000000000000000000000000000000000000000000000000000000000002"
//! - Without prefix: "2"
//!
//! Catalog keys and locator targets are always compared in the full form.

/// Number of hex digits in a 32-byte Sui address.
const ADDRESS_HEX_LEN: usize = 64;

fn strip_hex_prefix(addr: &str) -> &str {
    addr.strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr)
}

/// Normalize an address to lowercase with 0x prefix and full 64 hex characters.
///
/// No validation happens here; see [`normalize_address_checked`].
///
/// # Examples
///
/// ```
/// use sui_explorer_types::address::normalize_address;
///
/// assert_eq!(
///     normalize_address("0x2"),
///     "0x0000000000000000000000000000000000000000000000000000000000000002"
/// );
/// assert_eq!(
///     normalize_address("ABC"),
///     "0x0000000000000000000000000000000000000000000000000000000000000abc"
/// );
/// ```
pub fn normalize_address(addr: &str) -> String {
    let hex = strip_hex_prefix(addr.trim()).to_lowercase();
    format!("0x{:0>64}", hex)
}

/// Normalize an address, returning None if it's not a valid hex address.
///
/// # Examples
///
/// ```
/// use sui_explorer_types::address::normalize_address_checked;
///
/// assert_eq!(
///     normalize_address_checked("0x2"),
///     Some("0x0000000000000000000000000000000000000000000000000000000000000002".to_string())
/// );
/// assert_eq!(normalize_address_checked("not-hex"), None);
/// ```
pub fn normalize_address_checked(addr: &str) -> Option<String> {
    let hex = strip_hex_prefix(addr.trim());
    if hex.is_empty() || hex.len() > ADDRESS_HEX_LEN {
        return None;
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(normalize_address(hex))
}

/// Canonical form when the input is a hex address, the trimmed input otherwise.
///
/// Used wherever an identifier comes from the network and must not be dropped
/// just because it is spelled unexpectedly.
pub fn canonical_or_verbatim(addr: &str) -> String {
    normalize_address_checked(addr).unwrap_or_else(|| addr.trim().to_string())
}

/// Normalize an address to short form (minimal hex digits), for display.
///
/// # Examples
///
/// ```
/// use sui_explorer_types::address::normalize_address_short;
///
/// assert_eq!(normalize_address_short("0x0000000000000000000000000000000000000000000000000000000000000002"), "0x2");
/// assert_eq!(normalize_address_short("0x00abc"), "0xabc");
/// ```
pub fn normalize_address_short(addr: &str) -> String {
    let normalized = normalize_address(addr);
    let hex = normalized.strip_prefix("0x").unwrap_or(&normalized);
    let trimmed = hex.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", trimmed)
    }
}
