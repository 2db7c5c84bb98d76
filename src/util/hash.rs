//! Deterministic identifiers derived from text.
//!
//! Every generated object key (plist object IDs, filter GUIDs, solution
//! folder GUIDs) comes from here, so regenerating a project without content
//! changes yields byte-identical identifiers on every machine.

use sha2::{Digest, Sha256};

/// Length of a plist object key.
pub const OBJECT_KEY_LEN: usize = 24;

/// Length of a GUID in hex digits (without separators).
pub const GUID_LEN: usize = 32;

/// Compute the upper-case SHA256 hex digest of a byte slice.
pub fn sha256_upper(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode_upper(hasher.finalize())
}

/// Derive a fixed-length identifier from a string.
///
/// The identifier is the upper-case hex SHA256 of the UTF-8 input, truncated
/// to `length` characters. Lengths beyond one digest (64 characters) are
/// served by chaining: each further block is the SHA256 of the previous
/// block's hex text.
pub fn hash_for_path(path: &str, length: usize) -> String {
    let mut out = String::with_capacity(length);
    let mut block = sha256_upper(path.as_bytes());
    loop {
        let needed = length - out.len();
        if needed <= block.len() {
            out.push_str(&block[..needed]);
            return out;
        }
        out.push_str(&block);
        block = sha256_upper(block.as_bytes());
    }
}

/// Derive an upper-case GUID (`XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX`, no braces).
pub fn derive_guid(path: &str) -> String {
    format_guid(&hash_for_path(path, GUID_LEN))
}

/// Split 32 hex digits into the 8-4-4-4-12 GUID layout.
pub fn format_guid(hex32: &str) -> String {
    debug_assert_eq!(hex32.len(), GUID_LEN);
    format!(
        "{}-{}-{}-{}-{}",
        &hex32[0..8],
        &hex32[8..12],
        &hex32[12..16],
        &hex32[16..20],
        &hex32[20..32]
    )
}
