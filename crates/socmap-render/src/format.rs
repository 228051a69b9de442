//! Hex formatting shared by the artifacts.

/// Zero-padded 16-digit lowercase hex, `0x`-prefixed (e.g. `0x000000000000fff0`).
pub fn hex_u64(value: u64) -> String {
    format!("0x{value:016x}")
}

/// Unpadded lowercase hex, `0x`-prefixed (e.g. `0x10000`).
pub fn hex(value: u64) -> String {
    format!("0x{value:x}")
}
