//! Fixed-length hex codec.

use crate::error::{IdentityError, Result};

/// Lowercase hex encoding of `bytes`.
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Decode `input` into exactly `N` bytes.
///
/// Accepts either case. `what` names the value in the error message.
pub fn decode_fixed<const N: usize>(what: &'static str, input: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(input).map_err(|source| IdentityError::InvalidHex { what, source })?;
    to_array(what, &bytes)
}

/// Copy a slice into a fixed-size array, rejecting any other length.
pub fn to_array<const N: usize>(what: &'static str, bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| IdentityError::InvalidLength {
        what,
        expected: N,
        found: bytes.len(),
    })
}

/// True when `input` is non-empty, even-length, and made only of hex digits.
pub(crate) fn is_hex(input: &str) -> bool {
    !input.is_empty() && input.len() % 2 == 0 && input.bytes().all(|b| b.is_ascii_hexdigit())
}
