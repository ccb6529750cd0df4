//! Bech32 display encoding for key material (`npub` / `nsec`).
//!
//! Encode-only. These strings are for humans and client import; nothing in
//! derivation, signing or verification ever reads them back.

use crate::error::{IdentityError, Result};

/// Prefix for public keys.
pub const NPUB_HRP: &str = "npub";

/// Prefix for secret seeds.
pub const NSEC_HRP: &str = "nsec";

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

const CHECKSUM_LENGTH: usize = 6;

/// Encode `data` under the human-readable prefix `hrp`.
///
/// The prefix must be non-empty lowercase printable ASCII and the payload
/// must be non-empty.
pub fn encode(hrp: &str, data: &[u8]) -> Result<String> {
    let valid_hrp = !hrp.is_empty()
        && hrp
            .bytes()
            .all(|b| (33..=126).contains(&b) && !b.is_ascii_uppercase());
    if !valid_hrp {
        return Err(IdentityError::InvalidHrp(hrp.to_string()));
    }
    if data.is_empty() {
        return Err(IdentityError::EmptyPayload);
    }
    Ok(encode_unchecked(hrp, data))
}

/// `npub1...` form of a public key.
pub fn npub(public_key: &[u8; 32]) -> String {
    encode_unchecked(NPUB_HRP, public_key)
}

/// `nsec1...` form of a secret seed.
pub fn nsec(seed: &[u8; 32]) -> String {
    encode_unchecked(NSEC_HRP, seed)
}

fn encode_unchecked(hrp: &str, data: &[u8]) -> String {
    let values = to_base32(data);
    let checksum = create_checksum(hrp, &values);

    let mut out = String::with_capacity(hrp.len() + 1 + values.len() + CHECKSUM_LENGTH);
    out.push_str(hrp);
    out.push('1');
    out.extend(
        values
            .iter()
            .chain(checksum.iter())
            .map(|&v| CHARSET[usize::from(v)] as char),
    );
    out
}

/// Regroup 8-bit bytes into 5-bit values, zero-padding the last group.
fn to_base32(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity((data.len() * 8).div_ceil(5));
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for &byte in data {
        acc = ((acc << 8) | u32::from(byte)) & 0xfff;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(((acc >> bits) & 31) as u8);
        }
    }
    if bits > 0 {
        out.push(((acc << (5 - bits)) & 31) as u8);
    }
    out
}

fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> impl Iterator<Item = u8> + '_ {
    hrp.bytes()
        .map(|b| b >> 5)
        .chain(std::iter::once(0))
        .chain(hrp.bytes().map(|b| b & 31))
}

fn create_checksum(hrp: &str, values: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let input = hrp_expand(hrp)
        .chain(values.iter().copied())
        .chain([0u8; CHECKSUM_LENGTH]);
    let pm = polymod(input) ^ 1;

    let mut checksum = [0u8; CHECKSUM_LENGTH];
    for (i, slot) in checksum.iter_mut().enumerate() {
        *slot = ((pm >> (5 * (5 - i))) & 31) as u8;
    }
    checksum
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn bip173_empty_data_checksum() {
        // "a12uel5l" is the canonical valid bech32 string with no data part.
        let pm = polymod(hrp_expand("a").chain([0u8; CHECKSUM_LENGTH])) ^ 1;
        let tail: String = (0..CHECKSUM_LENGTH)
            .map(|i| CHARSET[((pm >> (5 * (5 - i))) & 31) as usize] as char)
            .collect();
        assert_eq!(tail, "2uel5l");
    }

    #[test]
    fn zero_key_npub() {
        assert_eq!(
            npub(&[0u8; 32]),
            "npub1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqzqujme"
        );
    }

    #[test]
    fn nsec_of_seed_one() {
        let mut seed = [0u8; 32];
        seed[31] = 1;
        assert_eq!(
            nsec(&seed),
            "nsec1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqsmhltgl"
        );
    }

    #[test]
    fn pads_final_group() {
        // 32 bytes = 256 bits -> 52 five-bit groups, the last one padded.
        assert_eq!(to_base32(&[0xff; 32]).len(), 52);
        assert_eq!(to_base32(&[0xff]), vec![31, 28]);
    }

    #[test]
    fn rejects_bad_prefix_and_empty_payload() {
        assert_matches!(encode("", b"x"), Err(IdentityError::InvalidHrp(_)));
        assert_matches!(encode("NPUB", b"x"), Err(IdentityError::InvalidHrp(_)));
        assert_matches!(encode("n pub", b"x"), Err(IdentityError::InvalidHrp(_)));
        assert_matches!(encode("npub", b""), Err(IdentityError::EmptyPayload));
    }

    #[test]
    fn encode_matches_helpers() {
        let key = [0x42u8; 32];
        assert_eq!(encode(NPUB_HRP, &key).unwrap(), npub(&key));
        assert_eq!(encode(NSEC_HRP, &key).unwrap(), nsec(&key));
    }
}
