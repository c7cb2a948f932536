//! Address derivation and Base58 encoding (spec §3 "Address", §4.2).
//!
//! `Address = Base58( BLAKE3(pubkey)[12..32] )`, no checksum, no version byte.

use crate::error::DisplayError;
use crate::hash::{Blake3Hash, StreamingHash};

pub const ADDRESS_LEN: usize = 20;
pub const ADDRESS_BASE58_MAX_LEN: usize = 35;

const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A 20-byte SUM Chain address.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

/// Derives the 20-byte address from a 32-byte Ed25519 public key:
/// `BLAKE3(pubkey)[12..32]`. The intermediate 32-byte hash is zeroized
/// before returning (spec §4.2).
pub fn address_from_pubkey(pubkey: &[u8; 32]) -> Address {
    let mut digest = [0u8; 32];
    Blake3Hash::hash_once(pubkey, &mut digest);

    let mut addr = [0u8; ADDRESS_LEN];
    addr.copy_from_slice(&digest[12..32]);

    zeroize::Zeroize::zeroize(&mut digest);
    Address(addr)
}

/// Encodes `input` as Base58 (Bitcoin alphabet, no checksum) into a
/// fixed-size string, per the exact algorithm in spec §4.2:
///
/// 1. Count leading zero bytes `z`.
/// 2. Repeatedly long-divide the remaining big-endian base-256 digits by
///    58, emitting the remainder as the next symbol (least-significant
///    digit first).
/// 3. Reverse the emitted digits, then prepend `z` copies of `'1'`.
///
/// Rejects inputs longer than 32 bytes (this bounds the scratch buffer) and
/// output buffers too small to hold the result.
pub fn base58_encode(input: &[u8]) -> Result<String, DisplayError> {
    const MAX_INPUT_LEN: usize = 32;

    if input.len() > MAX_INPUT_LEN {
        return Err(DisplayError::BufferTooSmall);
    }
    if input.is_empty() {
        return Ok(String::new());
    }

    let mut scratch = [0u8; MAX_INPUT_LEN];
    scratch[..input.len()].copy_from_slice(input);
    let scratch = &mut scratch[..input.len()];

    let leading_zeros = scratch.iter().take_while(|&&b| b == 0).count();

    let mut reversed_digits: Vec<u8> = Vec::with_capacity(input.len() * 2);
    let mut start = leading_zeros;
    while start < scratch.len() {
        let mut carry: u32 = 0;
        for byte in scratch[start..].iter_mut() {
            carry = carry * 256 + *byte as u32;
            *byte = (carry / 58) as u8;
            carry %= 58;
        }
        reversed_digits.push(BASE58_ALPHABET[carry as usize]);

        while start < scratch.len() && scratch[start] == 0 {
            start += 1;
        }
    }

    let total_len = leading_zeros + reversed_digits.len();
    if total_len > ADDRESS_BASE58_MAX_LEN - 1 {
        return Err(DisplayError::BufferTooSmall);
    }

    let mut out = String::with_capacity(total_len);
    out.extend(std::iter::repeat('1').take(leading_zeros));
    out.extend(reversed_digits.iter().rev().map(|&b| b as char));

    Ok(out)
}

/// Encodes a 20-byte address as Base58 (spec §4.2 via [`base58_encode`]).
pub fn address_to_base58(address: &Address) -> Result<String, DisplayError> {
    base58_encode(&address.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_vector() {
        // "Hello World" -> well-known Base58 test vector (no checksum).
        let encoded = base58_encode(b"Hello World").unwrap();
        assert_eq!(encoded, "JxF12TrwUP45BMd");
    }

    #[test]
    fn leading_zero_bytes_become_leading_ones() {
        let input = [0u8, 0u8, 1u8, 2u8, 3u8];
        let encoded = base58_encode(&input).unwrap();
        let leading_ones = encoded.chars().take_while(|&c| c == '1').count();
        assert_eq!(leading_ones, 2);
    }

    #[test]
    fn all_zero_input_is_all_ones() {
        let input = [0u8; 20];
        let encoded = base58_encode(&input).unwrap();
        assert_eq!(encoded, "1".repeat(20));
    }

    #[test]
    fn rejects_oversize_input() {
        let input = [1u8; 33];
        assert_eq!(base58_encode(&input), Err(DisplayError::BufferTooSmall));
    }

    #[test]
    fn alphabet_excludes_ambiguous_characters() {
        for forbidden in ['0', 'O', 'I', 'l'] {
            assert!(!BASE58_ALPHABET.contains(&(forbidden as u8)));
        }
    }

    #[test]
    fn address_round_trip_properties() {
        for seed in 0u8..=255u8 {
            let pubkey = [seed; 32];
            let address = address_from_pubkey(&pubkey);
            let encoded = address_to_base58(&address).unwrap();
            assert!(encoded.len() <= 34);
            assert!(!encoded.is_empty() || address.0 == [0u8; 20]);
            assert!(encoded.chars().all(|c| BASE58_ALPHABET.contains(&(c as u8))));

            let leading_zero_bytes = address.0.iter().take_while(|&&b| b == 0).count();
            let leading_ones = encoded.chars().take_while(|&c| c == '1').count();
            assert_eq!(leading_ones, leading_zero_bytes);
        }
    }

    #[test]
    fn address_matches_blake3_slice() {
        let pubkey = [0x42u8; 32];
        let address = address_from_pubkey(&pubkey);
        let mut full_hash = [0u8; 32];
        Blake3Hash::hash_once(&pubkey, &mut full_hash);
        assert_eq!(address.0, full_hash[12..32]);
    }
}
