//! Converts a parsed transaction into human-readable display strings
//! (spec §3 "Parsed transaction" -> §4.4).

use crate::address::{address_to_base58, ADDRESS_BASE58_MAX_LEN};
use crate::error::DisplayError;
use crate::tx_parser::ParsedTransaction;

pub const AMOUNT_MAX_LEN: usize = 32;
pub const FEE_MAX_LEN: usize = 40;
pub const CHAIN_ID_MAX_LEN: usize = 24;

/// The fixed set of strings shown to the user before they approve a sign
/// request, in the order the display contract requires them to be
/// presented (spec §6 "Display contract"): chain_id, sender, recipient,
/// amount, fee, nonce.
#[derive(Debug, Clone, Default)]
pub struct TxDisplay {
    pub chain_id: String,
    pub sender: String,
    pub recipient: String,
    pub amount: String,
    pub fee: String,
    pub nonce: String,
}

/// Formats a u64 as a decimal string (reverse-then-flip digit emission).
pub fn format_u64_decimal(value: u64) -> String {
    value.to_string()
}

/// Formats the 128-bit fee as decimal, or the literal string `"Overflow"`
/// when `overflow` is set (spec §4.4).
///
/// When the high part is non-zero, division by 10 is expressed using the
/// identity `2^64 = 1844674407370955161 * 10 + 6` so the whole computation
/// stays in native 64-bit arithmetic, exactly as spec §4.4 prescribes.
pub fn format_fee(fee_low: u64, fee_high: u64, overflow: bool) -> String {
    if overflow {
        return "Overflow".to_string();
    }
    if fee_high == 0 {
        return format_u64_decimal(fee_low);
    }

    const Q_FACTOR: u64 = 1_844_674_407_370_955_161;
    const R_FACTOR: u64 = 6;

    let mut hi = fee_high;
    let mut lo = fee_low;
    let mut digits = Vec::with_capacity(40);

    while hi != 0 || lo != 0 {
        let hi_div = hi / 10;
        let hi_rem = hi % 10;

        let lo_contrib = hi_rem * R_FACTOR + lo;
        let lo_div = lo_contrib / 10;
        let lo_rem = lo_contrib % 10;

        let lo_new = hi_rem * Q_FACTOR + lo_div;

        digits.push(b'0' + lo_rem as u8);
        hi = hi_div;
        lo = lo_new;
    }

    digits.reverse();
    String::from_utf8(digits).expect("digits are ASCII")
}

/// Formats a 20-byte address as Base58 (spec §4.4).
pub fn format_address(addr: &[u8; 20]) -> Result<String, DisplayError> {
    address_to_base58(&crate::address::Address(*addr))
}

/// Builds the full display record for a parsed, done transaction. Buffer
/// bounds (spec §4.4) leave no room for a valid parse to overflow them;
/// a formatting failure here is therefore treated as a signing failure
/// rather than recovered from.
pub fn format_transaction(parsed: &ParsedTransaction) -> Result<TxDisplay, DisplayError> {
    let amount = format_u64_decimal(parsed.amount);
    let nonce = format_u64_decimal(parsed.nonce);
    let chain_id = format_u64_decimal(parsed.chain_id);
    let fee = format_fee(parsed.fee_low, parsed.fee_high, parsed.fee_overflow);
    let sender = format_address(&parsed.sender)?;
    let recipient = format_address(&parsed.recipient)?;

    if amount.len() + 1 > AMOUNT_MAX_LEN
        || nonce.len() + 1 > AMOUNT_MAX_LEN
        || chain_id.len() + 1 > CHAIN_ID_MAX_LEN
        || fee.len() + 1 > FEE_MAX_LEN
        || sender.len() + 1 > ADDRESS_BASE58_MAX_LEN
        || recipient.len() + 1 > ADDRESS_BASE58_MAX_LEN
    {
        return Err(DisplayError::BufferTooSmall);
    }

    Ok(TxDisplay {
        chain_id,
        sender,
        recipient,
        amount,
        fee,
        nonce,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero() {
        assert_eq!(format_u64_decimal(0), "0");
    }

    #[test]
    fn formats_u64_max() {
        assert_eq!(format_u64_decimal(u64::MAX), "18446744073709551615");
    }

    #[test]
    fn fee_without_overflow_formats_low_part_only() {
        assert_eq!(format_fee(21_000_000, 0, false), "21000000");
    }

    #[test]
    fn fee_overflow_formats_as_overflow_literal() {
        assert_eq!(format_fee(123, 456, true), "Overflow");
    }

    #[test]
    fn fee_with_nonzero_high_part_matches_128_bit_value() {
        // (1 << 64) + 5 -> fee_low = 5, fee_high = 1
        let formatted = format_fee(5, 1, false);
        let expected = (1u128 << 64) + 5;
        assert_eq!(formatted, expected.to_string());
    }

    #[test]
    fn fee_matches_u128_division_across_many_values() {
        let cases: &[(u64, u64)] = &[
            (0, 1),
            (1, 0),
            (u64::MAX, 1),
            (u64::MAX, u64::MAX),
            (0x1234_5678, 0x9ABC_DEF0),
        ];
        for &(low, high) in cases {
            let expected = ((high as u128) << 64) | low as u128;
            assert_eq!(format_fee(low, high, false), expected.to_string());
        }
    }

    #[test]
    fn formats_well_formed_transaction() {
        let mut parsed = ParsedTransaction::default();
        parsed.chain_id = 1;
        parsed.sender = [0x11u8; 20];
        parsed.nonce = 42;
        parsed.recipient = [0x22u8; 20];
        parsed.amount = 1_000_000;
        parsed.fee_low = 21_000_000;

        let display = format_transaction(&parsed).unwrap();
        assert_eq!(display.chain_id, "1");
        assert_eq!(display.nonce, "42");
        assert_eq!(display.amount, "1000000");
        assert_eq!(display.fee, "21000000");
        assert!(!display.sender.is_empty());
        assert!(!display.recipient.is_empty());
    }
}
