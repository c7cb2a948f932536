//! Streaming transaction parser (spec §3 "Parsed transaction", §4.3).
//!
//! Wire format (all multi-byte integers little-endian):
//!
//! ```text
//! version      1 byte
//! chain_id     8 bytes
//! sender       20 bytes
//! nonce        8 bytes
//! gas_price    8 bytes
//! gas_limit    8 bytes
//! tx_type      1 byte   (only 0 = Transfer supported)
//! recipient    20 bytes (Transfer only)
//! amount       8 bytes  (Transfer only)
//! ```
//!
//! A valid Transfer transaction is exactly 82 bytes on the wire.

use crate::address::ADDRESS_LEN;
use crate::error::ParseError;

pub const MAX_TX_SIZE: usize = 8192;

/// Width of the `amount` field. Named rather than inlined so widening to a
/// 16-byte (u128) amount (spec §9 open question (b)) is a one-line change.
const AMOUNT_FIELD_LEN: usize = 8;

pub const TX_TYPE_TRANSFER: u8 = 0x00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Version,
    ChainId,
    Sender,
    Nonce,
    GasPrice,
    GasLimit,
    TxType,
    Recipient,
    Amount,
    Done,
    Error,
}

impl ParserState {
    /// Width in bytes of the field currently being assembled, or `None` for
    /// the terminal states.
    fn field_width(self) -> Option<usize> {
        match self {
            ParserState::Version => Some(1),
            ParserState::ChainId => Some(8),
            ParserState::Sender => Some(ADDRESS_LEN),
            ParserState::Nonce => Some(8),
            ParserState::GasPrice => Some(8),
            ParserState::GasLimit => Some(8),
            ParserState::TxType => Some(1),
            ParserState::Recipient => Some(ADDRESS_LEN),
            ParserState::Amount => Some(AMOUNT_FIELD_LEN),
            ParserState::Done | ParserState::Error => None,
        }
    }
}

/// The decoded fields of a transaction, in wire order, plus the derived fee.
#[derive(Debug, Clone, Default)]
pub struct ParsedTransaction {
    pub version: u8,
    pub chain_id: u64,
    pub sender: [u8; ADDRESS_LEN],
    pub nonce: u64,
    pub gas_price: u64,
    pub gas_limit: u64,
    pub tx_type: u8,
    pub recipient: [u8; ADDRESS_LEN],
    pub amount: u64,

    pub fee_low: u64,
    pub fee_high: u64,
    pub fee_overflow: bool,
}

/// Computes `fee = gas_price * gas_limit` as a full 128-bit product via
/// 32x32 partial-product accumulation with explicit carries (spec §4.3),
/// and reports whether the high 64 bits are non-zero.
pub fn compute_fee(gas_price: u64, gas_limit: u64) -> (u64, u64, bool) {
    let a_lo = gas_price as u32 as u64;
    let a_hi = (gas_price >> 32) as u32 as u64;
    let b_lo = gas_limit as u32 as u64;
    let b_hi = (gas_limit >> 32) as u32 as u64;

    let lo_lo = a_lo * b_lo;
    let lo_hi = a_lo * b_hi;
    let hi_lo = a_hi * b_lo;
    let hi_hi = a_hi * b_hi;

    let mid = lo_hi.wrapping_add(hi_lo);
    let carry_from_mid: u64 = if mid < lo_hi { 1 } else { 0 };

    let result_lo = lo_lo.wrapping_add(mid << 32);
    let carry_to_hi: u64 = if result_lo < lo_lo { 1 } else { 0 };

    let result_hi = hi_hi
        .wrapping_add(mid >> 32)
        .wrapping_add(carry_from_mid << 32)
        .wrapping_add(carry_to_hi);

    (result_lo, result_hi, result_hi != 0)
}

/// Streaming parser context: current state, offset within the field being
/// assembled, a 32-byte scratch accumulator, the in-progress parsed record,
/// and the running total of bytes consumed (spec §3 "Parser context").
pub struct TxParser {
    state: ParserState,
    field_offset: usize,
    scratch: [u8; 32],
    parsed: ParsedTransaction,
    total_consumed: usize,
}

impl TxParser {
    pub fn new() -> Self {
        TxParser {
            state: ParserState::Version,
            field_offset: 0,
            scratch: [0u8; 32],
            parsed: ParsedTransaction::default(),
            total_consumed: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = TxParser::new();
    }

    pub fn is_done(&self) -> bool {
        self.state == ParserState::Done
    }

    pub fn has_error(&self) -> bool {
        self.state == ParserState::Error
    }

    pub fn total_consumed(&self) -> usize {
        self.total_consumed
    }

    /// Returns the parsed record. Only meaningful once `is_done()` is true.
    pub fn parsed(&self) -> &ParsedTransaction {
        &self.parsed
    }

    /// Feeds `data` to the parser. Returns the number of bytes actually
    /// absorbed; the caller must treat `consumed != data.len()` as a
    /// protocol error (trailing bytes, spec §4.3 "Chunk semantics").
    ///
    /// A no-op once the parser has reached `Done` or `Error` (spec §3
    /// invariant ii).
    pub fn consume(&mut self, data: &[u8]) -> usize {
        if matches!(self.state, ParserState::Done | ParserState::Error) {
            return 0;
        }

        let mut consumed = 0usize;

        while consumed < data.len()
            && !matches!(self.state, ParserState::Done | ParserState::Error)
        {
            if self.total_consumed >= MAX_TX_SIZE {
                self.state = ParserState::Error;
                break;
            }

            let Some(field_width) = self.state.field_width() else {
                self.state = ParserState::Error;
                break;
            };

            let needed = field_width - self.field_offset;
            let available = data.len() - consumed;
            let take = needed.min(available);

            self.scratch[self.field_offset..self.field_offset + take]
                .copy_from_slice(&data[consumed..consumed + take]);
            self.field_offset += take;
            consumed += take;
            self.total_consumed += take;

            if self.field_offset >= field_width {
                if self.process_complete_field().is_err() {
                    self.state = ParserState::Error;
                    break;
                }
                self.field_offset = 0;
            }
        }

        consumed
    }

    fn read_u64_le(&self) -> u64 {
        u64::from_le_bytes(self.scratch[0..8].try_into().unwrap())
    }

    fn process_complete_field(&mut self) -> Result<(), ParseError> {
        match self.state {
            ParserState::Version => {
                self.parsed.version = self.scratch[0];
                if self.parsed.version != 1 {
                    return Err(ParseError::UnsupportedVersion);
                }
                self.state = ParserState::ChainId;
            }
            ParserState::ChainId => {
                self.parsed.chain_id = self.read_u64_le();
                self.state = ParserState::Sender;
            }
            ParserState::Sender => {
                self.parsed.sender.copy_from_slice(&self.scratch[..ADDRESS_LEN]);
                self.state = ParserState::Nonce;
            }
            ParserState::Nonce => {
                self.parsed.nonce = self.read_u64_le();
                self.state = ParserState::GasPrice;
            }
            ParserState::GasPrice => {
                self.parsed.gas_price = self.read_u64_le();
                self.state = ParserState::GasLimit;
            }
            ParserState::GasLimit => {
                self.parsed.gas_limit = self.read_u64_le();
                self.state = ParserState::TxType;
            }
            ParserState::TxType => {
                self.parsed.tx_type = self.scratch[0];
                if self.parsed.tx_type != TX_TYPE_TRANSFER {
                    return Err(ParseError::UnsupportedTxType);
                }
                self.state = ParserState::Recipient;
            }
            ParserState::Recipient => {
                self.parsed.recipient.copy_from_slice(&self.scratch[..ADDRESS_LEN]);
                self.state = ParserState::Amount;
            }
            ParserState::Amount => {
                self.parsed.amount = self.read_u64_le();
                let (fee_low, fee_high, fee_overflow) =
                    compute_fee(self.parsed.gas_price, self.parsed.gas_limit);
                self.parsed.fee_low = fee_low;
                self.parsed.fee_high = fee_high;
                self.parsed.fee_overflow = fee_overflow;
                self.state = ParserState::Done;
            }
            ParserState::Done | ParserState::Error => {
                return Err(ParseError::ImpossibleState);
            }
        }
        Ok(())
    }
}

impl Default for TxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl zeroize::Zeroize for TxParser {
    fn zeroize(&mut self) {
        self.scratch.zeroize();
        self.field_offset = 0;
        self.total_consumed = 0;
        self.parsed = ParsedTransaction::default();
        self.state = ParserState::Error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transfer() -> Vec<u8> {
        let mut tx = Vec::with_capacity(82);
        tx.push(1u8); // version
        tx.extend_from_slice(&1u64.to_le_bytes()); // chain_id
        tx.extend_from_slice(&[0x11u8; 20]); // sender
        tx.extend_from_slice(&42u64.to_le_bytes()); // nonce
        tx.extend_from_slice(&1000u64.to_le_bytes()); // gas_price
        tx.extend_from_slice(&21_000u64.to_le_bytes()); // gas_limit
        tx.push(0u8); // tx_type = Transfer
        tx.extend_from_slice(&[0x22u8; 20]); // recipient
        tx.extend_from_slice(&1_000_000u64.to_le_bytes()); // amount
        assert_eq!(tx.len(), 82);
        tx
    }

    #[test]
    fn parses_well_formed_transfer_one_shot() {
        let tx = sample_transfer();
        let mut parser = TxParser::new();
        let consumed = parser.consume(&tx);
        assert_eq!(consumed, tx.len());
        assert!(parser.is_done());
        assert!(!parser.has_error());

        let parsed = parser.parsed();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.chain_id, 1);
        assert_eq!(parsed.sender, [0x11u8; 20]);
        assert_eq!(parsed.nonce, 42);
        assert_eq!(parsed.gas_price, 1000);
        assert_eq!(parsed.gas_limit, 21_000);
        assert_eq!(parsed.tx_type, 0);
        assert_eq!(parsed.recipient, [0x22u8; 20]);
        assert_eq!(parsed.amount, 1_000_000);
        assert_eq!(parsed.fee_low, 21_000_000);
        assert_eq!(parsed.fee_high, 0);
        assert!(!parsed.fee_overflow);
    }

    #[test]
    fn chunking_at_every_boundary_matches_one_shot() {
        let tx = sample_transfer();

        for chunk_size in 1..=tx.len() {
            let mut parser = TxParser::new();
            let mut consumed_total = 0;
            for chunk in tx.chunks(chunk_size) {
                consumed_total += parser.consume(chunk);
            }
            assert_eq!(consumed_total, tx.len(), "chunk_size={chunk_size}");
            assert!(parser.is_done(), "chunk_size={chunk_size}");
            assert_eq!(parser.parsed().amount, 1_000_000);
            assert_eq!(parser.parsed().fee_low, 21_000_000);
        }
    }

    #[test]
    fn single_byte_chunks_match_one_shot() {
        let tx = sample_transfer();
        let mut parser = TxParser::new();
        let mut total = 0;
        for byte in &tx {
            total += parser.consume(std::slice::from_ref(byte));
        }
        assert_eq!(total, tx.len());
        assert!(parser.is_done());
    }

    #[test]
    fn rejects_wrong_version() {
        let mut tx = sample_transfer();
        tx[0] = 2;
        let mut parser = TxParser::new();
        parser.consume(&tx);
        assert!(parser.has_error());
    }

    #[test]
    fn rejects_unsupported_tx_type() {
        let mut tx = sample_transfer();
        tx[1 + 8 + 20 + 8 + 8 + 8] = 1; // tx_type offset
        let mut parser = TxParser::new();
        parser.consume(&tx);
        assert!(parser.has_error());
    }

    #[test]
    fn is_noop_after_done() {
        let tx = sample_transfer();
        let mut parser = TxParser::new();
        parser.consume(&tx);
        assert!(parser.is_done());
        let consumed = parser.consume(&[1, 2, 3]);
        assert_eq!(consumed, 0);
    }

    #[test]
    fn is_noop_after_error() {
        let mut tx = sample_transfer();
        tx[0] = 9;
        let mut parser = TxParser::new();
        parser.consume(&tx);
        assert!(parser.has_error());
        let consumed = parser.consume(&[1, 2, 3]);
        assert_eq!(consumed, 0);
    }

    #[test]
    fn size_cap_trips_before_structural_end() {
        let mut parser = TxParser::new();
        parser.total_consumed = MAX_TX_SIZE;
        let consumed = parser.consume(&[1, 2, 3]);
        assert_eq!(consumed, 0);
        assert!(parser.has_error());
    }

    #[test]
    fn fee_matches_exact_128_bit_product_for_sample_values() {
        let cases: &[(u64, u64)] = &[
            (0, 0),
            (1, 1),
            (u64::MAX, 1),
            (1, u64::MAX),
            (u64::MAX, u64::MAX),
            (1_000, 21_000),
            (0xFFFF_FFFF, 0xFFFF_FFFF),
            (u64::MAX, 0),
        ];
        for &(a, b) in cases {
            let (low, high, overflow) = compute_fee(a, b);
            let expected = (a as u128) * (b as u128);
            let actual = ((high as u128) << 64) | low as u128;
            assert_eq!(actual, expected, "a={a} b={b}");
            assert_eq!(overflow, high != 0, "a={a} b={b}");
        }
    }

    #[test]
    fn fee_overflow_on_max_gas_values() {
        let (_, high, overflow) = compute_fee(u64::MAX, u64::MAX);
        assert!(overflow);
        assert_ne!(high, 0);
    }
}
