//! Wire-visible status words returned to the host after every command.
//!
//! One status word is returned per command (spec §6/§7); this is the single
//! place in the crate that knows the full code table.

/// A status word, as it appears on the wire: big-endian `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum StatusWord {
    Ok = 0x9000,
    WrongLength = 0x6700,
    SecurityCondition = 0x6982,
    UserRejected = 0x6985,
    InvalidData = 0x6A80,
    InvalidPath = 0x6A81,
    InvalidP1P2 = 0x6B00,
    InsNotSupported = 0x6D00,
    ClaNotSupported = 0x6E00,
    InternalError = 0x6F00,
    TxParseError = 0x6F01,
    TxOverflow = 0x6F02,
    SessionError = 0x6F03,
    TxTooLarge = 0x6F04,
}

impl StatusWord {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn to_be_bytes(self) -> [u8; 2] {
        self.code().to_be_bytes()
    }
}

impl From<StatusWord> for u16 {
    fn from(sw: StatusWord) -> u16 {
        sw.code()
    }
}
