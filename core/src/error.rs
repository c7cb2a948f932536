//! Error taxonomy for the signer core.
//!
//! Every fallible operation in this crate returns one of the domain error
//! enums below; [`DispatchError`] is the only type that crosses the
//! dispatcher boundary and is the single place that maps failures onto the
//! wire [`StatusWord`](crate::status::StatusWord) table (spec §7).

use thiserror::Error;

use crate::status::StatusWord;

/// Errors from parsing or validating a BIP32-style derivation path.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    #[error("path data too short to contain a component count")]
    Empty,
    #[error("path component count {0} is out of range 1..=10")]
    BadLength(u8),
    #[error("path data shorter than component count requires")]
    Truncated,
    #[error("path component {0} is not hardened")]
    NotHardened(usize),
}

/// Errors from the streaming transaction parser.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("unsupported transaction version")]
    UnsupportedVersion,
    #[error("unsupported transaction type")]
    UnsupportedTxType,
    #[error("parser reached an impossible internal state")]
    ImpossibleState,
    #[error("transaction exceeds the {0}-byte size cap")]
    TooLarge(usize),
    #[error("trailing bytes after the structural end of the transaction")]
    TrailingBytes,
    #[error("final chunk absorbed but parser has not reached the done state")]
    NotDone,
}

/// Errors from formatting parsed fields for display.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    #[error("formatted value does not fit in the destination buffer")]
    BufferTooSmall,
}

/// Errors from the key provider boundary (spec §9, "Branching on platform").
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyError {
    #[error("underlying key derivation primitive failed")]
    DerivationFailed,
    #[error("underlying signing primitive failed")]
    SigningFailed,
}

/// Errors from session-protocol violations (spec §4.5 / §7).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("first chunk received while a session was already streaming")]
    FirstChunkWhileStreaming,
    #[error("continuation chunk received with no active session")]
    ContinuationWithoutSession,
    #[error("continuation chunk received after the last chunk was already seen")]
    ContinuationAfterLastChunk,
}

/// The unified error that crosses the dispatcher boundary and is mapped to a
/// [`StatusWord`] exactly once, at the top of [`crate::dispatch::Dispatcher::dispatch`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unsupported instruction class")]
    WrongClass,
    #[error("unsupported instruction code")]
    UnsupportedInstruction,
    #[error("invalid P1/P2 combination")]
    InvalidP1P2,
    #[error("data too short for the requested operation")]
    WrongLength,
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Display(#[from] DisplayError),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("fee computation overflowed 128 bits")]
    FeeOverflow,
    #[error("user rejected the operation on-device")]
    UserRejected,
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl From<DispatchError> for StatusWord {
    fn from(err: DispatchError) -> StatusWord {
        match err {
            DispatchError::WrongClass => StatusWord::ClaNotSupported,
            DispatchError::UnsupportedInstruction => StatusWord::InsNotSupported,
            DispatchError::InvalidP1P2 => StatusWord::InvalidP1P2,
            DispatchError::WrongLength => StatusWord::WrongLength,
            DispatchError::Path(_) => StatusWord::InvalidPath,
            DispatchError::Parse(ParseError::TooLarge(_)) => StatusWord::TxTooLarge,
            DispatchError::Parse(_) => StatusWord::TxParseError,
            DispatchError::Display(_) => StatusWord::InternalError,
            DispatchError::Key(_) => StatusWord::InternalError,
            DispatchError::Session(_) => StatusWord::SessionError,
            DispatchError::FeeOverflow => StatusWord::TxOverflow,
            DispatchError::UserRejected => StatusWord::UserRejected,
            DispatchError::Internal(_) => StatusWord::InternalError,
        }
    }
}
