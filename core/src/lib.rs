//! Transaction-signing core for the SUM Chain hardware wallet application.
//!
//! This crate owns the streaming transaction parser, the BLAKE3 transcript
//! hash, Base58 address formatting, the approve-before-sign session state
//! machine, and the command dispatcher that ties them together. It does not
//! own the Ed25519 primitive, the secure-element key derivation, the
//! on-device UI event loop, or the transport (USB/BLE/host) — those are
//! collaborator traits implemented by the embedder.

#![forbid(unsafe_code)]

pub mod address;
pub mod collab;
pub mod display;
pub mod dispatch;
pub mod error;
pub mod hash;
pub mod key;
pub mod path;
pub mod session;
pub mod status;
pub mod tx_parser;

pub use address::{address_from_pubkey, address_to_base58, base58_encode, Address};
pub use collab::{ApprovalResult, DisplayCollaborator};
pub use dispatch::{Apdu, Dispatcher, Response};
pub use error::{DispatchError, DisplayError, KeyError, ParseError, PathError, SessionError};
pub use hash::{Blake3Hash, StreamingHash};
pub use key::{KeyProvider, PublicKey, Signature};
pub use path::DerivationPath;
pub use session::{SessionState, SignSession};
pub use status::StatusWord;
pub use tx_parser::{compute_fee, ParsedTransaction, TxParser};
