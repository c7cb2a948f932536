//! Key-derivation / signing boundary (spec §2 "Key primitive", §9 "Branching
//! on platform").
//!
//! The actual SLIP-10 derivation from the device seed and the Ed25519
//! primitive are out of scope (spec §1) and are represented here only as a
//! trait contract. Production embedders implement [`KeyProvider`] against
//! the real secure element; tests and the host CLI use a software fake.

use crate::error::KeyError;
use crate::path::DerivationPath;

pub const PUBKEY_LEN: usize = 32;
pub const SIGNATURE_LEN: usize = 64;

pub type PublicKey = [u8; PUBKEY_LEN];
pub type Signature = [u8; SIGNATURE_LEN];

/// Derives public keys and produces signatures for a validated derivation
/// path. Implementors own all private key material for the duration of a
/// single call only; no private key byte may outlive the call that used it
/// (spec §5 "Scoped acquisition").
pub trait KeyProvider {
    fn derive_pubkey(&self, path: &DerivationPath) -> Result<PublicKey, KeyError>;
    fn sign(&self, path: &DerivationPath, digest: &[u8; 32]) -> Result<Signature, KeyError>;
}
