//! A software stand-in for the secure-element key primitive (spec §9
//! "Branching on platform"). Not SLIP-10: this derives a distinct Ed25519
//! keypair per path with a simple BLAKE3-based KDF so the CLI has stable,
//! reproducible keys to sign against. Never use this for real funds.

use ed25519_dalek::{Signer, SigningKey};
use sumchain_core::{DerivationPath, KeyError, KeyProvider, PublicKey, Signature};
use zeroize::Zeroizing;

pub struct DevKeyProvider {
    seed: [u8; 32],
}

impl DevKeyProvider {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        DevKeyProvider { seed }
    }

    fn derive_signing_key(&self, path: &DerivationPath) -> Zeroizing<SigningKey> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed);
        for component in path.as_slice() {
            hasher.update(&component.to_be_bytes());
        }
        let digest = hasher.finalize();
        Zeroizing::new(SigningKey::from_bytes(digest.as_bytes()))
    }
}

impl KeyProvider for DevKeyProvider {
    fn derive_pubkey(&self, path: &DerivationPath) -> Result<PublicKey, KeyError> {
        path.validate().map_err(|_| KeyError::DerivationFailed)?;
        let signing_key = self.derive_signing_key(path);
        Ok(signing_key.verifying_key().to_bytes())
    }

    fn sign(&self, path: &DerivationPath, digest: &[u8; 32]) -> Result<Signature, KeyError> {
        path.validate().map_err(|_| KeyError::SigningFailed)?;
        let signing_key = self.derive_signing_key(path);
        Ok(signing_key.sign(digest).to_bytes())
    }
}
