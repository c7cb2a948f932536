//! Signing session state machine (spec §3 "Signing session", §4.5).
//!
//! Owns a path, a live hash context, and a live parser context across
//! multiple command chunks; enforces the approve-before-sign invariant and
//! the strict parse-display-approve-sign ordering.

use zeroize::Zeroize;

use crate::error::{DispatchError, ParseError, SessionError};
use crate::hash::{Blake3Hash, StreamingHash};
use crate::path::DerivationPath;
use crate::tx_parser::{TxParser, MAX_TX_SIZE};

/// Which phase of the chunked sign command the session is in (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Streaming,
}

/// The live state of one in-flight `sign-transaction` command.
///
/// There is at most one of these alive at a time (spec §5 "no
/// multi-session concurrency"); the dispatcher is its sole owner.
pub struct SignSession {
    state: SessionState,
    path: DerivationPath,
    hash: Blake3Hash,
    parser: TxParser,
    total_received: usize,
    last_chunk_received: bool,
}

impl SignSession {
    pub fn new() -> Self {
        SignSession {
            state: SessionState::Idle,
            path: DerivationPath::default(),
            hash: Blake3Hash::new(),
            parser: TxParser::new(),
            total_received: 0,
            last_chunk_received: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn parser(&self) -> &TxParser {
        &self.parser
    }

    /// Fully zeroizes every piece of session state: the path, the parser
    /// scratch/record, and the hash context, then returns to `Idle`. Called
    /// on every exit path: success, any error, user rejection, a protocol
    /// violation, or an implicit I/O-reset discard (spec §3, §5, §7).
    pub fn reset(&mut self) {
        self.path.zeroize();
        self.hash.zeroize();
        zeroize::Zeroize::zeroize(&mut self.parser);
        self.total_received = 0;
        self.last_chunk_received = false;
        self.state = SessionState::Idle;
    }

    /// First-chunk arm: installs `path`, resets the hash and parser, marks
    /// the chunk boundary, and begins streaming. Feeds `tx_bytes` (the data
    /// after the path) to both collaborators in lockstep, as spec §2
    /// requires ("every received byte ... is fed in order to both the
    /// parser and the hash"). Any failure zeroizes the session before
    /// returning.
    ///
    /// A first chunk arriving while a session is already `Streaming` is a
    /// protocol violation, not an implicit restart (spec §4.5: "A
    /// first-chunk received here -> session zeroized -> session error").
    pub fn begin(
        &mut self,
        path: DerivationPath,
        tx_bytes: &[u8],
        is_last_chunk: bool,
    ) -> Result<(), DispatchError> {
        if self.state == SessionState::Streaming {
            self.reset();
            return Err(SessionError::FirstChunkWhileStreaming.into());
        }

        self.path = path;
        self.hash.reset();
        self.parser.reset();
        self.total_received = 0;
        self.last_chunk_received = is_last_chunk;
        self.state = SessionState::Streaming;

        if let Err(err) = self.absorb(tx_bytes) {
            self.reset();
            return Err(err.into());
        }
        Ok(())
    }

    /// Continuation arm: requires an active, still-streaming session.
    pub fn continue_chunk(
        &mut self,
        tx_bytes: &[u8],
        is_last_chunk: bool,
    ) -> Result<(), DispatchError> {
        if self.state != SessionState::Streaming {
            return Err(SessionError::ContinuationWithoutSession.into());
        }
        if self.last_chunk_received {
            self.reset();
            return Err(SessionError::ContinuationAfterLastChunk.into());
        }

        self.last_chunk_received = is_last_chunk;

        if let Err(err) = self.absorb(tx_bytes) {
            self.reset();
            return Err(err.into());
        }
        Ok(())
    }

    pub fn last_chunk_received(&self) -> bool {
        self.last_chunk_received
    }

    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    /// Finalizes the live hash context into a 32-byte digest. Only
    /// meaningful after the caller has confirmed the parser is `done` and
    /// the user has approved (spec §4.5 "only `approve` leads to hash
    /// finalization and signing").
    pub fn finalize_digest(&mut self) -> [u8; 32] {
        let mut digest = [0u8; 32];
        self.hash.finalize32(&mut digest);
        digest
    }

    fn absorb(&mut self, tx_bytes: &[u8]) -> Result<(), ParseError> {
        if tx_bytes.is_empty() {
            return Ok(());
        }
        if self.total_received + tx_bytes.len() > MAX_TX_SIZE {
            return Err(ParseError::TooLarge(MAX_TX_SIZE));
        }

        self.hash.update(tx_bytes);
        let consumed = self.parser.consume(tx_bytes);
        if consumed != tx_bytes.len() || self.parser.has_error() {
            return Err(ParseError::TrailingBytes);
        }

        self.total_received += tx_bytes.len();
        Ok(())
    }
}

impl Default for SignSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SignSession {
    fn drop(&mut self) {
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hardened_path() -> DerivationPath {
        let mut wire = vec![1u8];
        wire.extend_from_slice(&0x8000_0000u32.to_be_bytes());
        DerivationPath::parse_wire(&wire).unwrap().0
    }

    #[test]
    fn begin_then_reset_returns_to_idle() {
        let mut session = SignSession::new();
        session.begin(hardened_path(), b"", true).unwrap();
        assert_eq!(session.state(), SessionState::Streaming);
        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.total_received, 0);
    }

    #[test]
    fn first_chunk_while_streaming_is_rejected_and_resets() {
        let mut session = SignSession::new();
        session.begin(hardened_path(), b"", false).unwrap();
        let err = session.begin(hardened_path(), b"", true).unwrap_err();
        assert_eq!(
            err,
            DispatchError::Session(SessionError::FirstChunkWhileStreaming)
        );
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn continuation_without_session_is_rejected() {
        let mut session = SignSession::new();
        let err = session.continue_chunk(b"abc", true).unwrap_err();
        assert_eq!(err, DispatchError::Session(SessionError::ContinuationWithoutSession));
    }

    #[test]
    fn continuation_after_last_chunk_is_rejected_and_resets() {
        let mut session = SignSession::new();
        session.begin(hardened_path(), b"", true).unwrap();
        let err = session.continue_chunk(b"abc", false).unwrap_err();
        assert_eq!(
            err,
            DispatchError::Session(SessionError::ContinuationAfterLastChunk)
        );
        assert_eq!(session.state(), SessionState::Idle);
    }
}
