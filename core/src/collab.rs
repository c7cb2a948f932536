//! The single blocking "present these fields, return approve/reject"
//! contract the core consumes (spec §1, §6 "Display contract").
//!
//! The embedded UI toolkit's event loop and button handling live entirely
//! on the other side of this trait and are out of scope here.

use crate::display::TxDisplay;

/// The outcome of an on-device approval prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalResult {
    Approved,
    Rejected,
    None,
}

/// Presents decoded fields to the user and blocks for a decision.
pub trait DisplayCollaborator {
    /// Presents the full transaction review flow (chain_id, sender,
    /// recipient, amount, fee, nonce, in that order) and returns the
    /// user's decision.
    fn show_approval(&mut self, display: &TxDisplay) -> ApprovalResult;

    /// Presents a single address string for confirmation (spec §9 open
    /// question (c): wiring `get-address` P1=0x01 into a one-field
    /// confirmation flow built on the same formatter).
    fn show_address(&mut self, address: &str) -> ApprovalResult;
}
