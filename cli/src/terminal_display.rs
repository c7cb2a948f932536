//! A terminal stand-in for the on-device approval screen (spec §6 "Display
//! contract"). Prints the fields in the required order and prompts for a
//! decision, or auto-approves when `--yes` was passed.

use std::io::{self, Write};

use sumchain_core::display::TxDisplay;
use sumchain_core::{ApprovalResult, DisplayCollaborator};

pub struct TerminalDisplay {
    auto_approve: bool,
}

impl TerminalDisplay {
    pub fn new(auto_approve: bool) -> Self {
        TerminalDisplay { auto_approve }
    }

    fn prompt(&self, lines: &[(&str, &str)]) -> ApprovalResult {
        for (label, value) in lines {
            println!("{label:>10}: {value}");
        }

        if self.auto_approve {
            tracing::info!("auto-approving (--yes)");
            return ApprovalResult::Approved;
        }

        print!("approve? [y/N] ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return ApprovalResult::None;
        }
        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => ApprovalResult::Approved,
            _ => ApprovalResult::Rejected,
        }
    }
}

impl DisplayCollaborator for TerminalDisplay {
    fn show_approval(&mut self, display: &TxDisplay) -> ApprovalResult {
        self.prompt(&[
            ("chain_id", display.chain_id.as_str()),
            ("sender", display.sender.as_str()),
            ("recipient", display.recipient.as_str()),
            ("amount", display.amount.as_str()),
            ("fee", display.fee.as_str()),
            ("nonce", display.nonce.as_str()),
        ])
    }

    fn show_address(&mut self, address: &str) -> ApprovalResult {
        self.prompt(&[("address", address)])
    }
}
