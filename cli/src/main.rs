//! Host development harness for the SUM Chain signer core: derives
//! addresses and public keys and signs transactions against a deterministic
//! software key, without any real secure element involved.

mod dev_key;
mod path_arg;
mod terminal_display;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sumchain_core::dispatch::{
    CLA_SUMCHAIN, INS_GET_ADDRESS, INS_GET_PUBLIC_KEY, INS_GET_VERSION, INS_SIGN_TX,
    P1_ADDRESS_CONFIRM, P1_ADDRESS_PLAIN,
};
use sumchain_core::{Dispatcher, StatusWord};

use dev_key::DevKeyProvider;
use path_arg::path_string_to_wire;
use terminal_display::TerminalDisplay;

#[derive(Parser)]
#[command(name = "sumchain-cli", version, about = "SUM Chain signer dev harness")]
struct Cli {
    /// 32-byte hex dev seed; defaults to an all-zero seed if omitted.
    #[arg(long, global = true)]
    seed: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the app version string.
    Version,
    /// Derives the public key for a hardened path.
    Pubkey { path: String },
    /// Derives and prints the Base58 address for a hardened path.
    Address {
        path: String,
        /// Route through the on-device confirmation flow (P1 = 0x01).
        #[arg(long)]
        confirm: bool,
        /// Skip the approve/reject prompt and always approve.
        #[arg(long)]
        yes: bool,
    },
    /// Parses, displays and signs a transaction read from a file.
    Sign {
        path: String,
        tx_file: PathBuf,
        /// Skip the approve/reject prompt and always approve.
        #[arg(long)]
        yes: bool,
        /// Max bytes fed to the dispatcher per chunk.
        #[arg(long, default_value_t = 255)]
        chunk_size: usize,
    },
}

fn build_apdu(ins: u8, p1: u8, data: &[u8]) -> Vec<u8> {
    let mut raw = vec![CLA_SUMCHAIN, ins, p1, 0x00, data.len() as u8];
    raw.extend_from_slice(data);
    raw
}

fn parse_seed(seed: &Option<String>) -> Result<[u8; 32]> {
    match seed {
        None => Ok([0u8; 32]),
        Some(hex_str) => {
            let bytes = hex::decode(hex_str).context("seed must be hex")?;
            let mut seed = [0u8; 32];
            if bytes.len() != 32 {
                anyhow::bail!("seed must be exactly 32 bytes");
            }
            seed.copy_from_slice(&bytes);
            Ok(seed)
        }
    }
}

fn expect_ok(status: StatusWord) -> Result<()> {
    if status != StatusWord::Ok {
        anyhow::bail!("device returned status {:#06x}", status.code());
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let seed = parse_seed(&cli.seed)?;
    let key_provider = DevKeyProvider::from_seed(seed);

    match cli.command {
        Command::Version => {
            let mut dispatcher = Dispatcher::new(key_provider, TerminalDisplay::new(true));
            let resp = dispatcher.dispatch(&build_apdu(INS_GET_VERSION, 0x00, &[]));
            expect_ok(resp.status)?;
            println!("{}.{}.{}", resp.data[0], resp.data[1], resp.data[2]);
        }
        Command::Pubkey { path } => {
            let mut dispatcher = Dispatcher::new(key_provider, TerminalDisplay::new(true));
            let wire = path_string_to_wire(&path)?;
            let resp = dispatcher.dispatch(&build_apdu(INS_GET_PUBLIC_KEY, 0x00, &wire));
            expect_ok(resp.status)?;
            println!("{}", hex::encode(&resp.data));
        }
        Command::Address { path, confirm, yes } => {
            let mut dispatcher = Dispatcher::new(key_provider, TerminalDisplay::new(yes));
            let wire = path_string_to_wire(&path)?;
            let p1 = if confirm { P1_ADDRESS_CONFIRM } else { P1_ADDRESS_PLAIN };
            let resp = dispatcher.dispatch(&build_apdu(INS_GET_ADDRESS, p1, &wire));
            expect_ok(resp.status)?;
            println!("{}", String::from_utf8_lossy(&resp.data));
        }
        Command::Sign { path, tx_file, yes, chunk_size } => {
            let mut dispatcher = Dispatcher::new(key_provider, TerminalDisplay::new(yes));
            let path_wire = path_string_to_wire(&path)?;
            let tx_bytes = fs::read(&tx_file)
                .with_context(|| format!("reading {}", tx_file.display()))?;

            let mut first_chunk = path_wire.clone();
            let first_tx_slice_len = chunk_size.saturating_sub(path_wire.len()).min(tx_bytes.len());
            first_chunk.extend_from_slice(&tx_bytes[..first_tx_slice_len]);

            let remaining = &tx_bytes[first_tx_slice_len..];
            let remaining_chunks: Vec<&[u8]> = remaining.chunks(chunk_size.max(1)).collect();
            let is_last_overall = remaining_chunks.is_empty();

            let p1_first = if is_last_overall { 0x80 } else { 0x00 };
            let resp = dispatcher.dispatch(&build_apdu(INS_SIGN_TX, p1_first, &first_chunk));
            expect_ok(resp.status)?;

            let mut signature = resp.data;
            for (i, chunk) in remaining_chunks.iter().enumerate() {
                let is_last = i == remaining_chunks.len() - 1;
                let p1 = if is_last { 0x81 } else { 0x01 };
                let resp = dispatcher.dispatch(&build_apdu(INS_SIGN_TX, p1, chunk));
                expect_ok(resp.status)?;
                if is_last {
                    signature = resp.data;
                }
            }

            println!("{}", hex::encode(&signature));
        }
    }

    Ok(())
}
