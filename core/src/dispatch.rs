//! Top-level command dispatch (spec §2 "Command dispatcher", §6 "Wire
//! protocol", §7 "Status words").
//!
//! [`Dispatcher`] is the single owner of the live [`SignSession`] and the
//! only place that converts a [`DispatchError`] into a [`StatusWord`].
//! Everything upstream of this module (the transport, the BOLOS/USB/BLE
//! exchange loop) is out of scope (spec §1).

use crate::address::address_from_pubkey;
use crate::collab::{ApprovalResult, DisplayCollaborator};
use crate::display::format_transaction;
use crate::error::{DispatchError, ParseError};
use crate::key::KeyProvider;
use crate::path::DerivationPath;
use crate::session::SignSession;
use crate::status::StatusWord;

pub const CLA_SUMCHAIN: u8 = 0xE0;

pub const INS_GET_VERSION: u8 = 0x00;
pub const INS_GET_APP_NAME: u8 = 0x01;
pub const INS_GET_PUBLIC_KEY: u8 = 0x02;
pub const INS_GET_ADDRESS: u8 = 0x03;
pub const INS_SIGN_TX: u8 = 0x04;

/// `get-address` P1: plain lookup, no on-device confirmation.
pub const P1_ADDRESS_PLAIN: u8 = 0x00;
/// `get-address` P1: show the address and require approval (spec §9 OQ-c).
pub const P1_ADDRESS_CONFIRM: u8 = 0x01;

/// `sign-tx` P1 bit 0: set on every chunk after the first.
const P1_MASK_CONTINUATION: u8 = 0x01;
/// `sign-tx` P1 bit 7: set on the final chunk of the transaction.
const P1_MASK_LAST: u8 = 0x80;

const APP_VERSION: [u8; 3] = [1, 0, 0];
const APP_NAME: &[u8] = b"SUM Chain Signer";

/// A decoded command APDU: `CLA INS P1 P2 Lc [data]` (spec §6).
pub struct Apdu<'a> {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: &'a [u8],
}

impl<'a> Apdu<'a> {
    const HEADER_LEN: usize = 5;

    pub fn parse(raw: &'a [u8]) -> Result<Self, DispatchError> {
        if raw.len() < Self::HEADER_LEN {
            return Err(DispatchError::WrongLength);
        }
        let lc = raw[4] as usize;
        let body = &raw[Self::HEADER_LEN..];
        if body.len() != lc {
            return Err(DispatchError::WrongLength);
        }
        Ok(Apdu {
            cla: raw[0],
            ins: raw[1],
            p1: raw[2],
            p2: raw[3],
            data: body,
        })
    }
}

/// The full response to a command: the data field plus the status word that
/// always terminates it (spec §7: "exactly one status word per command").
pub struct Response {
    pub data: Vec<u8>,
    pub status: StatusWord,
}

impl Response {
    pub fn to_wire(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        out.extend_from_slice(&self.status.to_be_bytes());
        out
    }
}

/// Owns the one live signing session and the two out-of-scope collaborators
/// (spec §9 "Branching on platform"): the key primitive and the on-device
/// display/approval flow. There is exactly one `Dispatcher` per device, and
/// `&mut self` on every method is what rules out concurrent command
/// handling (spec §5 "single in-flight command").
pub struct Dispatcher<K: KeyProvider, D: DisplayCollaborator> {
    key_provider: K,
    display: D,
    session: SignSession,
}

impl<K: KeyProvider, D: DisplayCollaborator> Dispatcher<K, D> {
    pub fn new(key_provider: K, display: D) -> Self {
        Dispatcher {
            key_provider,
            display,
            session: SignSession::new(),
        }
    }

    /// Discards any in-flight session without producing a response. Called
    /// when the transport resets the I/O channel (spec §5, §7): a dropped
    /// connection must not leave key material or transcript state alive.
    pub fn on_disconnect(&mut self) {
        self.session.reset();
    }

    /// Dispatches one raw command APDU and returns the full wire response.
    /// Every error path resets the session before the status word is
    /// produced, so a failed command can never leave secret state behind
    /// (spec §5 "every exit path zeroizes").
    pub fn dispatch(&mut self, raw_apdu: &[u8]) -> Response {
        match self.dispatch_inner(raw_apdu) {
            Ok(data) => Response {
                data,
                status: StatusWord::Ok,
            },
            Err(err) => {
                self.session.reset();
                Response {
                    data: Vec::new(),
                    status: err.into(),
                }
            }
        }
    }

    fn dispatch_inner(&mut self, raw_apdu: &[u8]) -> Result<Vec<u8>, DispatchError> {
        let apdu = Apdu::parse(raw_apdu)?;
        if apdu.cla != CLA_SUMCHAIN {
            return Err(DispatchError::WrongClass);
        }

        match apdu.ins {
            INS_GET_VERSION => Ok(Self::handle_get_version()),
            INS_GET_APP_NAME => Ok(Self::handle_get_app_name()),
            INS_GET_PUBLIC_KEY => self.handle_get_public_key(&apdu),
            INS_GET_ADDRESS => self.handle_get_address(&apdu),
            INS_SIGN_TX => self.handle_sign_tx(&apdu),
            _ => Err(DispatchError::UnsupportedInstruction),
        }
    }

    fn handle_get_version() -> Vec<u8> {
        APP_VERSION.to_vec()
    }

    fn handle_get_app_name() -> Vec<u8> {
        APP_NAME.to_vec()
    }

    fn handle_get_public_key(&mut self, apdu: &Apdu) -> Result<Vec<u8>, DispatchError> {
        let (path, _consumed) = DerivationPath::parse_wire(apdu.data)?;
        path.validate()?;
        let pubkey = self.key_provider.derive_pubkey(&path)?;
        Ok(pubkey.to_vec())
    }

    fn handle_get_address(&mut self, apdu: &Apdu) -> Result<Vec<u8>, DispatchError> {
        if apdu.p1 != P1_ADDRESS_PLAIN && apdu.p1 != P1_ADDRESS_CONFIRM {
            return Err(DispatchError::InvalidP1P2);
        }

        let (path, _consumed) = DerivationPath::parse_wire(apdu.data)?;
        path.validate()?;
        let pubkey = self.key_provider.derive_pubkey(&path)?;
        let address = address_from_pubkey(&pubkey);
        let encoded = crate::address::address_to_base58(&address)?;

        if apdu.p1 == P1_ADDRESS_CONFIRM {
            match self.display.show_address(&encoded) {
                ApprovalResult::Approved => {}
                ApprovalResult::Rejected | ApprovalResult::None => {
                    return Err(DispatchError::UserRejected);
                }
            }
        }

        Ok(encoded.into_bytes())
    }

    fn handle_sign_tx(&mut self, apdu: &Apdu) -> Result<Vec<u8>, DispatchError> {
        let is_continuation = apdu.p1 & P1_MASK_CONTINUATION != 0;
        let is_last = apdu.p1 & P1_MASK_LAST != 0;

        if is_continuation {
            self.session.continue_chunk(apdu.data, is_last)?;
        } else {
            let (path, consumed) = DerivationPath::parse_wire(apdu.data)?;
            path.validate()?;
            let tx_bytes = &apdu.data[consumed..];
            self.session.begin(path, tx_bytes, is_last)?;
        }

        if !is_last {
            return Ok(Vec::new());
        }

        if !self.session.parser().is_done() {
            self.session.reset();
            return Err(ParseError::NotDone.into());
        }

        if self.session.parser().parsed().fee_overflow {
            self.session.reset();
            return Err(DispatchError::FeeOverflow);
        }

        let display = format_transaction(self.session.parser().parsed())?;

        match self.display.show_approval(&display) {
            ApprovalResult::Approved => {}
            ApprovalResult::Rejected | ApprovalResult::None => {
                self.session.reset();
                return Err(DispatchError::UserRejected);
            }
        }

        let digest = self.session.finalize_digest();
        let path = self.session.path().clone();
        let signature = self.key_provider.sign(&path, &digest);
        self.session.reset();

        Ok(signature?.to_vec())
    }
}
