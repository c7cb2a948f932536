//! Hardened BIP32-style derivation paths (spec §3 "Derivation path", §6 "Path wire form").

use zeroize::Zeroize;

use crate::error::PathError;

pub const MAX_PATH_LEN: usize = 10;

/// An ordered sequence of 1 to 10 hardened u32 components.
///
/// Immutable after construction; zeroized on drop so a path never outlives
/// the session or call that created it (spec §3, §5 "scoped acquisition").
#[derive(Clone)]
pub struct DerivationPath {
    components: [u32; MAX_PATH_LEN],
    len: u8,
}

impl DerivationPath {
    /// Parses the wire form: `[count:1][component:4 BE] * count`.
    ///
    /// Returns the path and the number of bytes consumed from `data`, or a
    /// [`PathError`] describing why the encoding was rejected (spec §6).
    pub fn parse_wire(data: &[u8]) -> Result<(Self, usize), PathError> {
        let count = *data.first().ok_or(PathError::Empty)?;
        if count == 0 || count as usize > MAX_PATH_LEN {
            return Err(PathError::BadLength(count));
        }
        let required = 1 + count as usize * 4;
        if data.len() < required {
            return Err(PathError::Truncated);
        }

        let mut components = [0u32; MAX_PATH_LEN];
        for (i, chunk) in data[1..required].chunks_exact(4).enumerate() {
            let component = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            if component & 0x8000_0000 == 0 {
                return Err(PathError::NotHardened(i));
            }
            components[i] = component;
        }

        Ok((
            DerivationPath {
                components,
                len: count,
            },
            required,
        ))
    }

    /// Every component's high bit is already checked during `parse_wire`;
    /// this re-validates the invariant for paths assembled by other means
    /// (spec §3 invariant: "every component has its high bit set").
    pub fn validate(&self) -> Result<(), PathError> {
        if self.len == 0 || self.len as usize > MAX_PATH_LEN {
            return Err(PathError::BadLength(self.len));
        }
        for (i, component) in self.as_slice().iter().enumerate() {
            if component & 0x8000_0000 == 0 {
                return Err(PathError::NotHardened(i));
            }
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.components[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Zeroize for DerivationPath {
    fn zeroize(&mut self) {
        self.components.zeroize();
        self.len.zeroize();
    }
}

impl Drop for DerivationPath {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Default for DerivationPath {
    fn default() -> Self {
        DerivationPath {
            components: [0u32; MAX_PATH_LEN],
            len: 0,
        }
    }
}
