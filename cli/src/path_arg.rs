//! Parses a BIP32-style path string (e.g. `m/44'/0'/0'`) into the wire
//! encoding [`sumchain_core::DerivationPath::parse_wire`] expects: a leading
//! component count byte followed by big-endian `u32`s with the hardened bit
//! already set.

use anyhow::{bail, Context, Result};

pub fn path_string_to_wire(path: &str) -> Result<Vec<u8>> {
    let body = path.strip_prefix("m/").unwrap_or(path);
    let mut components = Vec::new();

    for part in body.split('/').filter(|p| !p.is_empty()) {
        let hardened_suffix = part.ends_with('\'') || part.ends_with('h');
        let digits = part.trim_end_matches('\'').trim_end_matches('h');
        let value: u32 = digits
            .parse()
            .with_context(|| format!("invalid path component {part:?}"))?;
        if !hardened_suffix {
            bail!("path component {part:?} must be hardened (append ')");
        }
        components.push(value | 0x8000_0000);
    }

    if components.is_empty() || components.len() > 10 {
        bail!("path must have between 1 and 10 components");
    }

    let mut wire = vec![components.len() as u8];
    for component in components {
        wire.extend_from_slice(&component.to_be_bytes());
    }
    Ok(wire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_form() {
        let wire = path_string_to_wire("m/44'/0'/0'").unwrap();
        assert_eq!(wire[0], 3);
        assert_eq!(&wire[1..5], &0x8000_002Cu32.to_be_bytes());
    }

    #[test]
    fn rejects_non_hardened_component() {
        assert!(path_string_to_wire("m/44").is_err());
    }

    #[test]
    fn rejects_empty_path() {
        assert!(path_string_to_wire("m/").is_err());
    }
}
