use core::fmt;

use base64ct::{Base64, Encoding};
use zeroize::Zeroize;

use crate::LtpaError;

/// The pre-shared keying material binding token digests.
///
/// Supplied Base64-encoded (the `LTPA_DominoSecret` field of the SSO
/// configuration document) and treated as opaque bytes from then on. The
/// raw bytes never appear in any `Debug`/`Display` output: only the first
/// and last character of the Base64 text survive into diagnostics.
#[derive(Clone)]
pub struct SharedSecret {
    bytes: Vec<u8>,
    obscured: String,
}

impl SharedSecret {
    /// Decode the Base64 secret text.
    pub fn from_base64(text: &str) -> Result<Self, LtpaError> {
        let bytes = Base64::decode_vec(text).map_err(|_| LtpaError::InvalidKey)?;
        Ok(SharedSecret {
            bytes,
            obscured: obscure(text),
        })
    }

    /// The raw keying material fed to the digest.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The obscured rendering used in diagnostic traces.
    pub fn obscured(&self) -> &str {
        &self.obscured
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret({})", self.obscured)
    }
}

impl fmt::Display for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.obscured)
    }
}

/// First character, dots, last character.
fn obscure(text: &str) -> String {
    let mut chars = text.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return String::from("??");
    };
    let mut out = String::with_capacity(text.len());
    out.push(first);
    for _ in 0..text.chars().count().saturating_sub(3) {
        out.push('.');
    }
    out.push(last);
    out
}
