//! The digest strategy sealing a token.
//!
//! The LTPA layout reserves exactly 20 bytes for the digest. Domino pins
//! SHA-1, so [`Sha1`] is the default everywhere, but the primitive is
//! swappable: any [`digest::Digest`] with a 20-byte output drops in without
//! touching the layout or slicing logic.

use digest::consts::U20;
use digest::{Digest, OutputSizeUser};

pub use sha1::Sha1;

/// Length of the digest trailing every token, in bytes.
pub const DIGEST_LEN: usize = 20;

/// A 20-byte digest over a sequence of byte slices.
pub trait TokenDigest {
    /// Digest `parts` as one contiguous message.
    fn digest(parts: &[&[u8]]) -> [u8; DIGEST_LEN];
}

impl<D> TokenDigest for D
where
    D: Digest + OutputSizeUser<OutputSize = U20>,
{
    fn digest(parts: &[&[u8]]) -> [u8; DIGEST_LEN] {
        let mut ctx = D::new();
        for part in parts {
            ctx.update(part);
        }
        let mut out = [0; DIGEST_LEN];
        out.copy_from_slice(ctx.finalize().as_slice());
        out
    }
}
