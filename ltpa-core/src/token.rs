use core::fmt;
use core::marker::PhantomData;

use base64ct::{Base64, Encoding};
use jiff::Timestamp;
use subtle::ConstantTimeEq;

use crate::digest::{Sha1, TokenDigest, DIGEST_LEN};
use crate::secret::SharedSecret;
use crate::LtpaError;

/// The fixed 4-byte magic opening every token. A format-version marker
/// only; it is fed to the digest but never checked against alternatives.
pub const HEADER: [u8; 4] = [0x00, 0x01, 0x02, 0x03];

/// Bytes of fixed fields: header, two 8-byte hex timestamps, and the
/// trailing digest. Anything shorter cannot be sliced.
pub const MIN_TOKEN_LEN: usize = 40;

const HEADER_END: usize = HEADER.len();
const CREATION_END: usize = HEADER_END + 8;
const EXPIRATION_END: usize = CREATION_END + 8;

/// An LTPA token: a signed, time-bounded credential asserting a principal's
/// identity.
///
/// The raw layout is `header ‖ creation ‖ expiration ‖ principal ‖ digest`,
/// with the creation and expiration instants rendered as uppercase
/// hexadecimal ASCII of their whole-second epoch values. The token owns its
/// decoded buffer; every field accessor is a view into it at the fixed
/// offsets.
///
/// `D` selects the digest primitive and defaults to the [`Sha1`] that
/// Domino interoperates with.
///
/// Tokens are immutable once constructed, by [`generate`](Self::generate)
/// or [`decode`](Self::decode). Neither path establishes trust: call
/// [`is_valid`](Self::is_valid) before believing the embedded principal.
pub struct LtpaToken<D = Sha1> {
    raw: Box<[u8]>,
    encoded: String,
    creation: Timestamp,
    expiration: Timestamp,
    secret: SharedSecret,
    _digest: PhantomData<D>,
}

impl<D: TokenDigest> LtpaToken<D> {
    /// Generate a new token for the given principal and validity window.
    ///
    /// `principal` is the canonical user identifier, e.g.
    /// `CN=Robert Kelly/OU=MIS/O=EBIMED`, and must be non-empty. Instants
    /// are truncated to whole seconds.
    ///
    /// The freshly built bytes are immediately re-parsed through
    /// [`decode`](Self::decode), so the returned token is field-for-field
    /// identical to what the recipient will see.
    pub fn generate(
        principal: &str,
        creation: Timestamp,
        expiration: Timestamp,
        secret: &SharedSecret,
    ) -> Result<Self, LtpaError> {
        if principal.is_empty() {
            return Err(LtpaError::MalformedToken);
        }
        tracing::debug!(principal, "generating ltpa token");

        let creation_hex = hex_seconds(creation);
        let expiration_hex = hex_seconds(expiration);

        let mut raw = Vec::with_capacity(MIN_TOKEN_LEN + principal.len());
        raw.extend_from_slice(&HEADER);
        raw.extend_from_slice(creation_hex.as_bytes());
        raw.extend_from_slice(expiration_hex.as_bytes());
        raw.extend_from_slice(principal.as_bytes());

        let digest = D::digest(&[&raw, secret.as_bytes()]);
        raw.extend_from_slice(&digest);

        Self::decode(&Base64::encode_string(&raw), secret)
    }

    /// Recompute the digest with the shared secret and check the validity
    /// window, both bounds exclusive.
    ///
    /// Digest comparison is constant-time. A well-formed token never
    /// errors here: tampering, a wrong secret, and an expired or
    /// not-yet-valid window all come back as plain `false`.
    pub fn is_valid(&self, now: Timestamp) -> bool {
        let signed = &self.raw[..self.raw.len() - DIGEST_LEN];
        let expected = D::digest(&[signed, self.secret.as_bytes()]);

        let valid_digest = bool::from(expected.as_slice().ct_eq(self.digest()));
        let valid_window = now > self.creation && now < self.expiration;
        tracing::debug!(valid_digest, valid_window, "validated ltpa token");

        valid_digest & valid_window
    }
}

impl<D> LtpaToken<D> {
    /// Parse Base64 token text without validating it.
    ///
    /// Fails with [`LtpaError::MalformedToken`] when the text is not
    /// Base64 or decodes to fewer than [`MIN_TOKEN_LEN`] bytes, and with
    /// [`LtpaError::MalformedTimestamp`] when a timestamp field is not
    /// hexadecimal ASCII. A well-formed but forged token decodes fine;
    /// only [`is_valid`](Self::is_valid) distinguishes trust.
    ///
    /// The secret is kept alongside the token for later validation and is
    /// never exposed by any accessor.
    pub fn decode(encoded: &str, secret: &SharedSecret) -> Result<Self, LtpaError> {
        let raw = Base64::decode_vec(encoded).map_err(|_| LtpaError::MalformedToken)?;
        if raw.len() < MIN_TOKEN_LEN {
            return Err(LtpaError::MalformedToken);
        }

        let creation = parse_hex_seconds(&raw[HEADER_END..CREATION_END])?;
        let expiration = parse_hex_seconds(&raw[CREATION_END..EXPIRATION_END])?;
        tracing::debug!(len = raw.len(), "decoded ltpa token");

        Ok(LtpaToken {
            raw: raw.into_boxed_slice(),
            encoded: encoded.to_owned(),
            creation,
            expiration,
            secret: secret.clone(),
            _digest: PhantomData,
        })
    }

    /// The Base64 wire form, suitable as a cookie value.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// The embedded principal, lossily decoded as UTF-8.
    pub fn principal(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(self.principal_bytes())
    }

    /// When the token was issued.
    pub fn creation(&self) -> Timestamp {
        self.creation
    }

    /// When the token stops being accepted.
    pub fn expiration(&self) -> Timestamp {
        self.expiration
    }

    /// The 4-byte magic.
    pub fn header(&self) -> &[u8] {
        &self.raw[..HEADER_END]
    }

    /// Creation instant as stored: uppercase hexadecimal ASCII.
    pub fn creation_bytes(&self) -> &[u8] {
        &self.raw[HEADER_END..CREATION_END]
    }

    /// Expiration instant as stored: uppercase hexadecimal ASCII.
    pub fn expiration_bytes(&self) -> &[u8] {
        &self.raw[CREATION_END..EXPIRATION_END]
    }

    /// The raw principal bytes.
    pub fn principal_bytes(&self) -> &[u8] {
        &self.raw[EXPIRATION_END..self.raw.len() - DIGEST_LEN]
    }

    /// The 20-byte digest trailing the token.
    pub fn digest(&self) -> &[u8] {
        &self.raw[self.raw.len() - DIGEST_LEN..]
    }
}

impl<D> fmt::Debug for LtpaToken<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LtpaToken")
            .field("encoded", &self.encoded)
            .field("creation", &self.creation)
            .field("expiration", &self.expiration)
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}

impl<D> fmt::Display for LtpaToken<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

/// Uppercase hex of the whole-second epoch value, unpadded.
///
/// Matches the historical rendering bit for bit, including its latent
/// boundary: only instants whose epoch seconds need exactly 8 hex digits
/// (mid-1970s through 2106) produce a well-sliced token. Anything else is
/// rendered faithfully and mis-slices on decode. Negative second counts
/// render as their unsigned 64-bit value.
fn hex_seconds(instant: Timestamp) -> String {
    format!("{:X}", instant.as_second() as u64)
}

fn parse_hex_seconds(field: &[u8]) -> Result<Timestamp, LtpaError> {
    let text = core::str::from_utf8(field).map_err(|_| LtpaError::MalformedTimestamp)?;
    let seconds = u64::from_str_radix(text, 16).map_err(|_| LtpaError::MalformedTimestamp)?;
    Timestamp::from_second(seconds as i64).map_err(|_| LtpaError::MalformedTimestamp)
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::{hex_seconds, parse_hex_seconds};
    use crate::LtpaError;

    #[test]
    fn hex_rendering_is_uppercase_and_unpadded() {
        let instant = Timestamp::from_second(314168400).unwrap();
        assert_eq!(hex_seconds(instant), "12B9D450");

        let instant = Timestamp::from_second(1605762000).unwrap();
        assert_eq!(hex_seconds(instant), "5FB5FBD0");

        // early instants render short, late ones long; neither is padded
        assert_eq!(hex_seconds(Timestamp::from_second(1_000_000).unwrap()), "F4240");
        assert_eq!(
            hex_seconds(Timestamp::from_second(-1).unwrap()),
            "FFFFFFFFFFFFFFFF"
        );
    }

    #[test]
    fn hex_parsing_round_trips() {
        let instant = parse_hex_seconds(b"5FB5FBD0").unwrap();
        assert_eq!(instant.as_second(), 1605762000);

        // lowercase hex is still hex
        assert_eq!(parse_hex_seconds(b"5fb5fbd0").unwrap().as_second(), 1605762000);
    }

    #[test]
    fn hex_parsing_rejects_non_hex() {
        assert_eq!(
            parse_hex_seconds(b"5FB5FBDZ").unwrap_err(),
            LtpaError::MalformedTimestamp
        );
        assert_eq!(
            parse_hex_seconds(&[0xff; 8]).unwrap_err(),
            LtpaError::MalformedTimestamp
        );
    }
}
