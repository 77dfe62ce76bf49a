//! LTPA (Lightweight Third Party Authentication) tokens.
//!
//! Generates and validates the LTPA tokens used in Domino single sign-on
//! environments: a fixed binary layout of `header ‖ creation ‖ expiration ‖
//! principal ‖ digest`, carried over the wire as Base64 text, with a shared
//! secret binding the digest. Does not work with WebSphere SSO tokens.
//!
//! ```
//! use jiff::Timestamp;
//! use ltpa_core::{LtpaToken, SharedSecret};
//!
//! let secret = SharedSecret::from_base64("jcDWR0+4RXCEZyLRb8a1zvATUQA=").unwrap();
//!
//! let creation = Timestamp::from_second(314168400).unwrap();
//! let expiration = Timestamp::from_second(1605762000).unwrap();
//!
//! // issue a token for an authenticated principal
//! let token: LtpaToken =
//!     LtpaToken::generate("CN=Robert Kelly/OU=MIS/O=EBIMED", creation, expiration, &secret)
//!         .unwrap();
//!
//! // ship it as cookie text, then parse it back on the trusting side
//! let parsed: LtpaToken = LtpaToken::decode(&token.to_string(), &secret).unwrap();
//! assert_eq!(parsed.principal(), "CN=Robert Kelly/OU=MIS/O=EBIMED");
//!
//! // parsing establishes shape only; trust requires validation
//! let now = Timestamp::from_second(1000000000).unwrap();
//! assert!(parsed.is_valid(now));
//! ```
#![forbid(unsafe_code)]

pub mod digest;
mod secret;
mod token;

pub use digest::{Sha1, TokenDigest, DIGEST_LEN};
pub use secret::SharedSecret;
pub use token::{LtpaToken, HEADER, MIN_TOKEN_LEN};

/// Error returned for all LTPA operations that can fail.
///
/// An expired or tampered token is not an error: [`LtpaToken::is_valid`]
/// reports that as `false`. These variants cover input that could not be
/// parsed at all, so "cannot parse" is never conflated with "invalid".
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum LtpaError {
    /// The token was not valid Base64, or decoded to fewer than the 40
    /// bytes of fixed fields.
    MalformedToken,
    /// The creation or expiration field was not hexadecimal ASCII.
    MalformedTimestamp,
    /// The shared secret text was not valid Base64.
    InvalidKey,
}

impl std::error::Error for LtpaError {}

impl std::fmt::Display for LtpaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LtpaError::MalformedToken => {
                f.write_str("the token could not be base64 decoded, or is shorter than 40 bytes")
            }
            LtpaError::MalformedTimestamp => {
                f.write_str("the token timestamps are not hexadecimal ASCII")
            }
            LtpaError::InvalidKey => f.write_str("could not parse the shared secret"),
        }
    }
}
