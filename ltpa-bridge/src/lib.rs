//! The bridge collaborator around [`ltpa_core`].
//!
//! An authentication front-end that already knows the request's principal
//! uses this crate to turn configuration into concrete token issuance: the
//! recognized option set, the creation/expiration window derived from the
//! configured lifetime and clock skew, and the `Set-Cookie` header value
//! carrying the encoded token. Receiving the request, attaching the header,
//! and redirecting to the destination service stay with the integrating
//! HTTP stack.
#![forbid(unsafe_code)]

mod cookie;

use core::fmt;

use jiff::Timestamp;
use ltpa_core::{LtpaError, LtpaToken, SharedSecret};
use serde::Deserialize;

pub use cookie::SetCookie;

/// The recognized bridge options.
///
/// Deserializes from any serde-compatible source shaped as three tables:
///
/// ```json
/// {
///   "cookie": { "name": "LtpaToken", "domain": ".example.edu", "path": "/", "secure": false },
///   "token":  { "expiration": 120000, "clockskew": 30 },
///   "domino": { "secret": "…base64…", "service": "https://domino.example.edu/names.nsf" }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    pub cookie: CookieConfig,
    pub token: TokenConfig,
    pub domino: DominoConfig,
}

/// Attributes of the cookie carrying the token.
#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    /// Cookie name, conventionally `LtpaToken`.
    pub name: String,
    /// Domain the generated cookie is scoped to, e.g. `.example.edu`
    /// (note the leading dot).
    pub domain: String,
    /// Cookie path, conventionally `/`.
    pub path: String,
    /// Whether to emit the `Secure` attribute.
    #[serde(default)]
    pub secure: bool,
}

/// Token lifetime knobs.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TokenConfig {
    /// Token lifetime, documented in minutes. See
    /// [`BridgeConfig::token_window`] for how it is actually applied.
    pub expiration: i64,
    /// Clock skew allowance, documented in seconds. Same caveat.
    pub clockskew: i64,
}

/// The Domino side of the trust relationship.
#[derive(Clone, Deserialize)]
pub struct DominoConfig {
    /// The Base64 secret from the `LTPA_DominoSecret` field of the SSO
    /// configuration document.
    pub secret: String,
    /// Destination URI that knows how to consume LTPA tokens; the
    /// integrator redirects here after attaching the cookie.
    pub service: String,
}

impl fmt::Debug for DominoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = self.secret.chars().next().unwrap_or('?');
        let tail = self.secret.chars().next_back().unwrap_or('?');
        f.debug_struct("DominoConfig")
            .field("secret", &format_args!("{head}..{tail}"))
            .field("service", &self.service)
            .finish()
    }
}

/// The creation/expiration instants a token is issued with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenWindow {
    pub creation: Timestamp,
    pub expiration: Timestamp,
}

impl BridgeConfig {
    /// Decode `domino.secret` into keying material.
    pub fn shared_secret(&self) -> Result<SharedSecret, LtpaError> {
        SharedSecret::from_base64(&self.domino.secret)
    }

    /// Compute the validity window around `now`.
    ///
    /// This reproduces the deployed arithmetic literally: the configured
    /// skew and lifetime counts are applied as raw milliseconds, even
    /// though the options document them as seconds and minutes. The
    /// mismatch is part of the external contract and is deliberately not
    /// corrected here; [`validate`](Self::validate) calls it out so the
    /// integrating system can decide what its configured values mean.
    pub fn token_window(&self, now: Timestamp) -> TokenWindow {
        let millis = now.as_millisecond();
        TokenWindow {
            creation: clamped_from_millis(millis - self.token.clockskew),
            expiration: clamped_from_millis(millis + self.token.expiration + self.token.clockskew),
        }
    }

    /// Non-fatal configuration review.
    ///
    /// Returns one message per suspicious option. An empty result means
    /// nothing jumped out, not that the configuration is proven good.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.cookie.name.is_empty() {
            warnings.push("cookie.name is empty; the Set-Cookie header would be malformed".into());
        }
        if !self.cookie.domain.is_empty() && !self.cookie.domain.starts_with('.') {
            warnings.push(format!(
                "cookie.domain {:?} has no leading dot and will not match subdomains",
                self.cookie.domain
            ));
        }
        if self.shared_secret().is_err() {
            warnings.push("domino.secret is not valid base64".into());
        }
        if self.token.expiration != 0 || self.token.clockskew != 0 {
            warnings.push(
                "token.expiration (documented minutes) and token.clockskew (documented seconds) \
                 are applied as raw milliseconds when computing the validity window; confirm the \
                 configured values against observed token lifetimes"
                    .into(),
            );
        }

        warnings
    }

    /// Issue a token for an authenticated principal, together with the
    /// `Set-Cookie` value that carries it.
    pub fn issue_token(
        &self,
        principal: &str,
        now: Timestamp,
    ) -> Result<(LtpaToken, SetCookie), LtpaError> {
        let secret = self.shared_secret()?;
        tracing::debug!(
            cookie_name = %self.cookie.name,
            cookie_domain = %self.cookie.domain,
            secret = %secret,
            "issuing ltpa token"
        );

        let window = self.token_window(now);
        let token = LtpaToken::generate(principal, window.creation, window.expiration, &secret)?;
        let cookie = SetCookie::new(&self.cookie, token.encoded());
        Ok((token, cookie))
    }
}

/// The window math happens on raw milliseconds; pin out-of-range results
/// to the representable extremes rather than failing issuance.
fn clamped_from_millis(millis: i64) -> Timestamp {
    Timestamp::from_millisecond(millis).unwrap_or(if millis < 0 {
        Timestamp::MIN
    } else {
        Timestamp::MAX
    })
}
