use core::fmt;

use crate::CookieConfig;

/// A `Set-Cookie` header value carrying an encoded token.
///
/// Renders as `Name=Value; Domain=...; Path=...; Secure`, omitting the
/// domain and path segments when empty and the `Secure` flag when unset.
/// Attaching the header to a response is the integrator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
}

impl SetCookie {
    /// Build the cookie for a token's wire text.
    pub fn new(config: &CookieConfig, value: impl Into<String>) -> Self {
        SetCookie {
            name: config.name.clone(),
            value: value.into(),
            domain: config.domain.clone(),
            path: config.path.clone(),
            secure: config.secure,
        }
    }

    /// The full header value.
    pub fn header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if !self.domain.is_empty() {
            write!(f, "; Domain={}", self.domain)?;
        }
        if !self.path.is_empty() {
            write!(f, "; Path={}", self.path)?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}
