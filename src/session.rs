use std::fmt;

/// Static API key sent as `x-api-key` on every request.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Trims the raw input; blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Authentication state of the running client.
///
/// The key is captured once: `Unset -> Validating` when the user submits a
/// key, `Validating -> Authenticated` after a successful health check, and
/// back to `Unset` when the check fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Unset,
    Validating(ApiKey),
    Authenticated(ApiKey),
}

impl Session {
    pub fn new() -> Self {
        Self::Unset
    }

    /// Starts validation of `key`. Ignored once authenticated.
    pub fn begin(&mut self, key: ApiKey) -> bool {
        match self {
            Session::Authenticated(_) => false,
            _ => {
                *self = Session::Validating(key);
                true
            }
        }
    }

    pub fn authenticate(&mut self) -> bool {
        match std::mem::take(self) {
            Session::Validating(key) => {
                *self = Session::Authenticated(key);
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    pub fn reject(&mut self) {
        if matches!(self, Session::Validating(_)) {
            *self = Session::Unset;
        }
    }

    /// Key usable for API calls; only available after authentication.
    pub fn api_key(&self) -> Option<&ApiKey> {
        match self {
            Session::Authenticated(key) => Some(key),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn is_validating(&self) -> bool {
        matches!(self, Session::Validating(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> ApiKey {
        ApiKey::parse(raw).expect("non-blank key")
    }

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(key("  abc \n").expose(), "abc");
        assert!(ApiKey::parse("   ").is_none());
        assert!(ApiKey::parse("").is_none());
    }

    #[test]
    fn debug_never_shows_the_key() {
        let rendered = format!("{:?}", Session::Authenticated(key("top-secret")));
        assert!(!rendered.contains("top-secret"));
    }

    #[test]
    fn key_is_only_usable_after_authentication() {
        let mut session = Session::new();
        assert!(session.api_key().is_none());

        assert!(session.begin(key("abc")));
        assert!(session.is_validating());
        assert!(session.api_key().is_none());

        assert!(session.authenticate());
        assert_eq!(session.api_key().map(ApiKey::expose), Some("abc"));
        assert!(!session.begin(key("other")));
    }

    #[test]
    fn rejection_returns_to_unset() {
        let mut session = Session::new();
        session.begin(key("bad"));
        session.reject();
        assert_eq!(session, Session::Unset);
        assert!(!session.authenticate());
    }
}
