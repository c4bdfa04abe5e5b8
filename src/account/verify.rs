use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};

/// A login token of an account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct Token {
    value: String,
    /// Never expires if absent.
    expires_at: Option<DateTime<Utc>>,
}

/// Login tokens of an account, newest last.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    #[serde(default)]
    inner: Vec<Token>,
}

impl Tokens {
    /// Most tokens kept at once, the oldest is dropped beyond this.
    const CAPACITY: usize = 16;

    pub fn new() -> Self {
        Self {
            inner: Vec::with_capacity(Self::CAPACITY),
        }
    }

    /// Create a new token expiring in `expiration_days`, or never if it is `0`.
    #[must_use]
    pub fn new_token(&mut self, id: u64, expiration_days: u16) -> String {
        let now = Utc::now();
        let expires_at = if expiration_days == 0 {
            None
        } else {
            now.checked_add_days(Days::new(expiration_days as u64))
        };

        let token = sha256::digest(format!(
            "{id}-{}-{}",
            now.timestamp_nanos_opt().unwrap_or_default(),
            rand::random::<u64>()
        ));

        self.refresh();
        if self.inner.len() >= Self::CAPACITY {
            self.inner.remove(0);
        }
        self.inner.push(Token {
            value: token.clone(),
            expires_at,
        });
        token
    }

    /// Remove a target token and return whether the token was removed.
    pub fn remove(&mut self, token: &str) -> bool {
        let len = self.inner.len();
        self.inner.retain(|e| e.value != token);
        len > self.inner.len()
    }

    /// Check if a token exists and has not expired.
    pub fn token_usable(&self, token: &str) -> bool {
        let now = Utc::now();
        self.inner
            .iter()
            .any(|e| e.value == token && e.expires_at.map_or(true, |t| t > now))
    }

    /// Remove expired tokens.
    pub fn refresh(&mut self) {
        let now = Utc::now();
        self.inner.retain(|e| e.expires_at.map_or(true, |t| t > now));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_and_revoke() {
        let mut tokens = Tokens::new();
        let a = tokens.new_token(1, 7);
        let b = tokens.new_token(1, 0);
        assert_ne!(a, b);
        assert!(tokens.token_usable(&a));
        assert!(tokens.token_usable(&b));

        assert!(tokens.remove(&a));
        assert!(!tokens.remove(&a));
        assert!(!tokens.token_usable(&a));
        assert!(tokens.token_usable(&b));
    }

    #[test]
    fn expired_tokens_are_unusable() {
        let mut tokens = Tokens::new();
        tokens.inner.push(Token {
            value: "stale".to_owned(),
            expires_at: Some(Utc::now() - chrono::Duration::seconds(1)),
        });
        assert!(!tokens.token_usable("stale"));

        tokens.refresh();
        assert!(tokens.is_empty());
    }

    #[test]
    fn oldest_token_evicted() {
        let mut tokens = Tokens::new();
        let first = tokens.new_token(1, 0);
        for _ in 0..Tokens::CAPACITY {
            let _ = tokens.new_token(1, 0);
        }
        assert_eq!(tokens.len(), Tokens::CAPACITY);
        assert!(!tokens.token_usable(&first));
    }
}
