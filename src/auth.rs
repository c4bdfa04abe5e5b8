use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{Error, Global};

/// A logged-in account, extracted from the
/// `Authorization: Bearer {account}:{token}` header.
///
/// Use `Option<Auth>` for routes open to anonymous viewers.
#[derive(Debug, Clone)]
pub struct Auth {
    /// The only id of this account.
    pub account_id: u64,
    /// The access token of this account.
    pub token: String,
}

impl Auth {
    /// Parses a `{account}:{token}` credential.
    pub fn parse(credential: &str) -> Result<Self, Error> {
        let (id, token) = credential
            .split_once(':')
            .ok_or(Error::InvalidAuthHeader)?;

        Ok(Self {
            account_id: id.parse().map_err(|_| Error::InvalidAuthHeader)?,
            token: token.to_owned(),
        })
    }

    /// Ensures this is the account `id`.
    #[inline]
    pub fn require_self(&self, id: u64) -> Result<(), Error> {
        if self.account_id == id {
            Ok(())
        } else {
            Err(Error::PermissionDenied)
        }
    }
}

#[async_trait]
impl FromRequestParts<Global> for Auth {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &Global) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(Error::NotLoggedIn)?
            .to_str()?;

        let this = Self::parse(
            value
                .strip_prefix("Bearer ")
                .ok_or(Error::InvalidAuthHeader)?
                .trim(),
        )?;

        if state
            .accounts
            .with(this.account_id, |account| {
                account.tokens.token_usable(&this.token)
            })
            .unwrap_or_default()
        {
            Ok(this)
        } else {
            tracing::warn!("rejected token for account {}", this.account_id);
            Err(Error::NotLoggedIn)
        }
    }
}
