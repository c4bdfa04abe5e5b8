//! Google sign-in with ID tokens handed out to the frontend.

use serde::Deserialize;

use super::{same_email, Account};
use crate::{Error, Global};

const TOKEN_INFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Claims of an ID token as reported by the tokeninfo endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct TokenInfo {
    pub aud: String,
    pub sub: String,
    pub email: Option<String>,
    /// `"true"` or `"false"`.
    pub email_verified: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

/// A verified Google identity.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject: String,
    pub email: lettre::Address,
    pub first_name: String,
    pub last_name: String,
    pub picture: Option<String>,
}

impl TokenInfo {
    /// Checks the claims were issued for `client_id` with a verified email.
    pub fn verify(self, client_id: &str) -> Result<Identity, Error> {
        if self.aud != client_id {
            return Err(Error::GoogleToken("audience mismatch"));
        }
        if self.email_verified.as_deref() != Some("true") {
            return Err(Error::GoogleToken("email not verified"));
        }
        let email: lettre::Address = self
            .email
            .ok_or(Error::GoogleToken("no email claim"))?
            .parse()?;

        Ok(Identity {
            subject: self.sub,
            first_name: self
                .given_name
                .unwrap_or_else(|| email.user().to_owned()),
            last_name: self.family_name.unwrap_or_default(),
            picture: self.picture.filter(|p| adnuverse_shared::is_media_url(p)),
            email,
        })
    }
}

/// Asks Google about `id_token` and verifies the answer.
pub async fn verify_id_token(
    http: &reqwest::Client,
    client_id: &str,
    id_token: &str,
) -> Result<Identity, Error> {
    let response = http
        .get(TOKEN_INFO_URL)
        .query(&[("id_token", id_token)])
        .send()
        .await?;

    if !response.status().is_success() {
        tracing::warn!("tokeninfo rejected id token: {}", response.status());
        return Err(Error::GoogleToken("invalid id token"));
    }
    response.json::<TokenInfo>().await?.verify(client_id)
}

/// Derives an unused username from the local part of an email address.
fn unique_username(global: &Global, email: &lettre::Address) -> String {
    let mut base: String = email
        .user()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
        .take(24)
        .collect();
    while base.len() < 3 {
        base.push('_');
    }

    let taken = |name: &str| {
        global
            .accounts
            .find(|a| a.username.eq_ignore_ascii_case(name))
            .is_some()
    };
    if !taken(&base) {
        return base;
    }
    loop {
        let name = format!("{base}{}", rand::random::<u16>() % 10000);
        if !taken(&name) {
            return name;
        }
    }
}

/// Logs into the account linked to `identity`, linking an account with
/// the same email or creating a new one if there is none.
///
/// Returns the account id and a new credential.
pub fn sign_in(global: &Global, identity: Identity) -> Result<(u64, String), Error> {
    let days = global.config.token_expiration_days;
    let _guard = global.registration.lock();

    if let Some(account) = global
        .accounts
        .find(|a| a.google_id.as_deref() == Some(identity.subject.as_str()))
    {
        let credential = global
            .accounts
            .update(account.id, |a| Ok(a.issue_token(days)))?;
        return Ok((account.id, credential));
    }

    if let Some(account) = global
        .accounts
        .find(|a| same_email(&a.email, &identity.email))
    {
        tracing::info!("linking google account to account {}", account.id);
        let credential = global.accounts.update(account.id, |a| {
            a.google_id = Some(identity.subject.clone());
            Ok(a.issue_token(days))
        })?;
        return Ok((account.id, credential));
    }

    if !global.config.email_allowed(&identity.email) {
        return Err(Error::EmailDomainNotAllowed(
            identity.email.domain().to_owned(),
        ));
    }

    let mut account = Account::new(
        global.accounts.next_id(),
        unique_username(global, &identity.email),
        identity.email,
        identity.first_name,
        identity.last_name,
    )?;
    account.google_id = Some(identity.subject);
    account.attributes.avatar = identity.picture;
    let credential = account.issue_token(days);
    let id = account.id;

    tracing::info!("created account {id} from google sign-in");
    global.accounts.insert(account);
    Ok((id, credential))
}
