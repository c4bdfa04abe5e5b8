use adnuverse_shared::{notification::NotificationKind, Data};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{google, same_email, Account, UserProfile};
use crate::{store::Record, Auth, Error, Global};

use adnuverse_shared::account::handle::*;

/// Create an account and log into it.
pub async fn signup(
    State(global): State<Global>,
    Json(descriptor): Json<SignupDescriptor>,
) -> Result<(StatusCode, Json<Data<LoginResult>>), Error> {
    if !global.config.email_allowed(&descriptor.email) {
        return Err(Error::EmailDomainNotAllowed(
            descriptor.email.domain().to_owned(),
        ));
    }
    let username = descriptor.username.trim().to_owned();

    let _guard = global.registration.lock();
    if global
        .accounts
        .find(|a| a.username.eq_ignore_ascii_case(&username))
        .is_some()
    {
        return Err(Error::UsernameTaken(username));
    }
    if global
        .accounts
        .find(|a| same_email(&a.email, &descriptor.email))
        .is_some()
    {
        return Err(Error::EmailRegistered(descriptor.email));
    }

    let mut account = Account::new(
        global.accounts.next_id(),
        username,
        descriptor.email,
        descriptor.first_name,
        descriptor.last_name,
    )?;
    account.set_password(&descriptor.password)?;
    let token = account.issue_token(global.config.token_expiration_days);
    let user = account.profile();

    tracing::info!("account {} registered as {}", account.id, account.username);
    global.accounts.insert(account);
    Ok((StatusCode::CREATED, Json(Data::new(LoginResult { token, user }))))
}

pub async fn login(
    State(global): State<Global>,
    Json(descriptor): Json<LoginDescriptor>,
) -> Result<Json<Data<LoginResult>>, Error> {
    let id = global
        .accounts
        .find(|a| same_email(&a.email, &descriptor.email))
        .ok_or(Error::UsernameOrPasswordIncorrect)?
        .id;

    let days = global.config.token_expiration_days;
    let (token, user) = global.accounts.update(id, |a| {
        Ok((a.login(&descriptor.password, days)?, a.profile()))
    })?;
    Ok(Json(Data::new(LoginResult { token, user })))
}

/// Log in with a Google ID token, creating or linking the account.
pub async fn google_login(
    State(global): State<Global>,
    Json(descriptor): Json<GoogleLoginDescriptor>,
) -> Result<Json<Data<LoginResult>>, Error> {
    let client_id = &global
        .config
        .google
        .as_ref()
        .ok_or(Error::GoogleDisabled)?
        .client_id;

    let identity = google::verify_id_token(&global.http, client_id, &descriptor.id_token).await?;
    let (id, token) = google::sign_in(&global, identity)?;
    let user = global.accounts.try_get(id)?.profile();
    Ok(Json(Data::new(LoginResult { token, user })))
}

/// Revoke the token of this request.
pub async fn logout(State(global): State<Global>, auth: Auth) -> Result<StatusCode, Error> {
    global.accounts.update(auth.account_id, |a| {
        a.tokens.remove(&auth.token);
        Ok(())
    })?;
    Ok(StatusCode::NO_CONTENT)
}

/// List users, optionally matching a search query. Sorted by username.
pub async fn get_users(
    State(global): State<Global>,
    _auth: Auth,
    Query(query): Query<SearchUsersQuery>,
) -> Json<Data<Vec<UserProfile>>> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    let mut users: Vec<UserProfile> = global
        .accounts
        .filter(|a| q.is_empty() || a.matches(q))
        .iter()
        .map(Account::profile)
        .collect();
    users.sort_by(|a, b| a.username.cmp(&b.username));
    Json(Data::new(users))
}

pub async fn get_user(
    State(global): State<Global>,
    Path(id): Path<u64>,
) -> Result<Json<Data<UserProfile>>, Error> {
    Ok(Json(Data::new(global.accounts.try_get(id)?.profile())))
}

pub async fn update_user(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
    Json(descriptor): Json<UpdateProfileDescriptor>,
) -> Result<Json<Data<UserProfile>>, Error> {
    auth.require_self(id)?;
    let user = global.accounts.update(id, |a| {
        a.apply(descriptor)?;
        Ok(a.profile())
    })?;
    Ok(Json(Data::new(user)))
}

pub async fn change_password(
    State(global): State<Global>,
    auth: Auth,
    Json(descriptor): Json<ChangePasswordDescriptor>,
) -> Result<StatusCode, Error> {
    global
        .accounts
        .update(auth.account_id, |a| a.change_password(&descriptor))?;
    tracing::info!("account {} changed password", auth.account_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Follow a user, returning the followed profile.
pub async fn follow(
    State(global): State<Global>,
    auth: Auth,
    Path(target): Path<u64>,
) -> Result<Json<Data<UserProfile>>, Error> {
    if target == auth.account_id {
        return Err(Error::FollowSelf);
    }
    if !global.accounts.contains(target) {
        return Err(Error::NotFound(Account::KIND));
    }

    global.accounts.update(auth.account_id, |a| {
        if a.following.contains(&target) {
            return Err(Error::AlreadyFollowing);
        }
        a.following.push(target);
        Ok(())
    })?;
    let user = global.accounts.update(target, |a| {
        if !a.followers.contains(&auth.account_id) {
            a.followers.push(auth.account_id);
        }
        Ok(a.profile())
    })?;

    crate::notification::notify(
        &global,
        target,
        auth.account_id,
        NotificationKind::Follow,
        None,
    );
    Ok(Json(Data::new(user)))
}

/// Unfollow a user, returning the unfollowed profile.
pub async fn unfollow(
    State(global): State<Global>,
    auth: Auth,
    Path(target): Path<u64>,
) -> Result<Json<Data<UserProfile>>, Error> {
    if !global.accounts.contains(target) {
        return Err(Error::NotFound(Account::KIND));
    }

    global.accounts.update(auth.account_id, |a| {
        let len = a.following.len();
        a.following.retain(|id| *id != target);
        if a.following.len() == len {
            Err(Error::NotFollowing)
        } else {
            Ok(())
        }
    })?;
    let user = global.accounts.update(target, |a| {
        a.followers.retain(|id| *id != auth.account_id);
        Ok(a.profile())
    })?;
    Ok(Json(Data::new(user)))
}

/// Profiles of the given ids, skipping deleted accounts.
fn profiles(global: &Global, ids: &[u64]) -> Vec<UserProfile> {
    ids.iter()
        .filter_map(|id| global.accounts.with(*id, Account::profile))
        .collect()
}

pub async fn followers(
    State(global): State<Global>,
    Path(id): Path<u64>,
) -> Result<Json<Data<Vec<UserProfile>>>, Error> {
    let ids = global.accounts.try_get(id)?.followers;
    Ok(Json(Data::new(profiles(&global, &ids))))
}

pub async fn following(
    State(global): State<Global>,
    Path(id): Path<u64>,
) -> Result<Json<Data<Vec<UserProfile>>>, Error> {
    let ids = global.accounts.try_get(id)?.following;
    Ok(Json(Data::new(profiles(&global, &ids))))
}
