use adnuverse_shared::Data;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{Notification, NotificationRecord};
use crate::{store::Record, Auth, Error, Global};

/// Get a notification of `auth`, hiding those of other accounts.
fn own(global: &Global, id: u64, auth: &Auth) -> Result<NotificationRecord, Error> {
    global
        .notifications
        .get(id)
        .filter(|n| n.recipient == auth.account_id)
        .ok_or(Error::NotFound(NotificationRecord::KIND))
}

/// Notifications of an account, newest first.
pub async fn get_notifications(
    State(global): State<Global>,
    auth: Auth,
    Path(user_id): Path<u64>,
) -> Result<Json<Data<Vec<Notification>>>, Error> {
    auth.require_self(user_id)?;

    let mut notifications = global
        .notifications
        .filter(|n| n.recipient == user_id);
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(Data::new(
        notifications
            .iter()
            .map(|n| n.populate(&global))
            .collect(),
    )))
}

pub async fn mark_seen(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
) -> Result<Json<Data<Notification>>, Error> {
    own(&global, id, &auth)?;
    let notification = global.notifications.update(id, |n| {
        n.seen = true;
        Ok(n.clone())
    })?;
    Ok(Json(Data::new(notification.populate(&global))))
}

pub async fn delete_notification(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
) -> Result<StatusCode, Error> {
    own(&global, id, &auth)?;
    global.notifications.remove(id);
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes every notification of an account and returns how many were deleted.
pub async fn delete_all_notifications(
    State(global): State<Global>,
    auth: Auth,
    Path(user_id): Path<u64>,
) -> Result<Json<Data<usize>>, Error> {
    auth.require_self(user_id)?;
    let deleted = global.notifications.retain(|n| n.recipient != user_id);
    tracing::info!("cleared {deleted} notifications of account {user_id}");
    Ok(Json(Data::new(deleted)))
}
