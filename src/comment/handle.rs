use adnuverse_shared::{notification::NotificationKind, Data};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{Comment, CommentDescriptor, CommentRecord};
use crate::{
    content::{self, Content},
    store::Store,
    Auth, Error, Global,
};

/// Comments on an item `auth` may see, notifying its author.
fn comment_on<C: Content>(
    global: &Global,
    store: &Store<C>,
    id: u64,
    auth: &Auth,
    descriptor: CommentDescriptor,
) -> Result<(StatusCode, Json<Data<Comment>>), Error> {
    let viewer = global.viewer(Some(auth));
    let (item, _) = content::get_visible(global, store, id, viewer.as_ref())?;

    let comment = CommentRecord::new(
        global.comments.next_id(),
        auth.account_id,
        item.reference(),
        &descriptor.text,
    )?;
    let populated = comment.populate(global);
    global.comments.insert(comment);

    crate::notification::notify(
        global,
        item.user_id(),
        auth.account_id,
        NotificationKind::Comment,
        Some(item.reference()),
    );
    Ok((StatusCode::CREATED, Json(Data::new(populated))))
}

/// Comments of a visible item, oldest first.
fn comments_of<C: Content>(
    global: &Global,
    store: &Store<C>,
    id: u64,
    auth: Option<&Auth>,
) -> Result<Json<Data<Vec<Comment>>>, Error> {
    let viewer = global.viewer(auth);
    let (item, _) = content::get_visible(global, store, id, viewer.as_ref())?;
    let reference = item.reference();

    let mut comments = global.comments.filter(|c| c.parent == reference);
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(Json(Data::new(
        comments.iter().map(|c| c.populate(global)).collect(),
    )))
}

pub async fn comment_on_post(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
    Json(descriptor): Json<CommentDescriptor>,
) -> Result<(StatusCode, Json<Data<Comment>>), Error> {
    comment_on(&global, &global.posts, id, &auth, descriptor)
}

pub async fn get_post_comments(
    State(global): State<Global>,
    auth: Option<Auth>,
    Path(id): Path<u64>,
) -> Result<Json<Data<Vec<Comment>>>, Error> {
    comments_of(&global, &global.posts, id, auth.as_ref())
}

pub async fn comment_on_reel(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
    Json(descriptor): Json<CommentDescriptor>,
) -> Result<(StatusCode, Json<Data<Comment>>), Error> {
    comment_on(&global, &global.reels, id, &auth, descriptor)
}

pub async fn get_reel_comments(
    State(global): State<Global>,
    auth: Option<Auth>,
    Path(id): Path<u64>,
) -> Result<Json<Data<Vec<Comment>>>, Error> {
    comments_of(&global, &global.reels, id, auth.as_ref())
}

/// Deletes a comment. Allowed for its author and the author of the commented item.
pub async fn delete_comment(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
) -> Result<StatusCode, Error> {
    let comment = global.comments.try_get(id)?;
    if comment.user_id != auth.account_id
        && comment.parent_author(&global) != Some(auth.account_id)
    {
        return Err(Error::PermissionDenied);
    }

    global.comments.remove(id);
    tracing::info!("comment {id} deleted by {}", auth.account_id);
    Ok(StatusCode::NO_CONTENT)
}
