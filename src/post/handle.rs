use adnuverse_shared::{feed, Data, LikeResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{Post, PostRecord};
use crate::{
    content::{self, Content},
    store::Record,
    Auth, Error, Global,
};

use adnuverse_shared::post::handle::*;

/// Timeline of posts for the viewer, newest first.
pub async fn get_posts(
    State(global): State<Global>,
    auth: Option<Auth>,
) -> Json<Data<Vec<Post>>> {
    let viewer = global.viewer(auth.as_ref());
    Json(Data::new(feed::timeline(
        content::populate_all(&global, &global.posts),
        viewer.as_ref(),
    )))
}

pub async fn create_post(
    State(global): State<Global>,
    auth: Auth,
    Json(descriptor): Json<PostDescriptor>,
) -> Result<(StatusCode, Json<Data<Post>>), Error> {
    let post = PostRecord::new(global.posts.next_id(), auth.account_id, descriptor)?;
    let populated = post.populate(&global);

    tracing::info!("account {} created post {}", auth.account_id, post.id);
    global.posts.insert(post);
    Ok((StatusCode::CREATED, Json(Data::new(populated))))
}

/// Posts of one user the viewer may see, newest first.
pub async fn get_user_posts(
    State(global): State<Global>,
    auth: Option<Auth>,
    Path(user_id): Path<u64>,
) -> Result<Json<Data<Vec<Post>>>, Error> {
    if !global.accounts.contains(user_id) {
        return Err(Error::NotFound(crate::account::Account::KIND));
    }

    let viewer = global.viewer(auth.as_ref());
    Ok(Json(Data::new(feed::profile(
        content::populate_all(&global, &global.posts),
        viewer.as_ref(),
        user_id,
    ))))
}

pub async fn get_post(
    State(global): State<Global>,
    auth: Option<Auth>,
    Path(id): Path<u64>,
) -> Result<Json<Data<Post>>, Error> {
    let viewer = global.viewer(auth.as_ref());
    let (_, post) = content::get_visible(&global, &global.posts, id, viewer.as_ref())?;
    Ok(Json(Data::new(post)))
}

pub async fn update_post(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
    Json(descriptor): Json<EditPostDescriptor>,
) -> Result<Json<Data<Post>>, Error> {
    let post = global.posts.update(id, |post| {
        content::require_author(post, &auth)?;
        post.edit(descriptor)?;
        Ok(post.clone())
    })?;
    Ok(Json(Data::new(post.populate(&global))))
}

pub async fn delete_post(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
) -> Result<StatusCode, Error> {
    content::delete(&global, &global.posts, id, &auth)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn like_post(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
) -> Result<Json<Data<LikeResult>>, Error> {
    content::like(&global, &global.posts, id, &auth).map(|r| Json(Data::new(r)))
}
