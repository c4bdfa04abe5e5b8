use adnuverse_shared::{feed, Data, LikeResult, ViewResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::{purge_expired, Story, StoryRecord};
use crate::{
    content::{self, Content},
    store::Record,
    Auth, Error, Global,
};

use adnuverse_shared::story::handle::*;

/// Story tray of the viewer: visible stories, newest first,
/// with the viewer's own story in front.
pub async fn get_stories(
    State(global): State<Global>,
    auth: Option<Auth>,
) -> Json<Data<Vec<Story>>> {
    purge_expired(&global);

    let viewer = global.viewer(auth.as_ref());
    Json(Data::new(feed::story_tray(
        content::populate_all(&global, &global.stories),
        viewer.as_ref(),
    )))
}

pub async fn create_story(
    State(global): State<Global>,
    auth: Auth,
    Json(descriptor): Json<StoryDescriptor>,
) -> Result<(StatusCode, Json<Data<Story>>), Error> {
    let now = Utc::now();
    let _guard = global.story_creation.lock();
    if global
        .stories
        .find(|s| s.user_id == auth.account_id && !s.is_expired(now))
        .is_some()
    {
        return Err(Error::ActiveStoryExists);
    }

    let story = StoryRecord::new(
        global.stories.next_id(),
        auth.account_id,
        descriptor,
        global.config.story_lifetime(),
    )?;
    let populated = story.populate(&global);

    tracing::info!("account {} created story {}", auth.account_id, story.id);
    global.stories.insert(story);
    Ok((StatusCode::CREATED, Json(Data::new(populated))))
}

pub async fn get_user_stories(
    State(global): State<Global>,
    auth: Option<Auth>,
    Path(user_id): Path<u64>,
) -> Result<Json<Data<Vec<Story>>>, Error> {
    if !global.accounts.contains(user_id) {
        return Err(Error::NotFound(crate::account::Account::KIND));
    }
    purge_expired(&global);

    let viewer = global.viewer(auth.as_ref());
    Ok(Json(Data::new(feed::profile(
        content::populate_all(&global, &global.stories),
        viewer.as_ref(),
        user_id,
    ))))
}

pub async fn delete_story(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
) -> Result<StatusCode, Error> {
    content::delete(&global, &global.stories, id, &auth)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn like_story(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
) -> Result<Json<Data<LikeResult>>, Error> {
    purge_expired(&global);
    content::like(&global, &global.stories, id, &auth).map(|r| Json(Data::new(r)))
}

/// Records the viewer of a story once. The author's own views are not recorded.
pub async fn view_story(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
) -> Result<Json<Data<ViewResult>>, Error> {
    purge_expired(&global);

    let viewer = global.viewer(Some(&auth));
    content::get_visible(&global, &global.stories, id, viewer.as_ref())?;

    let views = global.stories.update(id, |story| {
        if story.user_id != auth.account_id && !story.viewers.contains(&auth.account_id) {
            story.viewers.push(auth.account_id);
        }
        Ok(story.viewers.len() as u64)
    })?;
    Ok(Json(Data::new(ViewResult { views })))
}
