use adnuverse_shared::{feed, Data, LikeResult, ViewResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::{Reel, ReelRecord};
use crate::{
    content::{self, Content},
    store::Record,
    Auth, Error, Global,
};

use adnuverse_shared::reel::handle::*;

pub async fn get_reels(
    State(global): State<Global>,
    auth: Option<Auth>,
) -> Json<Data<Vec<Reel>>> {
    let viewer = global.viewer(auth.as_ref());
    Json(Data::new(feed::timeline(
        content::populate_all(&global, &global.reels),
        viewer.as_ref(),
    )))
}

pub async fn create_reel(
    State(global): State<Global>,
    auth: Auth,
    Json(descriptor): Json<ReelDescriptor>,
) -> Result<(StatusCode, Json<Data<Reel>>), Error> {
    let reel = ReelRecord::new(global.reels.next_id(), auth.account_id, descriptor)?;
    let populated = reel.populate(&global);

    tracing::info!("account {} created reel {}", auth.account_id, reel.id);
    global.reels.insert(reel);
    Ok((StatusCode::CREATED, Json(Data::new(populated))))
}

pub async fn get_user_reels(
    State(global): State<Global>,
    auth: Option<Auth>,
    Path(user_id): Path<u64>,
) -> Result<Json<Data<Vec<Reel>>>, Error> {
    if !global.accounts.contains(user_id) {
        return Err(Error::NotFound(crate::account::Account::KIND));
    }

    let viewer = global.viewer(auth.as_ref());
    Ok(Json(Data::new(feed::profile(
        content::populate_all(&global, &global.reels),
        viewer.as_ref(),
        user_id,
    ))))
}

pub async fn get_reel(
    State(global): State<Global>,
    auth: Option<Auth>,
    Path(id): Path<u64>,
) -> Result<Json<Data<Reel>>, Error> {
    let viewer = global.viewer(auth.as_ref());
    let (_, reel) = content::get_visible(&global, &global.reels, id, viewer.as_ref())?;
    Ok(Json(Data::new(reel)))
}

pub async fn delete_reel(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
) -> Result<StatusCode, Error> {
    content::delete(&global, &global.reels, id, &auth)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn like_reel(
    State(global): State<Global>,
    auth: Auth,
    Path(id): Path<u64>,
) -> Result<Json<Data<LikeResult>>, Error> {
    content::like(&global, &global.reels, id, &auth).map(|r| Json(Data::new(r)))
}

/// Counts a play of a visible reel. Anonymous plays count too.
pub async fn view_reel(
    State(global): State<Global>,
    auth: Option<Auth>,
    Path(id): Path<u64>,
) -> Result<Json<Data<ViewResult>>, Error> {
    let viewer = global.viewer(auth.as_ref());
    content::get_visible(&global, &global.reels, id, viewer.as_ref())?;

    let views = global.reels.update(id, |reel| {
        reel.views = reel.views.saturating_add(1);
        Ok(reel.views)
    })?;
    Ok(Json(Data::new(ViewResult { views })))
}
