//! Behaviour shared by posts, reels and stories.

use adnuverse_shared::{
    feed::{self, Audience, Viewer, Visibility},
    notification::NotificationKind,
    ContentKind, ContentRef, LikeResult,
};
use serde::Serialize;

use crate::{
    store::{Record, Store},
    Auth, Error, Global,
};

/// A stored content item that can be placed in a feed.
pub trait Content: Record {
    /// The content with its author populated, as sent to clients.
    type Populated: Audience + Serialize + Send;

    const CONTENT: ContentKind;

    /// Id of the author account.
    fn user_id(&self) -> u64;

    fn likes_mut(&mut self) -> &mut Vec<u64>;

    /// Populates the item, given how many comments it has.
    fn populate_with(&self, global: &Global, comments: usize) -> Self::Populated;

    fn populate(&self, global: &Global) -> Self::Populated {
        let reference = self.reference();
        self.populate_with(global, global.comments.count(|c| c.parent == reference))
    }

    #[inline]
    fn reference(&self) -> ContentRef {
        ContentRef {
            kind: Self::CONTENT,
            id: self.id(),
        }
    }
}

/// Rejects visibility values this server doesn't know.
pub fn visibility(visibility: Visibility) -> Result<Visibility, Error> {
    if visibility == Visibility::Unrecognized {
        Err(Error::InvalidVisibility)
    } else {
        Ok(visibility)
    }
}

/// Validates an optional media url, blank values clear it.
pub fn media_field(field: &'static str, value: String) -> Result<Option<String>, Error> {
    let value = value.trim();
    if value.is_empty() {
        Ok(None)
    } else if adnuverse_shared::is_media_url(value) {
        Ok(Some(value.to_owned()))
    } else {
        Err(Error::InvalidField {
            field,
            reason: "must be an http(s) url",
        })
    }
}

/// Validates a list of media urls, dropping blank entries.
pub fn media_list(field: &'static str, urls: Vec<String>) -> Result<Vec<String>, Error> {
    let mut media = Vec::with_capacity(urls.len());
    for url in urls {
        media.extend(media_field(field, url)?);
    }
    Ok(media)
}

/// Trims tags, strips leading `#` and drops blank or repeated ones.
pub fn tags(tags: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().trim_start_matches('#').trim();
        if !tag.is_empty() && !result.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            result.push(tag.to_owned());
        }
    }
    result
}

/// Trims an optional course, blank values clear it.
pub fn course(course: Option<String>) -> Option<String> {
    course
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty())
}

/// Ensures `auth` wrote `item`.
#[inline]
pub fn require_author<C: Content>(item: &C, auth: &Auth) -> Result<(), Error> {
    if item.user_id() == auth.account_id {
        Ok(())
    } else {
        Err(Error::PermissionDenied)
    }
}

/// Every stored item of a kind, populated.
///
/// Comments are counted in a single pass over the comment store.
pub fn populate_all<C: Content>(global: &Global, store: &Store<C>) -> Vec<C::Populated> {
    let comments = global.comments.tally(|c| c.parent);
    store
        .snapshot()
        .iter()
        .map(|item| {
            let count = comments.get(&item.reference()).copied().unwrap_or(0);
            item.populate_with(global, count)
        })
        .collect()
}

/// An item if `viewer` may see it, [`Error::NotFound`] otherwise.
pub fn get_visible<C: Content>(
    global: &Global,
    store: &Store<C>,
    id: u64,
    viewer: Option<&Viewer>,
) -> Result<(C, C::Populated), Error> {
    let item = store.try_get(id)?;
    let populated = item.populate(global);
    if feed::is_visible(&populated, viewer) {
        Ok((item, populated))
    } else {
        Err(Error::NotFound(C::KIND))
    }
}

/// Toggles the like of `auth` on a visible item.
///
/// The author is notified when the like is turned on.
pub fn like<C: Content>(
    global: &Global,
    store: &Store<C>,
    id: u64,
    auth: &Auth,
) -> Result<LikeResult, Error> {
    let viewer = global.viewer(Some(auth));
    let (item, _) = get_visible(global, store, id, viewer.as_ref())?;

    let result = store.update(id, |item| {
        let likes = item.likes_mut();
        let liked = adnuverse_shared::toggle_like(likes, auth.account_id);
        Ok(LikeResult {
            liked,
            likes: likes.len(),
        })
    })?;

    if result.liked {
        crate::notification::notify(
            global,
            item.user_id(),
            auth.account_id,
            NotificationKind::Like,
            Some(item.reference()),
        );
    }
    Ok(result)
}

/// Deletes an item written by `auth` with its comments and the
/// notifications referencing it.
pub fn delete<C: Content>(
    global: &Global,
    store: &Store<C>,
    id: u64,
    auth: &Auth,
) -> Result<(), Error> {
    require_author(&store.try_get(id)?, auth)?;
    let item = store.remove(id).ok_or(Error::NotFound(C::KIND))?;
    let reference = item.reference();

    let comments = global.comments.retain(|c| c.parent != reference);
    let notifications = global
        .notifications
        .retain(|n| n.reference != Some(reference));
    tracing::info!(
        "{} {id} deleted by {} with {comments} comments and {notifications} notifications",
        C::KIND,
        auth.account_id
    );
    Ok(())
}
