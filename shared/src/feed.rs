//! Feed assembly: which content a viewer may see, and in which order.
//!
//! Posts, reels and stories all implement [`Audience`], so the visibility
//! rule lives here once and is shared by the server handlers and the
//! client session. Every function is total: missing authors, blank
//! departments and unknown visibility values resolve to "not visible".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{Author, UserProfile};

/// Who may see a content item besides its author.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    #[default]
    Public,
    /// Members of the author's department.
    DepartmentOnly,
    /// Accounts listed in the author's followers.
    FollowersOnly,
    /// A value this build does not know. Only the author sees such items.
    #[serde(other)]
    Unrecognized,
}

/// The account a feed is assembled for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: u64,
    pub department: Option<String>,
}

impl From<&UserProfile> for Viewer {
    #[inline]
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            department: profile.department.clone(),
        }
    }
}

/// Content that can be placed in a feed.
pub trait Audience {
    /// The populated author, `None` if it could not be resolved.
    fn author(&self) -> Option<&Author>;

    fn visibility(&self) -> Visibility;

    fn created_at(&self) -> DateTime<Utc>;
}

impl<T: Audience + ?Sized> Audience for &T {
    #[inline]
    fn author(&self) -> Option<&Author> {
        (**self).author()
    }

    #[inline]
    fn visibility(&self) -> Visibility {
        (**self).visibility()
    }

    #[inline]
    fn created_at(&self) -> DateTime<Utc> {
        (**self).created_at()
    }
}

fn same_department(a: Option<&str>, b: Option<&str>) -> bool {
    match (a.map(str::trim), b.map(str::trim)) {
        (Some(a), Some(b)) => !a.is_empty() && a == b,
        _ => false,
    }
}

/// Whether `viewer` may see `item`. An anonymous viewer only sees public items.
pub fn is_visible<T: Audience + ?Sized>(item: &T, viewer: Option<&Viewer>) -> bool {
    let Some(author) = item.author() else {
        return false;
    };
    let visibility = item.visibility();
    if visibility == Visibility::Public {
        return true;
    }
    let Some(viewer) = viewer else {
        return false;
    };
    if author.id == viewer.id {
        return true;
    }

    match visibility {
        Visibility::Public => true,
        Visibility::DepartmentOnly => same_department(
            author.department.as_deref(),
            viewer.department.as_deref(),
        ),
        Visibility::FollowersOnly => author.followers.contains(&viewer.id),
        Visibility::Unrecognized => false,
    }
}

/// Keeps the items `viewer` may see, preserving their order.
pub fn visible<I>(items: I, viewer: Option<&Viewer>) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: Audience,
{
    items
        .into_iter()
        .filter(|item| is_visible(item, viewer))
        .collect()
}

/// Sorts newest first. Items created at the same instant keep their order.
pub fn rank_by_recency<T: Audience>(items: &mut [T]) {
    items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
}

/// Moves the first item authored by `viewer_id` to the front.
pub fn pin_own<T: Audience>(items: &mut [T], viewer_id: u64) {
    if let Some(index) = items
        .iter()
        .position(|item| item.author().map_or(false, |a| a.id == viewer_id))
    {
        items[..=index].rotate_right(1);
    }
}

/// Keeps the items written by `author_id`, preserving their order.
pub fn authored_by<I>(items: I, author_id: u64) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: Audience,
{
    items
        .into_iter()
        .filter(|item| item.author().map_or(false, |a| a.id == author_id))
        .collect()
}

/// Visible items, newest first.
pub fn timeline<I>(items: I, viewer: Option<&Viewer>) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: Audience,
{
    let mut items = visible(items, viewer);
    rank_by_recency(&mut items);
    items
}

/// Visible stories, newest first, with the viewer's own story in front.
pub fn story_tray<I>(items: I, viewer: Option<&Viewer>) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: Audience,
{
    let mut items = timeline(items, viewer);
    if let Some(viewer) = viewer {
        pin_own(&mut items, viewer.id);
    }
    items
}

/// Visible items of one author, newest first. Used by profile pages.
pub fn profile<I>(items: I, viewer: Option<&Viewer>, author_id: u64) -> Vec<I::Item>
where
    I: IntoIterator,
    I::Item: Audience,
{
    let mut items = authored_by(visible(items, viewer), author_id);
    rank_by_recency(&mut items);
    items
}
