pub mod account;
pub mod comment;
pub mod feed;
pub mod notification;
pub mod post;
pub mod reel;
pub mod story;

use serde::{Deserialize, Serialize};

/// Envelope of every successful response body.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    #[inline]
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Kinds of content that can be liked, commented on or referenced by a notification.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Post,
    Reel,
    Story,
}

impl ContentKind {
    /// Path segment of the collection under `/api`.
    pub fn collection(self) -> &'static str {
        match self {
            ContentKind::Post => "posts",
            ContentKind::Reel => "reels",
            ContentKind::Story => "stories",
        }
    }
}

/// A `{type, id}` pointer to a content item.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentRef {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub id: u64,
}

/// Content carrying a list of liking accounts.
pub trait Likeable {
    const KIND: ContentKind;

    fn id(&self) -> u64;

    fn likes_mut(&mut self) -> &mut Vec<u64>;
}

/// Adds `id` to `likes` if absent, removes it otherwise.
///
/// Returns whether `id` is present afterwards.
pub fn toggle_like(likes: &mut Vec<u64>, id: u64) -> bool {
    if let Some(index) = likes.iter().position(|e| *e == id) {
        likes.remove(index);
        false
    } else {
        likes.push(id);
        true
    }
}

/// Whether `url` looks like a link handed out by the media CDN.
pub fn is_media_url(url: &str) -> bool {
    ["https://", "http://"]
        .iter()
        .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme))
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeResult {
    pub liked: bool,
    pub likes: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewResult {
    pub views: u64,
}
