pub mod handle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    account::Author,
    feed::{Audience, Visibility},
    ContentKind, Likeable,
};

/// Represents a short video.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Reel {
    pub id: u64,
    pub user: Option<Author>,
    /// URL of the video hosted by the CDN.
    pub video_url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub likes: Vec<u64>,
    #[serde(default)]
    pub comments: usize,
    #[serde(default)]
    pub views: u64,
    pub visibility: Visibility,
    #[serde(default)]
    pub tags: Vec<String>,
    pub related_course: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Audience for Reel {
    #[inline]
    fn author(&self) -> Option<&Author> {
        self.user.as_ref()
    }

    #[inline]
    fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Likeable for Reel {
    const KIND: ContentKind = ContentKind::Reel;

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    fn likes_mut(&mut self) -> &mut Vec<u64> {
        &mut self.likes
    }
}
