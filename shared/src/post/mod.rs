pub mod handle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    account::Author,
    feed::{Audience, Visibility},
    ContentKind, Likeable,
};

/// Represents a post published by a user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Post {
    /// The only id of this post.
    pub id: u64,
    pub user: Option<Author>,
    pub text: String,
    /// Media URLs hosted by the CDN.
    #[serde(default)]
    pub media: Vec<String>,
    /// Ids of accounts that liked this post.
    #[serde(default)]
    pub likes: Vec<u64>,
    /// Number of comments.
    #[serde(default)]
    pub comments: usize,
    pub visibility: Visibility,
    #[serde(default)]
    pub tags: Vec<String>,
    pub related_course: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Audience for Post {
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

impl Likeable for Post {
    const KIND: ContentKind = ContentKind::Post;

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    fn likes_mut(&mut self) -> &mut Vec<u64> {
        &mut self.likes
    }
}
