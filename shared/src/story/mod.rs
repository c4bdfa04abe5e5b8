pub mod handle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    account::Author,
    feed::{Audience, Visibility},
    ContentKind, Likeable,
};

/// Represents a story, visible until `expires_at`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Story {
    pub id: u64,
    pub user: Option<Author>,
    #[serde(rename = "type")]
    pub kind: StoryKind,
    #[serde(default)]
    pub text: String,
    pub text_style: Option<TextStyle>,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub likes: Vec<u64>,
    /// Accounts that opened this story, each at most once.
    #[serde(default)]
    pub viewers: Vec<u64>,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Story {
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum StoryKind {
    #[default]
    Text,
    Image,
    Video,
}

/// Presentation of the text layer of a story.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font_size: u16,
    pub position: Position,
    pub background: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Audience for Story {
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

impl Likeable for Story {
    const KIND: ContentKind = ContentKind::Story;

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    fn likes_mut(&mut self) -> &mut Vec<u64> {
        &mut self.likes
    }
}
