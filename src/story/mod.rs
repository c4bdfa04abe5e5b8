pub mod handle;

use adnuverse_shared::{feed::Visibility, story::handle::StoryDescriptor, ContentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use adnuverse_shared::story::*;

use crate::{content::Content, store::Record, Error, Global};

/// A stored story.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StoryRecord {
    pub id: u64,
    pub user_id: u64,
    pub kind: StoryKind,
    #[serde(default)]
    pub text: String,
    pub text_style: Option<TextStyle>,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub likes: Vec<u64>,
    #[serde(default)]
    pub viewers: Vec<u64>,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Record for StoryRecord {
    const KIND: &'static str = "story";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

impl Content for StoryRecord {
    type Populated = Story;

    const CONTENT: ContentKind = ContentKind::Story;

    #[inline]
    fn user_id(&self) -> u64 {
        self.user_id
    }

    #[inline]
    fn likes_mut(&mut self) -> &mut Vec<u64> {
        &mut self.likes
    }

    // stories take no comments
    fn populate_with(&self, global: &Global, _comments: usize) -> Story {
        Story {
            id: self.id,
            user: global.author(self.user_id),
            kind: self.kind,
            text: self.text.clone(),
            text_style: self.text_style.clone(),
            media: self.media.clone(),
            likes: self.likes.clone(),
            viewers: self.viewers.clone(),
            visibility: self.visibility,
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

impl StoryRecord {
    /// Creates a story living for `lifetime` from now.
    pub fn new(
        id: u64,
        user_id: u64,
        descriptor: StoryDescriptor,
        lifetime: chrono::Duration,
    ) -> Result<Self, Error> {
        let text = descriptor.text.trim().to_owned();
        let media = crate::content::media_list("media", descriptor.media)?;

        match descriptor.kind {
            StoryKind::Text if text.is_empty() => {
                return Err(Error::InvalidField {
                    field: "text",
                    reason: "a text story needs text",
                })
            }
            StoryKind::Image | StoryKind::Video if media.is_empty() => {
                return Err(Error::InvalidField {
                    field: "media",
                    reason: "an image or video story needs media",
                })
            }
            _ => (),
        }

        let created_at = Utc::now();
        Ok(Self {
            id,
            user_id,
            kind: descriptor.kind,
            text,
            text_style: descriptor.text_style,
            media,
            likes: vec![],
            viewers: vec![],
            visibility: crate::content::visibility(descriptor.visibility)?,
            created_at,
            expires_at: created_at + lifetime,
        })
    }

    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Removes expired stories with the notifications referencing them.
pub fn purge_expired(global: &Global) {
    let now = Utc::now();
    let expired = global.stories.filter(|s| s.is_expired(now));
    for story in expired {
        global.stories.remove(story.id);
        let reference = story.reference();
        global
            .notifications
            .retain(|n| n.reference != Some(reference));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(kind: StoryKind, text: &str, media: &[&str]) -> StoryDescriptor {
        StoryDescriptor {
            kind,
            text: text.to_owned(),
            text_style: None,
            media: media.iter().map(|m| m.to_string()).collect(),
            visibility: Visibility::Public,
        }
    }

    #[test]
    fn story_body_matches_kind() {
        let day = chrono::Duration::hours(24);
        assert!(StoryRecord::new(1, 2, descriptor(StoryKind::Text, " ", &[]), day).is_err());
        assert!(StoryRecord::new(1, 2, descriptor(StoryKind::Image, "hi", &[]), day).is_err());

        let story = StoryRecord::new(
            1,
            2,
            descriptor(StoryKind::Video, "", &["https://cdn.example/v.mp4"]),
            day,
        )
        .unwrap();
        assert_eq!(story.expires_at - story.created_at, day);
        assert!(!story.is_expired(story.created_at));
        assert!(story.is_expired(story.expires_at));
    }
}
