pub mod handle;

use adnuverse_shared::{feed::Visibility, ContentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use adnuverse_shared::reel::*;
use adnuverse_shared::reel::handle::ReelDescriptor;

use crate::{content::Content, store::Record, Error, Global};

/// A stored reel.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReelRecord {
    pub id: u64,
    pub user_id: u64,
    pub video_url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub likes: Vec<u64>,
    #[serde(default)]
    pub views: u64,
    pub visibility: Visibility,
    #[serde(default)]
    pub tags: Vec<String>,
    pub related_course: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for ReelRecord {
    const KIND: &'static str = "reel";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

impl Content for ReelRecord {
    type Populated = Reel;

    const CONTENT: ContentKind = ContentKind::Reel;

    #[inline]
    fn user_id(&self) -> u64 {
        self.user_id
    }

    #[inline]
    fn likes_mut(&mut self) -> &mut Vec<u64> {
        &mut self.likes
    }

    fn populate_with(&self, global: &Global, comments: usize) -> Reel {
        Reel {
            id: self.id,
            user: global.author(self.user_id),
            video_url: self.video_url.clone(),
            caption: self.caption.clone(),
            likes: self.likes.clone(),
            comments,
            views: self.views,
            visibility: self.visibility,
            tags: self.tags.clone(),
            related_course: self.related_course.clone(),
            created_at: self.created_at,
        }
    }
}

impl ReelRecord {
    pub fn new(id: u64, user_id: u64, descriptor: ReelDescriptor) -> Result<Self, Error> {
        let video_url = crate::content::media_field("video_url", descriptor.video_url)?.ok_or(
            Error::InvalidField {
                field: "video_url",
                reason: "a reel needs a video",
            },
        )?;

        Ok(Self {
            id,
            user_id,
            video_url,
            caption: descriptor.caption.trim().to_owned(),
            likes: vec![],
            views: 0,
            visibility: crate::content::visibility(descriptor.visibility)?,
            tags: crate::content::tags(descriptor.tags),
            related_course: crate::content::course(descriptor.related_course),
            created_at: Utc::now(),
        })
    }
}
