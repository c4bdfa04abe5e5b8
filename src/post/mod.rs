pub mod handle;

use adnuverse_shared::ContentKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use adnuverse_shared::post::*;
use adnuverse_shared::{
    feed::Visibility,
    post::handle::{EditPostDescriptor, PostDescriptor},
};

use crate::{content::Content, store::Record, Error, Global};

/// Longest accepted post text, in characters.
pub const MAX_TEXT_LEN: usize = 5000;

/// A stored post.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PostRecord {
    pub id: u64,
    /// The publisher.
    pub user_id: u64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub likes: Vec<u64>,
    pub visibility: Visibility,
    #[serde(default)]
    pub tags: Vec<String>,
    pub related_course: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for PostRecord {
    const KIND: &'static str = "post";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

impl Content for PostRecord {
    type Populated = Post;

    const CONTENT: ContentKind = ContentKind::Post;

    #[inline]
    fn user_id(&self) -> u64 {
        self.user_id
    }

    #[inline]
    fn likes_mut(&mut self) -> &mut Vec<u64> {
        &mut self.likes
    }

    fn populate_with(&self, global: &Global, comments: usize) -> Post {
        Post {
            id: self.id,
            user: global.author(self.user_id),
            text: self.text.clone(),
            media: self.media.clone(),
            likes: self.likes.clone(),
            comments,
            visibility: self.visibility,
            tags: self.tags.clone(),
            related_course: self.related_course.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Post bodies need text or media.
fn check_body(text: &str, media: &[String]) -> Result<(), Error> {
    if text.is_empty() && media.is_empty() {
        Err(Error::InvalidField {
            field: "text",
            reason: "a post needs text or media",
        })
    } else if text.chars().count() > MAX_TEXT_LEN {
        Err(Error::InvalidField {
            field: "text",
            reason: "too long",
        })
    } else {
        Ok(())
    }
}

impl PostRecord {
    pub fn new(id: u64, user_id: u64, descriptor: PostDescriptor) -> Result<Self, Error> {
        let text = descriptor.text.trim().to_owned();
        let media = crate::content::media_list("media", descriptor.media)?;
        check_body(&text, &media)?;

        Ok(Self {
            id,
            user_id,
            text,
            media,
            likes: vec![],
            visibility: crate::content::visibility(descriptor.visibility)?,
            tags: crate::content::tags(descriptor.tags),
            related_course: crate::content::course(descriptor.related_course),
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    /// Applies edits, leaving this post untouched if any of them is invalid.
    pub fn edit(&mut self, descriptor: EditPostDescriptor) -> Result<(), Error> {
        let text = descriptor
            .text
            .map_or_else(|| self.text.clone(), |t| t.trim().to_owned());
        let media = match descriptor.media {
            Some(media) => crate::content::media_list("media", media)?,
            None => self.media.clone(),
        };
        check_body(&text, &media)?;
        let visibility = match descriptor.visibility {
            Some(v) => crate::content::visibility(v)?,
            None => self.visibility,
        };

        self.text = text;
        self.media = media;
        self.visibility = visibility;
        if let Some(tags) = descriptor.tags {
            self.tags = crate::content::tags(tags);
        }
        if descriptor.related_course.is_some() {
            self.related_course = crate::content::course(descriptor.related_course);
        }
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}
