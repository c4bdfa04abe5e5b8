pub mod handle;

use adnuverse_shared::{ContentKind, ContentRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use adnuverse_shared::comment::*;

use crate::{content::Content, store::Record, Error, Global};

/// A stored comment.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CommentRecord {
    pub id: u64,
    pub user_id: u64,
    pub parent: ContentRef,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Record for CommentRecord {
    const KIND: &'static str = "comment";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

impl CommentRecord {
    pub fn new(id: u64, user_id: u64, parent: ContentRef, text: &str) -> Result<Self, Error> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidField {
                field: "text",
                reason: "must not be blank",
            });
        }
        if text.chars().count() > MAX_COMMENT_LEN {
            return Err(Error::InvalidField {
                field: "text",
                reason: "too long",
            });
        }

        Ok(Self {
            id,
            user_id,
            parent,
            text: text.to_owned(),
            created_at: Utc::now(),
        })
    }

    pub fn populate(&self, global: &Global) -> Comment {
        Comment {
            id: self.id,
            user: global.author(self.user_id),
            parent: self.parent,
            text: self.text.clone(),
            created_at: self.created_at,
        }
    }

    /// Author of the commented item, `None` if it no longer exists.
    pub fn parent_author(&self, global: &Global) -> Option<u64> {
        match self.parent.kind {
            ContentKind::Post => global.posts.with(self.parent.id, Content::user_id),
            ContentKind::Reel => global.reels.with(self.parent.id, Content::user_id),
            ContentKind::Story => global.stories.with(self.parent.id, Content::user_id),
        }
    }
}
