use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{account::Author, ContentRef};

/// Represents a comment under a post or a reel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: u64,
    pub user: Option<Author>,
    pub parent: ContentRef,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CommentDescriptor {
    pub text: String,
}

/// Longest accepted comment, in characters.
pub const MAX_COMMENT_LEN: usize = 2000;
