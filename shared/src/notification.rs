use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{account::Author, ContentRef};

/// Represents a notification delivered to one account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub recipient: u64,
    /// The account that triggered this notification.
    pub sender: Option<Author>,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// The content this notification is about, absent for follows.
    pub reference: Option<ContentRef>,
    #[serde(default)]
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
}
