pub mod handle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use adnuverse_shared::notification::*;
use adnuverse_shared::ContentRef;

use crate::{store::Record, Global};

/// A stored notification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NotificationRecord {
    pub id: u64,
    pub recipient: u64,
    pub sender: u64,
    pub kind: NotificationKind,
    pub reference: Option<ContentRef>,
    #[serde(default)]
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}

impl Record for NotificationRecord {
    const KIND: &'static str = "notification";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

impl NotificationRecord {
    pub fn populate(&self, global: &Global) -> Notification {
        Notification {
            id: self.id,
            recipient: self.recipient,
            sender: global.author(self.sender),
            kind: self.kind,
            reference: self.reference,
            seen: self.seen,
            created_at: self.created_at,
        }
    }
}

/// Delivers a notification to `recipient`, unless it is the sender.
pub fn notify(
    global: &Global,
    recipient: u64,
    sender: u64,
    kind: NotificationKind,
    reference: Option<ContentRef>,
) {
    if recipient == sender {
        return;
    }

    global.notifications.insert(NotificationRecord {
        id: global.notifications.next_id(),
        recipient,
        sender,
        kind,
        reference,
        seen: false,
        created_at: Utc::now(),
    });
}
