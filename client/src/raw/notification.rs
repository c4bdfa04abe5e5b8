use adnuverse_shared::notification::Notification;
use reqwest::{Method, Response};

pub struct GetNotifications {
    pub user_id: u64,
}

#[async_trait::async_trait]
impl super::Request for GetNotifications {
    type Output = Vec<Notification>;

    fn path(&self) -> String {
        format!("/api/notifications/{}", self.user_id)
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct MarkSeen {
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for MarkSeen {
    type Output = Notification;
    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        format!("/api/notifications/{}/seen", self.id)
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct DeleteNotification {
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for DeleteNotification {
    type Output = ();
    const METHOD: Method = Method::DELETE;

    fn path(&self) -> String {
        format!("/api/notifications/{}", self.id)
    }

    async fn parse_res(&mut self, _response: Response) -> anyhow::Result<Self::Output> {
        Ok(())
    }
}

/// Delete every notification of a user, returning how many were deleted.
pub struct ClearNotifications {
    pub user_id: u64,
}

#[async_trait::async_trait]
impl super::Request for ClearNotifications {
    type Output = usize;
    const METHOD: Method = Method::DELETE;

    fn path(&self) -> String {
        format!("/api/notifications/user/{}", self.user_id)
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}
