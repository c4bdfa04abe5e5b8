//! Client of the adnuverse backend.
//!
//! [`Session`] keeps the logged-in user explicitly instead of in global
//! state, and assembles feeds with the same visibility rule as the server.

pub mod raw;

use adnuverse_shared::{
    account::{handle::*, UserProfile},
    comment::Comment,
    feed::{self, Audience, Viewer},
    notification::Notification,
    post::{handle::PostDescriptor, Post},
    reel::{handle::ReelDescriptor, Reel},
    story::{handle::StoryDescriptor, Story},
    toggle_like, ContentKind, ContentRef, LikeResult, Likeable, ViewResult,
};
use dashmap::DashMap;
use parking_lot::RwLock;

pub use adnuverse_shared as shared;

/// Where and how requests are sent.
pub struct Context {
    pub req_client: reqwest::Client,
    /// Server url without trailing slash, like `http://localhost:3000`.
    pub url_prefix: String,
}

impl Context {
    pub fn new(url_prefix: impl Into<String>) -> Self {
        Self {
            req_client: reqwest::Client::new(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_owned(),
        }
    }
}

/// The logged-in user.
struct Credential {
    /// Bearer credential in `{account}:{token}` form.
    token: String,
    user: UserProfile,
}

/// A client session, logged in or anonymous.
pub struct Session {
    cx: Context,
    credential: RwLock<Option<Credential>>,
    /// Profiles fetched so far.
    users: DashMap<u64, UserProfile>,
}

impl Session {
    /// An anonymous session.
    pub fn new(cx: Context) -> Self {
        Self {
            cx,
            credential: RwLock::new(None),
            users: DashMap::new(),
        }
    }

    #[inline]
    pub fn context(&self) -> &Context {
        &self.cx
    }

    fn token(&self) -> Option<String> {
        self.credential.read().as_ref().map(|c| c.token.clone())
    }

    fn require_token(&self) -> anyhow::Result<String> {
        self.token()
            .ok_or_else(|| anyhow::anyhow!("not logged in"))
    }

    /// Calls `req` with the credential of this session, if any.
    pub async fn call<T: raw::Request>(&self, req: T) -> anyhow::Result<T::Output> {
        let token = self.token();
        raw::call(req, &self.cx, token.as_deref()).await
    }

    fn set_credential(&self, result: LoginResult) -> UserProfile {
        self.users.insert(result.user.id, result.user.clone());
        *self.credential.write() = Some(Credential {
            token: result.token,
            user: result.user.clone(),
        });
        result.user
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.credential.read().as_ref().map(|c| c.user.clone())
    }

    /// The viewer feeds of this session are assembled for.
    pub fn viewer(&self) -> Option<Viewer> {
        self.credential
            .read()
            .as_ref()
            .map(|c| Viewer::from(&c.user))
    }

    pub async fn signup(&self, descriptor: SignupDescriptor) -> anyhow::Result<UserProfile> {
        let result = raw::call(raw::account::Signup(descriptor), &self.cx, None).await?;
        Ok(self.set_credential(result))
    }

    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<UserProfile> {
        let result = raw::call(
            raw::account::Login {
                email: email.to_owned(),
                password: password.to_owned(),
            },
            &self.cx,
            None,
        )
        .await?;
        Ok(self.set_credential(result))
    }

    pub async fn google_login(&self, id_token: &str) -> anyhow::Result<UserProfile> {
        let result = raw::call(
            raw::account::GoogleLogin {
                id_token: id_token.to_owned(),
            },
            &self.cx,
            None,
        )
        .await?;
        Ok(self.set_credential(result))
    }

    /// Revokes the token and forgets the user, even if the server can't be reached.
    pub async fn logout(&self) -> anyhow::Result<()> {
        let token = self.require_token()?;
        let result = raw::call(raw::account::Logout, &self.cx, Some(&token)).await;
        *self.credential.write() = None;
        result
    }

    /// Fetch a profile, caching it.
    pub async fn user(&self, id: u64) -> anyhow::Result<UserProfile> {
        let user = self.call(raw::account::GetUser { id }).await?;
        self.users.insert(id, user.clone());
        Ok(user)
    }

    /// A profile fetched earlier.
    pub fn cached_user(&self, id: u64) -> Option<UserProfile> {
        self.users.get(&id).map(|e| e.value().clone())
    }

    /// Re-fetch the logged-in user, picking up follower changes.
    pub async fn refresh_user(&self) -> anyhow::Result<UserProfile> {
        let id = self
            .current_user()
            .ok_or_else(|| anyhow::anyhow!("not logged in"))?
            .id;
        let user = self.user(id).await?;
        if let Some(credential) = self.credential.write().as_mut() {
            credential.user = user.clone();
        }
        Ok(user)
    }

    pub async fn update_profile(
        &self,
        descriptor: UpdateProfileDescriptor,
    ) -> anyhow::Result<UserProfile> {
        self.require_token()?;
        let id = self
            .current_user()
            .ok_or_else(|| anyhow::anyhow!("not logged in"))?
            .id;
        self.call(raw::account::UpdateUser { id, descriptor }).await?;
        self.refresh_user().await
    }

    /// Follow or unfollow a user, refreshing the logged-in user afterwards.
    pub async fn set_following(&self, id: u64, follow: bool) -> anyhow::Result<UserProfile> {
        self.require_token()?;
        let user = self.call(raw::account::Follow { id, follow }).await?;
        self.users.insert(id, user.clone());
        self.refresh_user().await?;
        Ok(user)
    }

    /// Posts the viewer may see, newest first.
    pub async fn timeline(&self) -> anyhow::Result<Vec<Post>> {
        let posts = self.call(raw::content::Feed::<Post>::new()).await?;
        Ok(feed::timeline(posts, self.viewer().as_ref()))
    }

    /// Reels the viewer may see, newest first.
    pub async fn reels(&self) -> anyhow::Result<Vec<Reel>> {
        let reels = self.call(raw::content::Feed::<Reel>::new()).await?;
        Ok(feed::timeline(reels, self.viewer().as_ref()))
    }

    /// Stories the viewer may see, newest first, with the viewer's own in front.
    ///
    /// Stories that expired since the server sent them are dropped.
    pub async fn story_tray(&self) -> anyhow::Result<Vec<Story>> {
        let mut stories = self.call(raw::content::Feed::<Story>::new()).await?;
        let now = chrono::Utc::now();
        stories.retain(|s| !s.is_expired(now));
        Ok(feed::story_tray(stories, self.viewer().as_ref()))
    }

    /// Posts of one user the viewer may see, newest first.
    pub async fn profile_posts(&self, user_id: u64) -> anyhow::Result<Vec<Post>> {
        self.profile::<Post>(user_id).await
    }

    /// Reels of one user the viewer may see, newest first.
    pub async fn profile_reels(&self, user_id: u64) -> anyhow::Result<Vec<Reel>> {
        self.profile::<Reel>(user_id).await
    }

    async fn profile<T>(&self, user_id: u64) -> anyhow::Result<Vec<T>>
    where
        T: Likeable + Audience + serde::de::DeserializeOwned + Send + 'static,
    {
        let items = self.call(raw::content::UserFeed::<T>::new(user_id)).await?;
        Ok(feed::profile(items, self.viewer().as_ref(), user_id))
    }

    pub async fn create_post(&self, descriptor: PostDescriptor) -> anyhow::Result<Post> {
        self.require_token()?;
        self.call(raw::content::CreatePost(descriptor)).await
    }

    pub async fn create_reel(&self, descriptor: ReelDescriptor) -> anyhow::Result<Reel> {
        self.require_token()?;
        self.call(raw::content::CreateReel(descriptor)).await
    }

    pub async fn create_story(&self, descriptor: StoryDescriptor) -> anyhow::Result<Story> {
        self.require_token()?;
        self.call(raw::content::CreateStory(descriptor)).await
    }

    pub async fn delete(&self, kind: ContentKind, id: u64) -> anyhow::Result<()> {
        self.require_token()?;
        self.call(raw::content::Delete { kind, id }).await
    }

    /// Counts a view of a reel or a story.
    pub async fn view(&self, kind: ContentKind, id: u64) -> anyhow::Result<ViewResult> {
        self.call(raw::content::View { kind, id }).await
    }

    pub async fn comment(&self, parent: ContentRef, text: &str) -> anyhow::Result<Comment> {
        self.require_token()?;
        self.call(raw::comment::CreateComment {
            parent,
            text: text.to_owned(),
        })
        .await
    }

    pub async fn comments(&self, parent: ContentRef) -> anyhow::Result<Vec<Comment>> {
        self.call(raw::comment::GetComments { parent }).await
    }

    pub async fn delete_comment(&self, id: u64) -> anyhow::Result<()> {
        self.require_token()?;
        self.call(raw::comment::DeleteComment { id }).await
    }

    /// Notifications of the logged-in user, newest first.
    pub async fn notifications(&self) -> anyhow::Result<Vec<Notification>> {
        let user_id = self
            .current_user()
            .ok_or_else(|| anyhow::anyhow!("not logged in"))?
            .id;
        self.call(raw::notification::GetNotifications { user_id })
            .await
    }

    pub async fn unseen_notifications(&self) -> anyhow::Result<usize> {
        Ok(self
            .notifications()
            .await?
            .iter()
            .filter(|n| !n.seen)
            .count())
    }

    pub async fn mark_seen(&self, id: u64) -> anyhow::Result<Notification> {
        self.call(raw::notification::MarkSeen { id }).await
    }

    pub async fn delete_notification(&self, id: u64) -> anyhow::Result<()> {
        self.call(raw::notification::DeleteNotification { id })
            .await
    }

    /// Deletes every notification of the logged-in user.
    pub async fn clear_notifications(&self) -> anyhow::Result<usize> {
        let user_id = self
            .current_user()
            .ok_or_else(|| anyhow::anyhow!("not logged in"))?
            .id;
        self.call(raw::notification::ClearNotifications { user_id })
            .await
    }

    /// Toggles the like on `item` right away, then asks the server.
    ///
    /// If the request fails the toggle is reverted and the error returned.
    pub async fn like<T: Likeable>(&self, item: &mut T) -> anyhow::Result<LikeResult> {
        let token = self.require_token()?;
        let user_id = self
            .current_user()
            .ok_or_else(|| anyhow::anyhow!("not logged in"))?
            .id;

        let liked = toggle_like(item.likes_mut(), user_id);
        let result = raw::call(
            raw::content::Like {
                kind: T::KIND,
                id: item.id(),
            },
            &self.cx,
            Some(&token),
        )
        .await;

        match result {
            Ok(result) => {
                // the server is the authority if the item was stale
                if result.liked != liked {
                    toggle_like(item.likes_mut(), user_id);
                }
                Ok(result)
            }
            Err(err) => {
                toggle_like(item.likes_mut(), user_id);
                Err(err)
            }
        }
    }
}
