//! Requests shared by posts, reels and stories.

use std::marker::PhantomData;

use adnuverse_shared::{
    post::{handle::*, Post},
    reel::{handle::ReelDescriptor, Reel},
    story::{handle::StoryDescriptor, Story},
    ContentKind, LikeResult, Likeable, ViewResult,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// Every item of a kind the viewer may see.
pub struct Feed<T>(PhantomData<fn() -> T>);

impl<T> Feed<T> {
    #[inline]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for Feed<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<T: Likeable + DeserializeOwned + Send + 'static> super::Request for Feed<T> {
    type Output = Vec<T>;

    fn path(&self) -> String {
        format!("/api/{}", T::KIND.collection())
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

/// Items of one user the viewer may see.
pub struct UserFeed<T> {
    pub user_id: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> UserFeed<T> {
    #[inline]
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            _marker: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<T: Likeable + DeserializeOwned + Send + 'static> super::Request for UserFeed<T> {
    type Output = Vec<T>;

    fn path(&self) -> String {
        format!("/api/{}/user/{}", T::KIND.collection(), self.user_id)
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct GetPost {
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for GetPost {
    type Output = Post;

    fn path(&self) -> String {
        format!("/api/posts/{}", self.id)
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct GetReel {
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for GetReel {
    type Output = Reel;

    fn path(&self) -> String {
        format!("/api/reels/{}", self.id)
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct CreatePost(pub PostDescriptor);

#[async_trait::async_trait]
impl super::Request for CreatePost {
    type Output = Post;
    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        "/api/posts".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&self.0))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct EditPost {
    pub id: u64,
    pub descriptor: EditPostDescriptor,
}

#[async_trait::async_trait]
impl super::Request for EditPost {
    type Output = Post;
    const METHOD: Method = Method::PUT;

    fn path(&self) -> String {
        format!("/api/posts/{}", self.id)
    }

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&self.descriptor))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct CreateReel(pub ReelDescriptor);

#[async_trait::async_trait]
impl super::Request for CreateReel {
    type Output = Reel;
    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        "/api/reels".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&self.0))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct CreateStory(pub StoryDescriptor);

#[async_trait::async_trait]
impl super::Request for CreateStory {
    type Output = Story;
    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        "/api/stories/create".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&self.0))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct Delete {
    pub kind: ContentKind,
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for Delete {
    type Output = ();
    const METHOD: Method = Method::DELETE;

    fn path(&self) -> String {
        format!("/api/{}/{}", self.kind.collection(), self.id)
    }

    async fn parse_res(&mut self, _response: Response) -> anyhow::Result<Self::Output> {
        Ok(())
    }
}

/// Toggle the like of the logged-in user.
pub struct Like {
    pub kind: ContentKind,
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for Like {
    type Output = LikeResult;
    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        format!("/api/{}/{}/like", self.kind.collection(), self.id)
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

/// Count a view of a reel or a story.
pub struct View {
    pub kind: ContentKind,
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for View {
    type Output = ViewResult;
    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        format!("/api/{}/{}/view", self.kind.collection(), self.id)
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}
