use adnuverse_shared::{
    comment::{Comment, CommentDescriptor},
    ContentRef,
};
use reqwest::{Method, RequestBuilder, Response};

/// Path of the comments under a post or a reel.
fn base(parent: &ContentRef) -> String {
    let kind = match parent.kind {
        adnuverse_shared::ContentKind::Post => "post",
        adnuverse_shared::ContentKind::Reel => "reel",
        adnuverse_shared::ContentKind::Story => "story",
    };
    format!("/api/comments/{kind}/{}", parent.id)
}

pub struct CreateComment {
    pub parent: ContentRef,
    pub text: String,
}

#[async_trait::async_trait]
impl super::Request for CreateComment {
    type Output = Comment;
    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        format!("{}/comment", base(&self.parent))
    }

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&CommentDescriptor {
            text: self.text.clone(),
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

/// Comments under an item, oldest first.
pub struct GetComments {
    pub parent: ContentRef,
}

#[async_trait::async_trait]
impl super::Request for GetComments {
    type Output = Vec<Comment>;

    fn path(&self) -> String {
        format!("{}/comments", base(&self.parent))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct DeleteComment {
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for DeleteComment {
    type Output = ();
    const METHOD: Method = Method::DELETE;

    fn path(&self) -> String {
        format!("/api/comments/{}", self.id)
    }

    async fn parse_res(&mut self, _response: Response) -> anyhow::Result<Self::Output> {
        Ok(())
    }
}
