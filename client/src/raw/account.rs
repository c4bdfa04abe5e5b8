use adnuverse_shared::account::{handle::*, UserProfile};
use reqwest::{Method, RequestBuilder, Response};

pub struct Signup(pub SignupDescriptor);

#[async_trait::async_trait]
impl super::Request for Signup {
    type Output = LoginResult;
    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        "/api/users/create".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&self.0))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct Login {
    pub email: String,
    pub password: String,
}

#[async_trait::async_trait]
impl super::Request for Login {
    type Output = LoginResult;
    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        "/api/users/login".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&LoginDescriptor {
            email: self.email.parse()?,
            password: self.password.clone(),
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct GoogleLogin {
    pub id_token: String,
}

#[async_trait::async_trait]
impl super::Request for GoogleLogin {
    type Output = LoginResult;
    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        "/auth/google".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&GoogleLoginDescriptor {
            id_token: self.id_token.clone(),
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct Logout;

#[async_trait::async_trait]
impl super::Request for Logout {
    type Output = ();
    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        "/api/users/logout".to_owned()
    }

    async fn parse_res(&mut self, _response: Response) -> anyhow::Result<Self::Output> {
        Ok(())
    }
}

pub struct GetUser {
    pub id: u64,
}

#[async_trait::async_trait]
impl super::Request for GetUser {
    type Output = UserProfile;

    fn path(&self) -> String {
        format!("/api/users/{}", self.id)
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

/// List users, filtered by `query` if present.
pub struct SearchUsers {
    pub query: Option<String>,
}

#[async_trait::async_trait]
impl super::Request for SearchUsers {
    type Output = Vec<UserProfile>;

    fn path(&self) -> String {
        "/api/users".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.query(&SearchUsersQuery {
            q: self.query.clone(),
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct UpdateUser {
    pub id: u64,
    pub descriptor: UpdateProfileDescriptor,
}

#[async_trait::async_trait]
impl super::Request for UpdateUser {
    type Output = UserProfile;
    const METHOD: Method = Method::PUT;

    fn path(&self) -> String {
        format!("/api/users/{}", self.id)
    }

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&self.descriptor))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

pub struct ChangePassword(pub ChangePasswordDescriptor);

#[async_trait::async_trait]
impl super::Request for ChangePassword {
    type Output = ();
    const METHOD: Method = Method::PUT;

    fn path(&self) -> String {
        "/api/users/change-password".to_owned()
    }

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&self.0))
    }

    async fn parse_res(&mut self, _response: Response) -> anyhow::Result<Self::Output> {
        Ok(())
    }
}

/// Follow or unfollow a user.
pub struct Follow {
    pub id: u64,
    pub follow: bool,
}

#[async_trait::async_trait]
impl super::Request for Follow {
    type Output = UserProfile;
    const METHOD: Method = Method::POST;

    fn path(&self) -> String {
        let action = if self.follow { "follow" } else { "unfollow" };
        format!("/api/users/{}/{action}", self.id)
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}

/// Followers of a user, or the users they follow.
pub struct Relations {
    pub id: u64,
    pub followers: bool,
}

#[async_trait::async_trait]
impl super::Request for Relations {
    type Output = Vec<UserProfile>;

    fn path(&self) -> String {
        let which = if self.followers {
            "followers"
        } else {
            "following"
        };
        format!("/api/users/{}/{which}", self.id)
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::data(response).await
    }
}
