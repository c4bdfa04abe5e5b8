//! One type per endpoint, sent with [`call`].

use std::fmt::{Formatter, Write};

use adnuverse_shared::Data;
use serde::de::DeserializeOwned;

pub mod account;
pub mod comment;
pub mod content;
pub mod notification;

#[async_trait::async_trait]
pub trait Request: Send {
    type Output;

    const METHOD: reqwest::Method = reqwest::Method::GET;

    /// Path of this request under the url prefix.
    fn path(&self) -> String;

    fn make_req(&self, req: reqwest::RequestBuilder) -> anyhow::Result<reqwest::RequestBuilder> {
        Ok(req)
    }

    async fn parse_res(&mut self, response: reqwest::Response) -> anyhow::Result<Self::Output>;
}

/// A non-success response.
#[derive(Debug)]
pub struct ResponseError {
    pub status_code: reqwest::StatusCode,
    pub error: Option<String>,
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status_code.as_str())?;

        if let Some(msg) = self.status_code.canonical_reason() {
            f.write_char(' ')?;
            f.write_str(msg)?;
        }

        if let Some(ref msg) = self.error {
            f.write_str(": ")?;
            f.write_str(msg)?;
        }

        Ok(())
    }
}

impl std::error::Error for ResponseError {}

/// Calls a [`Request`] and return its output.
///
/// `credential` is sent as bearer token if present.
pub async fn call<T: Request>(
    mut req: T,
    cx: &crate::Context,
    credential: Option<&str>,
) -> anyhow::Result<<T as Request>::Output> {
    let mut builder = cx
        .req_client
        .request(T::METHOD, format!("{}{}", cx.url_prefix, req.path()));
    if let Some(credential) = credential {
        builder = builder.bearer_auth(credential);
    }

    let response = req.make_req(builder)?.send().await?;
    let status = response.status();

    if !status.is_success() {
        #[derive(serde::Deserialize)]
        struct ThrownError {
            error: String,
        }

        let err_msg = response
            .json::<ThrownError>()
            .await
            .ok()
            .map(|msg| msg.error);

        return Err(anyhow::Error::new(ResponseError {
            status_code: status,
            error: err_msg,
        }));
    }

    req.parse_res(response).await
}

/// Unwraps a `{"data": ...}` body.
pub(crate) async fn data<T: DeserializeOwned>(response: reqwest::Response) -> anyhow::Result<T> {
    Ok(response.json::<Data<T>>().await?.data)
}
