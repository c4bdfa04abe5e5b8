use std::sync::Arc;

use adnuverse_shared::{account::Author, feed::Viewer};
use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod auth;
pub mod config;
pub mod store;

pub mod account;
pub mod comment;
pub mod content;
pub mod notification;
pub mod post;
pub mod reel;
pub mod story;

/// The module for unit testing, will only be availabled in dev env.
#[cfg(test)]
mod tests;

pub use auth::Auth;
use config::Config;
use store::Store;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("permission denied")]
    PermissionDenied,

    #[error("not logged in")]
    NotLoggedIn,
    #[error("non-ascii header value: {0}")]
    HeaderNonAscii(axum::http::header::ToStrError),
    #[error("authorization header is not in `Bearer {{account}}:{{token}}` syntax")]
    InvalidAuthHeader,
    #[error("username or password incorrect")]
    UsernameOrPasswordIncorrect,
    #[error("password incorrect")]
    PasswordIncorrect,

    #[error("username \"{0}\" is already taken")]
    UsernameTaken(String),
    #[error("username must be 3 to 30 letters, digits, '_' or '.'")]
    InvalidUsername,
    #[error("email {0} is already registered")]
    EmailRegistered(lettre::Address),
    #[error("email domain {0} is not allowed")]
    EmailDomainNotAllowed(String),
    #[error("address error: {0}")]
    EmailAddress(lettre::address::AddressError),
    #[error("password must be between 8 and 64 characters long")]
    PasswordLength,
    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },
    #[error("visibility must be one of public, department-only or followers-only")]
    InvalidVisibility,
    #[error("an active story already exists")]
    ActiveStoryExists,

    #[error("cannot follow yourself")]
    FollowSelf,
    #[error("already following target user")]
    AlreadyFollowing,
    #[error("not following target user")]
    NotFollowing,

    #[error("google sign-in is not configured")]
    GoogleDisabled,
    #[error("google id token rejected: {0}")]
    GoogleToken(&'static str),
    #[error("identity provider request failed: {0}")]
    Http(reqwest::Error),

    #[error("io error: {0}")]
    Io(std::io::Error),
    #[error("failed to decode record: {0}")]
    TomlDe(toml::de::Error),
    #[error("failed to encode record: {0}")]
    TomlSer(toml::ser::Error),
}

impl Error {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) | Error::GoogleDisabled => StatusCode::NOT_FOUND,
            Error::NotLoggedIn | Error::UsernameOrPasswordIncorrect | Error::GoogleToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            Error::UsernameTaken(_)
            | Error::EmailRegistered(_)
            | Error::ActiveStoryExists
            | Error::AlreadyFollowing => StatusCode::CONFLICT,
            Error::HeaderNonAscii(_)
            | Error::InvalidAuthHeader
            | Error::InvalidUsername
            | Error::EmailAddress(_)
            | Error::PasswordLength
            | Error::PasswordMismatch
            | Error::InvalidField { .. }
            | Error::InvalidVisibility
            | Error::FollowSelf
            | Error::NotFollowing => StatusCode::BAD_REQUEST,
            Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::Io(_) | Error::TomlDe(_) | Error::TomlSer(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::PermissionDenied | Error::PasswordIncorrect | Error::EmailDomainNotAllowed(_) => {
                StatusCode::FORBIDDEN
            }
        }
    }
}

impl IntoResponse for Error {
    #[inline]
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ErrorInfo {
            error: String,
        }
        (
            self.to_status_code(),
            axum::Json(ErrorInfo {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Implements `From<T>` for [`Error`].
macro_rules! impl_from {
    ($($t:ty => $v:ident),* $(,)?) => {
        $(
            impl From<$t> for $crate::Error {
                #[inline]
                fn from(err: $t) -> Self {
                    Self::$v(err)
                }
            }
        )*
    };
}

impl_from! {
    axum::http::header::ToStrError => HeaderNonAscii,
    lettre::address::AddressError => EmailAddress,
    reqwest::Error => Http,
    std::io::Error => Io,
    toml::de::Error => TomlDe,
    toml::ser::Error => TomlSer,
}

/// State shared by every handler.
#[derive(Clone)]
pub struct Global {
    pub config: Arc<Config>,
    pub accounts: Arc<Store<account::Account>>,
    pub posts: Arc<Store<post::PostRecord>>,
    pub reels: Arc<Store<reel::ReelRecord>>,
    pub stories: Arc<Store<story::StoryRecord>>,
    pub comments: Arc<Store<comment::CommentRecord>>,
    pub notifications: Arc<Store<notification::NotificationRecord>>,
    /// Serializes account creation so username and email checks
    /// can't race with each other.
    pub registration: Arc<parking_lot::Mutex<()>>,
    /// Serializes story creation so a user can't get two active stories.
    pub story_creation: Arc<parking_lot::Mutex<()>>,
    pub http: reqwest::Client,
}

impl Global {
    /// Opens every store under the configured data directory,
    /// or in memory if there is none.
    pub fn new(config: Config) -> Result<Self, Error> {
        let dir = config.data_dir.clone();
        let dir = dir.as_deref();

        Ok(Self {
            accounts: Arc::new(Store::open(dir)?),
            posts: Arc::new(Store::open(dir)?),
            reels: Arc::new(Store::open(dir)?),
            stories: Arc::new(Store::open(dir)?),
            comments: Arc::new(Store::open(dir)?),
            notifications: Arc::new(Store::open(dir)?),
            registration: Arc::default(),
            story_creation: Arc::default(),
            http: reqwest::Client::new(),
            config: Arc::new(config),
        })
    }

    /// The author reference of an account, if it exists.
    pub fn author(&self, id: u64) -> Option<Author> {
        self.accounts.with(id, account::Account::author)
    }

    /// The feed viewer behind an optional login.
    pub fn viewer(&self, auth: Option<&Auth>) -> Option<Viewer> {
        auth.and_then(|auth| {
            self.accounts
                .with(auth.account_id, |account| Viewer {
                    id: account.id,
                    department: account.attributes.department.clone(),
                })
        })
    }
}

/// Construct a router.
pub fn router(global: Global) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            global
                .config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Router::new()
        // account
        .route("/api/users", get(account::handle::get_users))
        .route("/api/users/create", post(account::handle::signup))
        .route("/api/users/login", post(account::handle::login))
        .route("/api/users/logout", post(account::handle::logout))
        .route(
            "/api/users/change-password",
            put(account::handle::change_password),
        )
        .route(
            "/api/users/:id",
            get(account::handle::get_user).put(account::handle::update_user),
        )
        .route("/api/users/:id/follow", post(account::handle::follow))
        .route("/api/users/:id/unfollow", post(account::handle::unfollow))
        .route("/api/users/:id/followers", get(account::handle::followers))
        .route("/api/users/:id/following", get(account::handle::following))
        .route("/auth/google", post(account::handle::google_login))
        // posts
        .route(
            "/api/posts",
            get(post::handle::get_posts).post(post::handle::create_post),
        )
        .route("/api/posts/user/:id", get(post::handle::get_user_posts))
        .route(
            "/api/posts/:id",
            get(post::handle::get_post)
                .put(post::handle::update_post)
                .delete(post::handle::delete_post),
        )
        .route("/api/posts/:id/like", post(post::handle::like_post))
        // reels
        .route(
            "/api/reels",
            get(reel::handle::get_reels).post(reel::handle::create_reel),
        )
        .route("/api/reels/user/:id", get(reel::handle::get_user_reels))
        .route(
            "/api/reels/:id",
            get(reel::handle::get_reel).delete(reel::handle::delete_reel),
        )
        .route("/api/reels/:id/like", post(reel::handle::like_reel))
        .route("/api/reels/:id/view", post(reel::handle::view_reel))
        // stories
        .route("/api/stories", get(story::handle::get_stories))
        .route("/api/stories/create", post(story::handle::create_story))
        .route("/api/stories/user/:id", get(story::handle::get_user_stories))
        .route("/api/stories/:id", delete(story::handle::delete_story))
        .route("/api/stories/:id/like", post(story::handle::like_story))
        .route("/api/stories/:id/view", post(story::handle::view_story))
        // comments
        .route(
            "/api/comments/post/:id/comment",
            post(comment::handle::comment_on_post),
        )
        .route(
            "/api/comments/post/:id/comments",
            get(comment::handle::get_post_comments),
        )
        .route(
            "/api/comments/reel/:id/comment",
            post(comment::handle::comment_on_reel),
        )
        .route(
            "/api/comments/reel/:id/comments",
            get(comment::handle::get_reel_comments),
        )
        .route(
            "/api/comments/:id",
            delete(comment::handle::delete_comment),
        )
        // notifications
        .route(
            "/api/notifications/:id",
            get(notification::handle::get_notifications)
                .delete(notification::handle::delete_notification),
        )
        .route(
            "/api/notifications/:id/seen",
            post(notification::handle::mark_seen),
        )
        .route(
            "/api/notifications/user/:id",
            delete(notification::handle::delete_all_notifications),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(global)
}
