use adnuverse_backend::{config::Config, Global};
use adnuverse_client::{
    shared::{
        account::handle::SignupDescriptor, feed::Visibility, notification::NotificationKind,
        post::handle::PostDescriptor, story::handle::StoryDescriptor, ContentRef, Likeable,
    },
    Context, Session,
};

/// Serves a fresh in-memory backend and returns its url.
fn serve() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let app = adnuverse_backend::router(Global::new(Config::default()).unwrap());

    tokio::spawn(
        axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service()),
    );
    format!("http://{addr}")
}

async fn signup(url: &str, username: &str) -> Session {
    let session = Session::new(Context::new(url));
    session
        .signup(SignupDescriptor {
            first_name: "Test".to_owned(),
            last_name: username.to_owned(),
            email: format!("{username}@gbox.adnu.edu.ph").parse().unwrap(),
            username: username.to_owned(),
            password: "password123".to_owned(),
        })
        .await
        .unwrap();
    session
}

#[tokio::test]
async fn post_like_and_comment() {
    let url = serve();
    let alice = signup(&url, "alice").await;
    let bob = signup(&url, "bob").await;

    let post = alice
        .create_post(PostDescriptor {
            text: "hello campus".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap();

    let mut timeline = bob.timeline().await.unwrap();
    assert_eq!(timeline.len(), 1);
    let item = &mut timeline[0];
    assert_eq!(item.id(), post.id);

    let result = bob.like(item).await.unwrap();
    assert!(result.liked);
    assert_eq!(result.likes, 1);
    assert_eq!(item.likes.len(), 1);

    let parent = ContentRef {
        kind: <adnuverse_client::shared::post::Post as Likeable>::KIND,
        id: post.id,
    };
    bob.comment(parent, "nice").await.unwrap();
    let comments = alice.comments(parent).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "nice");

    let notifications = alice.notifications().await.unwrap();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0].kind, NotificationKind::Comment);
    assert_eq!(notifications[1].kind, NotificationKind::Like);
    assert_eq!(alice.unseen_notifications().await.unwrap(), 2);

    assert!(alice.mark_seen(notifications[0].id).await.unwrap().seen);
    assert_eq!(alice.clear_notifications().await.unwrap(), 2);
}

#[tokio::test]
async fn followers_only_posts_need_following() {
    let url = serve();
    let alice = signup(&url, "alice").await;
    let bob = signup(&url, "bob").await;
    let alice_id = alice.current_user().unwrap().id;

    alice
        .create_post(PostDescriptor {
            text: "friends only".to_owned(),
            visibility: Visibility::FollowersOnly,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(bob.profile_posts(alice_id).await.unwrap().is_empty());

    bob.set_following(alice_id, true).await.unwrap();
    assert_eq!(bob.current_user().unwrap().following, [alice_id]);
    assert_eq!(bob.profile_posts(alice_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn logout_forgets_user() {
    let url = serve();
    let alice = signup(&url, "alice").await;

    alice.logout().await.unwrap();
    assert!(alice.current_user().is_none());

    let err = alice
        .login("alice@gbox.adnu.edu.ph", "wrong password")
        .await
        .unwrap_err();
    let err = err
        .downcast_ref::<adnuverse_client::raw::ResponseError>()
        .unwrap();
    assert_eq!(err.status_code, reqwest::StatusCode::UNAUTHORIZED);

    alice
        .login("alice@gbox.adnu.edu.ph", "password123")
        .await
        .unwrap();
    assert_eq!(alice.current_user().unwrap().username, "alice");
}

#[tokio::test]
async fn own_story_leads_the_tray() {
    let url = serve();
    let alice = signup(&url, "alice").await;
    let bob = signup(&url, "bob").await;

    let mine = bob
        .create_story(StoryDescriptor {
            text: "older".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap();
    let theirs = alice
        .create_story(StoryDescriptor {
            text: "newer".to_owned(),
            ..Default::default()
        })
        .await
        .unwrap();

    let tray = bob.story_tray().await.unwrap();
    assert_eq!(
        tray.iter().map(|s| s.id).collect::<Vec<_>>(),
        [mine.id, theirs.id]
    );
    assert!(tray.iter().all(|s| !s.is_expired(chrono::Utc::now())));
}
