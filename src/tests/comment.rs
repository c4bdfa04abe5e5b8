use super::*;

use chrono::{Duration, Utc};

async fn comment(app: &Router, token: &str, post: u64, text: &str) -> (StatusCode, Value) {
    call(
        app,
        "POST",
        &format!("/api/comments/post/{post}/comment"),
        Some(token),
        Some(json!({ "text": text })),
    )
    .await
}

#[tokio::test]
async fn comments_oldest_first() {
    let (global, app) = app();
    let (ana, ana_token) = signup(&app, "ana").await;
    let (_, ben_token) = signup(&app, "ben").await;
    let post = create_post(&app, &ana_token, "discuss", "public").await;

    let (status, body) = comment(&app, &ben_token, post, "first!").await;
    assert_eq!(status, StatusCode::CREATED);
    let first = body["data"]["id"].as_u64().unwrap();
    let (_, body) = comment(&app, &ana_token, post, "thanks").await;
    let second = body["data"]["id"].as_u64().unwrap();

    let now = Utc::now();
    for (id, age) in [(first, 2), (second, 1)] {
        global
            .comments
            .update(id, |c| {
                c.created_at = now - Duration::minutes(age);
                Ok(())
            })
            .unwrap();
    }

    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/comments/post/{post}/comments"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), [first, second]);
    assert_eq!(body["data"][0]["user"]["username"], "ben");
    assert_eq!(body["data"][0]["parent"], json!({ "type": "post", "id": post }));

    // ana commenting on her own post notifies nobody
    assert_eq!(global.notifications.count(|n| n.recipient == ana), 1);

    let (_, body) = call(&app, "GET", &format!("/api/posts/{post}"), None, None).await;
    assert_eq!(body["data"]["comments"].as_u64(), Some(2));
}

#[tokio::test]
async fn blank_comment_rejected() {
    let (_, app) = app();
    let (_, token) = signup(&app, "ana").await;
    let post = create_post(&app, &token, "discuss", "public").await;

    let (status, _) = comment(&app, &token, post, "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = comment(&app, &token, post + 1, "lost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn hidden_parent_hides_comments() {
    let (_, app) = app();
    let (_, ana_token) = signup_in(&app, "ana", "Computer Science").await;
    let (_, ben_token) = signup_in(&app, "ben", "Nursing").await;
    let post = create_post(&app, &ana_token, "cs only", "department-only").await;

    let (status, _) = comment(&app, &ben_token, post, "let me in").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        "GET",
        &format!("/api/comments/post/{post}/comments"),
        Some(&ben_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_permissions() {
    let (global, app) = app();
    let (_, ana_token) = signup(&app, "ana").await;
    let (_, ben_token) = signup(&app, "ben").await;
    let (_, cara_token) = signup(&app, "cara").await;
    let post = create_post(&app, &ana_token, "discuss", "public").await;

    let (_, body) = comment(&app, &ben_token, post, "first").await;
    let by_ben = body["data"]["id"].as_u64().unwrap();
    let (_, body) = comment(&app, &ben_token, post, "second").await;
    let also_by_ben = body["data"]["id"].as_u64().unwrap();

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/comments/{by_ben}"),
        Some(&cara_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // the comment author
    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/comments/{by_ben}"),
        Some(&ben_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // the post author
    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/comments/{also_by_ben}"),
        Some(&ana_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(global.comments.is_empty());
}

#[tokio::test]
async fn timeline_counts_comments_per_post() {
    let (_, app) = app();
    let (_, ana_token) = signup(&app, "ana").await;
    let (_, ben_token) = signup(&app, "ben").await;
    let busy = create_post(&app, &ana_token, "busy", "public").await;
    let quiet = create_post(&app, &ana_token, "quiet", "public").await;

    for text in ["one", "two", "three"] {
        let (status, _) = comment(&app, &ben_token, busy, text).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = call(&app, "GET", "/api/posts", None, None).await;
    let counts: Vec<(u64, u64)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| (p["id"].as_u64().unwrap(), p["comments"].as_u64().unwrap()))
        .collect();
    assert_eq!(counts.len(), 2);
    assert!(counts.contains(&(busy, 3)));
    assert!(counts.contains(&(quiet, 0)));
}
