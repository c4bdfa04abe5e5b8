use super::*;

use chrono::{DateTime, Duration, Utc};

fn create_story(
    app: &Router,
    token: &str,
    text: &str,
) -> impl std::future::Future<Output = (StatusCode, Value)> + Send + 'static {
    call(
        app,
        "POST",
        "/api/stories/create",
        Some(token),
        Some(json!({
            "type": "text",
            "text": text,
            "text_style": {
                "font_size": 24,
                "position": { "x": 0.5, "y": 0.4 },
                "background": "#1d4ed8",
            },
        })),
    )
}

#[tokio::test]
async fn own_story_pinned_first() {
    let (global, app) = app();
    let (_, ana_token) = signup(&app, "ana").await;
    let (_, ben_token) = signup(&app, "ben").await;
    let (_, cara_token) = signup(&app, "cara").await;

    let mut stories = vec![];
    for token in [&ana_token, &ben_token, &cara_token] {
        let (status, body) = create_story(&app, token, "hello").await;
        assert_eq!(status, StatusCode::CREATED);
        stories.push(body["data"]["id"].as_u64().unwrap());
    }

    // ana's story is the oldest
    let now = Utc::now();
    for (id, age) in stories.iter().zip([3, 2, 1]) {
        global
            .stories
            .update(*id, |s| {
                s.created_at = now - Duration::minutes(age);
                Ok(())
            })
            .unwrap();
    }

    let (_, body) = call(&app, "GET", "/api/stories", Some(&ana_token), None).await;
    assert_eq!(ids(&body), [stories[0], stories[2], stories[1]]);

    let (_, body) = call(&app, "GET", "/api/stories", None, None).await;
    assert_eq!(ids(&body), [stories[2], stories[1], stories[0]]);
}

#[tokio::test]
async fn one_active_story() {
    let (global, app) = app();
    let (_, token) = signup(&app, "ana").await;

    let (_, body) = create_story(&app, &token, "first").await;
    let first = body["data"]["id"].as_u64().unwrap();
    let time = |field: &str| -> DateTime<Utc> {
        body["data"][field].as_str().unwrap().parse().unwrap()
    };
    assert_eq!(time("expires_at") - time("created_at"), Duration::hours(24));

    let (status, _) = create_story(&app, &token, "second").await;
    assert_eq!(status, StatusCode::CONFLICT);

    // once expired, the story disappears and a new one may be posted
    global
        .stories
        .update(first, |s| {
            s.expires_at = Utc::now() - Duration::seconds(1);
            Ok(())
        })
        .unwrap();

    let (_, body) = call(&app, "GET", "/api/stories", Some(&token), None).await;
    assert!(ids(&body).is_empty());
    assert!(!global.stories.contains(first));

    let (status, _) = create_story(&app, &token, "second").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn views_recorded_once() {
    let (_, app) = app();
    let (_, ana_token) = signup(&app, "ana").await;
    let (_, ben_token) = signup(&app, "ben").await;

    let (_, body) = create_story(&app, &ana_token, "hello").await;
    let story = body["data"]["id"].as_u64().unwrap();

    for _ in 0..2 {
        let (_, body) = call(
            &app,
            "POST",
            &format!("/api/stories/{story}/view"),
            Some(&ben_token),
            None,
        )
        .await;
        assert_eq!(body["data"]["views"].as_u64(), Some(1));
    }

    let (_, body) = call(
        &app,
        "POST",
        &format!("/api/stories/{story}/view"),
        Some(&ana_token),
        None,
    )
    .await;
    assert_eq!(body["data"]["views"].as_u64(), Some(1));

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/stories/{story}/like"),
        Some(&ben_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["liked"], true);

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/stories/{story}"),
        Some(&ana_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn image_story_needs_media() {
    let (_, app) = app();
    let (ana, token) = signup(&app, "ana").await;

    let (status, _) = call(
        &app,
        "POST",
        "/api/stories/create",
        Some(&token),
        Some(json!({ "type": "image" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        "POST",
        "/api/stories/create",
        Some(&token),
        Some(json!({ "type": "image", "media": ["https://cdn.example/s.jpg"] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = call(&app, "GET", &format!("/api/stories/user/{ana}"), None, None).await;
    assert_eq!(body["data"][0]["type"], "image");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_leave_one_story() {
    let (global, app) = app();
    let (id, token) = signup(&app, "ana").await;

    let mut handles = vec![];
    for i in 0..32 {
        let app = app.clone();
        let token = token.clone();
        handles.push(tokio::spawn(async move {
            create_story(&app, &token, &format!("story {i}")).await.0
        }));
    }

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            status => assert_eq!(status, StatusCode::CONFLICT),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(global.stories.count(|s| s.user_id == id), 1);
}
