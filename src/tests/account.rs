use super::*;

#[tokio::test]
async fn register_and_login() {
    let (global, app) = app();
    let (id, _) = signup(&app, "juan").await;
    assert!(global.accounts.contains(id));

    // duplicated username, ignoring case
    let (status, _) = call(
        &app,
        "POST",
        "/api/users/create",
        None,
        Some(json!({
            "first_name": "Other",
            "last_name": "Juan",
            "email": "other@gbox.adnu.edu.ph",
            "username": "JUAN",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // short password
    let (status, _) = call(
        &app,
        "POST",
        "/api/users/create",
        None,
        Some(json!({
            "first_name": "Other",
            "last_name": "Juan",
            "email": "other@gbox.adnu.edu.ph",
            "username": "juan2",
            "password": "short",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({ "email": "juan@gbox.adnu.edu.ph", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"].as_u64(), Some(id));
    assert!(body["data"]["user"].get("password_sha").is_none());

    let (status, body) = call(
        &app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({ "email": "juan@gbox.adnu.edu.ph", "password": "password124" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn email_domain_restriction() {
    let mut config = Config::default();
    config.allowed_email_domains = vec!["gbox.adnu.edu.ph".to_owned()];
    let app = crate::router(Global::new(config).unwrap());

    let (status, _) = call(
        &app,
        "POST",
        "/api/users/create",
        None,
        Some(json!({
            "first_name": "Outside",
            "last_name": "User",
            "email": "someone@gmail.com",
            "username": "outsider",
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    signup(&app, "insider").await;
}

#[tokio::test]
async fn logout_revokes_token() {
    let (_, app) = app();
    let (_, token) = signup(&app, "juan").await;

    let (status, _) = call(&app, "GET", "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "POST", "/api/users/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "GET", "/api/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_auth_header() {
    let (_, app) = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/users")
                .header(http::header::AUTHORIZATION, "Token abc")
                .body(hyper::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_users() {
    let (_, app) = app();
    let (_, token) = signup(&app, "maria.santos").await;
    signup(&app, "juan").await;

    let (_, body) = call(&app, "GET", "/api/users?q=SANTOS", Some(&token), None).await;
    let names: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["maria.santos"]);

    let (_, body) = call(&app, "GET", "/api/users", Some(&token), None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn update_profile() {
    let (_, app) = app();
    let (id, token) = signup(&app, "juan").await;
    let (other, _) = signup(&app, "maria").await;

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/users/{id}"),
        Some(&token),
        Some(json!({
            "department": "Computer Science",
            "bio": "hello",
            "role": "faculty",
            "avatar": "https://cdn.example/avatar.png",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["department"], "Computer Science");
    assert_eq!(body["data"]["role"], "faculty");

    let (status, _) = call(
        &app,
        "PUT",
        &format!("/api/users/{other}"),
        Some(&token),
        Some(json!({ "bio": "hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, "GET", &format!("/api/users/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bio"], "hello");
}

#[tokio::test]
async fn change_password() {
    let (_, app) = app();
    let (_, token) = signup(&app, "juan").await;

    let (status, _) = call(
        &app,
        "PUT",
        "/api/users/change-password",
        Some(&token),
        Some(json!({
            "old_password": "password123",
            "new_password": "newpassword",
            "confirm_new_password": "different",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        "PUT",
        "/api/users/change-password",
        Some(&token),
        Some(json!({
            "old_password": "password123",
            "new_password": "newpassword",
            "confirm_new_password": "newpassword",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(
        &app,
        "POST",
        "/api/users/login",
        None,
        Some(json!({ "email": "juan@gbox.adnu.edu.ph", "password": "newpassword" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn follow_and_unfollow() {
    let (global, app) = app();
    let (juan, juan_token) = signup(&app, "juan").await;
    let (maria, _) = signup(&app, "maria").await;

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/users/{juan}/follow"),
        Some(&juan_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    follow(&app, &juan_token, maria).await;
    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/users/{maria}/follow"),
        Some(&juan_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = call(&app, "GET", &format!("/api/users/{maria}/followers"), None, None).await;
    assert_eq!(ids(&body), [juan]);
    let (_, body) = call(&app, "GET", &format!("/api/users/{juan}/following"), None, None).await;
    assert_eq!(ids(&body), [maria]);
    assert_eq!(global.notifications.count(|n| n.recipient == maria), 1);

    let (status, body) = call(
        &app,
        "POST",
        &format!("/api/users/{maria}/unfollow"),
        Some(&juan_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["followers"].as_array().unwrap().is_empty());

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/users/{maria}/unfollow"),
        Some(&juan_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn google_sign_in_disabled() {
    let (_, app) = app();
    let (status, _) = call(
        &app,
        "POST",
        "/auth/google",
        None,
        Some(json!({ "id_token": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
