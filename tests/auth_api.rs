//! Sign-up, sign-in, sign-out and session verification.

mod fixtures;
use fixtures::{TestServer, json_body};
use serde_json::json;

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::start().await;

    let response = server
        .client()
        .get(server.url("/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_sign_up_then_sign_in() {
    // given
    let server = TestServer::start().await;
    let response = server.sign_up("skystar", "doge", "usezmap").await;
    assert_eq!(response.status(), 201);

    // when
    let client = server.client();
    let response = server.sign_in(&client, "skystar", "doge").await;

    // then
    assert_eq!(response.status(), 200);
    assert_eq!(json_body(response).await, json!({ "username": "skystar" }));
}

#[tokio::test]
async fn test_sign_up_missing_field() {
    let server = TestServer::start().await;

    let response = server
        .client()
        .post(server.url("/sign_up"))
        .json(&json!({ "username": "skystar", "password": "doge", "email": "asdf@asdf.com" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let response = server
        .client()
        .get(server.url("/sign_up"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 405);
}

#[tokio::test]
async fn test_sign_up_blank_field() {
    let server = TestServer::start().await;

    let response = server.sign_up("skystar", "doge", "   ").await;

    assert_eq!(response.status(), 400);
    assert_eq!(json_body(response).await["error"], "nickname must not be blank");
}

#[tokio::test]
async fn test_sign_up_taken_username_or_nickname() {
    let server = TestServer::start().await;
    assert_eq!(server.sign_up("skystar", "doge", "usezmap").await.status(), 201);

    let response = server.sign_up("skystar", "other", "other").await;
    assert_eq!(response.status(), 400);
    assert_eq!(json_body(response).await["error"], "username already taken");

    let response = server.sign_up("other", "other", "usezmap").await;
    assert_eq!(response.status(), 400);
    assert_eq!(json_body(response).await["error"], "nickname already taken");
}

#[tokio::test]
async fn test_sign_in_fail_does_not_leak_usernames() {
    let server = TestServer::start().await;
    server.sign_up("skystar", "doge", "usezmap").await;
    let client = server.client();

    let wrong_password = server.sign_in(&client, "skystar", "not doge").await;
    assert_eq!(wrong_password.status(), 401);
    let wrong_password = json_body(wrong_password).await;

    let unknown_user = server.sign_in(&client, "nobody", "doge").await;
    assert_eq!(unknown_user.status(), 401);
    assert_eq!(json_body(unknown_user).await, wrong_password);

    let response = client
        .get(server.url("/sign_in"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 405);
}

#[tokio::test]
async fn test_verify_session() {
    let server = TestServer::start().await;

    let anonymous = server
        .client()
        .get(server.url("/verify_session"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(anonymous.status(), 401);

    let client = server.skystar().await;
    let response = client
        .get(server.url("/verify_session"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    assert_eq!(json_body(response).await["username"], "skystar");

    let response = client
        .post(server.url("/verify_session"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 405);
}

#[tokio::test]
async fn test_sign_out() {
    let server = TestServer::start().await;

    let anonymous = server
        .client()
        .get(server.url("/sign_out"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(anonymous.status(), 200);

    let client = server.skystar().await;
    let response = client
        .get(server.url("/sign_out"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .get(server.url("/verify_session"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);

    let response = client
        .post(server.url("/sign_out"))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 405);
}
