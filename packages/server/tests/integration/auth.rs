use serde_json::json;

use crate::common::{COOKIE_NAME, TestApp, routes};

#[tokio::test]
async fn first_sign_in_creates_the_user_and_sets_a_cookie() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(
            routes::SIGN_IN,
            &json!({"email": "Ada@Example.com ", "name": "Ada"}),
            None,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert!(res.body["token"].is_string());
    assert_eq!(res.body["user"]["email"], "ada@example.com");
    assert_eq!(res.body["user"]["name"], "Ada");

    let cookie = res.set_cookie.expect("sign-in should set a cookie");
    assert!(cookie.starts_with(&format!("{COOKIE_NAME}=")));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn signing_in_again_reuses_the_same_user() {
    let app = TestApp::spawn().await;

    let first = app
        .post_json(routes::SIGN_IN, &json!({"email": "ada@example.com"}), None)
        .await;
    let second = app
        .post_json(
            routes::SIGN_IN,
            &json!({"email": "ADA@example.com", "name": "Ada L."}),
            None,
        )
        .await;

    assert_eq!(first.body["user"]["id"], second.body["user"]["id"]);
    assert_eq!(second.body["user"]["name"], "Ada L.");
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(routes::SIGN_IN, &json!({"email": "not-an-email"}), None)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(routes::SIGN_IN, &json!({"name": "No email"}), None)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn session_reports_the_signed_in_user_via_header_or_cookie() {
    let app = TestApp::spawn().await;
    let token = app.sign_in("ada@example.com", "Ada").await;

    let by_header = app.get(routes::SESSION, Some(&token)).await;
    assert_eq!(by_header.status, 200);
    assert_eq!(by_header.body["user"]["name"], "Ada");

    let by_cookie = app.get_with_cookie(routes::SESSION, &token).await;
    assert_eq!(by_cookie.body["user"], by_header.body["user"]);
}

#[tokio::test]
async fn session_is_null_when_signed_out_or_token_is_bad() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::SESSION, None).await;
    assert_eq!(res.status, 200);
    assert!(res.body["user"].is_null());

    let res = app.get(routes::SESSION, Some("garbage")).await;
    assert_eq!(res.status, 200);
    assert!(res.body["user"].is_null());
}

#[tokio::test]
async fn sign_out_clears_the_cookie() {
    let app = TestApp::spawn().await;

    let res = app.post_json(routes::SIGN_OUT, &json!({}), None).await;

    assert_eq!(res.status, 204);
    let cookie = res.set_cookie.expect("sign-out should clear the cookie");
    assert!(cookie.starts_with(&format!("{COOKIE_NAME}=;")));
}
