use crate::common::{TestApp, Upload, routes};

#[tokio::test]
async fn blue_yarn_without_image_has_null_image_url() {
    let app = TestApp::spawn().await;
    let token = app.sign_in("ada@example.com", "Ada").await;

    let res = app
        .post_form(
            routes::STASH,
            Some("Blue Yarn"),
            Some("Cotton yarn"),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["name"], "Blue Yarn");
    assert_eq!(res.body["description"], "Cotton yarn");
    assert!(res.body["imageUrl"].is_null());
    assert!(app.uploaded_files().is_empty());
}

#[tokio::test]
async fn photo_gets_the_stash_prefix() {
    let app = TestApp::spawn().await;
    let token = app.sign_in("ada@example.com", "Ada").await;

    let res = app
        .post_form(
            routes::STASH,
            Some("Buttons"),
            Some("Wooden"),
            Some(Upload::png("buttons.png")),
            Some(&token),
        )
        .await;

    assert_eq!(res.status, 201);
    let url = res.body["imageUrl"].as_str().unwrap();
    assert!(url.starts_with("/uploads/stash-"));
    assert!(url.ends_with("-buttons.png"));
    assert_eq!(app.uploaded_files().len(), 1);
}

#[tokio::test]
async fn blank_file_input_is_ignored() {
    let app = TestApp::spawn().await;
    let token = app.sign_in("ada@example.com", "Ada").await;

    let res = app
        .post_form(
            routes::STASH,
            Some("Needles"),
            Some("4mm"),
            Some(Upload {
                file_name: "",
                bytes: Vec::new(),
            }),
            Some(&token),
        )
        .await;

    assert_eq!(res.status, 201);
    assert!(res.body["imageUrl"].is_null());
}

#[tokio::test]
async fn missing_description_writes_nothing() {
    let app = TestApp::spawn().await;
    let token = app.sign_in("ada@example.com", "Ada").await;

    let res = app
        .post_form(
            routes::STASH,
            Some("Blue Yarn"),
            None,
            Some(Upload::png("yarn.png")),
            Some(&token),
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["message"], "Name and description are required");
    assert_eq!(app.stash_count().await, 0);
    assert!(app.uploaded_files().is_empty());
    assert_eq!(app.staged_files(), 0);
}

#[tokio::test]
async fn stash_requires_a_session() {
    let app = TestApp::spawn().await;

    let list = app.get(routes::STASH, None).await;
    assert_eq!(list.status, 401);

    let create = app
        .post_form(routes::STASH, Some("Yarn"), Some("Wool"), None, None)
        .await;
    assert_eq!(create.status, 401);
    assert_eq!(app.stash_count().await, 0);
}

#[tokio::test]
async fn each_user_sees_only_their_own_items_newest_first() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada@example.com", "Ada").await;
    let bob = app.sign_in("bob@example.com", "Bob").await;

    app.create_stash_item("Yarn", "Merino", &ada).await;
    app.create_stash_item("Hooks", "Steel", &ada).await;
    app.create_stash_item("Beads", "Glass", &bob).await;

    let res = app.get(routes::STASH, Some(&ada)).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.names(), vec!["Hooks", "Yarn"]);

    let res = app.get(routes::STASH, Some(&bob)).await;
    assert_eq!(res.names(), vec!["Beads"]);
}

#[tokio::test]
async fn search_stays_within_the_callers_stash() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada@example.com", "Ada").await;
    let bob = app.sign_in("bob@example.com", "Bob").await;

    app.create_stash_item("Blue Yarn", "Cotton", &ada).await;
    app.create_stash_item("Red Yarn", "Wool", &ada).await;
    app.create_stash_item("Blue Beads", "Glass", &bob).await;

    let res = app
        .get(&format!("{}?q=Blue", routes::STASH), Some(&ada))
        .await;
    assert_eq!(res.names(), vec!["Blue Yarn"]);

    let res = app
        .get(&format!("{}?q=cotton", routes::STASH), Some(&ada))
        .await;
    assert!(res.names().is_empty());
}

#[tokio::test]
async fn only_the_owner_can_delete_an_item() {
    let app = TestApp::spawn().await;
    let ada = app.sign_in("ada@example.com", "Ada").await;
    let bob = app.sign_in("bob@example.com", "Bob").await;
    let id = app.create_stash_item("Yarn", "Merino", &ada).await;

    let res = app.delete(&routes::stash_item(&id), Some(&bob)).await;
    assert_eq!(res.status, 403);
    assert_eq!(app.stash_count().await, 1);

    let res = app.delete(&routes::stash_item(&id), None).await;
    assert_eq!(res.status, 401);

    let res = app.delete(&routes::stash_item(&id), Some(&ada)).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["success"], true);
    assert_eq!(app.stash_count().await, 0);

    let res = app.delete(&routes::stash_item(&id), Some(&ada)).await;
    assert_eq!(res.status, 404);
}
