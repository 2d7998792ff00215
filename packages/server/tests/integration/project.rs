use crate::common::{TestApp, Upload, routes};

mod listing {
    use super::*;

    #[tokio::test]
    async fn projects_are_listed_newest_first_for_everyone() {
        let app = TestApp::spawn().await;
        let token = app.sign_in("ada@example.com", "Ada").await;

        app.create_project("Granny squares", "Blanket", Some(&token)).await;
        app.create_project("Socks", "Toe-up", None).await;

        let res = app.get(routes::PROJECTS, None).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.names(), vec!["Socks", "Granny squares"]);
    }

    #[tokio::test]
    async fn search_is_a_case_sensitive_substring_match_on_name_or_description() {
        let app = TestApp::spawn().await;
        app.create_project("Blue Scarf", "wool", None).await;
        app.create_project("Hat", "Blue pompom", None).await;
        app.create_project("blue mittens", "acrylic", None).await;

        let res = app.get(&format!("{}?q=Blue", routes::PROJECTS), None).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.names(), vec!["Hat", "Blue Scarf"]);
    }

    #[tokio::test]
    async fn empty_query_returns_everything() {
        let app = TestApp::spawn().await;
        app.create_project("One", "", None).await;
        app.create_project("Two", "", None).await;

        let res = app.get(&format!("{}?q=", routes::PROJECTS), None).await;

        assert_eq!(res.names().len(), 2);
    }

    #[tokio::test]
    async fn like_wildcards_in_the_query_match_literally() {
        let app = TestApp::spawn().await;
        app.create_project("50% wool", "", None).await;
        app.create_project("500 beads", "", None).await;

        let res = app.get(&format!("{}?q=50%25", routes::PROJECTS), None).await;

        assert_eq!(res.names(), vec!["50% wool"]);
    }
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn signed_in_creator_owns_the_project_and_file_is_stored() {
        let app = TestApp::spawn().await;
        let token = app.sign_in("ada@example.com", "Ada").await;

        let res = app
            .post_form(
                routes::PROJECTS,
                Some("Blanket"),
                Some("Twelve squares"),
                Some(Upload::png("my blanket.png")),
                Some(&token),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        let session = app.get(routes::SESSION, Some(&token)).await;
        assert_eq!(res.body["userId"], session.body["user"]["id"]);

        let image_url = res.body["imageUrl"].as_str().unwrap();
        assert!(image_url.starts_with("/uploads/"));
        assert!(image_url.ends_with("-my_blanket.png"));

        let files = app.uploaded_files();
        assert_eq!(files.len(), 1);
        assert_eq!(format!("/uploads/{}", files[0]), image_url);
        assert_eq!(app.staged_files(), 0);
    }

    #[tokio::test]
    async fn anonymous_projects_have_no_owner() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::PROJECTS,
                Some("Legacy"),
                None,
                Some(Upload::png("a.png")),
                None,
            )
            .await;

        assert_eq!(res.status, 201);
        assert!(res.body["userId"].is_null());
        assert_eq!(res.body["description"], "");
    }

    #[tokio::test]
    async fn uploaded_image_is_served_at_its_public_url() {
        let app = TestApp::spawn().await;
        let res = app
            .post_form(
                routes::PROJECTS,
                Some("Quilt"),
                Some(""),
                Some(Upload::png("quilt.png")),
                None,
            )
            .await;

        let image = app.get(res.body["imageUrl"].as_str().unwrap(), None).await;

        assert_eq!(image.status, 200);
        assert!(image.text.ends_with("fake-image"));
    }

    #[tokio::test]
    async fn missing_image_writes_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(routes::PROJECTS, Some("Blanket"), Some("desc"), None, None)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["message"], "Name and image are required");
        assert_eq!(app.project_count().await, 0);
        assert!(app.uploaded_files().is_empty());
        assert_eq!(app.staged_files(), 0);
    }

    #[tokio::test]
    async fn missing_name_writes_nothing() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::PROJECTS,
                Some("   "),
                Some("desc"),
                Some(Upload::png("a.png")),
                None,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(app.project_count().await, 0);
        assert!(app.uploaded_files().is_empty());
    }

    #[tokio::test]
    async fn blank_file_input_counts_as_missing_image() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::PROJECTS,
                Some("Blanket"),
                None,
                Some(Upload {
                    file_name: "",
                    bytes: Vec::new(),
                }),
                None,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(app.project_count().await, 0);
    }

    #[tokio::test]
    async fn hidden_filenames_are_rejected_before_anything_is_written() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::PROJECTS,
                Some("Sneaky"),
                None,
                Some(Upload::png(".htaccess")),
                None,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(app.project_count().await, 0);
        assert!(app.uploaded_files().is_empty());
        assert_eq!(app.staged_files(), 0);
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn non_owner_gets_403_and_owner_can_delete() {
        let app = TestApp::spawn().await;
        let owner = app.sign_in("owner@example.com", "Owner").await;
        let other = app.sign_in("other@example.com", "Other").await;
        let id = app.create_project("Scarf", "Striped", Some(&owner)).await;

        let res = app.delete(&routes::project(&id), Some(&other)).await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "FORBIDDEN");
        assert_eq!(app.project_count().await, 1);

        let res = app.delete(&routes::project(&id), Some(&owner)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["success"], true);

        let list = app.get(routes::PROJECTS, None).await;
        assert!(list.names().is_empty());
    }

    #[tokio::test]
    async fn nobody_can_delete_an_unowned_project() {
        let app = TestApp::spawn().await;
        let token = app.sign_in("ada@example.com", "Ada").await;
        let id = app.create_project("Legacy", "", None).await;

        let res = app.delete(&routes::project(&id), Some(&token)).await;

        assert_eq!(res.status, 403);
        assert_eq!(app.project_count().await, 1);
    }

    #[tokio::test]
    async fn delete_requires_a_session() {
        let app = TestApp::spawn().await;
        let id = app.create_project("Scarf", "", None).await;

        let res = app.delete(&routes::project(&id), None).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn expired_or_forged_tokens_are_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_project("Scarf", "", None).await;

        let res = app.delete(&routes::project(&id), Some("not-a-jwt")).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let app = TestApp::spawn().await;
        let token = app.sign_in("ada@example.com", "Ada").await;

        let res = app
            .delete(&routes::project(&uuid::Uuid::now_v7().to_string()), Some(&token))
            .await;
        assert_eq!(res.status, 404);

        let res = app.delete(&routes::project("42"), Some(&token)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
