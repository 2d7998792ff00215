use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use common::config::{AppEnvironment, DatabaseConfig, UploadConfig};
use common::storage::filesystem::FilesystemUploadStore;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::Value;
use tempfile::TempDir;

use server::config::{AppConfig, AppSection, AuthConfig, CorsConfig, LogConfig, ServerConfig};
use server::entity::{project, stash_item};
use server::state::AppState;

pub mod routes {
    pub const SIGN_IN: &str = "/api/auth/signin";
    pub const SIGN_OUT: &str = "/api/auth/signout";
    pub const SESSION: &str = "/api/auth/session";
    pub const PROJECTS: &str = "/api/projects";
    pub const STASH: &str = "/api/stash";

    pub fn project(id: &str) -> String {
        format!("/api/projects/{id}")
    }

    pub fn stash_item(id: &str) -> String {
        format!("/api/stash/{id}")
    }

    pub fn project_page(id: &str) -> String {
        format!("/projects/{id}")
    }

    pub fn stash_page(id: &str) -> String {
        format!("/stash/{id}")
    }

    pub fn profile_page(id: &str) -> String {
        format!("/profile/{id}")
    }
}

pub const TEST_SECRET: &str = "test-secret-for-integration-tests";
pub const COOKIE_NAME: &str = "craftykeep_session";

/// A file part for multipart forms.
pub struct Upload<'a> {
    pub file_name: &'a str,
    pub bytes: Vec<u8>,
}

impl<'a> Upload<'a> {
    pub fn png(file_name: &'a str) -> Self {
        Self {
            file_name,
            bytes: b"\x89PNG\r\n\x1a\nfake-image".to_vec(),
        }
    }
}

/// A running test server backed by in-memory SQLite and a temporary upload
/// directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub upload_dir: PathBuf,
    _tmp: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
    pub set_cookie: Option<String>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let tmp = tempfile::tempdir().expect("Failed to create temp dir");
        let upload_dir = tmp.path().join("uploads");

        let db = server::database::init_db("sqlite::memory:")
            .await
            .expect("Failed to initialize test database");

        let app_config = AppConfig {
            app: AppSection {
                environment: AppEnvironment::Development,
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: Some("sqlite::memory:".into()),
            },
            uploads: UploadConfig {
                dir: upload_dir.clone(),
                public_prefix: "/uploads".into(),
                max_size: 1024 * 1024,
            },
            auth: AuthConfig {
                jwt_secret: TEST_SECRET.to_string(),
                session_ttl_days: 30,
                cookie_name: COOKIE_NAME.to_string(),
            },
            log: LogConfig {
                level: "warn".into(),
            },
        };

        let uploads = FilesystemUploadStore::new(upload_dir.clone(), "/uploads")
            .await
            .expect("Failed to create upload store");

        let state = AppState {
            db: db.clone(),
            uploads: Arc::new(uploads),
            config: app_config,
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            upload_dir,
            _tmp: tmp,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn with_token(
        &self,
        req: reqwest::RequestBuilder,
        token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        match token {
            Some(token) => req.header("Authorization", format!("Bearer {token}")),
            None => req,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let res = self
            .with_token(self.client.get(self.url(path)), token)
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_cookie(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Cookie", format!("{COOKIE_NAME}={token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn post_json(&self, path: &str, body: &Value, token: Option<&str>) -> TestResponse {
        let res = self
            .with_token(self.client.post(self.url(path)), token)
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        let res = self
            .with_token(self.client.delete(self.url(path)), token)
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// POST a multipart form with optional `name`, `description` and `image`
    /// parts.
    pub async fn post_form(
        &self,
        path: &str,
        name: Option<&str>,
        description: Option<&str>,
        image: Option<Upload<'_>>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut form = Form::new();
        if let Some(name) = name {
            form = form.text("name", name.to_string());
        }
        if let Some(description) = description {
            form = form.text("description", description.to_string());
        }
        if let Some(image) = image {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name.to_string())
                .mime_str("image/png")
                .expect("Failed to set MIME type");
            form = form.part("image", part);
        }

        let res = self
            .with_token(self.client.post(self.url(path)), token)
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    /// Sign in as `email`, returning the session token.
    pub async fn sign_in(&self, email: &str, name: &str) -> String {
        let res = self
            .post_json(
                routes::SIGN_IN,
                &serde_json::json!({ "email": email, "name": name }),
                None,
            )
            .await;
        assert_eq!(res.status, 200, "Sign-in failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Sign-in response should contain a token")
            .to_string()
    }

    /// Create a project via the API and return its `id`.
    pub async fn create_project(&self, name: &str, description: &str, token: Option<&str>) -> String {
        let res = self
            .post_form(
                routes::PROJECTS,
                Some(name),
                Some(description),
                Some(Upload::png("cover.png")),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_project failed: {}", res.text);
        res.id()
    }

    /// Create a stash item without a photo and return its `id`.
    pub async fn create_stash_item(&self, name: &str, description: &str, token: &str) -> String {
        let res = self
            .post_form(routes::STASH, Some(name), Some(description), None, Some(token))
            .await;
        assert_eq!(res.status, 201, "create_stash_item failed: {}", res.text);
        res.id()
    }

    pub async fn project_count(&self) -> u64 {
        project::Entity::find()
            .count(&self.db)
            .await
            .expect("DB query failed")
    }

    pub async fn stash_count(&self) -> u64 {
        stash_item::Entity::find()
            .count(&self.db)
            .await
            .expect("DB query failed")
    }

    /// Files under the upload directory, excluding the staging area.
    pub fn uploaded_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.upload_dir)
            .expect("Failed to read upload dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }

    /// Files left in the staging area.
    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.upload_dir.join(".tmp"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let set_cookie = res
            .headers()
            .get("set-cookie")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self {
            status,
            text,
            body,
            set_cookie,
        }
    }

    pub fn id(&self) -> String {
        self.body["id"]
            .as_str()
            .expect("response body should contain 'id'")
            .to_string()
    }

    /// Names of the items in a list response, in order.
    pub fn names(&self) -> Vec<String> {
        self.body
            .as_array()
            .expect("response body should be an array")
            .iter()
            .map(|item| item["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}
