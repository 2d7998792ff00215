//! Reqwest-backed client for the `/api` surface.

use async_trait::async_trait;
use common::{Project, SessionResponse, SessionUser, StashItem};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Status {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The two owned collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Projects,
    Stash,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::Projects => "api/projects",
            Resource::Stash => "api/stash",
        }
    }

    /// Page the browser returns to after deleting an entry.
    pub fn index_page(self) -> &'static str {
        match self {
            Resource::Projects => "/projects",
            Resource::Stash => "/stash",
        }
    }
}

/// A file picked for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    fn into_part(self) -> Result<Part, ApiError> {
        let mime = mime_guess::from_path(&self.file_name).first_or_octet_stream();
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(mime.as_ref())?)
    }
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub image: ImageFile,
}

#[derive(Debug, Clone)]
pub struct NewStashItem {
    pub name: String,
    pub description: String,
    pub image: Option<ImageFile>,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct SignInBody {
    token: String,
    user: SessionUser,
}

/// Operations the view models need.
#[async_trait]
pub trait Api: Send + Sync {
    async fn list_projects(&self, q: Option<&str>) -> Result<Vec<Project>, ApiError>;
    async fn list_stash(&self, q: Option<&str>) -> Result<Vec<StashItem>, ApiError>;
    async fn delete(&self, resource: Resource, id: Uuid) -> Result<(), ApiError>;
}

pub struct ApiClient {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Build a client for the server at `base` (e.g. `http://localhost:3000/`).
    /// Cookies set by the server are kept for later requests.
    pub fn new(base: Url) -> Result<Self, ApiError> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base,
            token: None,
        })
    }

    /// Send `token` as a bearer header instead of relying on the cookie.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn check(res: Response) -> Result<Response, ApiError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body: Option<ErrorBody> = res.json().await.ok();
        let (code, message) = match body {
            Some(body) => (
                body.code,
                body.message
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
            ),
            None => (None, status.canonical_reason().unwrap_or("").to_string()),
        };
        Err(ApiError::Status {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        q: Option<&str>,
    ) -> Result<Vec<T>, ApiError> {
        let mut url = self.url(resource.path())?;
        if let Some(q) = q.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().append_pair("q", q);
        }
        let res = self.authorize(self.client.get(url)).send().await?;
        Ok(Self::check(res).await?.json().await?)
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        resource: Resource,
        form: Form,
    ) -> Result<T, ApiError> {
        let url = self.url(resource.path())?;
        let res = self
            .authorize(self.client.post(url))
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check(res).await?.json().await?)
    }

    pub async fn create_project(&self, project: NewProject) -> Result<Project, ApiError> {
        let form = Form::new()
            .text("name", project.name)
            .text("description", project.description)
            .part("image", project.image.into_part()?);
        self.post_form(Resource::Projects, form).await
    }

    pub async fn create_stash_item(&self, item: NewStashItem) -> Result<StashItem, ApiError> {
        let mut form = Form::new()
            .text("name", item.name)
            .text("description", item.description);
        if let Some(image) = item.image {
            form = form.part("image", image.into_part()?);
        }
        self.post_form(Resource::Stash, form).await
    }

    /// Complete sign-in for an identity the provider has verified. The
    /// returned token is also stored in the client's cookie jar.
    pub async fn sign_in(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<(String, SessionUser), ApiError> {
        let url = self.url("api/auth/signin")?;
        let res = self
            .client
            .post(url)
            .json(&serde_json::json!({ "email": email, "name": name }))
            .send()
            .await?;
        let body: SignInBody = Self::check(res).await?.json().await?;
        Ok((body.token, body.user))
    }

    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let url = self.url("api/auth/signout")?;
        let res = self.client.post(url).send().await?;
        Self::check(res).await?;
        Ok(())
    }

    pub async fn session(&self) -> Result<Option<SessionUser>, ApiError> {
        let url = self.url("api/auth/session")?;
        let res = self.authorize(self.client.get(url)).send().await?;
        let body: SessionResponse = Self::check(res).await?.json().await?;
        Ok(body.user)
    }
}

#[async_trait]
impl Api for ApiClient {
    async fn list_projects(&self, q: Option<&str>) -> Result<Vec<Project>, ApiError> {
        self.get_list(Resource::Projects, q).await
    }

    async fn list_stash(&self, q: Option<&str>) -> Result<Vec<StashItem>, ApiError> {
        self.get_list(Resource::Stash, q).await
    }

    async fn delete(&self, resource: Resource, id: Uuid) -> Result<(), ApiError> {
        let url = self.url(&format!("{}/{id}", resource.path()))?;
        let res = self.authorize(self.client.delete(url)).send().await?;
        Self::check(res).await?;
        Ok(())
    }
}
