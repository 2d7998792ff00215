//! Wire types shared by the HTTP API and its clients.
//!
//! Field names are camelCase on the wire (`imageUrl`, `createdAt`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A craft project with its cover photo.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: Uuid,
    #[schema(example = "Granny square blanket")]
    pub name: String,
    #[schema(example = "Twelve squares in, forty to go.")]
    pub description: String,
    /// Public-relative URL of the uploaded photo.
    #[schema(example = "/uploads/1718000000000-blanket.jpg")]
    pub image_url: String,
    /// `None` only for legacy rows created before ownership was tracked.
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A material in the caller's stash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StashItem {
    pub id: Uuid,
    #[schema(example = "Blue Yarn")]
    pub name: String,
    #[schema(example = "Cotton yarn")]
    pub description: String,
    #[schema(example = "/uploads/stash-1718000000000-yarn.jpg")]
    pub image_url: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// The signed-in user as exposed to pages and clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl SessionUser {
    /// Single upper-cased letter of the name (or email) shown when the user has
    /// no avatar image.
    pub fn initial(&self, fallback: char) -> char {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .and_then(|n| n.trim_start().chars().next())
            .map(|c| c.to_uppercase().next().unwrap_or(c))
            .unwrap_or(fallback)
    }
}

/// Body of `GET /api/auth/session`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SessionResponse {
    pub user: Option<SessionUser>,
}

/// Body returned by successful deletes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

impl DeleteResponse {
    pub const OK: Self = Self { success: true };
}
