use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use common::StashItem;

use super::shared::{ImageUpload, required_text};
use crate::entity::stash_item;
use crate::error::AppError;

/// `multipart/form-data` body of `POST /api/stash`.
#[derive(TryFromMultipart, utoipa::ToSchema)]
pub struct StashForm {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Optional photo.
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<FieldData<Bytes>>,
}

#[derive(Debug)]
pub struct NewStashItem {
    pub name: String,
    pub description: String,
    pub image: Option<ImageUpload>,
}

pub fn validate_stash_form(form: StashForm) -> Result<NewStashItem, AppError> {
    let name = required_text(form.name);
    let description = required_text(form.description);

    match (name, description) {
        (Some(name), Some(description)) => Ok(NewStashItem {
            name,
            description,
            image: ImageUpload::from_field(form.image),
        }),
        _ => Err(AppError::Validation(
            "Name and description are required".into(),
        )),
    }
}

impl From<stash_item::Model> for StashItem {
    fn from(m: stash_item::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            image_url: m.image_url,
            user_id: m.user_id,
            created_at: m.created_at,
        }
    }
}
