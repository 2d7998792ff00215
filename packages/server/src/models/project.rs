use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use common::Project;

use super::shared::{ImageUpload, required_text};
use crate::entity::project;
use crate::error::AppError;

/// `multipart/form-data` body of `POST /api/projects`.
#[derive(TryFromMultipart, utoipa::ToSchema)]
pub struct ProjectForm {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Cover photo. Required.
    #[form_data(limit = "unlimited")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<FieldData<Bytes>>,
}

/// A project form that passed validation.
#[derive(Debug)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub image: ImageUpload,
}

pub fn validate_project_form(form: ProjectForm) -> Result<NewProject, AppError> {
    let name = required_text(form.name);
    let image = ImageUpload::from_field(form.image);

    match (name, image) {
        (Some(name), Some(image)) => Ok(NewProject {
            name,
            description: form.description.unwrap_or_default(),
            image,
        }),
        _ => Err(AppError::Validation("Name and image are required".into())),
    }
}

impl From<project::Model> for Project {
    fn from(m: project::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            image_url: m.image_url,
            user_id: m.user_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
