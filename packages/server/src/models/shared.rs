use axum::body::Bytes;
use axum_typed_multipart::FieldData;
use serde::Deserialize;

/// Query string accepted by list endpoints.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Case-sensitive substring matched against name or description.
    pub q: Option<String>,
}

/// An uploaded image that passed the presence checks.
#[derive(Debug)]
pub struct ImageUpload {
    pub original_name: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Accept a multipart file only if it carries bytes and a real filename.
    ///
    /// Browsers submit an empty part (`filename=""`, zero bytes) when the
    /// file input is left blank; some clients send the literal name
    /// `"undefined"`. Both count as "no image".
    pub fn from_field(field: Option<FieldData<Bytes>>) -> Option<Self> {
        let field = field?;
        let name = field.metadata.file_name?;
        if name.trim().is_empty() || name == "undefined" || field.contents.is_empty() {
            return None;
        }
        Some(Self {
            original_name: name,
            bytes: field.contents,
        })
    }
}

/// Trimmed non-empty text, or `None`.
pub fn required_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
