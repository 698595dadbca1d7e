//! Airport image upload handler
//!
//! Flow: parse the multipart form, require an `image` file part and a `name`
//! field, write the image to the object store as `"<name>-<filename>"`, then
//! point the matching catalog record at the new URL.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

const FORM_ERROR: &str = "Unable to parse form";
const MISSING_FILE: &str = "Error retrieving the file";
const MISSING_NAME: &str = "Airport name is required";
const NOT_FOUND: &str = "Airport not found";

/// Response for a successful upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadImageResponse {
    pub message: String,
    pub image_url: String,
}

/// The uploaded `image` part, fully buffered
struct ImagePart {
    file_name: String,
    content_type: Option<String>,
    content: Bytes,
}

#[derive(Default)]
struct UploadForm {
    image: Option<ImagePart>,
    name: Option<String>,
}

fn form_error(err: MultipartError) -> ApiError {
    tracing::debug!(error = %err, "Failed to read multipart body");
    ApiError::BadRequest(FORM_ERROR.to_string())
}

/// Last `/`-separated element of an uploaded filename
///
/// Trailing slashes are dropped first, so `"dir/"` gives `"dir"` and a name of
/// only slashes gives `"/"`. Backslashes are ordinary filename characters.
fn base_file_name(raw: &str) -> &str {
    if raw.is_empty() {
        return raw;
    }
    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Read every part of the form; the body limit layer caps the total size
///
/// The first `image` part carrying a filename and the first `name` field win.
async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("image") => {
                let file_name = field
                    .file_name()
                    .map(base_file_name)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let content = field.bytes().await.map_err(form_error)?;

                if form.image.is_none() {
                    form.image = file_name.map(|file_name| ImagePart {
                        file_name,
                        content_type,
                        content,
                    });
                }
            }
            Some("name") => {
                let value = field.text().await.map_err(form_error)?;
                if form.name.is_none() {
                    form.name = Some(value);
                }
            }
            _ => {
                // Unknown parts are read and discarded so they still count
                // towards the body limit
                field.bytes().await.map_err(form_error)?;
            }
        }
    }

    Ok(form)
}

/// POST /update_airport_image
/// Upload an airport image and update the airport's image URL
pub async fn update_airport_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadImageResponse>, ApiError> {
    let multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Rejected upload request");
        ApiError::BadRequest(FORM_ERROR.to_string())
    })?;

    let form = read_form(multipart).await?;

    let image = form
        .image
        .ok_or_else(|| ApiError::BadRequest(MISSING_FILE.to_string()))?;

    let name = form
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::BadRequest(MISSING_NAME.to_string()))?;

    let settings = state.upload();
    if settings.precheck_name && !state.catalog().contains(&name) {
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    let object_key = format!("{}-{}", name, image.file_name);
    let size = image.content.len();

    let image_url = state
        .object_store()
        .write(
            &settings.bucket,
            &object_key,
            image.content,
            image.content_type.as_deref(),
        )
        .await
        .map_err(|e| {
            tracing::error!(
                backend = state.object_store().kind(),
                bucket = %settings.bucket,
                object_key = %object_key,
                error = %e,
                "Image upload failed"
            );
            ApiError::from(e)
        })?;

    if !state.catalog().update_image_url(&name, &image_url) {
        tracing::warn!(
            bucket = %settings.bucket,
            object_key = %object_key,
            "Uploaded object is not referenced by any airport"
        );
        return Err(ApiError::NotFound(NOT_FOUND.to_string()));
    }

    tracing::info!(
        airport = %name,
        object_key = %object_key,
        size,
        "Airport image updated"
    );

    Ok(Json(UploadImageResponse {
        message: "Image uploaded successfully".to_string(),
        image_url,
    }))
}
