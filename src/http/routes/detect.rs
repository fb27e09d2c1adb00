use crate::domain::model::RawImage;
use crate::http::auth::CurrentUser;
use crate::http::error::ApiError;
use crate::http::extract::{multipart_error, ApiMultipart};
use crate::http::AppState;
use crate::utils::error::AppError;
use axum::extract::multipart::MultipartError;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

const IMAGE_FIELD: &str = "image_file";
const LANGUAGE_FIELD: &str = "language";
const DEFAULT_LANGUAGE: &str = "English";

#[derive(Debug, Serialize)]
pub struct DetectionResponse {
    pub disease: String,
    pub cure_localized: String,
    pub language: String,
}

pub async fn detect_disease(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    ApiMultipart(mut multipart): ApiMultipart,
) -> Result<Json<DetectionResponse>, ApiError> {
    let mut image: Option<RawImage> = None;
    let mut language = DEFAULT_LANGUAGE.to_string();
    let bad_form = |err: MultipartError| multipart_error(err, state.upload_limit);

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(IMAGE_FIELD) => {
                let content_type = field.content_type().map(str::to_string);
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad_form)?;
                image = Some(RawImage {
                    bytes: bytes.to_vec(),
                    content_type,
                    file_name,
                });
            }
            Some(LANGUAGE_FIELD) => {
                let text = field.text().await.map_err(bad_form)?;
                if !text.trim().is_empty() {
                    language = text.trim().to_string();
                }
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::BadRequest {
        message: format!("Missing '{}' file field.", IMAGE_FIELD),
    })?;

    tracing::info!(
        user_id = identity.id,
        bytes = image.bytes.len(),
        file_name = image.file_name.as_deref().unwrap_or("-"),
        %language,
        "Disease detection requested"
    );

    let report = state.service.detect(&identity, image, &language).await?;

    Ok(Json(DetectionResponse {
        disease: report.display_label,
        cure_localized: report.cure_text,
        language: report.language,
    }))
}
