use crate::http::error::ApiError;
use crate::utils::error::AppError;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::Json;

/// `Json<T>` whose rejection renders as `{ "detail": ... }`.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError(AppError::BadRequest {
                message: rejection.body_text(),
            })),
        }
    }
}

/// `Multipart` whose rejection renders as `{ "detail": ... }`.
pub struct ApiMultipart(pub Multipart);

impl<S> FromRequest<S> for ApiMultipart
where
    Multipart: FromRequest<S, Rejection = MultipartRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(ApiMultipart)
            .map_err(|rejection| {
                ApiError(AppError::BadRequest {
                    message: format!("Expected a multipart form upload: {}", rejection.body_text()),
                })
            })
    }
}

/// Field-level multipart failure; the body limit keeps its 413.
pub fn multipart_error(err: MultipartError, upload_limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError(AppError::PayloadTooLarge {
            limit_bytes: upload_limit,
        });
    }
    ApiError(AppError::BadRequest {
        message: format!("Malformed multipart form: {}", err.body_text()),
    })
}
