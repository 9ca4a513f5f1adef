//! Request extractors whose rejections render as [`AppError`].
//!
//! axum's own `Json` and `Path` reject with plain-text bodies. These
//! wrappers route every rejection through `AppError` so clients always
//! receive `{"detail": "..."}`.

use axum::{
    extract::{FromRequest, FromRequestParts, Path},
    http::request::Parts,
};

use voluntarios_core::VolunteerId;

use crate::error::{AppError, VOLUNTEER_NOT_FOUND_DETAIL};

/// JSON request body. Malformed or incomplete bodies answer 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Volunteer id taken from the `{id}` path segment.
///
/// Non-numeric segments answer 400. Integers outside the id range cannot
/// name a stored volunteer and answer 404, like any other unknown id.
#[derive(Debug, Clone, Copy)]
pub struct VolunteerPath(pub VolunteerId);

impl<S> FromRequestParts<S> for VolunteerPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<i64>::from_request_parts(parts, state).await?;

        i32::try_from(raw)
            .map(|id| Self(VolunteerId::new(id)))
            .map_err(|_| AppError::NotFound(VOLUNTEER_NOT_FOUND_DETAIL.to_string()))
    }
}
