// src/extractors.rs

use axum::{
    Json,
    extract::{FromRequest, Request},
};

use crate::error::AppError;

/// JSON body extractor whose rejection is an `AppError`, so a malformed body
/// gets the same `{"error": ...}` shape and a 400 like every other client error.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                tracing::warn!("Rejected JSON request body: {}", rejection);
                Err(AppError::from(rejection))
            }
        }
    }
}
