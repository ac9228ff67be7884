//! JSON body extractor that runs `validator` rules.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use blockshare_core::error::AppError;

use crate::error::ApiError;

/// Like [`Json`], but rejects bodies failing their `#[validate]` rules with
/// a 400 carrying per-field details.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        if let Err(errors) = value.validate() {
            let details = serde_json::to_value(&errors).unwrap_or_default();
            return Err(ApiError::from(AppError::validation("Request body failed validation"))
                .with_details(details));
        }

        Ok(ValidatedJson(value))
    }
}
