//! Axum extractor for validated request bodies
//!
//! `Validated<T>` reads the JSON body, runs the filters and validators that
//! `T` declares, and only then deserializes into `T`. Every failure becomes a
//! `BizError::BadRequest`, so malformed bodies share the API error shape.

use super::config::PayloadRules;
use crate::core::error::BizError;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Trait for request bodies that declare validation rules
pub trait ValidatedPayload: DeserializeOwned {
    fn rules() -> PayloadRules;
}

/// Axum extractor that validates and filters the request body into `T`
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_invoice(
///     State(state): State<AppState>,
///     Validated(invoice): Validated<NewInvoice>,
/// ) -> BizResult<Json<Value>> {
///     // invoice.amt is known to be positive here
/// }
/// ```
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatedPayload,
{
    type Rejection = BizError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<Value> = Json::from_request(req, state).await?;

        let filtered = T::rules()
            .validate_and_filter(payload)
            .map_err(BizError::invalid_fields)?;

        Ok(Validated(serde_json::from_value(filtered)?))
    }
}
