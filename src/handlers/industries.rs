//! Industry endpoints
//!
//! Creates and updates always carry a `comp_code`: the industry row and its
//! company association are written in one transaction by the store.

use super::{AppState, MessageResponse};
use crate::core::validation::{PayloadRules, ValidatedPayload, Validated, filters, validators};
use crate::core::{BizError, BizResult, IndustryChange, IndustryWrite};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

fn text_field(rules: PayloadRules, field: &str) -> PayloadRules {
    rules
        .filter(field, filters::trim())
        .validate(field, validators::required())
        .validate(field, validators::string())
        .validate(field, validators::non_empty())
}

impl ValidatedPayload for IndustryWrite {
    fn rules() -> PayloadRules {
        ["code", "industry", "comp_code"]
            .into_iter()
            .fold(PayloadRules::new(), text_field)
    }
}

impl ValidatedPayload for IndustryChange {
    fn rules() -> PayloadRules {
        ["industry", "comp_code"]
            .into_iter()
            .fold(PayloadRules::new(), text_field)
    }
}

/// GET /industries
///
/// One row per industry/company pair.
pub async fn list_industries(State(state): State<AppState>) -> BizResult<Json<Value>> {
    let industries = state.store.list_industries().await?;
    Ok(Json(json!({ "industries": industries })))
}

/// GET /industries/{code}
pub async fn get_industry(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> BizResult<Json<Value>> {
    let industry = state
        .store
        .get_industry(&code)
        .await?
        .ok_or_else(|| BizError::industry_not_found(&code))?;
    Ok(Json(json!({ "industry": industry })))
}

/// POST /industries
pub async fn create_industry(
    State(state): State<AppState>,
    Validated(write): Validated<IndustryWrite>,
) -> BizResult<(StatusCode, Json<Value>)> {
    let industry = state.store.create_industry(write).await?;
    tracing::info!(code = %industry.code, comp_code = %industry.comp_code, "industry created");
    Ok((StatusCode::CREATED, Json(json!({ "industry": industry }))))
}

/// PUT /industries/{code}
pub async fn update_industry(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Validated(change): Validated<IndustryChange>,
) -> BizResult<Json<Value>> {
    let industry = state.store.update_industry(change.for_code(code)).await?;
    tracing::info!(code = %industry.code, comp_code = %industry.comp_code, "industry updated");
    Ok(Json(json!({ "industry": industry })))
}

/// DELETE /industries/{code}
pub async fn delete_industry(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> BizResult<Json<MessageResponse>> {
    state.store.delete_industry(&code).await?;
    tracing::info!(code = %code, "industry deleted");
    Ok(MessageResponse::deleted())
}
