//! Invoice endpoints

use super::{AppState, MessageResponse};
use crate::core::validation::{PayloadRules, ValidatedPayload, Validated, filters, validators};
use crate::core::{BizError, BizResult, InvoiceUpdate, NewInvoice};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

impl ValidatedPayload for NewInvoice {
    fn rules() -> PayloadRules {
        PayloadRules::new()
            .filter("comp_code", filters::trim())
            .validate("comp_code", validators::required())
            .validate("comp_code", validators::string())
            .validate("comp_code", validators::non_empty())
            .validate("amt", validators::required())
            .validate("amt", validators::number())
            .validate("amt", validators::positive())
    }
}

impl ValidatedPayload for InvoiceUpdate {
    fn rules() -> PayloadRules {
        PayloadRules::new()
            .validate("amt", validators::required())
            .validate("amt", validators::number())
            .validate("amt", validators::positive())
            .validate("paid", validators::boolean())
    }
}

/// Parse the `{id}` path segment
fn invoice_id(raw: &str) -> BizResult<i32> {
    raw.parse()
        .map_err(|_| BizError::bad_request(format!("Invalid invoice id '{}'", raw)))
}

/// GET /invoices
pub async fn list_invoices(State(state): State<AppState>) -> BizResult<Json<Value>> {
    let invoices = state.store.list_invoices().await?;
    Ok(Json(json!({ "invoices": invoices })))
}

/// GET /invoices/{id}
///
/// The company is nested in place of `comp_code`.
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> BizResult<Json<Value>> {
    let id = invoice_id(&raw_id)?;
    let invoice = state
        .store
        .get_invoice(id)
        .await?
        .ok_or_else(|| BizError::invoice_not_found(id))?;
    Ok(Json(json!({ "invoice": invoice })))
}

/// POST /invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    Validated(invoice): Validated<NewInvoice>,
) -> BizResult<(StatusCode, Json<Value>)> {
    let invoice = state.store.create_invoice(invoice).await?;
    tracing::info!(id = invoice.id, comp_code = %invoice.comp_code, "invoice created");
    Ok((StatusCode::CREATED, Json(json!({ "invoice": invoice }))))
}

/// PUT /invoices/{id}
///
/// `paid_date` follows the paid flag: stamped on `false -> true`, cleared on
/// `true -> false`, kept otherwise.
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Validated(update): Validated<InvoiceUpdate>,
) -> BizResult<Json<Value>> {
    let id = invoice_id(&raw_id)?;
    let invoice = state.store.update_invoice(id, update).await?;
    tracing::debug!(id, paid = invoice.paid, paid_date = ?invoice.paid_date, "invoice updated");
    Ok(Json(json!({ "invoice": invoice })))
}

/// DELETE /invoices/{id}
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> BizResult<Json<MessageResponse>> {
    let id = invoice_id(&raw_id)?;
    state.store.delete_invoice(id).await?;
    tracing::info!(id, "invoice deleted");
    Ok(MessageResponse::deleted())
}
