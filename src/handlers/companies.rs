//! Company endpoints

use super::{AppState, MessageResponse};
use crate::core::validation::{PayloadRules, ValidatedPayload, Validated, filters, validators};
use crate::core::{BizError, BizResult, Company, CompanyUpdate, NewCompany, slugify};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Body of POST /companies
///
/// `code` may be omitted; it is then derived from `name`.
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateCompanyRequest {
    /// Resolve the company code, slugifying the name when none was given
    pub fn into_new_company(self) -> BizResult<NewCompany> {
        let code = match self.code {
            Some(code) if !code.is_empty() => code,
            _ => slugify(&self.name),
        };
        if code.is_empty() {
            return Err(BizError::bad_request(format!(
                "Cannot derive a company code from name '{}'",
                self.name
            )));
        }
        Ok(NewCompany {
            code,
            name: self.name,
            description: self.description,
        })
    }
}

impl ValidatedPayload for CreateCompanyRequest {
    fn rules() -> PayloadRules {
        PayloadRules::new()
            .filter("code", filters::trim())
            .filter("name", filters::trim())
            .validate("code", validators::string())
            .validate("name", validators::required())
            .validate("name", validators::string())
            .validate("name", validators::non_empty())
            .validate("description", validators::string())
    }
}

impl ValidatedPayload for CompanyUpdate {
    fn rules() -> PayloadRules {
        PayloadRules::new()
            .filter("name", filters::trim())
            .validate("name", validators::required())
            .validate("name", validators::string())
            .validate("name", validators::non_empty())
            .validate("description", validators::string())
    }
}

/// GET /companies
pub async fn list_companies(State(state): State<AppState>) -> BizResult<Json<Value>> {
    let companies = state.store.list_companies().await?;
    Ok(Json(json!({ "companies": companies })))
}

/// GET /companies/{code}
///
/// Includes the company's invoices and industries.
pub async fn get_company(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> BizResult<Json<Value>> {
    let company = state
        .store
        .get_company(&code)
        .await?
        .ok_or_else(|| BizError::company_not_found(&code))?;
    Ok(Json(json!({ "company": company })))
}

/// POST /companies
pub async fn create_company(
    State(state): State<AppState>,
    Validated(request): Validated<CreateCompanyRequest>,
) -> BizResult<(StatusCode, Json<Company>)> {
    let company = state
        .store
        .create_company(request.into_new_company()?)
        .await?;
    tracing::info!(code = %company.code, "company created");
    Ok((StatusCode::CREATED, Json(company)))
}

/// PUT /companies/{code}
///
/// An unknown code is reported as 400, not 404.
pub async fn update_company(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Validated(update): Validated<CompanyUpdate>,
) -> BizResult<Json<Value>> {
    let company = state
        .store
        .update_company(&code, update)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                BizError::bad_request(format!(
                    "Couldn't update company with code '{}' because no such company exists",
                    code
                ))
            } else {
                e
            }
        })?;
    Ok(Json(json!({ "company": company })))
}

/// DELETE /companies/{code}
pub async fn delete_company(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> BizResult<Json<MessageResponse>> {
    state
        .store
        .delete_company(&code)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                BizError::not_found(format!(
                    "Couldn't delete company with code '{}' because it doesn't exist",
                    code
                ))
            } else {
                e
            }
        })?;
    tracing::info!(code = %code, "company deleted");
    Ok(MessageResponse::deleted())
}
