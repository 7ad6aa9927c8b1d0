//! Company/industry associations
//!
//! An association is a `(comp_code, ind_code)` row in `company_industries`.
//! It has no lifecycle of its own: rows are written and removed only as a
//! side effect of industry operations.

use serde::{Deserialize, Serialize};

/// A row of `company_industries`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct CompanyIndustry {
    pub comp_code: String,
    pub ind_code: String,
}

impl CompanyIndustry {
    pub fn new(comp_code: impl Into<String>, ind_code: impl Into<String>) -> Self {
        Self {
            comp_code: comp_code.into(),
            ind_code: ind_code.into(),
        }
    }
}

/// Body of an industry create: the industry and the company to link it to
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndustryWrite {
    pub code: String,
    pub industry: String,
    pub comp_code: String,
}

/// Body of an industry update; the code comes from the path
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndustryChange {
    pub industry: String,
    pub comp_code: String,
}

impl IndustryChange {
    pub fn for_code(self, code: impl Into<String>) -> IndustryWrite {
        IndustryWrite {
            code: code.into(),
            industry: self.industry,
            comp_code: self.comp_code,
        }
    }
}

/// Result of an association write: the industry merged with the link row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryAssociation {
    pub code: String,
    pub industry: String,
    pub comp_code: String,
    pub ind_code: String,
}

impl IndustryAssociation {
    pub fn new(code: &str, industry: &str, comp_code: &str) -> Self {
        Self {
            code: code.to_string(),
            industry: industry.to_string(),
            comp_code: comp_code.to_string(),
            ind_code: code.to_string(),
        }
    }
}

/// One row of `industries LEFT JOIN company_industries`
///
/// Industries without any company appear once with `comp_code: null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct IndustryListing {
    pub code: String,
    pub industry: String,
    pub comp_code: Option<String>,
}

/// Industry with the codes of every associated company
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryDetail {
    pub code: String,
    pub industry: String,
    pub companies: Vec<String>,
}
