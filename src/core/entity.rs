//! Entity records stored in the `companies`, `invoices` and `industries` tables
//!
//! Records mirror table rows one to one. Read views that join several tables
//! (`CompanyDetail`, `InvoiceDetail`) live next to the records they nest.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A company, keyed by a short client-facing code (e.g. "apple")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Company {
    /// Immutable key, supplied by the client or slugified from `name`
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// Fields for inserting a company, with `code` already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// Mutable company fields; the code never changes
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompanyUpdate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Company with its invoices and the industries it belongs to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub invoices: Vec<Invoice>,
    pub industries: Vec<Industry>,
}

/// An invoice row
///
/// `paid_date` is `Some` exactly when `paid` is true. Only the payment
/// transition logic in [`crate::core::payment`] decides its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

/// List view of an invoice
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

impl From<&Invoice> for InvoiceSummary {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            comp_code: invoice.comp_code.clone(),
        }
    }
}

/// Invoice with its company nested in place of `comp_code`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDetail {
    pub id: i32,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub company: Company,
}

impl InvoiceDetail {
    pub fn new(invoice: Invoice, company: Company) -> Self {
        Self {
            id: invoice.id,
            amt: invoice.amt,
            paid: invoice.paid,
            add_date: invoice.add_date,
            paid_date: invoice.paid_date,
            company,
        }
    }
}

/// Fields for a new invoice; `paid`, `add_date` and `paid_date` are set by storage
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewInvoice {
    pub comp_code: String,
    pub amt: f64,
}

/// Requested invoice change
///
/// When `paid` is omitted the current flag is kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvoiceUpdate {
    pub amt: f64,
    #[serde(default)]
    pub paid: Option<bool>,
}

/// An industry row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Industry {
    pub code: String,
    pub industry: String,
}
