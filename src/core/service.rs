//! Service traits for company, invoice and industry storage
//!
//! Handlers only ever talk to these traits, so any backend (in-memory,
//! PostgreSQL) can be injected at startup. Every operation returns a
//! [`BizResult`]: business failures such as "zero rows affected" come back as
//! `BizError::NotFound` values rather than as opaque errors.

use crate::core::entity::{
    Company, CompanyDetail, CompanyUpdate, Invoice, InvoiceDetail, InvoiceSummary, InvoiceUpdate,
    NewCompany, NewInvoice,
};
use crate::core::error::BizResult;
use crate::core::link::{IndustryAssociation, IndustryDetail, IndustryListing, IndustryWrite};
use async_trait::async_trait;

/// Company CRUD
#[async_trait]
pub trait CompanyService: Send + Sync {
    /// List all companies
    async fn list_companies(&self) -> BizResult<Vec<Company>>;

    /// Get a company with its invoices and industries
    async fn get_company(&self, code: &str) -> BizResult<Option<CompanyDetail>>;

    /// Insert a company; `Conflict` if the code is taken
    async fn create_company(&self, company: NewCompany) -> BizResult<Company>;

    /// Update name and description; `NotFound` if no row matched
    async fn update_company(&self, code: &str, update: CompanyUpdate) -> BizResult<Company>;

    /// Delete a company
    ///
    /// `NotFound` if no row matched, `Conflict` while invoices or industry
    /// associations still reference it.
    async fn delete_company(&self, code: &str) -> BizResult<()>;
}

/// Invoice CRUD with payment transitions
#[async_trait]
pub trait InvoiceService: Send + Sync {
    /// List all invoices as `(id, comp_code)` pairs
    async fn list_invoices(&self) -> BizResult<Vec<InvoiceSummary>>;

    /// Get an invoice with its company
    async fn get_invoice(&self, id: i32) -> BizResult<Option<InvoiceDetail>>;

    /// Insert an unpaid invoice dated today
    ///
    /// `BadRequest` if the company does not exist or the amount is not positive.
    async fn create_invoice(&self, invoice: NewInvoice) -> BizResult<Invoice>;

    /// Change the amount and, optionally, the paid flag
    ///
    /// The stored row is read under lock and `paid_date` is recomputed with
    /// [`crate::core::payment::resolve_paid_date`] in the same transaction.
    async fn update_invoice(&self, id: i32, update: InvoiceUpdate) -> BizResult<Invoice>;

    /// Delete an invoice; `NotFound` if no row matched
    async fn delete_invoice(&self, id: i32) -> BizResult<()>;
}

/// Industry storage and the association write protocol
///
/// Multi-statement writes run in one transaction: either every statement
/// commits or none does.
#[async_trait]
pub trait IndustryService: Send + Sync {
    /// One row per industry/company pair, industries without companies included
    async fn list_industries(&self) -> BizResult<Vec<IndustryListing>>;

    /// Get an industry with its company codes
    async fn get_industry(&self, code: &str) -> BizResult<Option<IndustryDetail>>;

    /// Insert the industry, then link it to `comp_code`
    ///
    /// `Conflict` if the industry or the link exists, `BadRequest` if the
    /// company does not exist. Nothing persists on failure.
    async fn create_industry(&self, write: IndustryWrite) -> BizResult<IndustryAssociation>;

    /// Rename the industry, then link it to `comp_code` if not linked yet
    ///
    /// `NotFound` if the industry does not exist. Re-linking an existing pair
    /// is a no-op.
    async fn update_industry(&self, write: IndustryWrite) -> BizResult<IndustryAssociation>;

    /// Remove every link of the industry, then the industry itself
    async fn delete_industry(&self, code: &str) -> BizResult<()>;
}

/// A complete storage backend
pub trait BizStore: CompanyService + InvoiceService + IndustryService {}

impl<T> BizStore for T where T: CompanyService + InvoiceService + IndustryService {}
