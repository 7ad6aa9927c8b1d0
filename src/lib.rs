//! # BizTime
//!
//! A small REST API tracking companies, the invoices issued to them and the
//! industries they belong to.
//!
//! ## Features
//!
//! - **Invoice payment tracking**: `paid_date` is stamped and cleared from
//!   the paid flag transition, see [`core::payment`]
//! - **Industry associations**: industries and their company links are
//!   written in one transaction
//! - **Pluggable storage**: an in-memory store and a Postgres store
//!   (`postgres` feature) behind the same service traits
//! - **Uniform errors**: every failure is a JSON `{code, message}` body
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use biztime::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     ServerBuilder::new()
//!         .with_store(InMemoryStore::new())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod handlers;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Domain types ===
    pub use crate::core::{
        BizError, BizResult, Company, CompanyDetail, CompanyIndustry, CompanyUpdate,
        FieldValidationError, Industry, IndustryAssociation, IndustryChange, IndustryDetail,
        IndustryListing, IndustryWrite, Invoice, InvoiceDetail, InvoiceSummary, InvoiceUpdate,
        NewCompany, NewInvoice, PaymentTransition, StorageError, resolve_paid_date, slugify,
    };

    // === Service traits ===
    pub use crate::core::{BizStore, CompanyService, IndustryService, InvoiceService};

    // === Validation ===
    pub use crate::core::validation::{PayloadRules, Validated, ValidatedPayload};

    // === Config / Server / Storage ===
    pub use crate::config::{AppConfig, Backend, DatabaseConfig};
    pub use crate::handlers::AppState;
    pub use crate::server::ServerBuilder;
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === External re-exports ===
    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use serde::{Deserialize, Serialize};
}
