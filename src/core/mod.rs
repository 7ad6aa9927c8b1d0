//! Core module containing the domain records, business rules and service traits

pub mod entity;
pub mod error;
pub mod link;
pub mod payment;
pub mod service;
pub mod slug;
pub mod validation;

pub use entity::{
    Company, CompanyDetail, CompanyUpdate, Industry, Invoice, InvoiceDetail, InvoiceSummary,
    InvoiceUpdate, NewCompany, NewInvoice,
};
pub use error::{BizError, BizResult, FieldValidationError, StorageError};
pub use link::{
    CompanyIndustry, IndustryAssociation, IndustryChange, IndustryDetail, IndustryListing,
    IndustryWrite,
};
pub use payment::{PaymentTransition, resolve_paid_date};
pub use service::{BizStore, CompanyService, IndustryService, InvoiceService};
pub use slug::slugify;
