//! In-memory storage backend for testing and development
//!
//! All four tables live behind one `RwLock`. Writes go through
//! [`InMemoryStore::transaction`], which stages changes on a copy of the
//! tables and swaps the copy in only when the closure succeeds, so a failing
//! multi-step write leaves nothing behind.

use crate::core::payment::{self, resolve_paid_date};
use crate::core::{
    BizError, BizResult, Company, CompanyDetail, CompanyIndustry, CompanyService, CompanyUpdate,
    Industry, IndustryAssociation, IndustryDetail, IndustryListing, IndustryService, IndustryWrite,
    Invoice, InvoiceDetail, InvoiceService, InvoiceSummary, InvoiceUpdate, NewCompany, NewInvoice,
    StorageError,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default)]
struct Tables {
    companies: BTreeMap<String, Company>,
    invoices: BTreeMap<i32, Invoice>,
    industries: BTreeMap<String, Industry>,
    company_industries: BTreeSet<CompanyIndustry>,
    last_invoice_id: i32,
}

impl Tables {
    fn industries_of(&self, comp_code: &str) -> Vec<Industry> {
        self.company_industries
            .iter()
            .filter(|link| link.comp_code == comp_code)
            .filter_map(|link| self.industries.get(&link.ind_code).cloned())
            .collect()
    }

    fn companies_of(&self, ind_code: &str) -> Vec<String> {
        self.company_industries
            .iter()
            .filter(|link| link.ind_code == ind_code)
            .map(|link| link.comp_code.clone())
            .collect()
    }

    fn is_referenced(&self, comp_code: &str) -> bool {
        self.invoices.values().any(|i| i.comp_code == comp_code)
            || self
                .company_industries
                .iter()
                .any(|link| link.comp_code == comp_code)
    }
}

/// In-memory store implementing every service trait
///
/// Cloning is cheap and clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read<R>(&self, f: impl FnOnce(&Tables) -> BizResult<R>) -> BizResult<R> {
        let tables = self
            .tables
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        f(&tables)
    }

    /// Run `f` as one atomic unit
    ///
    /// The write lock is held for the whole closure, serializing writers the
    /// way a row lock would. Changes become visible only if `f` returns `Ok`.
    fn transaction<R>(&self, f: impl FnOnce(&mut Tables) -> BizResult<R>) -> BizResult<R> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        let mut staged = tables.clone();
        let out = f(&mut staged)?;
        *tables = staged;
        Ok(out)
    }
}

#[async_trait]
impl CompanyService for InMemoryStore {
    async fn list_companies(&self) -> BizResult<Vec<Company>> {
        self.read(|t| Ok(t.companies.values().cloned().collect()))
    }

    async fn get_company(&self, code: &str) -> BizResult<Option<CompanyDetail>> {
        self.read(|t| {
            Ok(t.companies.get(code).map(|company| CompanyDetail {
                company: company.clone(),
                invoices: t
                    .invoices
                    .values()
                    .filter(|i| i.comp_code == code)
                    .cloned()
                    .collect(),
                industries: t.industries_of(code),
            }))
        })
    }

    async fn create_company(&self, company: NewCompany) -> BizResult<Company> {
        self.transaction(|t| {
            if t.companies.contains_key(&company.code) {
                return Err(BizError::company_exists(&company.code));
            }
            let created = Company {
                code: company.code,
                name: company.name,
                description: company.description,
            };
            t.companies.insert(created.code.clone(), created.clone());
            Ok(created)
        })
    }

    async fn update_company(&self, code: &str, update: CompanyUpdate) -> BizResult<Company> {
        self.transaction(|t| {
            let company = t
                .companies
                .get_mut(code)
                .ok_or_else(|| BizError::company_not_found(code))?;
            company.name = update.name;
            company.description = update.description;
            Ok(company.clone())
        })
    }

    async fn delete_company(&self, code: &str) -> BizResult<()> {
        self.transaction(|t| {
            if !t.companies.contains_key(code) {
                return Err(BizError::company_not_found(code));
            }
            if t.is_referenced(code) {
                return Err(BizError::company_in_use(code));
            }
            t.companies.remove(code);
            Ok(())
        })
    }
}

#[async_trait]
impl InvoiceService for InMemoryStore {
    async fn list_invoices(&self) -> BizResult<Vec<InvoiceSummary>> {
        self.read(|t| Ok(t.invoices.values().map(InvoiceSummary::from).collect()))
    }

    async fn get_invoice(&self, id: i32) -> BizResult<Option<InvoiceDetail>> {
        self.read(|t| {
            let Some(invoice) = t.invoices.get(&id) else {
                return Ok(None);
            };
            let company = t.companies.get(&invoice.comp_code).cloned().ok_or_else(|| {
                StorageError::Query {
                    backend: "in-memory",
                    message: format!("invoice {} references a missing company", id),
                }
            })?;
            Ok(Some(InvoiceDetail::new(invoice.clone(), company)))
        })
    }

    async fn create_invoice(&self, invoice: NewInvoice) -> BizResult<Invoice> {
        if invoice.amt <= 0.0 {
            return Err(BizError::invalid_amount(invoice.amt));
        }
        self.transaction(|t| {
            if !t.companies.contains_key(&invoice.comp_code) {
                return Err(BizError::unknown_company(&invoice.comp_code));
            }
            t.last_invoice_id += 1;
            let created = Invoice {
                id: t.last_invoice_id,
                comp_code: invoice.comp_code,
                amt: invoice.amt,
                paid: false,
                add_date: payment::today(),
                paid_date: None,
            };
            t.invoices.insert(created.id, created.clone());
            Ok(created)
        })
    }

    async fn update_invoice(&self, id: i32, update: InvoiceUpdate) -> BizResult<Invoice> {
        if update.amt <= 0.0 {
            return Err(BizError::invalid_amount(update.amt));
        }
        self.transaction(|t| {
            let invoice = t
                .invoices
                .get_mut(&id)
                .ok_or_else(|| BizError::invoice_not_found(id))?;
            let requested = update.paid.unwrap_or(invoice.paid);
            invoice.paid_date =
                resolve_paid_date(invoice.paid, invoice.paid_date, requested, payment::today());
            invoice.paid = requested;
            invoice.amt = update.amt;
            Ok(invoice.clone())
        })
    }

    async fn delete_invoice(&self, id: i32) -> BizResult<()> {
        self.transaction(|t| {
            t.invoices
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| BizError::invoice_not_found(id))
        })
    }
}

#[async_trait]
impl IndustryService for InMemoryStore {
    async fn list_industries(&self) -> BizResult<Vec<IndustryListing>> {
        self.read(|t| {
            let mut rows = Vec::new();
            for industry in t.industries.values() {
                let companies = t.companies_of(&industry.code);
                if companies.is_empty() {
                    rows.push(IndustryListing {
                        code: industry.code.clone(),
                        industry: industry.industry.clone(),
                        comp_code: None,
                    });
                }
                rows.extend(companies.into_iter().map(|comp_code| IndustryListing {
                    code: industry.code.clone(),
                    industry: industry.industry.clone(),
                    comp_code: Some(comp_code),
                }));
            }
            Ok(rows)
        })
    }

    async fn get_industry(&self, code: &str) -> BizResult<Option<IndustryDetail>> {
        self.read(|t| {
            Ok(t.industries.get(code).map(|industry| IndustryDetail {
                code: industry.code.clone(),
                industry: industry.industry.clone(),
                companies: t.companies_of(code),
            }))
        })
    }

    async fn create_industry(&self, write: IndustryWrite) -> BizResult<IndustryAssociation> {
        self.transaction(|t| {
            if t.industries.contains_key(&write.code) {
                return Err(BizError::industry_exists(&write.code));
            }
            t.industries.insert(
                write.code.clone(),
                Industry {
                    code: write.code.clone(),
                    industry: write.industry.clone(),
                },
            );

            if !t.companies.contains_key(&write.comp_code) {
                return Err(BizError::unknown_company(&write.comp_code));
            }
            if !t
                .company_industries
                .insert(CompanyIndustry::new(&write.comp_code, &write.code))
            {
                return Err(BizError::association_exists(&write.comp_code, &write.code));
            }

            Ok(IndustryAssociation::new(
                &write.code,
                &write.industry,
                &write.comp_code,
            ))
        })
    }

    async fn update_industry(&self, write: IndustryWrite) -> BizResult<IndustryAssociation> {
        self.transaction(|t| {
            let industry = t
                .industries
                .get_mut(&write.code)
                .ok_or_else(|| BizError::industry_not_found(&write.code))?;
            industry.industry = write.industry.clone();

            if !t.companies.contains_key(&write.comp_code) {
                return Err(BizError::unknown_company(&write.comp_code));
            }
            // Existing pair: no-op
            t.company_industries
                .insert(CompanyIndustry::new(&write.comp_code, &write.code));

            Ok(IndustryAssociation::new(
                &write.code,
                &write.industry,
                &write.comp_code,
            ))
        })
    }

    async fn delete_industry(&self, code: &str) -> BizResult<()> {
        self.transaction(|t| {
            t.company_industries.retain(|link| link.ind_code != code);
            t.industries
                .remove(code)
                .map(|_| ())
                .ok_or_else(|| BizError::industry_not_found(code))
        })
    }
}
