//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresStore`, implementing every service trait on top of a
//! `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! biztime = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Transactions
//!
//! Multi-statement writes use `pool.begin()`. A `sqlx::Transaction` that is
//! dropped without `commit()` rolls back, so every early `return Err(..)` or
//! `?` inside a write path discards the statements already executed.
//!
//! # Schema
//!
//! Tables are created by the migrations in `migrations/`, applied with
//! [`PostgresStore::migrate`].

use crate::core::payment::{self, resolve_paid_date};
use crate::core::{
    BizError, BizResult, Company, CompanyDetail, CompanyIndustry, CompanyService, CompanyUpdate,
    Industry, IndustryAssociation, IndustryDetail, IndustryListing, IndustryService, IndustryWrite,
    Invoice, InvoiceDetail, InvoiceService, InvoiceSummary, InvoiceUpdate, NewCompany, NewInvoice,
    StorageError,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

const BACKEND: &str = "PostgreSQL";

const INVOICE_COLUMNS: &str = "id, comp_code, amt, paid, add_date, paid_date";

// ---------------------------------------------------------------------------
// Error classification
// ---------------------------------------------------------------------------

/// Constraint class of a failed statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
    Unique,
    ForeignKey,
    Check,
}

impl Violation {
    fn of(err: &sqlx::Error) -> Option<Self> {
        let db = err.as_database_error()?;
        if db.is_unique_violation() {
            Some(Violation::Unique)
        } else if db.is_foreign_key_violation() {
            Some(Violation::ForeignKey)
        } else if db.is_check_violation() {
            Some(Violation::Check)
        } else {
            None
        }
    }
}

/// Map a sqlx error onto the API taxonomy
///
/// `expected` turns the constraint violations a statement can legitimately
/// hit into business errors. Anything else is a storage fault.
fn classify(err: sqlx::Error, expected: impl FnOnce(Violation) -> Option<BizError>) -> BizError {
    if let Some(mapped) = Violation::of(&err).and_then(expected) {
        return mapped;
    }
    query_error(err)
}

fn query_error(err: sqlx::Error) -> BizError {
    StorageError::Query {
        backend: BACKEND,
        message: err.to_string(),
    }
    .into()
}

fn connection_error(err: sqlx::Error) -> StorageError {
    StorageError::Connection {
        backend: BACKEND,
        message: err.to_string(),
    }
}

fn transaction_error(err: sqlx::Error) -> BizError {
    StorageError::Transaction {
        message: err.to_string(),
    }
    .into()
}

// ---------------------------------------------------------------------------
// PostgresStore
// ---------------------------------------------------------------------------

/// Storage backend over the `companies`, `invoices`, `industries` and
/// `company_industries` tables.
///
/// # Example
///
/// ```rust,ignore
/// use biztime::storage::PostgresStore;
///
/// let store = PostgresStore::connect("postgres://localhost/biztime", 5).await?;
/// store.migrate().await?;
/// let companies = store.list_companies().await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new `PostgresStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url`
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let options = url.parse().map_err(connection_error)?;
        Self::connect_with(options, max_connections).await
    }

    /// Open a pool from prepared connection options
    pub async fn connect_with(
        options: PgConnectOptions,
        max_connections: u32,
    ) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(connection_error)?;
        Ok(Self::new(pool))
    }

    /// Apply the embedded migrations (idempotent)
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Schema {
                message: e.to_string(),
            })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CompanyService for PostgresStore {
    async fn list_companies(&self) -> BizResult<Vec<Company>> {
        sqlx::query_as::<_, Company>(
            "SELECT code, name, description FROM companies ORDER BY code",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)
    }

    async fn get_company(&self, code: &str) -> BizResult<Option<CompanyDetail>> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT code, name, description FROM companies WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        let Some(company) = company else {
            return Ok(None);
        };

        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE comp_code = $1 ORDER BY id"
        ))
        .bind(code)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        let industries = sqlx::query_as::<_, Industry>(
            "SELECT i.code, i.industry \
             FROM industries AS i \
             JOIN company_industries AS ci ON ci.ind_code = i.code \
             WHERE ci.comp_code = $1 \
             ORDER BY i.code",
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(Some(CompanyDetail {
            company,
            invoices,
            industries,
        }))
    }

    async fn create_company(&self, company: NewCompany) -> BizResult<Company> {
        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (code, name, description) \
             VALUES ($1, $2, $3) \
             RETURNING code, name, description",
        )
        .bind(&company.code)
        .bind(&company.name)
        .bind(&company.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            classify(e, |v| {
                (v == Violation::Unique).then(|| BizError::company_exists(&company.code))
            })
        })
    }

    async fn update_company(&self, code: &str, update: CompanyUpdate) -> BizResult<Company> {
        sqlx::query_as::<_, Company>(
            "UPDATE companies SET name = $1, description = $2 \
             WHERE code = $3 \
             RETURNING code, name, description",
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?
        .ok_or_else(|| BizError::company_not_found(code))
    }

    async fn delete_company(&self, code: &str) -> BizResult<()> {
        let result = sqlx::query("DELETE FROM companies WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                classify(e, |v| {
                    (v == Violation::ForeignKey).then(|| BizError::company_in_use(code))
                })
            })?;

        if result.rows_affected() == 0 {
            return Err(BizError::company_not_found(code));
        }
        Ok(())
    }
}

/// `invoices JOIN companies` row
#[derive(sqlx::FromRow)]
struct InvoiceDetailRow {
    id: i32,
    amt: f64,
    paid: bool,
    add_date: NaiveDate,
    paid_date: Option<NaiveDate>,
    comp_code: String,
    name: String,
    description: Option<String>,
}

impl From<InvoiceDetailRow> for InvoiceDetail {
    fn from(row: InvoiceDetailRow) -> Self {
        InvoiceDetail {
            id: row.id,
            amt: row.amt,
            paid: row.paid,
            add_date: row.add_date,
            paid_date: row.paid_date,
            company: Company {
                code: row.comp_code,
                name: row.name,
                description: row.description,
            },
        }
    }
}

#[async_trait]
impl InvoiceService for PostgresStore {
    async fn list_invoices(&self) -> BizResult<Vec<InvoiceSummary>> {
        sqlx::query_as::<_, InvoiceSummary>("SELECT id, comp_code FROM invoices ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(query_error)
    }

    async fn get_invoice(&self, id: i32) -> BizResult<Option<InvoiceDetail>> {
        let row = sqlx::query_as::<_, InvoiceDetailRow>(
            "SELECT i.id, i.amt, i.paid, i.add_date, i.paid_date, \
                    c.code AS comp_code, c.name, c.description \
             FROM invoices AS i \
             JOIN companies AS c ON i.comp_code = c.code \
             WHERE i.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(row.map(InvoiceDetail::from))
    }

    async fn create_invoice(&self, invoice: NewInvoice) -> BizResult<Invoice> {
        sqlx::query_as::<_, Invoice>(&format!(
            "INSERT INTO invoices (comp_code, amt, paid, add_date, paid_date) \
             VALUES ($1, $2, false, $3, NULL) \
             RETURNING {INVOICE_COLUMNS}"
        ))
        .bind(&invoice.comp_code)
        .bind(invoice.amt)
        .bind(payment::today())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            classify(e, |v| match v {
                Violation::ForeignKey => Some(BizError::unknown_company(&invoice.comp_code)),
                Violation::Check => Some(BizError::invalid_amount(invoice.amt)),
                Violation::Unique => None,
            })
        })
    }

    async fn update_invoice(&self, id: i32, update: InvoiceUpdate) -> BizResult<Invoice> {
        let mut tx = self.pool.begin().await.map_err(transaction_error)?;

        // Row lock: a concurrent transition waits until this one commits
        let current: Option<(bool, Option<NaiveDate>)> =
            sqlx::query_as("SELECT paid, paid_date FROM invoices WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(query_error)?;

        let Some((paid, paid_date)) = current else {
            return Err(BizError::invoice_not_found(id));
        };

        let requested = update.paid.unwrap_or(paid);
        let new_paid_date = resolve_paid_date(paid, paid_date, requested, payment::today());

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "UPDATE invoices SET amt = $1, paid = $2, paid_date = $3 \
             WHERE id = $4 \
             RETURNING {INVOICE_COLUMNS}"
        ))
        .bind(update.amt)
        .bind(requested)
        .bind(new_paid_date)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            classify(e, |v| {
                (v == Violation::Check).then(|| BizError::invalid_amount(update.amt))
            })
        })?
        .ok_or_else(|| BizError::invoice_not_found(id))?;

        tx.commit().await.map_err(transaction_error)?;
        Ok(invoice)
    }

    async fn delete_invoice(&self, id: i32) -> BizResult<()> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(BizError::invoice_not_found(id));
        }
        Ok(())
    }
}

#[async_trait]
impl IndustryService for PostgresStore {
    async fn list_industries(&self) -> BizResult<Vec<IndustryListing>> {
        sqlx::query_as::<_, IndustryListing>(
            "SELECT i.code, i.industry, ci.comp_code \
             FROM industries AS i \
             LEFT JOIN company_industries AS ci ON i.code = ci.ind_code \
             ORDER BY i.code, ci.comp_code",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)
    }

    async fn get_industry(&self, code: &str) -> BizResult<Option<IndustryDetail>> {
        let industry = sqlx::query_as::<_, Industry>(
            "SELECT code, industry FROM industries WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        let Some(industry) = industry else {
            return Ok(None);
        };

        let companies = sqlx::query_scalar::<_, String>(
            "SELECT comp_code FROM company_industries WHERE ind_code = $1 ORDER BY comp_code",
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(Some(IndustryDetail {
            code: industry.code,
            industry: industry.industry,
            companies,
        }))
    }

    async fn create_industry(&self, write: IndustryWrite) -> BizResult<IndustryAssociation> {
        let mut tx = self.pool.begin().await.map_err(transaction_error)?;

        let industry = sqlx::query_as::<_, Industry>(
            "INSERT INTO industries (code, industry) \
             VALUES ($1, $2) \
             RETURNING code, industry",
        )
        .bind(&write.code)
        .bind(&write.industry)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            classify(e, |v| {
                (v == Violation::Unique).then(|| BizError::industry_exists(&write.code))
            })
        })?;

        let link = sqlx::query_as::<_, CompanyIndustry>(
            "INSERT INTO company_industries (comp_code, ind_code) \
             VALUES ($1, $2) \
             RETURNING comp_code, ind_code",
        )
        .bind(&write.comp_code)
        .bind(&write.code)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            classify(e, |v| match v {
                Violation::Unique => {
                    Some(BizError::association_exists(&write.comp_code, &write.code))
                }
                Violation::ForeignKey => Some(BizError::unknown_company(&write.comp_code)),
                Violation::Check => None,
            })
        })?;

        tx.commit().await.map_err(transaction_error)?;

        tracing::debug!(code = %industry.code, comp_code = %link.comp_code, "industry created");
        Ok(IndustryAssociation::new(
            &industry.code,
            &industry.industry,
            &link.comp_code,
        ))
    }

    async fn update_industry(&self, write: IndustryWrite) -> BizResult<IndustryAssociation> {
        let mut tx = self.pool.begin().await.map_err(transaction_error)?;

        let industry = sqlx::query_as::<_, Industry>(
            "UPDATE industries SET industry = $2 \
             WHERE code = $1 \
             RETURNING code, industry",
        )
        .bind(&write.code)
        .bind(&write.industry)
        .fetch_optional(&mut *tx)
        .await
        .map_err(query_error)?
        .ok_or_else(|| BizError::industry_not_found(&write.code))?;

        sqlx::query(
            "INSERT INTO company_industries (comp_code, ind_code) \
             VALUES ($1, $2) \
             ON CONFLICT (comp_code, ind_code) DO NOTHING",
        )
        .bind(&write.comp_code)
        .bind(&write.code)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            classify(e, |v| {
                (v == Violation::ForeignKey).then(|| BizError::unknown_company(&write.comp_code))
            })
        })?;

        tx.commit().await.map_err(transaction_error)?;

        Ok(IndustryAssociation::new(
            &industry.code,
            &industry.industry,
            &write.comp_code,
        ))
    }

    async fn delete_industry(&self, code: &str) -> BizResult<()> {
        let mut tx = self.pool.begin().await.map_err(transaction_error)?;

        sqlx::query("DELETE FROM company_industries WHERE ind_code = $1")
            .bind(code)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        let result = sqlx::query("DELETE FROM industries WHERE code = $1")
            .bind(code)
            .execute(&mut *tx)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(BizError::industry_not_found(code));
        }

        tx.commit().await.map_err(transaction_error)?;
        Ok(())
    }
}
