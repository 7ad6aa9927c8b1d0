//! Macro-generated test suite for store contract validation.
//!
//! The `store_contract_tests!` macro generates a test module that validates
//! any `BizStore` implementation: company CRUD with restrict-on-delete,
//! invoice payment transitions, the transactional industry writer, and
//! concurrent payment updates.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use biztime::storage::InMemoryStore;
//!
//! store_contract_tests!(InMemoryStore::new());
//! ```

/// Generate a full `BizStore` conformance test suite.
///
/// `$factory` must evaluate to an empty store. It is re-evaluated for each
/// test. The concurrency test also needs the store to be `Clone + 'static`.
#[macro_export]
macro_rules! store_contract_tests {
    ($factory:expr) => {
        mod store_contract_tests {
            use super::*;
            use axum::http::StatusCode;
            use biztime::core::payment::today;
            use biztime::prelude::*;

            // ==================================================================
            // Companies
            // ==================================================================

            #[tokio::test]
            async fn test_list_companies_empty() {
                let store = $factory;
                assert!(store.list_companies().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_create_and_get_company() {
                let store = $factory;
                let created = store
                    .create_company(new_company("apple", "Apple Computer"))
                    .await
                    .unwrap();
                assert_eq!(created.code, "apple");
                assert_eq!(created.description.as_deref(), Some("Apple Computer description"));

                let detail = store.get_company("apple").await.unwrap().unwrap();
                assert_eq!(detail.company, created);
                assert!(detail.invoices.is_empty());
                assert!(detail.industries.is_empty());
            }

            #[tokio::test]
            async fn test_list_companies_ordered_by_code() {
                let store = $factory;
                for code in ["ibm", "apple", "msft"] {
                    store.create_company(new_company(code, code)).await.unwrap();
                }
                let codes: Vec<String> = store
                    .list_companies()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|c| c.code)
                    .collect();
                assert_eq!(codes, vec!["apple", "ibm", "msft"]);
            }

            #[tokio::test]
            async fn test_duplicate_company_conflicts() {
                let store = $factory;
                store.create_company(new_company("apple", "Apple")).await.unwrap();
                let err = store
                    .create_company(new_company("apple", "Other"))
                    .await
                    .unwrap_err();
                assert_eq!(err.status_code(), StatusCode::CONFLICT);
            }

            #[tokio::test]
            async fn test_get_company_includes_invoices_and_industries() {
                let store = $factory;
                let invoice_id = seed(&store).await;

                let detail = store.get_company("apple").await.unwrap().unwrap();
                assert_eq!(detail.invoices.len(), 1);
                assert_eq!(detail.invoices[0].id, invoice_id);
                assert_eq!(detail.industries.len(), 1);
                assert_eq!(detail.industries[0].code, "tech");

                let ibm = store.get_company("ibm").await.unwrap().unwrap();
                assert!(ibm.invoices.is_empty());
                assert!(ibm.industries.is_empty());
            }

            #[tokio::test]
            async fn test_get_company_nonexistent() {
                let store = $factory;
                assert!(store.get_company("nope").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_update_company() {
                let store = $factory;
                store.create_company(new_company("apple", "Apple")).await.unwrap();
                let updated = store
                    .update_company(
                        "apple",
                        CompanyUpdate {
                            name: "Apple Inc".to_string(),
                            description: None,
                        },
                    )
                    .await
                    .unwrap();
                assert_eq!(updated.name, "Apple Inc");
                assert!(updated.description.is_none());
            }

            #[tokio::test]
            async fn test_update_company_nonexistent() {
                let store = $factory;
                let err = store
                    .update_company(
                        "nope",
                        CompanyUpdate {
                            name: "Nope".to_string(),
                            description: None,
                        },
                    )
                    .await
                    .unwrap_err();
                assert!(err.is_not_found());
            }

            #[tokio::test]
            async fn test_delete_company() {
                let store = $factory;
                store.create_company(new_company("ibm", "IBM")).await.unwrap();
                store.delete_company("ibm").await.unwrap();
                assert!(store.get_company("ibm").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_company_nonexistent() {
                let store = $factory;
                let err = store.delete_company("nope").await.unwrap_err();
                assert!(err.is_not_found());
            }

            #[tokio::test]
            async fn test_delete_company_with_invoices_is_restricted() {
                let store = $factory;
                seed(&store).await;
                let err = store.delete_company("apple").await.unwrap_err();
                assert_eq!(err.status_code(), StatusCode::CONFLICT);
                assert!(store.get_company("apple").await.unwrap().is_some());
            }

            #[tokio::test]
            async fn test_delete_company_with_industries_is_restricted() {
                let store = $factory;
                store.create_company(new_company("ibm", "IBM")).await.unwrap();
                store
                    .create_industry(industry_write("tech", "Technology", "ibm"))
                    .await
                    .unwrap();
                let err = store.delete_company("ibm").await.unwrap_err();
                assert_eq!(err.status_code(), StatusCode::CONFLICT);
            }

            // ==================================================================
            // Invoices
            // ==================================================================

            #[tokio::test]
            async fn test_create_invoice_defaults() {
                let store = $factory;
                store.create_company(new_company("apple", "Apple")).await.unwrap();
                let invoice = store
                    .create_invoice(new_invoice("apple", 250.5))
                    .await
                    .unwrap();
                assert!(invoice.id > 0);
                assert_eq!(invoice.comp_code, "apple");
                assert!((invoice.amt - 250.5).abs() < f64::EPSILON);
                assert!(!invoice.paid);
                assert_eq!(invoice.add_date, today());
                assert!(invoice.paid_date.is_none());
            }

            #[tokio::test]
            async fn test_create_invoice_unknown_company() {
                let store = $factory;
                let err = store
                    .create_invoice(new_invoice("ghost", 10.0))
                    .await
                    .unwrap_err();
                assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
                assert!(store.list_invoices().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_create_invoice_rejects_non_positive_amount() {
                let store = $factory;
                store.create_company(new_company("apple", "Apple")).await.unwrap();
                for amt in [0.0, -5.0] {
                    let err = store
                        .create_invoice(new_invoice("apple", amt))
                        .await
                        .unwrap_err();
                    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
                }
            }

            #[tokio::test]
            async fn test_list_invoices_summaries() {
                let store = $factory;
                store.create_company(new_company("apple", "Apple")).await.unwrap();
                store.create_company(new_company("ibm", "IBM")).await.unwrap();
                let first = store.create_invoice(new_invoice("apple", 1.0)).await.unwrap();
                let second = store.create_invoice(new_invoice("ibm", 2.0)).await.unwrap();

                let list = store.list_invoices().await.unwrap();
                assert_eq!(
                    list,
                    vec![
                        InvoiceSummary { id: first.id, comp_code: "apple".to_string() },
                        InvoiceSummary { id: second.id, comp_code: "ibm".to_string() },
                    ]
                );
            }

            #[tokio::test]
            async fn test_get_invoice_nests_company() {
                let store = $factory;
                let id = seed(&store).await;
                let detail = store.get_invoice(id).await.unwrap().unwrap();
                assert_eq!(detail.id, id);
                assert_eq!(detail.company.code, "apple");
                assert_eq!(detail.company.name, "Apple Computer");
            }

            #[tokio::test]
            async fn test_get_invoice_nonexistent() {
                let store = $factory;
                assert!(store.get_invoice(999_999).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_mark_paid_stamps_today() {
                let store = $factory;
                let id = seed(&store).await;
                let invoice = store.update_invoice(id, pay(100.0, true)).await.unwrap();
                assert!(invoice.paid);
                assert_eq!(invoice.paid_date, Some(today()));
            }

            #[tokio::test]
            async fn test_mark_unpaid_clears_paid_date() {
                let store = $factory;
                let id = seed(&store).await;
                store.update_invoice(id, pay(100.0, true)).await.unwrap();
                let invoice = store.update_invoice(id, pay(100.0, false)).await.unwrap();
                assert!(!invoice.paid);
                assert!(invoice.paid_date.is_none());
            }

            #[tokio::test]
            async fn test_repeated_paid_keeps_paid_date() {
                let store = $factory;
                let id = seed(&store).await;
                let first = store.update_invoice(id, pay(100.0, true)).await.unwrap();
                let second = store.update_invoice(id, pay(150.0, true)).await.unwrap();
                assert_eq!(second.paid_date, first.paid_date);
                assert!((second.amt - 150.0).abs() < f64::EPSILON);
            }

            #[tokio::test]
            async fn test_amount_only_update_keeps_state() {
                let store = $factory;
                let id = seed(&store).await;
                let invoice = store
                    .update_invoice(id, InvoiceUpdate { amt: 300.0, paid: None })
                    .await
                    .unwrap();
                assert!(!invoice.paid);
                assert!(invoice.paid_date.is_none());
                assert!((invoice.amt - 300.0).abs() < f64::EPSILON);
            }

            #[tokio::test]
            async fn test_update_invoice_nonexistent() {
                let store = $factory;
                let err = store
                    .update_invoice(999_999, pay(10.0, true))
                    .await
                    .unwrap_err();
                assert!(err.is_not_found());
            }

            #[tokio::test]
            async fn test_update_invoice_rejects_non_positive_amount() {
                let store = $factory;
                let id = seed(&store).await;
                let err = store.update_invoice(id, pay(0.0, true)).await.unwrap_err();
                assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
                let unchanged = store.get_invoice(id).await.unwrap().unwrap();
                assert!(!unchanged.paid);
            }

            #[tokio::test]
            async fn test_delete_invoice() {
                let store = $factory;
                let id = seed(&store).await;
                store.delete_invoice(id).await.unwrap();
                assert!(store.get_invoice(id).await.unwrap().is_none());
                let err = store.delete_invoice(id).await.unwrap_err();
                assert!(err.is_not_found());
            }

            // ==================================================================
            // Industries
            // ==================================================================

            #[tokio::test]
            async fn test_create_industry_writes_both_rows() {
                let store = $factory;
                store.create_company(new_company("apple", "Apple")).await.unwrap();
                let created = store
                    .create_industry(industry_write("tech", "Technology", "apple"))
                    .await
                    .unwrap();
                assert_eq!(
                    created,
                    IndustryAssociation {
                        code: "tech".to_string(),
                        industry: "Technology".to_string(),
                        comp_code: "apple".to_string(),
                        ind_code: "tech".to_string(),
                    }
                );

                let detail = store.get_industry("tech").await.unwrap().unwrap();
                assert_eq!(detail.companies, vec!["apple".to_string()]);
            }

            #[tokio::test]
            async fn test_create_industry_unknown_company_rolls_back() {
                let store = $factory;
                let err = store
                    .create_industry(industry_write("tech", "Technology", "ghost"))
                    .await
                    .unwrap_err();
                assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
                assert!(store.get_industry("tech").await.unwrap().is_none());
                assert!(store.list_industries().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_create_industry_duplicate_code_conflicts() {
                let store = $factory;
                seed(&store).await;
                let err = store
                    .create_industry(industry_write("tech", "Tech again", "ibm"))
                    .await
                    .unwrap_err();
                assert_eq!(err.status_code(), StatusCode::CONFLICT);
                let detail = store.get_industry("tech").await.unwrap().unwrap();
                assert_eq!(detail.industry, "Technology");
                assert_eq!(detail.companies, vec!["apple".to_string()]);
            }

            #[tokio::test]
            async fn test_update_industry_adds_association() {
                let store = $factory;
                seed(&store).await;
                let updated = store
                    .update_industry(industry_write("tech", "Tech", "ibm"))
                    .await
                    .unwrap();
                assert_eq!(updated.comp_code, "ibm");
                assert_eq!(updated.ind_code, "tech");

                let detail = store.get_industry("tech").await.unwrap().unwrap();
                assert_eq!(detail.industry, "Tech");
                assert_eq!(detail.companies, vec!["apple".to_string(), "ibm".to_string()]);
            }

            #[tokio::test]
            async fn test_update_industry_existing_pair_is_idempotent() {
                let store = $factory;
                seed(&store).await;
                for _ in 0..2 {
                    let updated = store
                        .update_industry(industry_write("tech", "Technology", "apple"))
                        .await
                        .unwrap();
                    assert_eq!(updated.comp_code, "apple");
                }
                let detail = store.get_industry("tech").await.unwrap().unwrap();
                assert_eq!(detail.companies, vec!["apple".to_string()]);
            }

            #[tokio::test]
            async fn test_update_industry_nonexistent() {
                let store = $factory;
                store.create_company(new_company("apple", "Apple")).await.unwrap();
                let err = store
                    .update_industry(industry_write("ghost", "Ghost", "apple"))
                    .await
                    .unwrap_err();
                assert!(err.is_not_found());
            }

            #[tokio::test]
            async fn test_update_industry_unknown_company_rolls_back() {
                let store = $factory;
                seed(&store).await;
                let err = store
                    .update_industry(industry_write("tech", "Renamed", "ghost"))
                    .await
                    .unwrap_err();
                assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
                let detail = store.get_industry("tech").await.unwrap().unwrap();
                assert_eq!(detail.industry, "Technology");
            }

            #[tokio::test]
            async fn test_list_industries_one_row_per_pair() {
                let store = $factory;
                seed(&store).await;
                store
                    .update_industry(industry_write("tech", "Technology", "ibm"))
                    .await
                    .unwrap();
                store
                    .create_industry(industry_write("acct", "Accounting", "ibm"))
                    .await
                    .unwrap();

                let rows: Vec<(String, Option<String>)> = store
                    .list_industries()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|r| (r.code, r.comp_code))
                    .collect();
                assert_eq!(
                    rows,
                    vec![
                        ("acct".to_string(), Some("ibm".to_string())),
                        ("tech".to_string(), Some("apple".to_string())),
                        ("tech".to_string(), Some("ibm".to_string())),
                    ]
                );
            }

            #[tokio::test]
            async fn test_delete_industry_removes_associations() {
                let store = $factory;
                seed(&store).await;
                store.delete_industry("tech").await.unwrap();
                assert!(store.get_industry("tech").await.unwrap().is_none());

                let apple = store.get_company("apple").await.unwrap().unwrap();
                assert!(apple.industries.is_empty());
                // The company is no longer referenced by any industry
                store.delete_invoice(apple.invoices[0].id).await.unwrap();
                store.delete_company("apple").await.unwrap();
            }

            #[tokio::test]
            async fn test_delete_industry_nonexistent() {
                let store = $factory;
                let err = store.delete_industry("ghost").await.unwrap_err();
                assert!(err.is_not_found());
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_paid_toggles_stay_consistent() {
                let store = $factory;
                let id = seed(&store).await;

                let handles: Vec<_> = (0..16)
                    .map(|i| {
                        let store = store.clone();
                        tokio::spawn(async move {
                            store.update_invoice(id, pay(100.0 + i as f64, i % 2 == 0)).await
                        })
                    })
                    .collect();

                let results = futures::future::join_all(handles).await;
                for invoice in results.into_iter().map(|r| r.unwrap().unwrap()) {
                    assert_eq!(invoice.paid, invoice.paid_date.is_some());
                    if invoice.paid {
                        assert_eq!(invoice.paid_date, Some(today()));
                    }
                }

                let stored = store.get_invoice(id).await.unwrap().unwrap();
                assert_eq!(stored.paid, stored.paid_date.is_some());
                if stored.paid {
                    assert_eq!(stored.paid_date, Some(today()));
                }
            }
        }
    };
}
