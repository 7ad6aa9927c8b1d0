//! Route table for the BizTime API

use crate::handlers::{AppState, companies, health, industries, invoices};
use axum::{Router, routing::get};

/// Build the resource routes
///
/// - GET/POST /companies, GET/PUT/DELETE /companies/{code}
/// - GET/POST /invoices, GET/PUT/DELETE /invoices/{id}
/// - GET/POST /industries, GET/PUT/DELETE /industries/{code}
pub fn build_api_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/companies",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/companies/{code}",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route(
            "/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route(
            "/invoices/{id}",
            get(invoices::get_invoice)
                .put(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        )
        .route(
            "/industries",
            get(industries::list_industries).post(industries::create_industry),
        )
        .route(
            "/industries/{code}",
            get(industries::get_industry)
                .put(industries::update_industry)
                .delete(industries::delete_industry),
        )
        .with_state(state)
}

/// Health check routes
pub fn build_health_routes() -> Router {
    Router::new().route("/health", get(health))
}
