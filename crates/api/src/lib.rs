//! HTTP API for the shop's inventory ledger and the mock sign-in routes.

pub mod app;
pub mod config;
pub mod middleware;
