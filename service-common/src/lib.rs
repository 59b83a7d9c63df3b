//! service-common: Shared infrastructure for the completion gateway.
pub mod config;
pub mod error;
pub mod observability;
