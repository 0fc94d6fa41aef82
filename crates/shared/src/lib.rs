//! Shared types, errors, and configuration for Kitabu.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Monetary rounding helpers with decimal precision
//! - Tenant context carried into every core call
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod context;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use context::TenantCtx;
pub use error::{AppError, AppResult};
