//! Shared types, errors, and configuration for Daybook.
//!
//! This crate provides common types used across all other crates:
//! - Money rounding and the currency allow-list
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management
//! - Verification of identity tokens from the auth provider

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
