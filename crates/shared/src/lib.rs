//! Shared utilities and common types for the maintenance intake backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Form field validation helpers
//! - Ledger date formatting

pub mod dates;
pub mod validation;
