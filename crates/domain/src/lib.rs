//! Domain layer for the maintenance intake backend.
//!
//! This crate contains:
//! - The maintenance request model and its status lifecycle
//! - The notifier seam used when a request is created

pub mod models;
pub mod services;
