//! Request handling and external service integrations.

pub mod email;
pub mod maintenance;

pub use email::EmailService;
pub use maintenance::{MaintenanceError, MaintenanceService};
