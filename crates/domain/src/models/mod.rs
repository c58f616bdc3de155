//! Domain models for maintenance intake.

pub mod maintenance_request;

pub use maintenance_request::{
    next_request_id, MaintenanceRequest, RequestStatus, SubmitRequestForm,
};
