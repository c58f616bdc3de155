//! Domain services for maintenance intake.
//!
//! Services contain business logic that operates on domain models.

pub mod notification;

pub use notification::{
    MockRequestNotifier, NewRequestNotice, NotificationResult, RequestNotifier,
};
