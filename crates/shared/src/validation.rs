//! Common validation utilities.

use validator::ValidationError;

/// Longest text a single ledger cell can hold.
pub const MAX_FIELD_CHARS: u64 = 32_767;

/// Validates that a form field was filled in.
///
/// Only an empty value is rejected; whitespace counts as content.
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        let mut err = ValidationError::new("empty");
        err.message = Some("Field must not be empty".into());
        Err(err)
    } else {
        Ok(())
    }
}
