//! Domain models for the pet medication tracker.

mod history;
mod medication;
mod notification;
mod pet;
mod reminder;
mod subscription;

pub use history::*;
pub use medication::*;
pub use notification::*;
pub use pet::*;
pub use reminder::*;
pub use subscription::*;

use thiserror::Error;

/// A missing or malformed field on user input. The message is shown as-is.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub type ValidationResult = Result<(), ValidationError>;

/// Reject empty or whitespace-only required text fields.
pub(crate) fn require_text(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError(format!("{} is required", field)));
    }
    Ok(())
}

/// Current time as an RFC 3339 string, the format used for audit timestamps.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
