//! Field-level validation helpers shared by the mutation ops

use crate::errors::{CoreError, Result};

/// Highest legal rate value
pub const MAX_RATE: u8 = 5;

/// Require a non-empty, non-whitespace-only string field
///
/// # Errors
///
/// Returns `InvalidField` naming the offending field.
pub fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidField {
            field: field.to_string(),
            reason: "cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Validate a comment rate (0-5 inclusive)
///
/// # Errors
///
/// Returns `InvalidRate` if the rate exceeds [`MAX_RATE`].
pub fn validate_rate(rate: u8) -> Result<()> {
    if rate > MAX_RATE {
        return Err(CoreError::InvalidRate { rate });
    }
    Ok(())
}

/// Validate the shape of an email address
///
/// The core only needs enough structure for uniqueness to be meaningful:
/// non-blank, exactly one '@' with non-empty local and domain parts. Real
/// address verification belongs to the excluded registration flow.
///
/// # Errors
///
/// Returns `InvalidField` for a malformed address.
pub fn validate_email(email: &str) -> Result<()> {
    require_non_blank("email", email)?;
    let mut parts = email.split('@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || parts.next().is_some() {
        return Err(CoreError::InvalidField {
            field: "email".to_string(),
            reason: format!("'{email}' is not a valid email address"),
        });
    }
    Ok(())
}
