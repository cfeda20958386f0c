//! Field rules shared by the request bodies in `models`
//!
//! Length bounds live on the `#[validate(...)]` attributes; this module holds
//! the rules `validator` has no builtin for.

use std::borrow::Cow;

use validator::ValidationError;

pub const MAX_PASSWORD_BYTES: usize = 128;

/// No whitespace or control characters anywhere in the username.
pub fn validate_username_shape(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        let mut err = ValidationError::new("invalid_username");
        err.message = Some(Cow::Borrowed("Username must not contain whitespace"));
        return Err(err);
    }
    Ok(())
}

/// Argon2 input is capped in bytes, not characters.
pub fn validate_password_size(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut err = ValidationError::new("password_too_long");
        err.message = Some(Cow::Owned(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes"
        )));
        return Err(err);
    }
    Ok(())
}

/// Surrounding whitespace is never significant in stored text.
pub fn trimmed(value: &str) -> String {
    value.trim().to_owned()
}
