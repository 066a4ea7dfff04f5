/**
 * Credential Validation
 *
 * Field checks applied to registration and login bodies before they reach
 * the auth handlers. The same rules are usable from clients so a form can
 * reject bad input without a round trip.
 */

use crate::shared::error::SharedError;

/// Minimum accepted password length (in characters)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum accepted email length, per RFC 5321
const MAX_EMAIL_LENGTH: usize = 254;

/// Validate an email address
///
/// This is a structural check only: exactly one `@`, a non-empty local part,
/// and a domain containing a dot that neither starts nor ends the domain.
pub fn validate_email(email: &str) -> Result<(), SharedError> {
    let invalid = || SharedError::validation("email", "Invalid email format");

    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid());
    }

    Ok(())
}

/// Validate a new password against the minimum length rule
pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

/// Validate that a required field is not blank
pub fn validate_present(field: &str, value: &str) -> Result<(), SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::validation(field, format!("{} is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["", "invalid-email", "@example.com", "user@", "user@localhost", "a@b@c.com", "user @x.com", "user@.com"] {
            assert!(validate_email(email).is_err(), "{email} should be rejected");
        }
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("exactly8").is_ok());
    }

    #[test]
    fn test_present() {
        assert!(validate_present("password", "   ").is_err());
        assert!(validate_present("password", "x").is_ok());
    }
}
