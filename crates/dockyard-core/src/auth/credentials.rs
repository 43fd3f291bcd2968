//! Login credentials type.

use std::fmt;

use crate::Result;
use crate::error::AuthError;

/// Username and password sent to the login endpoint.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use dockyard_core::Credentials;
///
/// let creds = Credentials::new("dispatch", "hunter2").unwrap();
/// assert_eq!(creds.username(), "dispatch");
/// ```
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials. Both fields must be non-empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let username = username.into();
        let password = password.into();

        if username.trim().is_empty() {
            return Err(AuthError::InvalidCredentials("username is required".to_string()).into());
        }
        if password.is_empty() {
            return Err(AuthError::InvalidCredentials("password is required".to_string()).into());
        }

        Ok(Self { username, password })
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing the login request.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_hides_password_in_debug() {
        let creds = Credentials::new("dispatch", "secret123").unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("dispatch"));
        assert!(!debug.contains("secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn empty_fields_are_rejected() {
        assert!(matches!(
            Credentials::new("", "pw"),
            Err(crate::Error::Auth(AuthError::InvalidCredentials(_)))
        ));
        assert!(Credentials::new("dispatch", "").is_err());
    }
}
