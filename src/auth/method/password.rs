//! Password-method detail construction.

use crate::auth::error::AuthError;
use crate::auth::method::AuthMethod;

use super::traits::DetailBuilder;

/// Password detail builder.
///
/// Emits the fixed detail template for the password method: prompting
/// disabled, session reuse enabled, the resolved username attached.
pub struct PasswordDetail;

impl PasswordDetail {
    /// Create a new password detail builder.
    pub fn new() -> Self {
        Self
    }
}

impl Default for PasswordDetail {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailBuilder for PasswordDetail {
    fn build(&self, user: &str) -> Result<String, AuthError> {
        Ok(format!("prompt:0 reuse:1 user:{user}"))
    }

    fn method(&self) -> AuthMethod {
        AuthMethod::Password
    }

    fn name(&self) -> &'static str {
        "password"
    }
}
