//! Detail-builder trait definition.
//!
//! Defines the interface for per-method credential detail construction,
//! enabling the Strategy pattern across authentication methods.

use crate::auth::error::AuthError;
use crate::auth::method::AuthMethod;

/// Trait for method-specific detail construction.
///
/// Implementations must be thread-safe (`Send + Sync`). Each builder serves
/// exactly one [`AuthMethod`] and is selected through the method registry's
/// lookup table.
pub trait DetailBuilder: Send + Sync {
    /// Build the detail string used to drive the challenge sequence for `user`.
    ///
    /// # Returns
    ///
    /// * `Ok(details)` - Detail string ready to attach to a host-auth record
    /// * `Err(AuthError::ConfigurationUnavailable)` - Required configuration
    ///   could not be resolved; the method must not enter the connect phase
    fn build(&self, user: &str) -> Result<String, AuthError>;

    /// The method this builder serves.
    fn method(&self) -> AuthMethod;

    /// Get the name of this builder.
    ///
    /// Used for logging and debugging purposes.
    fn name(&self) -> &'static str;
}
