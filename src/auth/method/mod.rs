//! Authentication methods and the method registry.
//!
//! Methods carry stable small-integer ids (wire ids are never renumbered) and
//! a per-method detail builder following the Strategy pattern, so new
//! credential schemes can be added without touching existing code.
//!
//! # Available builders
//!
//! - [`PasswordDetail`]: password-based authentication
//! - [`KerberosDetail`]: ticket-based authentication (explicit principal or
//!   realm discovery from the ticket-system config)
//!
//! The remaining methods in the id table are registered for id stability and
//! report unavailable in this build.

mod kerberos;
mod password;
mod traits;

pub use kerberos::{KerberosDetail, default_realm, locate_config};
pub use password::PasswordDetail;
pub use traits::DetailBuilder;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::error::AuthError;

/// A credential scheme identified by a stable small-integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    Password = 0,
    OneTimePassword = 1,
    Kerberos = 2,
    Certificate = 3,
    SshKey = 4,
    HostTrust = 5,
}

impl AuthMethod {
    /// Every method, in id order.
    pub const ALL: [AuthMethod; 6] = [
        AuthMethod::Password,
        AuthMethod::OneTimePassword,
        AuthMethod::Kerberos,
        AuthMethod::Certificate,
        AuthMethod::SshKey,
        AuthMethod::HostTrust,
    ];

    /// Stable wire id of this method.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Look a method up by wire id.
    pub fn from_id(id: u8) -> Option<AuthMethod> {
        Self::ALL.into_iter().find(|m| m.id() == id)
    }

    /// Short human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            AuthMethod::Password => "password",
            AuthMethod::OneTimePassword => "otp",
            AuthMethod::Kerberos => "kerberos",
            AuthMethod::Certificate => "certificate",
            AuthMethod::SshKey => "ssh-key",
            AuthMethod::HostTrust => "host-trust",
        }
    }
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Registry of the methods usable in the current environment.
///
/// Availability is computed once at construction and does not change mid-run:
/// a method is available exactly when a detail builder is registered for it.
pub struct MethodRegistry {
    builders: Vec<Box<dyn DetailBuilder>>,
}

impl MethodRegistry {
    /// Build a registry from explicit builders.
    ///
    /// Every method with a builder is marked available. At most one builder
    /// per method; the first registered wins lookups.
    pub fn from_builders(builders: Vec<Box<dyn DetailBuilder>>) -> Self {
        Self { builders }
    }

    /// Probe the environment and build the standard method table.
    ///
    /// Password is always usable. Kerberos is usable when an explicit
    /// `principal` was supplied (used verbatim, config discovery skipped), or
    /// when a ticket-system config file is discoverable (`krb5_config`
    /// override, then `KRB5_CONFIG`, then `/etc/krb5.conf`).
    pub fn detect(krb5_config: Option<&Path>, principal: Option<&str>) -> Self {
        let mut builders: Vec<Box<dyn DetailBuilder>> = vec![Box::new(PasswordDetail::new())];

        if let Some(principal) = principal {
            debug!("using explicit ticket principal");
            builders.push(Box::new(KerberosDetail::with_principal(principal)));
        } else if let Some(config) = locate_config(krb5_config) {
            builders.push(Box::new(KerberosDetail::from_config(config)));
        } else {
            info!("no ticket configuration discoverable; kerberos disabled for this run");
        }

        Self::from_builders(builders)
    }

    /// Whether `method` is usable in the current environment.
    ///
    /// Pure lookup, no side effects.
    pub fn is_available(&self, method: AuthMethod) -> bool {
        self.builder(method).is_some()
    }

    /// Detail builder registered for `method`, when one exists.
    pub fn builder(&self, method: AuthMethod) -> Option<&dyn DetailBuilder> {
        self.builders
            .iter()
            .find(|b| b.method() == method)
            .map(|b| b.as_ref())
    }

    /// Build the detail string for `method` and `user`.
    pub fn build_details(&self, method: AuthMethod, user: &str) -> Result<String, AuthError> {
        let builder = self.builder(method).ok_or_else(|| {
            AuthError::ConfigurationUnavailable(format!(
                "method {method} unavailable in this environment"
            ))
        })?;
        builder.build(user)
    }
}
