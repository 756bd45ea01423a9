//! Kerberos ticket-method detail construction and realm discovery.
//!
//! The ticket method needs a principal (`user@THE.REA.LM`). An explicit
//! principal is used verbatim; otherwise the realm is read from the
//! ticket-system config file located at probe startup.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::auth::config::{DEFAULT_KRB5_CONFIG_PATH, KRB5_CONFIG_ENV_VAR};
use crate::auth::error::{AuthError, RealmError};
use crate::auth::method::AuthMethod;

use super::traits::DetailBuilder;

/// Keyword introducing the realm record in a ticket-system config file.
const DEFAULT_REALM_KEYWORD: &str = "default_realm";

fn readable(path: &Path) -> bool {
    File::open(path).is_ok()
}

/// Locate a readable ticket-system configuration file.
///
/// Candidates are tried in order: the explicit `override_path`, the
/// `KRB5_CONFIG` environment variable, then `/etc/krb5.conf`. The first
/// readable candidate wins; `None` when no candidate is readable.
pub fn locate_config(override_path: Option<&Path>) -> Option<PathBuf> {
    let env_path = std::env::var(KRB5_CONFIG_ENV_VAR)
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);

    locate_config_from(override_path, env_path.as_deref(), Path::new(DEFAULT_KRB5_CONFIG_PATH))
}

/// Pure candidate selection behind [`locate_config`].
fn locate_config_from(
    override_path: Option<&Path>,
    env_path: Option<&Path>,
    default_path: &Path,
) -> Option<PathBuf> {
    let candidates = [override_path, env_path, Some(default_path)];
    for candidate in candidates.into_iter().flatten() {
        if readable(candidate) {
            debug!("ticket configuration located at {}", candidate.display());
            return Some(candidate.to_path_buf());
        }
    }
    None
}

/// Scan a ticket-system config file for the default realm.
///
/// The scan is linear, single-pass and case-sensitive: the first line whose
/// first whitespace-separated token is exactly `default_realm` and which
/// carries at least three tokens yields its third token (`default_realm =
/// THE.REA.LM`). Later matching lines are ignored: first match wins is a
/// contract of this scan, not an accident.
///
/// # Returns
///
/// * `Ok(realm)` - The realm from the first matching line
/// * `Err(RealmError::NotFound)` - No matching line in the file
/// * `Err(RealmError::Unreadable)` - The file could not be opened or read
pub fn default_realm(path: &Path) -> Result<String, RealmError> {
    let file = File::open(path).map_err(|source| RealmError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| RealmError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut tokens = line.split_whitespace();
        if tokens.next() == Some(DEFAULT_REALM_KEYWORD)
            && let (Some(_), Some(realm)) = (tokens.next(), tokens.next())
        {
            return Ok(realm.to_string());
        }
    }

    Err(RealmError::NotFound(path.to_path_buf()))
}

/// Kerberos detail builder.
///
/// With an explicit principal the principal is used verbatim; otherwise the
/// principal is `user@REALM` with the realm read from the configured file at
/// build time. A failed realm read surfaces as
/// `AuthError::ConfigurationUnavailable`, which keeps the method out of the
/// connect phase without aborting the run.
pub struct KerberosDetail {
    principal: Option<String>,
    config: Option<PathBuf>,
}

impl KerberosDetail {
    /// Use an explicit principal (`user@THE.REA.LM`) verbatim.
    pub fn with_principal(principal: impl Into<String>) -> Self {
        Self {
            principal: Some(principal.into()),
            config: None,
        }
    }

    /// Derive the principal from the realm recorded in `config`.
    pub fn from_config(config: impl Into<PathBuf>) -> Self {
        Self {
            principal: None,
            config: Some(config.into()),
        }
    }
}

impl DetailBuilder for KerberosDetail {
    fn build(&self, user: &str) -> Result<String, AuthError> {
        let principal = match (&self.principal, &self.config) {
            (Some(principal), _) => principal.clone(),
            (None, Some(config)) => {
                let realm = default_realm(config)
                    .map_err(|e| AuthError::ConfigurationUnavailable(e.to_string()))?;
                format!("{user}@{realm}")
            }
            (None, None) => {
                return Err(AuthError::ConfigurationUnavailable(
                    "no ticket configuration located".to_string(),
                ));
            }
        };

        Ok(format!("prompt:0 reuse:1 user:{principal}"))
    }

    fn method(&self) -> AuthMethod {
        AuthMethod::Kerberos
    }

    fn name(&self) -> &'static str {
        "kerberos"
    }
}
