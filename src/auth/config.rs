//! Configuration resolution for the authentication probe.
//!
//! This module handles configuration values with a three-tier priority system:
//!
//! 1. **Parameter** - Explicitly provided function parameter (highest priority)
//! 2. **Environment Variable** - Value from environment variable
//! 3. **Default** - Built-in default value (lowest priority)
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AUTHPROBE_PORT` | 1094 | Transfer-daemon port to probe |
//! | `AUTHPROBE_USER` | login user | Username the probe records are keyed by |
//! | `AUTHPROBE_PRINCIPAL` | `user@default_realm` | Explicit Kerberos principal |
//! | `KRB5_CONFIG` | `/etc/krb5.conf` | Ticket-system config file |
//! | `AUTHPROBE_CONNECT_TIMEOUT` | 30s | Transport connect timeout in seconds |

use std::env;

use crate::auth::identity;

/// Default transfer-daemon port
pub(crate) const DEFAULT_ENDPOINT_PORT: u16 = 1094;

/// Default transport connect timeout in seconds
pub(crate) const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Well-known ticket-system config file path
pub(crate) const DEFAULT_KRB5_CONFIG_PATH: &str = "/etc/krb5.conf";

/// Environment variable name for the transfer-daemon port
pub(crate) const ENDPOINT_PORT_ENV_VAR: &str = "AUTHPROBE_PORT";

/// Environment variable name for the probe username
pub(crate) const PROBE_USER_ENV_VAR: &str = "AUTHPROBE_USER";

/// Environment variable name for the explicit Kerberos principal
pub(crate) const PRINCIPAL_ENV_VAR: &str = "AUTHPROBE_PRINCIPAL";

/// Environment variable name for the ticket-system config file
pub(crate) const KRB5_CONFIG_ENV_VAR: &str = "KRB5_CONFIG";

/// Environment variable name for the transport connect timeout
pub(crate) const CONNECT_TIMEOUT_ENV_VAR: &str = "AUTHPROBE_CONNECT_TIMEOUT";

/// Resolve the transfer-daemon port with priority: parameter -> env var -> default
pub(crate) fn resolve_endpoint_port(port_param: Option<u16>) -> u16 {
    // Priority 1: Use parameter if provided
    if let Some(port) = port_param {
        return port;
    }

    // Priority 2: Use environment variable if set
    if let Ok(env_port) = env::var(ENDPOINT_PORT_ENV_VAR)
        && let Ok(port) = env_port.parse::<u16>()
    {
        return port;
    }

    // Priority 3: Default value
    DEFAULT_ENDPOINT_PORT
}

/// Resolve the probe username with priority: parameter -> env var -> login identity
///
/// Returns `None` when no tier yields a non-empty name; the harness turns
/// that into `AuthError::IdentityUnresolvable`.
pub(crate) fn resolve_probe_user(user_param: Option<&str>) -> Option<String> {
    // Priority 1: Use parameter if provided
    if let Some(user) = user_param
        && !user.is_empty()
    {
        return Some(user.to_string());
    }

    // Priority 2: Use environment variable if set
    if let Ok(user) = env::var(PROBE_USER_ENV_VAR)
        && !user.is_empty()
    {
        return Some(user);
    }

    // Priority 3: Login identity
    identity::local_username()
}

/// Resolve the explicit Kerberos principal with priority: parameter -> env var
///
/// There is no default tier: absent a principal, the detail builder derives
/// `user@default_realm` from the located ticket config.
pub(crate) fn resolve_principal(principal_param: Option<&str>) -> Option<String> {
    // Priority 1: Use parameter if provided
    if let Some(principal) = principal_param
        && !principal.is_empty()
    {
        return Some(principal.to_string());
    }

    // Priority 2: Use environment variable if set
    if let Ok(principal) = env::var(PRINCIPAL_ENV_VAR)
        && !principal.is_empty()
    {
        return Some(principal);
    }

    None
}

/// Resolve the transport connect timeout with priority: parameter -> env var -> default
pub(crate) fn resolve_connect_timeout(timeout_param: Option<u64>) -> u64 {
    // Priority 1: Use parameter if provided
    if let Some(timeout) = timeout_param {
        return timeout;
    }

    // Priority 2: Use environment variable if set
    if let Ok(env_timeout) = env::var(CONNECT_TIMEOUT_ENV_VAR)
        && let Ok(timeout) = env_timeout.parse::<u64>()
    {
        return timeout;
    }

    // Priority 3: Default value
    DEFAULT_CONNECT_TIMEOUT_SECS
}
