//! Local identity resolution.
//!
//! Host-auth records are keyed by (host, user). When no local username can be
//! determined the whole run aborts with `AuthError::IdentityUnresolvable`;
//! there is no meaningful record key to probe under.

use std::env;

/// Environment variables consulted for the local username, in order.
const USERNAME_ENV_VARS: [&str; 2] = ["USER", "LOGNAME"];

/// Resolve the local login username from the environment.
pub fn local_username() -> Option<String> {
    USERNAME_ENV_VARS
        .iter()
        .find_map(|var| env::var(var).ok().filter(|v| !v.is_empty()))
}

/// Resolve the local hostname.
///
/// Used as the Kerberos probe target: ticket-based authentication is
/// negotiated against the machine's resolved name rather than the loopback
/// alias.
pub fn local_hostname() -> Option<String> {
    hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().into_owned())
        .filter(|h| !h.is_empty())
}
