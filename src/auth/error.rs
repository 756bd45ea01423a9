//! Error taxonomy for the negotiation engine.
//!
//! Per-method failures are absorbed locally into `NegotiationOutcome` values
//! and never unwind past the probe harness. The only failure that propagates
//! to a caller is identity resolution at startup: without a local username no
//! meaningful record key can be formed.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the negotiation engine and probe harness.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Required method configuration could not be resolved (e.g. no ticket
    /// config discoverable). The method is skipped; the run continues.
    #[error("authentication configuration unavailable: {0}")]
    ConfigurationUnavailable(String),

    /// The connection-open attempt did not yield an open handle.
    #[error("connection to {target} failed: {reason}")]
    ConnectionFailed { target: String, reason: String },

    /// No local username could be determined. Fatal to the whole run.
    #[error("local identity could not be resolved (set USER, LOGNAME or AUTHPROBE_USER)")]
    IdentityUnresolvable,
}

/// Errors reported by the transport collaborator.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(#[from] std::io::Error),

    #[error("connect timed out after {0}s")]
    Timeout(u64),
}

/// Errors from ticket-realm discovery.
#[derive(Debug, Error)]
pub enum RealmError {
    /// The config file carries no `default_realm` record.
    #[error("no default_realm entry in {0}")]
    NotFound(PathBuf),

    /// The config file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}
