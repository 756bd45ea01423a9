//! Authentication method negotiation and session-reuse probing.
//!
//! This module is organized into the following submodules:
//!
//! - `types`: Serializable outcome and report types
//! - `config`: Configuration resolution with environment variable support
//! - `error`: Error taxonomy (absorbed per-method, fatal only for identity)
//! - `identity`: Local username and hostname resolution
//! - `method`: Authentication methods, detail builders, method registry
//! - `record`: Per-(host, user) authentication records
//! - `registry`: Host-auth registry with scoped acquire/release
//! - `context`: Security contexts and reuse classification
//! - `transport`: Connection-open collaborator (TCP + scripted mock)
//! - `engine`: Per-method negotiation state machine
//! - `harness`: Probe orchestration and report assembly

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod harness;
pub mod identity;
pub mod method;
pub mod record;
pub mod registry;
#[cfg(test)]
pub(crate) mod testutil;
pub mod transport;
pub mod types;

pub use engine::NegotiationEngine;
pub use harness::{ProbeHarness, ProbeOptions};
pub use method::{AuthMethod, MethodRegistry};
pub use registry::{HostAuthRegistry, RecordKey};
pub use types::{NegotiationOutcome, ProbeReport};
