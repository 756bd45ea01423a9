//! Negotiation engine: one authentication attempt per method.
//!
//! Each attempt walks the phases `Idle -> Configuring -> Connecting` and
//! terminates in `Succeeded` or `Failed`. Every failure is absorbed into the
//! returned [`NegotiationOutcome`]; nothing unwinds to the caller, so a probe
//! run always continues to its remaining methods.
//!
//! On completion, successful or not, the attempted method is removed from
//! the record's active list, so a later method's negotiation never sees a
//! previous one's configuration.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::auth::context::classify_reuse;
use crate::auth::error::AuthError;
use crate::auth::method::{AuthMethod, MethodRegistry};
use crate::auth::registry::{HostAuthRegistry, RecordKey};
use crate::auth::transport::{TargetDescriptor, Transport};
use crate::auth::types::{AttemptPhase, NegotiationOutcome, ReuseStatus};

/// Drives method negotiation against host-auth records.
pub struct NegotiationEngine {
    registry: Arc<HostAuthRegistry>,
    methods: Arc<MethodRegistry>,
    transport: Arc<dyn Transport>,
}

/// How one attempt ended, before the outcome is assembled.
enum AttemptEnd {
    Succeeded(ReuseStatus),
    Failed { phase: AttemptPhase, error: AuthError },
}

impl NegotiationEngine {
    pub fn new(
        registry: Arc<HostAuthRegistry>,
        methods: Arc<MethodRegistry>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            registry,
            methods,
            transport,
        }
    }

    /// Run a single negotiation attempt for `method` against the record at
    /// `key`, connecting to the daemon on `port`.
    ///
    /// Never fails: every input terminates in an outcome with the attempt
    /// either `Succeeded` or `Failed`. The method is removed from the
    /// record's active list before returning, regardless of outcome.
    pub async fn attempt(
        &self,
        key: &RecordKey,
        method: AuthMethod,
        port: u16,
    ) -> NegotiationOutcome {
        debug!(method = %method, target = %key, "negotiation attempt: idle -> configuring");
        let end = self.drive(key, method, port).await;

        // Unconditional: the attempted method never outlives its attempt
        self.registry.remove_method(key, method);

        match end {
            AttemptEnd::Succeeded(reuse) => {
                info!(method = %method, reuse = %reuse, "negotiation attempt succeeded");
                NegotiationOutcome {
                    method,
                    success: true,
                    reuse,
                    failed_phase: None,
                    error: None,
                    finished_at: Utc::now().to_rfc3339(),
                }
            }
            AttemptEnd::Failed { phase, error } => {
                warn!(method = %method, phase = %phase, "negotiation attempt failed: {error}");
                NegotiationOutcome {
                    method,
                    success: false,
                    reuse: ReuseStatus::NotApplicable,
                    failed_phase: Some(phase),
                    error: Some(error.to_string()),
                    finished_at: Utc::now().to_rfc3339(),
                }
            }
        }
    }

    async fn drive(&self, key: &RecordKey, method: AuthMethod, port: u16) -> AttemptEnd {
        // Configuring: build the method-specific detail string. An
        // unavailable method or a failed detail construction never enters
        // the connect phase.
        let details = match self.methods.build_details(method, &key.user) {
            Ok(details) => details,
            Err(error) => {
                return AttemptEnd::Failed {
                    phase: AttemptPhase::Configuring,
                    error,
                };
            }
        };
        self.registry.add_method(key, method, details.clone());

        debug!(method = %method, "configuring -> connecting");
        let target = TargetDescriptor {
            host: key.host.clone(),
            port,
            user: key.user.clone(),
            method,
            details,
        };

        // Connecting: a single open attempt, no retries, no engine-level
        // timeout override
        let mut conn = match self.transport.open(&target).await {
            Ok(conn) => conn,
            Err(error) => {
                return AttemptEnd::Failed {
                    phase: AttemptPhase::Connecting,
                    error: AuthError::ConnectionFailed {
                        target: target.url(),
                        reason: error.to_string(),
                    },
                };
            }
        };

        if !conn.is_open() {
            conn.close();
            return AttemptEnd::Failed {
                phase: AttemptPhase::Connecting,
                error: AuthError::ConnectionFailed {
                    target: target.url(),
                    reason: "handle did not report open".to_string(),
                },
            };
        }

        // Succeeded: attach whatever context the exchange established, then
        // classify reuse against the record's store
        if let Some(context) = conn.security_context() {
            self.registry.push_context(key, context);
        }
        let reuse = classify_reuse(&self.registry.established(key), method);
        conn.close();

        AttemptEnd::Succeeded(reuse)
    }
}
