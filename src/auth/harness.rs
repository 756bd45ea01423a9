//! Probe orchestration.
//!
//! The harness runs the standard two-method probe: password (method 0)
//! against `localhost`, Kerberos (method 2) against the resolved hostname.
//! Each attempt runs inside an acquire/release pair on the host-auth
//! registry, so the registry is left exactly as found whether or not the
//! attempt succeeded.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::auth::config::{resolve_endpoint_port, resolve_principal, resolve_probe_user};
use crate::auth::engine::NegotiationEngine;
use crate::auth::error::AuthError;
use crate::auth::identity;
use crate::auth::method::{AuthMethod, MethodRegistry};
use crate::auth::registry::HostAuthRegistry;
use crate::auth::transport::Transport;
use crate::auth::types::{MethodReport, NegotiationOutcome, ProbeReport, ProbeStatus, ReuseStatus};

/// Caller-supplied probe parameters.
///
/// Every field is optional; absent values resolve through the environment
/// (see the `config` module) and, for the user, the login identity.
#[derive(Debug, Clone, Default)]
pub struct ProbeOptions {
    /// Transfer-daemon port (`AUTHPROBE_PORT`, default 1094)
    pub port: Option<u16>,
    /// Username the probe records are keyed by (`AUTHPROBE_USER`, login user)
    pub user: Option<String>,
    /// Explicit Kerberos principal, used verbatim (`AUTHPROBE_PRINCIPAL`)
    pub principal: Option<String>,
    /// Ticket-system config override (`KRB5_CONFIG`, `/etc/krb5.conf`)
    pub krb5_config: Option<PathBuf>,
}

/// Runs probe plans against a registry and a transport.
pub struct ProbeHarness {
    registry: Arc<HostAuthRegistry>,
    transport: Arc<dyn Transport>,
}

impl ProbeHarness {
    /// Create a harness with a fresh registry.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_registry(Arc::new(HostAuthRegistry::new()), transport)
    }

    /// Create a harness over an existing registry.
    pub fn with_registry(registry: Arc<HostAuthRegistry>, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry,
            transport,
        }
    }

    pub fn registry(&self) -> &HostAuthRegistry {
        &self.registry
    }

    /// Run the standard two-method probe, detecting the method table from
    /// the environment.
    ///
    /// # Errors
    ///
    /// `AuthError::IdentityUnresolvable` when no local username can be
    /// determined. Per-method failures never surface here; they land in the
    /// report.
    pub async fn run(&self, opts: &ProbeOptions) -> Result<ProbeReport, AuthError> {
        let principal = resolve_principal(opts.principal.as_deref());
        let methods = Arc::new(MethodRegistry::detect(
            opts.krb5_config.as_deref(),
            principal.as_deref(),
        ));
        self.run_with_methods(opts, methods).await
    }

    /// Run the standard two-method probe with a pre-built method table.
    ///
    /// The seam for callers that already probed their environment.
    pub async fn run_with_methods(
        &self,
        opts: &ProbeOptions,
        methods: Arc<MethodRegistry>,
    ) -> Result<ProbeReport, AuthError> {
        let user =
            resolve_probe_user(opts.user.as_deref()).ok_or(AuthError::IdentityUnresolvable)?;
        let port = resolve_endpoint_port(opts.port);

        info!(user = %user, port, "starting authentication probe");

        let engine =
            NegotiationEngine::new(self.registry.clone(), methods.clone(), self.transport.clone());
        let mut report = ProbeReport::new(&user);

        // Password against the loopback endpoint
        let outcome = self
            .probe_method(&engine, "localhost", &user, AuthMethod::Password, port)
            .await;
        report.push(report_line(&methods, &outcome));

        // Kerberos against the resolved hostname; skipped when unavailable
        if methods.is_available(AuthMethod::Kerberos) {
            let host = identity::local_hostname().unwrap_or_else(|| "localhost".to_string());
            let outcome = self
                .probe_method(&engine, &host, &user, AuthMethod::Kerberos, port)
                .await;
            report.push(report_line(&methods, &outcome));
        } else {
            info!("kerberos not testable in this environment; skipping");
            report.push(skipped_line(AuthMethod::Kerberos));
        }

        Ok(report)
    }

    async fn probe_method(
        &self,
        engine: &NegotiationEngine,
        host: &str,
        user: &str,
        method: AuthMethod,
        port: u16,
    ) -> NegotiationOutcome {
        let lease = self.registry.acquire(host, user);
        let outcome = engine.attempt(lease.key(), method, port).await;
        // Release runs whether or not the attempt succeeded
        self.registry.release(lease);
        outcome
    }
}

/// Map an attempt outcome onto its report line.
fn report_line(methods: &MethodRegistry, outcome: &NegotiationOutcome) -> MethodReport {
    let (status, reuse) = if !outcome.success {
        (ProbeStatus::Failed, Some(ReuseStatus::NotApplicable))
    } else if outcome.reuse == ReuseStatus::NotDetermined {
        (ProbeStatus::NotTestable, None)
    } else {
        (ProbeStatus::Successful, Some(outcome.reuse))
    };

    MethodReport {
        method: outcome.method,
        name: outcome.method.name().to_string(),
        available: methods.is_available(outcome.method),
        status,
        reuse,
    }
}

/// Report line for a method skipped as unavailable.
fn skipped_line(method: AuthMethod) -> MethodReport {
    MethodReport {
        method,
        name: method.name().to_string(),
        available: false,
        status: ProbeStatus::NotTested,
        reuse: None,
    }
}
