//! Serializable outcome and report types for the probe.
//!
//! All types implement `Serialize` and `Deserialize` so probe results can be
//! consumed by tooling as well as rendered as the plain-text results table.

use serde::{Deserialize, Serialize};

use crate::auth::method::AuthMethod;

/// Reuse classification of a negotiation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReuseStatus {
    /// A full handshake took place; no reusable slot was found.
    Fresh,
    /// An existing reusable security context was found.
    Reused,
    /// The attempt succeeded but no matching context was established.
    NotDetermined,
    /// The attempt did not succeed; reuse is meaningless.
    NotApplicable,
}

impl std::fmt::Display for ReuseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReuseStatus::Fresh => write!(f, "fresh"),
            ReuseStatus::Reused => write!(f, "reused"),
            ReuseStatus::NotDetermined => write!(f, "not determined"),
            ReuseStatus::NotApplicable => write!(f, "n/a"),
        }
    }
}

/// Final status of one method in the probe report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// The attempt terminated without an open handle.
    Failed,
    /// The attempt succeeded and reuse was classified.
    Successful,
    /// The attempt succeeded but its reuse outcome stayed undetermined.
    NotTestable,
    /// The method was skipped (unavailable in this environment).
    NotTested,
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStatus::Failed => write!(f, "failed"),
            ProbeStatus::Successful => write!(f, "successful"),
            ProbeStatus::NotTestable => write!(f, "not testable"),
            ProbeStatus::NotTested => write!(f, "not tested"),
        }
    }
}

/// Phase of a negotiation attempt.
///
/// Each attempt walks `Idle -> Configuring -> Connecting` and terminates in
/// `Succeeded` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptPhase {
    Idle,
    Configuring,
    Connecting,
    Succeeded,
    Failed,
}

impl std::fmt::Display for AttemptPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptPhase::Idle => write!(f, "idle"),
            AttemptPhase::Configuring => write!(f, "configuring"),
            AttemptPhase::Connecting => write!(f, "connecting"),
            AttemptPhase::Succeeded => write!(f, "succeeded"),
            AttemptPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of a single negotiation attempt. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiationOutcome {
    /// Method that was attempted
    pub method: AuthMethod,
    /// Whether the connection-open attempt yielded an open handle
    pub success: bool,
    /// Reuse classification (`NotApplicable` when the attempt failed)
    pub reuse: ReuseStatus,
    /// Phase in which a failed attempt terminated (absent on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_phase: Option<AttemptPhase>,
    /// Failure description (absent on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the attempt completed (RFC3339 format)
    pub finished_at: String,
}

/// One line of the probe report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodReport {
    pub method: AuthMethod,
    pub name: String,
    /// Whether the method was usable in the probed environment
    pub available: bool,
    pub status: ProbeStatus,
    /// Reuse classification for attempted methods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reuse: Option<ReuseStatus>,
}

/// Results of a full probe run.
///
/// Attempted methods land in `tested`; methods that were skipped or whose
/// reuse outcome stayed undetermined land in `untestable` and render under a
/// separate "could not be tested" section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeReport {
    /// User the probe records were keyed by
    pub user: String,
    pub tested: Vec<MethodReport>,
    pub untestable: Vec<MethodReport>,
}

impl ProbeReport {
    /// Create an empty report for `user`.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            tested: Vec::new(),
            untestable: Vec::new(),
        }
    }

    /// File a line under the main table or the "could not be tested" section.
    pub fn push(&mut self, line: MethodReport) {
        match line.status {
            ProbeStatus::NotTestable | ProbeStatus::NotTested => self.untestable.push(line),
            ProbeStatus::Failed | ProbeStatus::Successful => self.tested.push(line),
        }
    }
}

const REPORT_WIDTH: usize = 64;

fn report_row(f: &mut std::fmt::Formatter<'_>, text: &str) -> std::fmt::Result {
    writeln!(f, "| {:<width$} |", text, width = REPORT_WIDTH - 2)
}

impl std::fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rule = format!("+{}+", "-".repeat(REPORT_WIDTH));

        writeln!(f, "{rule}")?;
        report_row(
            f,
            &format!("authentication probe results for user {}", self.user),
        )?;
        writeln!(f, "{rule}")?;
        for line in &self.tested {
            let reuse = line
                .reuse
                .map(|r| format!("  (reuse: {r})"))
                .unwrap_or_default();
            report_row(
                f,
                &format!(
                    "method {} ({:<11}) {:<12}{}",
                    line.method.id(),
                    line.name,
                    line.status.to_string(),
                    reuse
                ),
            )?;
        }
        if !self.untestable.is_empty() {
            report_row(f, "")?;
            report_row(f, "could not be tested:")?;
            for line in &self.untestable {
                report_row(
                    f,
                    &format!(
                        "method {} ({:<11}) {}",
                        line.method.id(),
                        line.name,
                        line.status
                    ),
                )?;
            }
        }
        writeln!(f, "{rule}")
    }
}
