//! Security contexts and reuse classification.
//!
//! A security context is the state left behind by a successful
//! authentication. Its `offset` tells the reuse story: a non-negative offset
//! points at an existing reusable session slot on the daemon side, while
//! [`FRESH_OFFSET`] marks a session that was negotiated by a full handshake
//! in the current attempt and cannot be reused yet.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::method::AuthMethod;
use crate::auth::types::ReuseStatus;

/// Sentinel offset marking a freshly negotiated, not-yet-reusable session.
pub const FRESH_OFFSET: i64 = -1;

/// State representing an established, possibly-reusable authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityContext {
    pub id: Uuid,
    /// Method that established this context
    pub method: AuthMethod,
    /// Reusable session slot (`>= 0`) or [`FRESH_OFFSET`]
    pub offset: i64,
    /// When the context was established (RFC3339 format)
    pub established_at: String,
}

impl SecurityContext {
    /// Create a context for `method` at `offset`.
    pub fn new(method: AuthMethod, offset: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            method,
            offset,
            established_at: Utc::now().to_rfc3339(),
        }
    }

    /// Create a freshly negotiated, not-yet-reusable context.
    pub fn fresh(method: AuthMethod) -> Self {
        Self::new(method, FRESH_OFFSET)
    }

    /// Whether this context points at an existing reusable session slot.
    pub fn reusable(&self) -> bool {
        self.offset >= 0
    }
}

/// Classify the reuse outcome of a successful attempt.
///
/// Scans `established` in creation order for the first context matching
/// `method`: a reusable offset classifies as `Reused`, a fresh one as
/// `Fresh`. No matching context at all classifies as `NotDetermined`: the
/// attempt succeeded but left nothing to judge reuse by.
pub fn classify_reuse(established: &[SecurityContext], method: AuthMethod) -> ReuseStatus {
    match established.iter().find(|ctx| ctx.method == method) {
        Some(ctx) if ctx.reusable() => ReuseStatus::Reused,
        Some(_) => ReuseStatus::Fresh,
        None => ReuseStatus::NotDetermined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_is_not_reusable() {
        let ctx = SecurityContext::fresh(AuthMethod::Password);
        assert_eq!(ctx.offset, FRESH_OFFSET);
        assert!(!ctx.reusable());
    }

    #[test]
    fn test_offset_zero_is_reusable() {
        let ctx = SecurityContext::new(AuthMethod::Password, 0);
        assert!(ctx.reusable());
    }

    #[test]
    fn test_positive_offset_is_reusable() {
        let ctx = SecurityContext::new(AuthMethod::Kerberos, 5);
        assert!(ctx.reusable());
    }

    #[test]
    fn test_contexts_get_distinct_ids() {
        let a = SecurityContext::fresh(AuthMethod::Password);
        let b = SecurityContext::fresh(AuthMethod::Password);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialize_round_trip() {
        let ctx = SecurityContext::new(AuthMethod::Kerberos, 3);
        let json = serde_json::to_string(&ctx).unwrap();
        let back: SecurityContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }

    mod classification {
        use super::*;

        #[test]
        fn test_reusable_offset_classifies_as_reused() {
            let established = [SecurityContext::new(AuthMethod::Password, 5)];
            assert_eq!(
                classify_reuse(&established, AuthMethod::Password),
                ReuseStatus::Reused
            );
        }

        #[test]
        fn test_fresh_offset_classifies_as_fresh() {
            let established = [SecurityContext::new(AuthMethod::Password, FRESH_OFFSET)];
            assert_eq!(
                classify_reuse(&established, AuthMethod::Password),
                ReuseStatus::Fresh
            );
        }

        #[test]
        fn test_no_context_classifies_as_not_determined() {
            assert_eq!(
                classify_reuse(&[], AuthMethod::Password),
                ReuseStatus::NotDetermined
            );
        }

        #[test]
        fn test_other_methods_are_ignored() {
            let established = [SecurityContext::new(AuthMethod::Kerberos, 5)];
            assert_eq!(
                classify_reuse(&established, AuthMethod::Password),
                ReuseStatus::NotDetermined
            );
        }

        #[test]
        fn test_first_matching_context_wins() {
            // Two contexts for the same method: classification follows the
            // first in creation order
            let established = [
                SecurityContext::new(AuthMethod::Password, FRESH_OFFSET),
                SecurityContext::new(AuthMethod::Password, 5),
            ];
            assert_eq!(
                classify_reuse(&established, AuthMethod::Password),
                ReuseStatus::Fresh
            );
        }
    }
}
