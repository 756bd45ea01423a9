//! Per-(host, user) authentication records.
//!
//! A record binds a (host, user) pair to its enabled authentication methods
//! and to the security contexts established against it. Insertion order of
//! the method list defines negotiation priority; at most one entry per
//! method. `Clone` gives the deep-copy snapshot semantics the registry's
//! acquire/release discipline relies on.

use serde::{Deserialize, Serialize};

use crate::auth::context::SecurityContext;
use crate::auth::method::AuthMethod;

/// One enabled method on a record, with its method-specific detail string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodEntry {
    pub method: AuthMethod,
    pub details: String,
}

/// Configuration binding a (host, user) pair to its enabled methods.
#[derive(Debug, Clone, PartialEq)]
pub struct HostAuthRecord {
    host: String,
    user: String,
    methods: Vec<MethodEntry>,
    contexts: Vec<SecurityContext>,
}

impl HostAuthRecord {
    /// Create an empty record for a (host, user) pair.
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            methods: Vec::new(),
            contexts: Vec::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Append a method to the negotiation list.
    ///
    /// No-op when the method is already present: the original entry and its
    /// details are kept.
    pub fn add_method(&mut self, method: AuthMethod, details: impl Into<String>) {
        if self.has_method(method) {
            return;
        }
        self.methods.push(MethodEntry {
            method,
            details: details.into(),
        });
    }

    /// Remove a method from the negotiation list.
    ///
    /// Silently a no-op when the method is not present; the engine removes
    /// unconditionally after every attempt.
    pub fn remove_method(&mut self, method: AuthMethod) {
        self.methods.retain(|entry| entry.method != method);
    }

    pub fn has_method(&self, method: AuthMethod) -> bool {
        self.methods.iter().any(|entry| entry.method == method)
    }

    /// Detail string for `method`, when enabled.
    pub fn method_details(&self, method: AuthMethod) -> Option<&str> {
        self.methods
            .iter()
            .find(|entry| entry.method == method)
            .map(|entry| entry.details.as_str())
    }

    /// Enabled methods in negotiation-priority order.
    pub fn methods(&self) -> &[MethodEntry] {
        &self.methods
    }

    /// Clear the method list and invalidate attached contexts.
    pub fn reset(&mut self) {
        self.methods.clear();
        self.contexts.clear();
    }

    /// Attach a context established by a successful authentication.
    pub fn push_context(&mut self, context: SecurityContext) {
        self.contexts.push(context);
    }

    /// Established contexts in creation order.
    pub fn established(&self) -> &[SecurityContext] {
        &self.contexts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_empty() {
        let record = HostAuthRecord::new("localhost", "alice");
        assert_eq!(record.host(), "localhost");
        assert_eq!(record.user(), "alice");
        assert!(record.methods().is_empty());
        assert!(record.established().is_empty());
    }

    #[test]
    fn test_add_method_preserves_insertion_order() {
        let mut record = HostAuthRecord::new("localhost", "alice");
        record.add_method(AuthMethod::Kerberos, "k");
        record.add_method(AuthMethod::Password, "p");

        let methods: Vec<_> = record.methods().iter().map(|e| e.method).collect();
        assert_eq!(methods, vec![AuthMethod::Kerberos, AuthMethod::Password]);
    }

    #[test]
    fn test_add_method_is_idempotent() {
        let mut record = HostAuthRecord::new("localhost", "alice");
        record.add_method(AuthMethod::Password, "original");
        record.add_method(AuthMethod::Password, "replacement");

        assert_eq!(record.methods().len(), 1);
        // The original entry and its details are kept
        assert_eq!(record.method_details(AuthMethod::Password), Some("original"));
    }

    #[test]
    fn test_remove_method_is_idempotent() {
        let mut record = HostAuthRecord::new("localhost", "alice");
        record.add_method(AuthMethod::Password, "p");

        record.remove_method(AuthMethod::Password);
        let after_first = record.clone();
        record.remove_method(AuthMethod::Password);

        assert_eq!(record, after_first);
        assert!(!record.has_method(AuthMethod::Password));
    }

    #[test]
    fn test_remove_missing_method_is_silent() {
        let mut record = HostAuthRecord::new("localhost", "alice");
        record.remove_method(AuthMethod::Kerberos);
        assert!(record.methods().is_empty());
    }

    #[test]
    fn test_reset_clears_methods_and_contexts() {
        let mut record = HostAuthRecord::new("localhost", "alice");
        record.add_method(AuthMethod::Password, "p");
        record.push_context(SecurityContext::fresh(AuthMethod::Password));

        record.reset();

        assert!(record.methods().is_empty());
        assert!(record.established().is_empty());
    }

    #[test]
    fn test_contexts_keep_creation_order() {
        let mut record = HostAuthRecord::new("localhost", "alice");
        record.push_context(SecurityContext::new(AuthMethod::Password, 1));
        record.push_context(SecurityContext::new(AuthMethod::Password, 2));

        let offsets: Vec<_> = record.established().iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![1, 2]);
    }

    #[test]
    fn test_clone_is_a_deep_snapshot() {
        let mut record = HostAuthRecord::new("localhost", "alice");
        record.add_method(AuthMethod::Password, "p");
        record.push_context(SecurityContext::new(AuthMethod::Password, 3));

        let snapshot = record.clone();
        record.reset();

        assert!(record.methods().is_empty());
        assert_eq!(snapshot.methods().len(), 1);
        assert_eq!(snapshot.established().len(), 1);
    }
}
