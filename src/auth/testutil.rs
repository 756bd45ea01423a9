//! Shared helpers for tests that mutate process environment variables.
//!
//! Several modules resolve values from the environment (`config`, `identity`,
//! the ticket-config discovery); their tests all serialize behind one mutex
//! so concurrent test threads never race on `set_var`/`remove_var`.

use std::sync::Mutex;

use once_cell::sync::Lazy;

/// Serializes every test that touches process environment variables.
pub(crate) static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Set an environment variable from a test.
/// SAFETY: Must be called while holding `ENV_MUTEX` to prevent data races.
pub(crate) unsafe fn set_env(key: &str, value: &str) {
    // SAFETY: Caller ensures ENV_MUTEX is held
    unsafe { std::env::set_var(key, value) };
}

/// Remove an environment variable from a test.
/// SAFETY: Must be called while holding `ENV_MUTEX` to prevent data races.
pub(crate) unsafe fn remove_env(key: &str) {
    // SAFETY: Caller ensures ENV_MUTEX is held
    unsafe { std::env::remove_var(key) };
}
