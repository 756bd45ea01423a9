//! Authentication method negotiation and session-reuse probe.
//!
//! `authprobe` negotiates credential methods (password, Kerberos ticket)
//! against a file-transfer daemon and verifies whether an established
//! security context was reused or a fresh handshake took place. The probe
//! leaves the host-auth registry exactly as it found it: every negotiation
//! runs inside a snapshot/restore pair.

pub mod auth;
