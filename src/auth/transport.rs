//! Transport collaborator: one-shot connection opening.
//!
//! The engine treats the transport as an external collaborator. It opens a
//! connection to a named endpoint and reports whether the resulting handle is
//! open; the credential exchange itself happens inside the daemon dialogue
//! and is out of scope here. The handle surfaces the security context the
//! exchange established, when the daemon granted one.
//!
//! # Thread Safety
//!
//! Implementations must be `Send + Sync`: the engine holds the transport
//! behind an `Arc<dyn Transport>` shared with the harness.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tracing::debug;

use crate::auth::config::resolve_connect_timeout;
use crate::auth::context::SecurityContext;
use crate::auth::error::TransportError;
use crate::auth::method::AuthMethod;

/// Named endpoint plus the configured credential detail for one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetDescriptor {
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Method being negotiated
    pub method: AuthMethod,
    /// Detail string built by the method's detail builder
    pub details: String,
}

impl TargetDescriptor {
    /// Endpoint in `xfer://user@host:port` form.
    pub fn url(&self) -> String {
        format!("xfer://{}@{}:{}", self.user, self.host, self.port)
    }
}

impl std::fmt::Display for TargetDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// Handle to the result of a connection-open attempt.
pub trait Connection: Send {
    /// Whether the open attempt yielded a usable session.
    fn is_open(&self) -> bool;

    /// Security context established during the open, when one was granted.
    fn security_context(&self) -> Option<SecurityContext>;

    /// Close the connection. Idempotent.
    fn close(&mut self);
}

/// Trait for transport implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a single connection-open attempt against `target`.
    ///
    /// One shot: no retries, and any timeout is the transport's own; the
    /// engine never overrides it.
    async fn open(&self, target: &TargetDescriptor) -> Result<Box<dyn Connection>, TransportError>;
}

/// TCP transport probing a transfer daemon directly.
pub struct TcpTransport {
    connect_timeout: Duration,
}

impl TcpTransport {
    /// Create a TCP transport with an explicit connect timeout.
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    /// Create a TCP transport with the timeout resolved from
    /// `AUTHPROBE_CONNECT_TIMEOUT` (default: 30s).
    pub fn from_env() -> Self {
        Self::new(Duration::from_secs(resolve_connect_timeout(None)))
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn open(&self, target: &TargetDescriptor) -> Result<Box<dyn Connection>, TransportError> {
        let addr = format!("{}:{}", target.host, target.port);
        debug!("opening {}", target.url());

        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| TransportError::Timeout(self.connect_timeout.as_secs()))??;

        // The daemon-side credential exchange is delegated; an open that
        // succeeds yields a fresh context. Reusable slot offsets are assigned
        // by daemons that broker session reuse.
        Ok(Box::new(TcpConnection {
            stream: Some(stream),
            context: SecurityContext::fresh(target.method),
        }))
    }
}

struct TcpConnection {
    stream: Option<TcpStream>,
    context: SecurityContext,
}

impl Connection for TcpConnection {
    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn security_context(&self) -> Option<SecurityContext> {
        self.stream.as_ref().map(|_| self.context.clone())
    }

    fn close(&mut self) {
        // Dropping the stream shuts the socket down
        self.stream = None;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn target(host: &str, port: u16) -> TargetDescriptor {
        TargetDescriptor {
            host: host.to_string(),
            port,
            user: "alice".to_string(),
            method: AuthMethod::Password,
            details: "prompt:0 reuse:1 user:alice".to_string(),
        }
    }

    #[test]
    fn test_target_url_form() {
        let target = target("localhost", 1094);
        assert_eq!(target.url(), "xfer://alice@localhost:1094");
        assert_eq!(target.to_string(), target.url());
    }

    #[tokio::test]
    async fn test_tcp_open_against_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let transport = TcpTransport::new(Duration::from_secs(5));
        let mut conn = transport.open(&target("127.0.0.1", port)).await.unwrap();

        assert!(conn.is_open());
        let ctx = conn.security_context().unwrap();
        assert_eq!(ctx.method, AuthMethod::Password);
        assert!(!ctx.reusable());

        conn.close();
        assert!(!conn.is_open());
        assert!(conn.security_context().is_none());
    }

    #[tokio::test]
    async fn test_tcp_open_refused() {
        // Bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = TcpTransport::new(Duration::from_secs(5));
        let result = transport.open(&target("127.0.0.1", port)).await;

        assert!(matches!(result, Err(TransportError::Connect(_))));
    }

    #[tokio::test]
    async fn test_tcp_open_timeout() {
        // Non-routable address so the connect hangs until the timeout fires
        let transport = TcpTransport::new(Duration::from_millis(10));
        let result = transport.open(&target("10.255.255.1", 1094)).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let transport = TcpTransport::new(Duration::from_secs(5));
        let mut conn = transport.open(&target("127.0.0.1", port)).await.unwrap();

        conn.close();
        conn.close();
        assert!(!conn.is_open());
    }

    mod mock_transport {
        use super::super::mock::MockTransport;
        use super::*;

        #[tokio::test]
        async fn test_scripted_offset() {
            let transport = MockTransport::open_with_offset(2);
            let conn = transport.open(&target("localhost", 1094)).await.unwrap();

            assert!(conn.is_open());
            assert_eq!(conn.security_context().unwrap().offset, 2);
            assert_eq!(transport.open_count(), 1);
        }

        #[tokio::test]
        async fn test_closed_handle() {
            let transport = MockTransport::closed();
            let conn = transport.open(&target("localhost", 1094)).await.unwrap();

            assert!(!conn.is_open());
            assert!(conn.security_context().is_none());
        }

        #[tokio::test]
        async fn test_refused_open() {
            let transport = MockTransport::refused();
            assert!(transport.open(&target("localhost", 1094)).await.is_err());
            assert_eq!(transport.open_count(), 1);
        }

        #[tokio::test]
        async fn test_records_last_target() {
            let transport = MockTransport::open_without_context();
            transport.open(&target("localhost", 2094)).await.unwrap();

            let seen = transport.last_target().unwrap();
            assert_eq!(seen.port, 2094);
            assert_eq!(seen.method, AuthMethod::Password);
        }
    }
}
