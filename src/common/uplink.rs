//! Network seams used by the control loop.

use core::fmt::Debug;

use heapless::Vec;
use log::warn;
use thiserror_no_std::Error;

/// Bytes of response body kept per request; the rest is dropped.
pub const REPLY_CAPACITY: usize = 512;

/// Failures where no HTTP status was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("DNS lookup failed")]
    Dns,
    #[error("connection failed")]
    Connect,
    #[error("TLS handshake failed")]
    Tls,
    #[error("malformed HTTP exchange")]
    Protocol,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8, REPLY_CAPACITY>,
}

impl HttpReply {
    /// Copies `body`, cutting it at [`REPLY_CAPACITY`]. A cut body will not
    /// parse as JSON, so an oversized reply never actuates the relay.
    pub fn new(status: u16, body: &[u8]) -> Self {
        let kept = body.len().min(REPLY_CAPACITY);
        if kept < body.len() {
            warn!("response body truncated from {} to {} bytes", body.len(), kept);
        }
        Self {
            status,
            body: Vec::from_slice(&body[..kept]).unwrap_or_default(),
        }
    }

    /// Keeps the status even when its body could not be read. The body is
    /// left empty, which never parses as a command.
    pub fn from_body_read<E: Debug>(status: u16, body: Result<&[u8], E>) -> Self {
        match body {
            Ok(body) => Self::new(status, body),
            Err(e) => {
                warn!("failed to read response body (status {}): {:?}", status, e);
                Self::new(status, &[])
            }
        }
    }

    pub fn body_str(&self) -> &str {
        core::str::from_utf8(&self.body).unwrap_or("<non-utf8 body>")
    }
}

pub trait Transport {
    /// Sends one `POST` with `Content-Type: application/json`.
    async fn post_json(&mut self, url: &str, body: &[u8]) -> Result<HttpReply, TransportError>;
}

pub trait Connectivity {
    /// Whether the network association is usable right now.
    fn is_connected(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_keeps_small_body() {
        let reply = HttpReply::new(201, br#"{"command":"ON"}"#);
        assert_eq!(reply.status, 201);
        assert_eq!(reply.body_str(), r#"{"command":"ON"}"#);
    }

    #[test]
    fn test_reply_truncates_large_body() {
        let big = [b'x'; REPLY_CAPACITY + 40];
        let reply = HttpReply::new(200, &big);
        assert_eq!(reply.body.len(), REPLY_CAPACITY);
    }

    #[test]
    fn test_reply_keeps_status_when_body_read_fails() {
        let reply = HttpReply::from_body_read::<&str>(201, Err("buffer too small"));
        assert_eq!(reply.status, 201);
        assert!(reply.body.is_empty());
    }

    #[test]
    fn test_reply_from_successful_body_read() {
        let body: Result<&[u8], ()> = Ok(br#"{"command":"OFF"}"#);
        let reply = HttpReply::from_body_read(200, body);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body_str(), r#"{"command":"OFF"}"#);
    }

    #[test]
    fn test_reply_non_utf8_body() {
        let reply = HttpReply::new(200, &[0xff, 0xfe]);
        assert_eq!(reply.body_str(), "<non-utf8 body>");
    }
}
