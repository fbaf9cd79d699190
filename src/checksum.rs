//! Remote checksum verification.
//!
//! Downloads a binary and compares its SHA-1 digest with the declared
//! checksum. A transient 5xx answer earns exactly one retry; transport
//! errors are never retried.

use std::io;
use std::time::Duration;

use sha1::{Digest, Sha1};
use thiserror::Error;
use tracing::warn;
use ureq::http::Response;
use ureq::{Agent, Body};

/// Statuses that trigger the single retry.
pub const TRANSIENT_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Why a binary failed verification.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// Connection, TLS, timeout, or body read failure.
    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The final response status was outside `[200, 400)`.
    #[error("failed to retrieve {url}: HTTP {status}")]
    Download { url: String, status: u16 },

    /// The content hashed to something other than the declared checksum.
    #[error("checksum mismatch: declared {expected}, computed {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

/// Fetches binaries and checks them against declared checksums.
#[derive(Clone)]
pub struct ChecksumVerifier {
    agent: Agent,
}

impl ChecksumVerifier {
    /// Create a verifier whose downloads each time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }

    /// Download `url` and confirm it hashes to `declared`.
    ///
    /// Both digests are compared as lowercase hex.
    ///
    /// # Errors
    ///
    /// See [`VerifyError`]. A transient status is retried once; if the
    /// retry is transient too, the result is [`VerifyError::Download`].
    pub fn verify(&self, url: &str, declared: &str) -> Result<(), VerifyError> {
        let mut response = self.fetch(url)?;

        let status = response.status().as_u16();
        if TRANSIENT_STATUSES.contains(&status) {
            warn!(url, status, "transient status, retrying once");
            // Release the first connection before asking again.
            drop(response);
            response = self.fetch(url)?;
        }

        let status = response.status().as_u16();
        if !(200..400).contains(&status) {
            return Err(VerifyError::Download {
                url: url.to_string(),
                status,
            });
        }

        let actual = digest_body(&mut response).map_err(|e| VerifyError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let expected = declared.to_ascii_lowercase();
        if actual != expected {
            return Err(VerifyError::ChecksumMismatch { expected, actual });
        }
        Ok(())
    }

    fn fetch(&self, url: &str) -> Result<Response<Body>, VerifyError> {
        self.agent
            .get(url)
            .call()
            .map_err(|e| VerifyError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

/// Stream the full response body through SHA-1 and hex-encode the digest.
fn digest_body(response: &mut Response<Body>) -> io::Result<String> {
    let mut hasher = Sha1::new();
    io::copy(&mut response.body_mut().as_reader(), &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Lowercase hex SHA-1 of `bytes`.
#[must_use]
pub fn sha1_hex(bytes: &[u8]) -> String {
    hex::encode(Sha1::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_of_empty_input() {
        assert_eq!(sha1_hex(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn sha1_of_known_input() {
        assert_eq!(
            sha1_hex(b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn error_messages_name_url_and_status() {
        let e = VerifyError::Download {
            url: "https://example.com/x".into(),
            status: 503,
        };
        assert_eq!(e.to_string(), "failed to retrieve https://example.com/x: HTTP 503");
    }

    #[test]
    fn transient_statuses_are_the_5xx_gateway_set() {
        assert!(TRANSIENT_STATUSES.contains(&503));
        assert!(!TRANSIENT_STATUSES.contains(&501));
        assert!(!TRANSIENT_STATUSES.contains(&404));
    }
}
