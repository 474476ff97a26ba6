//! Transport trait.
//!
//! A [`Transport`] performs the actual network exchange. It returns
//! `Ok(response)` for any HTTP status the server produced — deciding what
//! counts as a failure is the client's job — and errors only for
//! transport-level faults (connection, TLS, timeout, malformed request).

use std::future::Future;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Underlying HTTP transport performing the network exchange.
///
/// Implementations should be async-first. Custom transports (e.g. mocks for
/// testing, or clients wrapping an existing connection pool) implement this
/// single seam.
pub trait Transport: Send + Sync {
    /// Send an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport-level faults:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid request
    fn send(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}
