// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Abstraction over the reading service API.
//!
//! Sessions and sweeps only need one thing from the network: "deliver this
//! ping, tell me whether it worked". Keeping that behind a trait lets tests
//! script outcomes without a server.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rp_core::Ping;

/// Error type for API operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The service could not be reached, or did not answer in time.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The service answered and refused the ping.
    #[error("server rejected ping (HTTP {status}): {message}")]
    ServerRejected { status: u16, message: String },

    /// The service answered with something that is not a valid reply.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Boxed future returned by [`ApiWrapper`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = ApiResult<T>> + Send + 'a>>;

/// The network collaborator that performs authenticated calls.
///
/// Implementations enforce their own timeouts; a request that never
/// completes must resolve to [`ApiError::NetworkUnavailable`].
pub trait ApiWrapper: Send + Sync {
    /// Deliver one ping to the service.
    fn send_ping<'a>(&'a self, ping: &'a Ping) -> ApiFuture<'a, ()>;
}

impl<A: ApiWrapper + ?Sized> ApiWrapper for Arc<A> {
    fn send_ping<'a>(&'a self, ping: &'a Ping) -> ApiFuture<'a, ()> {
        (**self).send_ping(ping)
    }
}
