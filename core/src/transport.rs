//! Transports that execute an `HttpRequest` against the network.
//!
//! # Design
//! `Transport` is the only I/O seam in the crate. `UreqTransport` performs
//! the blocking round-trip; `RewriteTransport` wraps any other transport and
//! points every request at a fixed scheme/host/port, which is how production
//! targets the real API host and tests target a local mock server without
//! touching call sites.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Implementations must return non-2xx responses as `Ok` so status
/// interpretation stays with the client.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).send(request)
    }
}

/// Blocking transport backed by a shared `ureq::Agent`.
///
/// Clones share the agent and therefore its connection pool.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Transport without a request timeout.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Transport that fails any round-trip taking longer than `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.agent.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .call()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Decorator that redirects every request to `target`'s scheme, host and
/// port, leaving path, query and headers untouched.
#[derive(Debug, Clone)]
pub struct RewriteTransport<T> {
    target: Url,
    inner: T,
}

impl<T> RewriteTransport<T> {
    pub fn new(target: Url, inner: T) -> Self {
        Self { target, inner }
    }

    /// Parse `target` and wrap `inner`.
    pub fn parse(target: &str, inner: T) -> Result<Self, ApiError> {
        Ok(Self::new(Url::parse(target)?, inner))
    }

    pub fn target(&self) -> &Url {
        &self.target
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Copy of `request` addressed to the target origin.
    pub fn rewrite(&self, request: &HttpRequest) -> Result<HttpRequest, ApiError> {
        let mut url = Url::parse(&request.url)?;
        url.set_scheme(self.target.scheme()).map_err(|()| {
            ApiError::InvalidUrl(format!(
                "cannot switch {} to scheme {}",
                request.url,
                self.target.scheme()
            ))
        })?;
        url.set_host(self.target.host_str())?;
        url.set_port(self.target.port()).map_err(|()| {
            ApiError::InvalidUrl(format!("cannot set port on {}", request.url))
        })?;

        Ok(HttpRequest {
            url: url.into(),
            headers: request.headers.clone(),
        })
    }
}

impl<T: Transport> Transport for RewriteTransport<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let rewritten = self.rewrite(request)?;
        debug!(from = %request.url, to = %rewritten.url, "rewrote request target");
        self.inner.send(&rewritten)
    }
}
