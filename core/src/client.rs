//! Token-bearing client for the AppTweak API.
//!
//! # Design
//! `AuthClient` holds a token and a `Transport`, nothing else. Each operation
//! is split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`; the operation method
//! itself only chains build, `Transport::send` and parse. Requests are always
//! addressed to the production host; redirecting them is the transport's job
//! (see `RewriteTransport`).

use std::fmt;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::{Config, DEFAULT_BASE_URL};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{RewriteTransport, Transport, UreqTransport};
use crate::types::{KeywordSearchResponse, Options};

/// Header AppTweak reads the API token from.
pub const API_KEY_HEADER: &str = "X-Apptweak-Key";

pub const KEYWORD_SEARCH_PATH: &str = "/ios/searches.json";

/// Client that attaches its token to every request it sends.
#[derive(Clone)]
pub struct AuthClient<T = UreqTransport> {
    token: String,
    transport: T,
}

impl<T> AuthClient<T> {
    pub fn new(token: impl Into<String>, transport: T) -> Self {
        Self {
            token: token.into(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Request for a keyword search on the iOS App Store.
    pub fn build_keyword_search(&self, options: &Options) -> Result<HttpRequest, ApiError> {
        let url = Url::parse_with_params(
            &format!("{DEFAULT_BASE_URL}{KEYWORD_SEARCH_PATH}"),
            options.query_pairs(),
        )?;
        Ok(self.authorized(url))
    }

    pub fn parse_keyword_search(&self, response: HttpResponse) -> Result<KeywordSearchResponse, ApiError> {
        parse_json(response)
    }

    fn authorized(&self, url: Url) -> HttpRequest {
        HttpRequest {
            url: url.into(),
            headers: vec![
                (API_KEY_HEADER.to_string(), self.token.clone()),
                ("Accept".to_string(), "application/json".to_string()),
            ],
        }
    }
}

impl<T: Transport> AuthClient<T> {
    /// Search the App Store for `options.term`.
    ///
    /// Issues exactly one GET; failures are returned as-is, never retried.
    #[instrument(skip_all, fields(term = %options.term))]
    pub fn keyword_search(&self, options: &Options) -> Result<KeywordSearchResponse, ApiError> {
        if options.term.trim().is_empty() {
            warn!("keyword search with an empty term");
        }
        let request = self.build_keyword_search(options)?;
        debug!(url = %request.url, "sending keyword search");
        let response = self.transport.send(&request)?;
        self.parse_keyword_search(response)
    }
}

impl AuthClient<RewriteTransport<UreqTransport>> {
    /// Production client: ureq with the configured timeout, rewritten to
    /// `config.base_url`.
    pub fn from_config(config: &Config) -> Self {
        let inner = match config.timeout {
            Some(timeout) => UreqTransport::with_timeout(timeout),
            None => UreqTransport::new(),
        };
        Self::new(
            config.token.clone(),
            RewriteTransport::new(config.base_url.clone(), inner),
        )
    }
}

impl<T: fmt::Debug> fmt::Debug for AuthClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthClient")
            .field("token", &"<redacted>")
            .field("transport", &self.transport)
            .finish()
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "request rejected by server");
    match response.status {
        401 | 403 => Err(ApiError::Unauthorized {
            body: response.text().into_owned(),
        }),
        status => Err(ApiError::HttpError {
            status,
            body: response.text().into_owned(),
        }),
    }
}

fn parse_json<R: DeserializeOwned>(response: HttpResponse) -> Result<R, ApiError> {
    check_status(&response)?;
    if let Some(content_type) = response.header("content-type") {
        if !content_type.starts_with("application/json") {
            warn!(content_type, "unexpected content type, decoding anyway");
        }
    }
    serde_json::from_slice(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
