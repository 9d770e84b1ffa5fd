//! Synchronous client for the AppTweak keyword-search API.
//!
//! # Overview
//! `AuthClient` attaches an API token to every request, builds the search
//! URL from `Options`, sends it through a `Transport` and decodes the JSON
//! envelope into `KeywordSearchResponse`.
//!
//! # Design
//! - Request building and response parsing are pure (`build_*` / `parse_*`);
//!   the `Transport` trait is the only I/O seam.
//! - `RewriteTransport` redirects requests to another origin, so the same
//!   client code talks to the real host or to a local mock server.
//! - No retries, caching or rate limiting: every call is one GET and every
//!   failure is returned to the caller.
//!
//! ```no_run
//! use apptweak_core::{AuthClient, Config, Device, Options};
//!
//! let client = AuthClient::from_config(&Config::from_env()?);
//! let resp = client.keyword_search(&Options::new("micro-learning").with_device(Device::Iphone))?;
//! for app in &resp.apps {
//!     println!("{}", app.title);
//! }
//! # Ok::<(), apptweak_core::ApiError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{AuthClient, API_KEY_HEADER, KEYWORD_SEARCH_PATH};
pub use config::Config;
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse};
pub use transport::{RewriteTransport, Transport, UreqTransport};
pub use types::{App, Device, KeywordSearchResponse, Metadata, Options, RequestMetadata, RequestParams};
