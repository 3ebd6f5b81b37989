//! Client core for the short link management API.
//!
//! # Overview
//! Builds `HttpRequest` values for the `/api/shortlinks` and `/api/login`
//! endpoints, executes them through a pluggable `Transport`, and turns
//! failures into user-facing messages on a notification bus. A small
//! clipboard helper copies short link URLs for the UI.
//!
//! # Design
//! - `LinkRequests` is pure: it holds the base URI and default headers and
//!   never touches the network.
//! - `LinkServiceClient` issues one request per call through an injected
//!   transport; failures are tagged as `RestError` at that boundary.
//! - The event bus, default headers, and clipboard backend are constructor
//!   arguments, never process-wide state.

pub mod client;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod report;
pub mod requests;
pub mod transport;
pub mod types;

pub use client::LinkServiceClient;
pub use clipboard::{ClipboardBackend, ClipboardHelper, StagingArea};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use config::{ClientConfig, Deployment};
pub use error::{CallError, ClipboardError, ConfigError, DecodeError, RestError};
pub use events::{Event, EventBus, MAIN_ERROR_TOPIC};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use report::{classify, ErrorReporter};
pub use requests::{parse_link, parse_link_page, LinkRequests};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Credentials, LinkId, LinkPayload, PageQuery, ShortLink, ShortLinkPage};
