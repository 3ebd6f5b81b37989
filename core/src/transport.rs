//! Executing `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the single I/O seam of the crate. It returns `Ok` for any
//! response the server produced, whatever the status; deciding what counts as
//! a rejection is the client's job. What the transport does decide is the
//! failure shape when no response exists: a request that could not be built
//! never left the process, while a request that was sent but went unanswered
//! is a `NoResponse`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::RestError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RestError>;
}

/// `reqwest`-backed transport with a persistent cookie jar, so the session
/// cookie set by `POST /api/login` rides along on every later call.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    origin: Url,
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// `origin` resolves origin-relative URLs (same-origin deployments).
    pub fn new(origin: Url) -> Result<Self, RestError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| RestError::construction(e.to_string()))?;
        Ok(Self { origin, http })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    fn resolve(&self, url: &str) -> Result<Url, RestError> {
        self.origin
            .join(url)
            .map_err(|e| RestError::construction(format!("invalid URL {url:?}: {e}")))
    }

    fn build(&self, request: HttpRequest) -> Result<reqwest::Request, RestError> {
        let url = self.resolve(&request.url)?;
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| RestError::construction(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| RestError::construction(format!("invalid value for header {name}: {e}")))?;
            headers.append(name, value);
        }

        let mut builder = self.http.request(method, url).headers(headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        builder
            .build()
            .map_err(|e| RestError::construction(e.to_string()))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RestError> {
        let request = self.build(request)?;

        let response = self.http.execute(request).await.map_err(classify_send_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| RestError::no_response(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Errors from `Client::execute`. Builder errors mean the request never went
/// out; everything else happened on the wire.
fn classify_send_error(err: reqwest::Error) -> RestError {
    if err.is_builder() {
        RestError::construction(err.to_string())
    } else {
        RestError::no_response(err.to_string())
    }
}
