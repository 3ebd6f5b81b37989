//! Asynchronous client for the short link API.
//!
//! # Design
//! `LinkServiceClient` pairs the pure `LinkRequests` builder with an injected
//! `Transport`. Every operation issues exactly one request: no retries, no
//! deduplication, no caching. A 2xx response is handed back unmodified; any
//! other status becomes `RestError::ServerRejection` carrying the body.

use tracing::debug;

use crate::error::{CallError, RestError};
use crate::http::{HttpRequest, HttpResponse};
use crate::requests::{parse_link, parse_link_page, LinkRequests};
use crate::transport::Transport;
use crate::types::{Credentials, LinkId, LinkPayload, PageQuery, ShortLink, ShortLinkPage};

#[derive(Debug, Clone)]
pub struct LinkServiceClient<T> {
    requests: LinkRequests,
    transport: T,
}

impl<T: Transport> LinkServiceClient<T> {
    pub fn new(requests: LinkRequests, transport: T) -> Self {
        Self {
            requests,
            transport,
        }
    }

    pub fn requests(&self) -> &LinkRequests {
        &self.requests
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn list_links(&self, query: PageQuery) -> Result<HttpResponse, RestError> {
        self.execute(self.requests.build_list_links(&query)).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<HttpResponse, RestError> {
        self.execute(self.requests.build_login(credentials)).await
    }

    pub async fn create_link(&self, root: &str, short: &str) -> Result<HttpResponse, RestError> {
        let payload = LinkPayload::new(root, short);
        self.execute(self.requests.build_create_link(&payload)).await
    }

    pub async fn modify_link(
        &self,
        id: &LinkId,
        root: &str,
        short: &str,
    ) -> Result<HttpResponse, RestError> {
        let payload = LinkPayload::new(root, short);
        self.execute(self.requests.build_modify_link(id, &payload)).await
    }

    pub async fn delete_link(&self, id: &LinkId) -> Result<HttpResponse, RestError> {
        self.execute(self.requests.build_delete_link(id)).await
    }

    /// `list_links` decoded into the list envelope.
    pub async fn list_link_page(&self, query: PageQuery) -> Result<ShortLinkPage, CallError> {
        let response = self.list_links(query).await?;
        Ok(parse_link_page(&response)?)
    }

    pub async fn create_short_link(&self, root: &str, short: &str) -> Result<ShortLink, CallError> {
        let response = self.create_link(root, short).await?;
        Ok(parse_link(&response)?)
    }

    pub async fn modify_short_link(
        &self,
        id: &LinkId,
        root: &str,
        short: &str,
    ) -> Result<ShortLink, CallError> {
        let response = self.modify_link(id, root, short).await?;
        Ok(parse_link(&response)?)
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, RestError> {
        debug!(method = %request.method, url = %request.url, "issuing request");
        let response = self.transport.send(request).await?;
        check_status(response)
    }
}

/// Map non-success status codes to `ServerRejection`.
fn check_status(response: HttpResponse) -> Result<HttpResponse, RestError> {
    if response.is_success() {
        return Ok(response);
    }
    debug!(status = response.status, "request rejected by server");
    Err(RestError::rejection(response.status, response.json_body()))
}
