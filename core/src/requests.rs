//! Stateless HTTP request builder and response parser for the link API.
//!
//! # Design
//! `LinkRequests` holds the base URI and the injected default headers and
//! nothing else. Each operation is a `build_*` method producing an
//! `HttpRequest`; successful bodies are decoded by the `parse_*` functions.
//! Nothing here performs I/O.

use serde::de::DeserializeOwned;

use crate::error::DecodeError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Credentials, LinkId, LinkPayload, PageQuery, ShortLink, ShortLinkPage};

const LINKS_PATH: &str = "/api/shortlinks";
const LOGIN_PATH: &str = "/api/login";

/// Request builder for the link API.
#[derive(Debug, Clone, Default)]
pub struct LinkRequests {
    base_uri: String,
    default_headers: Vec<(String, String)>,
}

impl LinkRequests {
    /// `base_uri` may be empty, in which case requests carry origin-relative
    /// URLs (`/api/...`).
    pub fn new(base_uri: &str, default_headers: Vec<(String, String)>) -> Self {
        Self {
            base_uri: base_uri.trim_end_matches('/').to_string(),
            default_headers,
        }
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    pub fn build_list_links(&self, query: &PageQuery) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{LINKS_PATH}{}", self.base_uri, query.query_string()),
            headers: self.default_headers.clone(),
            body: None,
        }
    }

    pub fn build_login(&self, credentials: &Credentials) -> HttpRequest {
        let mut headers: Vec<(String, String)> = self
            .default_headers
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case("authorization"))
            .cloned()
            .collect();
        headers.push((
            "Authorization".to_string(),
            format!("Basic {}", credentials.token()),
        ));
        HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{LOGIN_PATH}", self.base_uri),
            headers,
            body: None,
        }
    }

    pub fn build_create_link(&self, payload: &LinkPayload) -> HttpRequest {
        self.json_request(format!("{}{LINKS_PATH}", self.base_uri), payload)
    }

    pub fn build_modify_link(&self, id: &LinkId, payload: &LinkPayload) -> HttpRequest {
        self.json_request(format!("{}{LINKS_PATH}/{id}", self.base_uri), payload)
    }

    pub fn build_delete_link(&self, id: &LinkId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}{LINKS_PATH}/{id}", self.base_uri),
            headers: self.default_headers.clone(),
            body: None,
        }
    }

    fn json_request(&self, url: String, payload: &LinkPayload) -> HttpRequest {
        let mut headers = self.default_headers.clone();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        HttpRequest {
            method: HttpMethod::Post,
            url,
            headers,
            // Two string fields cannot fail to serialize.
            body: Some(serde_json::json!({
                "root_link": payload.root_link,
                "short_link": payload.short_link,
            }).to_string()),
        }
    }
}

pub fn parse_link_page(response: &HttpResponse) -> Result<ShortLinkPage, DecodeError> {
    decode(response)
}

pub fn parse_link(response: &HttpResponse) -> Result<ShortLink, DecodeError> {
    decode(response)
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, DecodeError> {
    Ok(serde_json::from_str(&response.body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requests() -> LinkRequests {
        LinkRequests::new("http://localhost:8080", Vec::new())
    }

    #[test]
    fn build_list_links_without_paging() {
        let req = requests().build_list_links(&PageQuery::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/api/shortlinks?total_entries");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_links_with_paging() {
        let req = requests().build_list_links(&PageQuery::from_raw(1, 50));
        assert_eq!(
            req.url,
            "http://localhost:8080/api/shortlinks?total_entries&page=1&size=50"
        );
    }

    #[test]
    fn empty_base_uri_yields_relative_urls() {
        let req = LinkRequests::new("", Vec::new()).build_delete_link(&LinkId::Numeric(4));
        assert_eq!(req.url, "/api/shortlinks/4");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let req = LinkRequests::new("http://localhost:8080/", Vec::new())
            .build_list_links(&PageQuery::default());
        assert_eq!(req.url, "http://localhost:8080/api/shortlinks?total_entries");
    }

    #[test]
    fn build_login_sets_basic_auth_only() {
        let defaults = vec![
            ("X-Client".to_string(), "slms".to_string()),
            ("authorization".to_string(), "Bearer stale".to_string()),
        ];
        let req = LinkRequests::new("", defaults).build_login(&Credentials::new("s3cret"));
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "/api/login");
        assert!(req.body.is_none());
        let auth: Vec<_> = req
            .headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("authorization"))
            .collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(req.header("Authorization"), Some("Basic s3cret"));
        assert_eq!(req.header("X-Client"), Some("slms"));
    }

    #[test]
    fn build_create_link_sends_payload() {
        let req = requests().build_create_link(&LinkPayload::new("https://rust-lang.org", "rust"));
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/api/shortlinks");
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"root_link": "https://rust-lang.org", "short_link": "rust"})
        );
    }

    #[test]
    fn build_modify_link_keeps_id_out_of_body() {
        let req = requests().build_modify_link(
            &LinkId::Numeric(12),
            &LinkPayload::new("https://docs.rs", "docs"),
        );
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/api/shortlinks/12");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["short_link"], "docs");
    }

    #[test]
    fn build_delete_link_has_no_body() {
        let req = requests().build_delete_link(&LinkId::Alias("docs".to_string()));
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:8080/api/shortlinks/docs");
        assert!(req.body.is_none());
    }

    #[test]
    fn default_headers_travel_with_every_request() {
        let reqs = LinkRequests::new("", vec![("X-Client".to_string(), "slms".to_string())]);
        let id = LinkId::Numeric(1);
        let payload = LinkPayload::new("https://a.dev", "a");
        for req in [
            reqs.build_list_links(&PageQuery::default()),
            reqs.build_create_link(&payload),
            reqs.build_modify_link(&id, &payload),
            reqs.build_delete_link(&id),
        ] {
            assert_eq!(req.header("x-client"), Some("slms"), "{}", req.url);
        }
    }

    #[test]
    fn parse_link_page_success() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"n":1,"results":[{"id":1,"root_link":"https://a.dev","short_link":"a"}],"total":7}"#
                .to_string(),
        };
        let page = parse_link_page(&response).unwrap();
        assert_eq!(page.n, 1);
        assert_eq!(page.total, Some(7));
        assert_eq!(page.results[0].short_link, "a");
    }

    #[test]
    fn parse_link_bad_json() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "not json".to_string(),
        };
        assert!(parse_link(&response).is_err());
    }
}
