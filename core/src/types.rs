//! Domain DTOs for the short link API.
//!
//! # Design
//! These types mirror the server's JSON schema but are defined independently
//! of the mock-server crate; the integration test catches schema drift.
//! Links are server-owned, so every value here is a transient copy.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque link identifier.
///
/// The server resolves `/api/shortlinks/{id}` by numeric id first and then by
/// short alias, so both forms are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkId {
    Numeric(u64),
    Alias(String),
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkId::Numeric(id) => write!(f, "{id}"),
            LinkId::Alias(alias) => f.write_str(alias),
        }
    }
}

impl From<u64> for LinkId {
    fn from(id: u64) -> Self {
        LinkId::Numeric(id)
    }
}

impl From<&str> for LinkId {
    /// Only canonical decimal text becomes `Numeric`; anything else (`007`,
    /// `+5`) is kept verbatim so the path carries exactly what was given.
    fn from(raw: &str) -> Self {
        raw.parse::<u64>()
            .ok()
            .filter(|id| id.to_string() == raw)
            .map(LinkId::Numeric)
            .unwrap_or_else(|| LinkId::Alias(raw.to_string()))
    }
}

/// A short link as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortLink {
    pub id: LinkId,
    pub root_link: String,
    pub short_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accesses: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited: Option<DateTime<Utc>>,
}

/// Request payload for creating or modifying a link.
///
/// Deliberately has no `id` field: the id only ever travels in the path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkPayload {
    pub root_link: String,
    pub short_link: String,
}

impl LinkPayload {
    pub fn new(root: impl Into<String>, short: impl Into<String>) -> Self {
        Self {
            root_link: root.into(),
            short_link: short.into(),
        }
    }
}

/// List envelope returned by `GET /api/shortlinks`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShortLinkPage {
    pub n: usize,
    pub results: Vec<ShortLink>,
    /// Only present when the server honours `total_entries`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Result windowing for the list call. Absent fields are left out of the
/// query string entirely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

impl PageQuery {
    pub fn new(page: Option<u64>, size: Option<u64>) -> Self {
        Self { page, size }
    }

    /// Build from the sentinel convention used by UI callers: a negative
    /// `page` means "no page", a non-positive `size` means "no size".
    pub fn from_raw(page: i64, size: i64) -> Self {
        Self {
            page: u64::try_from(page).ok(),
            size: u64::try_from(size).ok().filter(|s| *s > 0),
        }
    }

    /// Always starts with `?total_entries`.
    pub fn query_string(&self) -> String {
        let mut query = String::from("?total_entries");
        if let Some(page) = self.page {
            query.push_str(&format!("&page={page}"));
        }
        if let Some(size) = self.size.filter(|s| *s > 0) {
            query.push_str(&format!("&size={size}"));
        }
        query
    }
}

/// Login token, sent verbatim as `Authorization: Basic <token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials(String);

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(<redacted>)")
    }
}
