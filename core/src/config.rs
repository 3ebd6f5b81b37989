//! Client configuration loaded from environment variables.
//!
//! ## Variables
//!
//! - `SLMS_ENV` - `production` or `development` (default: `development`)
//! - `SLMS_ORIGIN` - origin the management page is served from
//!   (default: `http://localhost:8080`)
//! - `SLMS_DEV_ORIGIN` - API origin used in development
//!   (default: `http://localhost:8080`)
//! - `SLMS_TOKEN` - login token; only required by callers that log in
//!
//! A `.env` file in the working directory is read first if present.

use std::env;
use std::str::FromStr;

use url::Url;

use crate::error::ConfigError;
use crate::types::Credentials;

const DEFAULT_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deployment {
    Production,
    #[default]
    Development,
}

impl FromStr for Deployment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Deployment::Production),
            "development" | "dev" => Ok(Deployment::Development),
            _ => Err(ConfigError::UnknownDeployment(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub deployment: Deployment,
    /// Origin of the page; relative API URLs and copied links are built on it.
    pub origin: Url,
    pub dev_origin: Url,
    /// `None` when `SLMS_TOKEN` is unset or empty.
    pub token: Option<Credentials>,
}

impl ClientConfig {
    /// # Errors
    ///
    /// Returns an error if `SLMS_ENV` is unknown or an origin does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let deployment = match lookup("SLMS_ENV") {
            Some(raw) => raw.parse::<Deployment>()?,
            None => Deployment::default(),
        };
        let origin = parse_origin("SLMS_ORIGIN", lookup("SLMS_ORIGIN"))?;
        let dev_origin = parse_origin("SLMS_DEV_ORIGIN", lookup("SLMS_DEV_ORIGIN"))?;
        let token = lookup("SLMS_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .map(Credentials::new);

        Ok(Self {
            deployment,
            origin,
            dev_origin,
            token,
        })
    }

    /// # Errors
    ///
    /// Returns `ConfigError::MissingToken` if `SLMS_TOKEN` was not set.
    pub fn credentials(&self) -> Result<&Credentials, ConfigError> {
        self.token.as_ref().ok_or(ConfigError::MissingToken)
    }

    /// Empty in production, where the API shares the page's origin.
    pub fn base_uri(&self) -> String {
        match self.deployment {
            Deployment::Production => String::new(),
            Deployment::Development => self.dev_origin.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Page origin without a trailing slash, as used for copied links.
    pub fn page_origin(&self) -> String {
        self.origin.as_str().trim_end_matches('/').to_string()
    }
}

fn parse_origin(var: &'static str, raw: Option<String>) -> Result<Url, ConfigError> {
    let raw = raw.unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
    Url::parse(&raw).map_err(|source| ConfigError::InvalidOrigin { var, source })
}
