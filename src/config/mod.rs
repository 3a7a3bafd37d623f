use std::env;
use std::fs;
use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

use crate::form::UrlPolicy;
use crate::models::Category;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::security_headers;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("EVENT_FORM_BIND_ADDR '{value}' is not a socket address")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },

    #[error("EVENT_FORM_URL_POLICY must be 'substring' or 'strict', got '{0}'")]
    InvalidUrlPolicy(String),

    #[error("Could not read categories from {path}")]
    CategoriesRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Categories file {path} is not a JSON array of categories")]
    CategoriesParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub categories_path: Option<PathBuf>,
    pub url_policy: UrlPolicy,
    pub production: bool,
    pub cors_allowed_origins: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_value =
            lookup("EVENT_FORM_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_value.clone(),
                source,
            })?;

        let url_policy = match lookup("EVENT_FORM_URL_POLICY") {
            None => UrlPolicy::default(),
            Some(value) => parse_url_policy(&value)?,
        };

        let production = lookup("RUST_ENV")
            .map(|value| value.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            categories_path: lookup("EVENT_FORM_CATEGORIES")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            url_policy,
            production,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS"),
        })
    }

    /// Reads the category list offered by the form's selector.
    ///
    /// Without a configured file the selector is empty.
    pub fn load_categories(&self) -> Result<Vec<Category>, ConfigError> {
        let Some(path) = &self.categories_path else {
            tracing::info!("No categories file configured, category selector will be empty");
            return Ok(Vec::new());
        };

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::CategoriesRead {
            path: path.clone(),
            source,
        })?;
        let categories: Vec<Category> =
            serde_json::from_str(&raw).map_err(|source| ConfigError::CategoriesParse {
                path: path.clone(),
                source,
            })?;

        tracing::info!(count = categories.len(), path = %path.display(), "Loaded categories");
        Ok(categories)
    }
}

fn parse_url_policy(value: &str) -> Result<UrlPolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "substring" => Ok(UrlPolicy::Substring),
        "strict" => Ok(UrlPolicy::Strict),
        _ => Err(ConfigError::InvalidUrlPolicy(value.to_string())),
    }
}
