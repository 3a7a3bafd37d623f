//! Image and video link lists.
//!
//! Links are checked against the providers a list accepts and Dropbox
//! share links are rewritten to the direct-content host so the stored URL
//! can be embedded as-is.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::form::FormError;

const DROPBOX_SHARE_HOST: &str = "www.dropbox.com";
const DROPBOX_DIRECT_HOST: &str = "dl.dropboxusercontent.com";

/// How strictly a pasted media link is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlPolicy {
    /// Any text containing a provider marker such as `dropbox.com` passes
    /// and the share host is rewritten by plain text replacement.
    #[default]
    Substring,
    /// The link must parse as an http(s) URL whose host is the provider's
    /// domain or one of its subdomains.
    Strict,
}

impl UrlPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            UrlPolicy::Substring => "substring",
            UrlPolicy::Strict => "strict",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provider {
    Dropbox,
    YouTube,
}

impl Provider {
    /// Substrings that identify the provider under [`UrlPolicy::Substring`].
    fn markers(self) -> &'static [&'static str] {
        match self {
            Provider::Dropbox => &["dropbox.com"],
            Provider::YouTube => &["youtube.com", "youtu.be"],
        }
    }

    /// Registrable domains accepted under [`UrlPolicy::Strict`].
    fn domains(self) -> &'static [&'static str] {
        match self {
            Provider::Dropbox => &["dropbox.com", "dropboxusercontent.com"],
            Provider::YouTube => &["youtube.com", "youtu.be"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    // Order matters: a link matching several providers is treated as the
    // first one, so Dropbox wins and gets its host rewritten.
    fn providers(self) -> &'static [Provider] {
        match self {
            MediaKind::Image => &[Provider::Dropbox],
            MediaKind::Video => &[Provider::Dropbox, Provider::YouTube],
        }
    }

    pub fn empty_error(self) -> FormError {
        match self {
            MediaKind::Image => FormError::EmptyImageUrl,
            MediaKind::Video => FormError::EmptyVideoUrl,
        }
    }

    pub fn invalid_error(self) -> FormError {
        match self {
            MediaKind::Image => FormError::InvalidImageUrl,
            MediaKind::Video => FormError::InvalidVideoUrl,
        }
    }

    pub fn duplicate_error(self) -> FormError {
        match self {
            MediaKind::Image => FormError::DuplicateImage,
            MediaKind::Video => FormError::DuplicateVideo,
        }
    }

    pub fn added_message(self) -> &'static str {
        match self {
            MediaKind::Image => "Image added successfully",
            MediaKind::Video => "Video added successfully",
        }
    }

    pub fn removed_message(self) -> &'static str {
        match self {
            MediaKind::Image => "Image removed successfully",
            MediaKind::Video => "Video removed successfully",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => f.write_str("image"),
            MediaKind::Video => f.write_str("video"),
        }
    }
}

/// Validates `raw` for `kind` and returns the URL as it should be stored.
pub fn normalize(raw: &str, kind: MediaKind, policy: UrlPolicy) -> Result<String, FormError> {
    if raw.is_empty() {
        return Err(kind.empty_error());
    }

    match policy {
        UrlPolicy::Substring => normalize_by_marker(raw, kind),
        UrlPolicy::Strict => normalize_by_host(raw, kind),
    }
}

fn normalize_by_marker(raw: &str, kind: MediaKind) -> Result<String, FormError> {
    let provider = kind
        .providers()
        .iter()
        .copied()
        .find(|provider| provider.markers().iter().any(|marker| raw.contains(marker)))
        .ok_or_else(|| kind.invalid_error())?;

    match provider {
        Provider::Dropbox => Ok(raw.replacen(DROPBOX_SHARE_HOST, DROPBOX_DIRECT_HOST, 1)),
        Provider::YouTube => Ok(raw.to_string()),
    }
}

fn normalize_by_host(raw: &str, kind: MediaKind) -> Result<String, FormError> {
    let mut url = Url::parse(raw.trim()).map_err(|_| kind.invalid_error())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(kind.invalid_error());
    }

    let host = url.host_str().ok_or_else(|| kind.invalid_error())?.to_string();
    let provider = kind
        .providers()
        .iter()
        .copied()
        .find(|provider| {
            provider
                .domains()
                .iter()
                .any(|domain| host_in_domain(&host, domain))
        })
        .ok_or_else(|| kind.invalid_error())?;

    if provider == Provider::Dropbox && host == DROPBOX_SHARE_HOST {
        url.set_host(Some(DROPBOX_DIRECT_HOST))
            .map_err(|_| kind.invalid_error())?;
    }

    Ok(url.into())
}

fn host_in_domain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// An ordered list of normalised, distinct media URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MediaList(Vec<String>);

impl MediaList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from URLs that were already stored, dropping repeats.
    pub fn from_stored<I>(urls: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut list = Self::new();
        for url in urls {
            if !list.contains(&url) {
                list.0.push(url);
            }
        }
        list
    }

    /// Normalises and appends a link, returning the stored form.
    ///
    /// Nothing changes when the link is rejected.
    pub fn add(
        &mut self,
        raw: &str,
        kind: MediaKind,
        policy: UrlPolicy,
    ) -> Result<String, FormError> {
        let url = normalize(raw, kind, policy)?;
        if self.contains(&url) {
            return Err(kind.duplicate_error());
        }
        self.0.push(url.clone());
        Ok(url)
    }

    /// Removes every entry equal to `url`; returns whether one was present.
    pub fn remove(&mut self, url: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != url);
        self.0.len() != before
    }

    pub fn contains(&self, url: &str) -> bool {
        self.0.iter().any(|existing| existing == url)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
