//! Sitemap URL records
//!
//! Every sitemap variant wraps a [`WebSitemapUrl`], which carries the fields
//! common to the whole protocol: `loc`, `lastmod`, `changefreq` and `priority`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SitemapError};

/// How frequently the page is likely to change
///
/// This is a hint to crawlers, not a command. `Always` describes documents that
/// change on every access; `Never` describes archived URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFreq {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(ChangeFreq::Always),
            "hourly" => Ok(ChangeFreq::Hourly),
            "daily" => Ok(ChangeFreq::Daily),
            "weekly" => Ok(ChangeFreq::Weekly),
            "monthly" => Ok(ChangeFreq::Monthly),
            "yearly" => Ok(ChangeFreq::Yearly),
            "never" => Ok(ChangeFreq::Never),
            other => Err(format!("unknown change frequency: {}", other)),
        }
    }
}

/// A single URL in a plain web sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct WebSitemapUrl {
    url: Url,
    last_mod: Option<DateTime<Utc>>,
    change_freq: Option<ChangeFreq>,
    priority: Option<f64>,
}

impl WebSitemapUrl {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            last_mod: None,
            change_freq: None,
            priority: None,
        }
    }

    /// Parse `url` and wrap it with no optional fields set
    pub fn parse(url: &str) -> Result<Self> {
        parse_url(url).map(Self::new)
    }

    pub fn with_last_mod(mut self, last_mod: DateTime<Utc>) -> Self {
        self.last_mod = Some(last_mod);
        self
    }

    pub fn with_change_freq(mut self, change_freq: ChangeFreq) -> Self {
        self.change_freq = Some(change_freq);
        self
    }

    /// Relative priority; the protocol range is 0.0 to 1.0
    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn last_mod(&self) -> Option<DateTime<Utc>> {
        self.last_mod
    }

    pub fn change_freq(&self) -> Option<ChangeFreq> {
        self.change_freq
    }

    pub fn priority(&self) -> Option<f64> {
        self.priority
    }
}

impl From<Url> for WebSitemapUrl {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

/// Access to the protocol-wide fields of any variant's record
pub trait SitemapUrl {
    fn base(&self) -> &WebSitemapUrl;

    fn url(&self) -> &Url {
        self.base().url()
    }

    fn last_mod(&self) -> Option<DateTime<Utc>> {
        self.base().last_mod()
    }
}

impl SitemapUrl for WebSitemapUrl {
    fn base(&self) -> &WebSitemapUrl {
        self
    }
}

pub(crate) fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| SitemapError::invalid_url(url, e))
}

/// Reject `url` unless it lives on the same host as `base_url`
///
/// Scheme and port are not compared, so `https://www.example.com/` is accepted
/// for a base of `http://www.example.com`.
pub(crate) fn check_url(url: &Url, base_url: &Url) -> Result<()> {
    let base_host = base_url
        .host_str()
        .ok_or_else(|| SitemapError::Config(format!("Base URL {} has no host", base_url)))?;

    match url.host_str() {
        Some(host) if host.eq_ignore_ascii_case(base_host) => Ok(()),
        _ => Err(SitemapError::DomainMismatch {
            url: url.to_string(),
            base_url: base_url.to_string(),
        }),
    }
}
