//! Sitemap index documents (`<sitemapindex>`)
//!
//! An index lists sitemap units by location and last-modified time. It is
//! written once; afterwards the emitter only renders.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::date_format::W3cDateFormat;
use crate::error::{Result, SitemapError, StateError};
use crate::generator::{GeneratorState, SitemapUnit, write_document};
use crate::render::{MAX_URLS_PER_SITEMAP, SITEMAP_NAMESPACE, XML_HEADER, escape_xml};
use crate::sitemap_url::{check_url, parse_url};
use crate::validator::{DocumentValidator, SchemaKind, default_validator};

/// One `<sitemap>` entry of an index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapIndexUrl {
    url: Url,
    last_mod: Option<DateTime<Utc>>,
}

impl SitemapIndexUrl {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            last_mod: None,
        }
    }

    pub fn parse(url: &str) -> Result<Self> {
        parse_url(url).map(Self::new)
    }

    pub fn with_last_mod(mut self, last_mod: DateTime<Utc>) -> Self {
        self.last_mod = Some(last_mod);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn last_mod(&self) -> Option<DateTime<Utc>> {
        self.last_mod
    }
}

/// Construction parameters for a [`SitemapIndexGenerator`]
#[derive(Clone)]
pub struct IndexOptions {
    base_url: Url,
    /// File written by `write`; `None` keeps the document in memory
    out_file: Option<PathBuf>,
    allow_empty_index: bool,
    max_urls: usize,
    auto_validate: bool,
    date_format: W3cDateFormat,
    /// Applied to entries that carry no `lastmod` of their own
    default_last_mod: Option<DateTime<Utc>>,
    validator: Option<Arc<dyn DocumentValidator>>,
}

impl IndexOptions {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            out_file: None,
            allow_empty_index: false,
            max_urls: MAX_URLS_PER_SITEMAP,
            auto_validate: false,
            date_format: W3cDateFormat::default(),
            default_last_mod: None,
            validator: None,
        }
    }

    pub fn parse(base_url: &str) -> Result<Self> {
        parse_url(base_url).map(Self::new)
    }

    /// Build options from the `generator`, `dates` and `index` sections of a [`Config`]
    ///
    /// The index file lands in `generator.output_dir` when one is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.generator.base_url.as_deref().ok_or_else(|| {
            SitemapError::Config("generator.base_url is required".to_string())
        })?;
        let date_format =
            W3cDateFormat::new(config.dates.pattern).with_timezone(&config.dates.timezone)?;

        let mut options = Self::parse(base_url)?
            .allow_empty_index(config.index.allow_empty_index)
            .auto_validate(config.generator.auto_validate)
            .date_format(date_format);
        if let Some(dir) = &config.generator.output_dir {
            options = options.out_file(dir.join(&config.index.file_name));
        }
        if let Some(last_mod) = &config.index.default_last_mod {
            options = options.default_last_mod(W3cDateFormat::default().parse(last_mod)?);
        }
        Ok(options)
    }

    pub fn out_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_file = Some(path.into());
        self
    }

    pub fn allow_empty_index(mut self, allow: bool) -> Self {
        self.allow_empty_index = allow;
        self
    }

    pub fn max_urls(mut self, max_urls: usize) -> Self {
        self.max_urls = max_urls;
        self
    }

    pub fn auto_validate(mut self, auto_validate: bool) -> Self {
        self.auto_validate = auto_validate;
        self
    }

    pub fn date_format(mut self, date_format: W3cDateFormat) -> Self {
        self.date_format = date_format;
        self
    }

    pub fn default_last_mod(mut self, last_mod: DateTime<Utc>) -> Self {
        self.default_last_mod = Some(last_mod);
        self
    }

    pub fn validator(mut self, validator: Arc<dyn DocumentValidator>) -> Self {
        self.validator = Some(validator);
        self
    }
}

/// Builds and writes a single sitemap index document
pub struct SitemapIndexGenerator {
    base_url: Url,
    out_file: Option<PathBuf>,
    allow_empty_index: bool,
    max_urls: usize,
    date_format: W3cDateFormat,
    default_last_mod: Option<DateTime<Utc>>,
    validator: Option<Arc<dyn DocumentValidator>>,
    urls: Vec<SitemapIndexUrl>,
    state: GeneratorState,
}

impl SitemapIndexGenerator {
    pub fn new(options: IndexOptions) -> Result<Self> {
        if options.max_urls == 0 || options.max_urls > MAX_URLS_PER_SITEMAP {
            return Err(SitemapError::Config(format!(
                "max_urls must be between 1 and {}, got {}",
                MAX_URLS_PER_SITEMAP, options.max_urls
            )));
        }
        if options.base_url.host_str().is_none() {
            return Err(SitemapError::Config(format!(
                "Base URL {} has no host",
                options.base_url
            )));
        }

        let validator = match (options.auto_validate, options.validator) {
            (false, _) => None,
            (true, Some(validator)) => Some(validator),
            (true, None) => Some(default_validator()?),
        };

        Ok(Self {
            base_url: options.base_url,
            out_file: options.out_file,
            allow_empty_index: options.allow_empty_index,
            max_urls: options.max_urls,
            date_format: options.date_format,
            default_last_mod: options.default_last_mod,
            validator,
            urls: Vec::new(),
            state: GeneratorState::Open,
        })
    }

    pub fn add_url(&mut self, url: SitemapIndexUrl) -> Result<&mut Self> {
        self.state.ensure_open()?;
        check_url(&url.url, &self.base_url)?;
        if self.urls.len() >= self.max_urls {
            return Err(SitemapError::CapacityExceeded {
                max_urls: self.max_urls,
            });
        }

        self.urls.push(url);
        Ok(self)
    }

    pub fn add_url_str(&mut self, url: &str) -> Result<&mut Self> {
        self.add_url(SitemapIndexUrl::parse(url)?)
    }

    pub fn add_urls<I>(&mut self, urls: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = SitemapIndexUrl>,
    {
        for url in urls {
            self.add_url(url)?;
        }
        Ok(self)
    }

    /// Add `{prefix}1{suffix}` through `{prefix}{count}{suffix}`, resolved against the base URL
    pub fn add_urls_by_prefix(
        &mut self,
        prefix: &str,
        suffix: &str,
        count: usize,
    ) -> Result<&mut Self> {
        for i in 1..=count {
            let name = format!("{}{}{}", prefix, i, suffix);
            let url = self.resolve(&name)?;
            self.add_url(SitemapIndexUrl::new(url))?;
        }
        Ok(self)
    }

    /// Add one entry per unit, carrying each unit's latest record `lastmod`
    pub fn add_units(&mut self, units: &[SitemapUnit]) -> Result<&mut Self> {
        for unit in units {
            let mut entry = SitemapIndexUrl::new(self.resolve(&unit.file_name)?);
            entry.last_mod = unit.last_mod;
            self.add_url(entry)?;
        }
        Ok(self)
    }

    /// Render the index, write it if a file is configured, and return it
    ///
    /// Only the first call succeeds.
    pub fn write(&mut self) -> Result<String> {
        self.state.ensure_open()?;
        if self.urls.is_empty() && !self.allow_empty_index {
            return Err(StateError::Empty.into());
        }

        let document = self.write_as_string();
        let name = match &self.out_file {
            Some(path) => {
                write_document(path, &document, false)?;
                path.display().to_string()
            }
            None => "sitemap index".to_string(),
        };

        if let Some(validator) = &self.validator {
            if let Err(e) = validator.validate(&name, &document, SchemaKind::SitemapIndex) {
                warn!(file = %name, error = %e, "Sitemap index failed validation");
                return Err(e);
            }
        }

        self.state = GeneratorState::Finished;
        info!(file = %name, url_count = self.urls.len(), "Wrote sitemap index");
        Ok(document)
    }

    /// Render the index without changing emitter state
    pub fn write_as_string(&self) -> String {
        let mut out = String::with_capacity(128 + self.urls.len() * 96);
        out.push_str(XML_HEADER);
        out.push('\n');
        out.push_str("<sitemapindex xmlns=\"");
        out.push_str(SITEMAP_NAMESPACE);
        out.push_str("\">\n");
        for url in &self.urls {
            out.push_str("  <sitemap>\n    <loc>");
            out.push_str(&escape_xml(url.url.as_str()));
            out.push_str("</loc>\n");
            if let Some(last_mod) = url.last_mod.or(self.default_last_mod) {
                out.push_str("    <lastmod>");
                out.push_str(&self.date_format.format(&last_mod));
                out.push_str("</lastmod>\n");
            }
            out.push_str("  </sitemap>\n");
        }
        out.push_str("</sitemapindex>");
        out
    }

    pub fn urls(&self) -> &[SitemapIndexUrl] {
        &self.urls
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    fn resolve(&self, name: &str) -> Result<Url> {
        let url = self
            .base_url
            .join(name)
            .map_err(|e| SitemapError::invalid_url(name, e))?;
        debug!(%url, "Resolved sitemap location");
        Ok(url)
    }
}
