//! Pagination and emission engine
//!
//! A [`SitemapGenerator`] accepts records one at a time, keeps at most
//! `max_urls` of them in its open batch, and seals the batch into a numbered
//! unit (`sitemap1.xml`, `sitemap2.xml`, ...) whenever one more record arrives
//! than the batch can hold. [`SitemapGenerator::finish`] seals the last batch;
//! a generator that never overflowed writes a single unnumbered `sitemap.xml`.
//!
//! Units are rendered through the generator's [`UrlRenderer`], optionally
//! gzip-compressed, written to an [`OutputTarget`], and optionally checked
//! against the protocol schema before they are recorded.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::date_format::W3cDateFormat;
use crate::error::{Result, SitemapError, StateError};
use crate::index::{IndexOptions, SitemapIndexGenerator};
use crate::render::{UrlRenderer, render_urlset};
use crate::sitemap_url::{SitemapUrl, check_url, parse_url};
use crate::validator::{DocumentValidator, SchemaKind, default_validator};

pub const DEFAULT_FILE_NAME_PREFIX: &str = "sitemap";

/// Where rendered documents go
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// Write one file per unit into this directory
    Directory(PathBuf),
    /// Keep rendered documents in the returned [`SitemapUnit`]s only
    #[default]
    Memory,
}

/// Lifecycle of a generator or index emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Open,
    Finished,
}

impl GeneratorState {
    pub(crate) fn ensure_open(self) -> Result<()> {
        match self {
            GeneratorState::Open => Ok(()),
            GeneratorState::Finished => Err(StateError::AlreadyFinished.into()),
        }
    }
}

/// One emitted sitemap document
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUnit {
    /// File name including suffix, e.g. `sitemap2.xml.gz`
    pub file_name: String,
    /// Full path when written to a directory
    pub path: Option<PathBuf>,
    /// Uncompressed document text
    pub document: String,
    /// Number of records in the document
    pub url_count: usize,
    /// Latest `lastmod` among the records, if any record carries one
    pub last_mod: Option<DateTime<Utc>>,
}

/// Construction parameters for a [`SitemapGenerator`]
#[derive(Clone)]
pub struct GeneratorOptions {
    /// Every record must share this URL's host
    base_url: Url,
    /// Destination of rendered documents
    output: OutputTarget,
    /// File name stem; units are `{prefix}.xml` or `{prefix}{n}.xml`
    file_name_prefix: String,
    /// Records per unit; `None` uses the renderer's ceiling
    max_urls: Option<usize>,
    /// Split into numbered units instead of failing when a unit is full
    allow_multiple_sitemaps: bool,
    /// Let `finish` emit a document with no records
    allow_empty_sitemap: bool,
    /// Compress written files and append `.gz` to their names
    gzip: bool,
    /// Validate each document against the protocol schema after rendering
    auto_validate: bool,
    date_format: W3cDateFormat,
    validator: Option<Arc<dyn DocumentValidator>>,
}

impl GeneratorOptions {
    pub fn new(base_url: Url, output: OutputTarget) -> Self {
        Self {
            base_url,
            output,
            file_name_prefix: DEFAULT_FILE_NAME_PREFIX.to_string(),
            max_urls: None,
            allow_multiple_sitemaps: true,
            allow_empty_sitemap: false,
            gzip: false,
            auto_validate: false,
            date_format: W3cDateFormat::default(),
            validator: None,
        }
    }

    /// Options writing into `dir`, with `base_url` parsed from a string
    pub fn for_directory(base_url: &str, dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::new(parse_url(base_url)?, OutputTarget::Directory(dir.into())))
    }

    /// Options producing documents in memory only
    pub fn in_memory(base_url: &str) -> Result<Self> {
        Ok(Self::new(parse_url(base_url)?, OutputTarget::Memory))
    }

    /// Build options from the `generator` and `dates` sections of a [`Config`]
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.generator.base_url.as_deref().ok_or_else(|| {
            SitemapError::Config("generator.base_url is required".to_string())
        })?;
        let output = match &config.generator.output_dir {
            Some(dir) => OutputTarget::Directory(dir.clone()),
            None => OutputTarget::Memory,
        };
        let date_format =
            W3cDateFormat::new(config.dates.pattern).with_timezone(&config.dates.timezone)?;

        let mut options = Self::new(parse_url(base_url)?, output)
            .file_name_prefix(config.generator.file_name_prefix.clone())
            .allow_multiple_sitemaps(config.generator.allow_multiple_sitemaps)
            .allow_empty_sitemap(config.generator.allow_empty_sitemap)
            .gzip(config.generator.gzip)
            .auto_validate(config.generator.auto_validate)
            .date_format(date_format);
        options.max_urls = config.generator.max_urls;
        Ok(options)
    }

    pub fn file_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_name_prefix = prefix.into();
        self
    }

    pub fn max_urls(mut self, max_urls: usize) -> Self {
        self.max_urls = Some(max_urls);
        self
    }

    pub fn allow_multiple_sitemaps(mut self, allow: bool) -> Self {
        self.allow_multiple_sitemaps = allow;
        self
    }

    pub fn allow_empty_sitemap(mut self, allow: bool) -> Self {
        self.allow_empty_sitemap = allow;
        self
    }

    pub fn gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
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

    /// Validator used when `auto_validate` is on; defaults to libxml2
    pub fn validator(mut self, validator: Arc<dyn DocumentValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn output(&self) -> &OutputTarget {
        &self.output
    }
}

/// Accumulates records of one variant and emits them as sitemap units
pub struct SitemapGenerator<R: UrlRenderer> {
    renderer: R,
    base_url: Url,
    output: OutputTarget,
    file_name_prefix: String,
    file_name_suffix: &'static str,
    max_urls: usize,
    allow_multiple_sitemaps: bool,
    allow_empty_sitemap: bool,
    gzip: bool,
    date_format: W3cDateFormat,
    validator: Option<Arc<dyn DocumentValidator>>,
    urls: Vec<R::Url>,
    map_count: usize,
    state: GeneratorState,
    units: Vec<SitemapUnit>,
}

impl<R: UrlRenderer> SitemapGenerator<R> {
    pub fn new(options: GeneratorOptions, renderer: R) -> Result<Self> {
        let ceiling = renderer.max_urls();
        let max_urls = options.max_urls.unwrap_or(ceiling);
        if max_urls == 0 || max_urls > ceiling {
            return Err(SitemapError::Config(format!(
                "max_urls must be between 1 and {}, got {}",
                ceiling, max_urls
            )));
        }
        if options.base_url.host_str().is_none() {
            return Err(SitemapError::Config(format!(
                "Base URL {} has no host",
                options.base_url
            )));
        }
        validate_prefix(&options.file_name_prefix)?;

        let validator = match (options.auto_validate, options.validator) {
            (false, _) => None,
            (true, Some(validator)) => Some(validator),
            (true, None) => Some(default_validator()?),
        };

        debug!(
            base_url = %options.base_url,
            max_urls,
            gzip = options.gzip,
            "Created sitemap generator"
        );

        Ok(Self {
            renderer,
            base_url: options.base_url,
            output: options.output,
            file_name_prefix: options.file_name_prefix,
            file_name_suffix: if options.gzip { ".xml.gz" } else { ".xml" },
            max_urls,
            allow_multiple_sitemaps: options.allow_multiple_sitemaps,
            allow_empty_sitemap: options.allow_empty_sitemap,
            gzip: options.gzip,
            date_format: options.date_format,
            validator,
            urls: Vec::new(),
            map_count: 0,
            state: GeneratorState::Open,
            units: Vec::new(),
        })
    }

    /// Add one record, sealing the open batch first if it is full
    ///
    /// A rejected record leaves the generator unchanged.
    pub fn add_url(&mut self, url: R::Url) -> Result<&mut Self> {
        self.state.ensure_open()?;
        check_url(url.url(), &self.base_url)?;

        if self.urls.len() == self.max_urls {
            if !self.allow_multiple_sitemaps {
                return Err(SitemapError::CapacityExceeded {
                    max_urls: self.max_urls,
                });
            }
            let number = self.map_count.max(1);
            self.write_sitemap(self.numbered_file_name(number))?;
            self.map_count = number + 1;
        }

        self.urls.push(url);
        Ok(self)
    }

    pub fn add_urls<I>(&mut self, urls: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = R::Url>,
    {
        for url in urls {
            self.add_url(url)?;
        }
        Ok(self)
    }

    /// Seal the open batch and return every unit produced
    pub fn finish(&mut self) -> Result<Vec<SitemapUnit>> {
        self.state.ensure_open()?;
        if self.urls.is_empty() && self.map_count == 0 && !self.allow_empty_sitemap {
            return Err(StateError::Empty.into());
        }

        let file_name = if self.map_count > 0 {
            self.numbered_file_name(self.map_count)
        } else {
            format!("{}{}", self.file_name_prefix, self.file_name_suffix)
        };
        self.write_sitemap(file_name)?;
        self.state = GeneratorState::Finished;
        info!(
            units = self.units.len(),
            base_url = %self.base_url,
            "Finished sitemap generation"
        );
        Ok(self.units.clone())
    }

    /// Write an index listing every unit to `path` and return its text
    pub fn write_sitemaps_with_index(&self, path: impl AsRef<Path>) -> Result<String> {
        if self.state != GeneratorState::Finished {
            return Err(StateError::NotFinished.into());
        }

        let mut options = IndexOptions::new(self.base_url.clone())
            .out_file(path.as_ref())
            .date_format(self.date_format);
        if let Some(validator) = &self.validator {
            options = options.auto_validate(true).validator(Arc::clone(validator));
        }

        let mut index = SitemapIndexGenerator::new(options)?;
        index.add_units(&self.units)?;
        index.write()
    }

    /// Units emitted so far
    pub fn units(&self) -> &[SitemapUnit] {
        &self.units
    }

    /// Records waiting in the open batch
    pub fn pending_urls(&self) -> usize {
        self.urls.len()
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn max_urls(&self) -> usize {
        self.max_urls
    }

    fn numbered_file_name(&self, number: usize) -> String {
        format!(
            "{}{}{}",
            self.file_name_prefix, number, self.file_name_suffix
        )
    }

    /// Render, write, and validate the open batch, then record it as a unit
    ///
    /// The batch is only cleared once every step has succeeded.
    fn write_sitemap(&mut self, file_name: String) -> Result<()> {
        let document = render_urlset(&self.renderer, &self.urls, &self.date_format);

        let path = match &self.output {
            OutputTarget::Directory(dir) => {
                let path = dir.join(&file_name);
                write_document(&path, &document, self.gzip)?;
                Some(path)
            }
            OutputTarget::Memory => None,
        };

        if let Some(validator) = &self.validator {
            if let Err(e) = validator.validate(&file_name, &document, SchemaKind::Sitemap) {
                warn!(file = %file_name, error = %e, "Sitemap failed validation");
                return Err(e);
            }
        }

        let url_count = self.urls.len();
        let last_mod = self.urls.iter().filter_map(|url| url.last_mod()).max();
        info!(file = %file_name, url_count, "Wrote sitemap");

        self.units.push(SitemapUnit {
            file_name,
            path,
            document,
            url_count,
            last_mod,
        });
        self.urls.clear();
        Ok(())
    }
}

impl<R: UrlRenderer + Default> SitemapGenerator<R> {
    /// Generator using the variant's default renderer
    pub fn with_options(options: GeneratorOptions) -> Result<Self> {
        Self::new(options, R::default())
    }
}

impl<R> SitemapGenerator<R>
where
    R: UrlRenderer,
    R::Url: From<Url>,
{
    /// Parse `url` and add it as a record with no optional fields
    pub fn add_url_str(&mut self, url: &str) -> Result<&mut Self> {
        let url = parse_url(url)?;
        self.add_url(R::Url::from(url))
    }

    pub fn add_url_strs<I, S>(&mut self, urls: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for url in urls {
            self.add_url_str(url.as_ref())?;
        }
        Ok(self)
    }
}

pub(crate) fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(SitemapError::Config(
            "file name prefix must not be empty".to_string(),
        ));
    }
    if prefix.contains(['/', '\\']) {
        return Err(SitemapError::Config(format!(
            "file name prefix must not contain path separators: {}",
            prefix
        )));
    }
    Ok(())
}

/// Write `document` to `path`, gzip-compressed when `gzip` is set
pub(crate) fn write_document(path: &Path, document: &str, gzip: bool) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    if gzip {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        encoder.write_all(document.as_bytes())?;
        encoder.finish()?.flush()?;
    } else {
        let mut writer = writer;
        writer.write_all(document.as_bytes())?;
        writer.flush()?;
    }
    Ok(())
}
