//! # sitemap-generator Library
//!
//! Generates XML sitemaps following the sitemaps.org protocol, splitting large
//! URL sets into numbered sitemap files and tying them together with a sitemap
//! index. Variants add Google's image, video, news, mobile, geo and code-search
//! extensions, plus `xhtml:link` alternates.
//!
//! ```no_run
//! use sitemap_generator::{GeneratorOptions, WebSitemapGenerator, WebSitemapUrl};
//!
//! # fn main() -> sitemap_generator::Result<()> {
//! let options = GeneratorOptions::for_directory("https://www.example.com", "public")?;
//! let mut generator = WebSitemapGenerator::with_options(options)?;
//! generator.add_url(WebSitemapUrl::parse("https://www.example.com/")?)?;
//! generator.add_url_str("https://www.example.com/about")?;
//!
//! generator.finish()?;
//! generator.write_sitemaps_with_index("public/sitemap_index.xml")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod date_format;
pub mod error;
pub mod generator;
pub mod index;
#[cfg(feature = "libxml2")]
pub mod libxml2;
pub mod render;
pub mod sitemap_url;
pub mod validator;
pub mod variants;

pub use config::{Config, ConfigError, ConfigManager, EnvProvider, SystemEnvProvider};
pub use date_format::{DatePattern, W3cDateFormat};
pub use error::{DateFormatError, LibXml2Error, Result, SitemapError, StateError};
pub use generator::{GeneratorOptions, GeneratorState, OutputTarget, SitemapGenerator, SitemapUnit};
pub use index::{IndexOptions, SitemapIndexGenerator, SitemapIndexUrl};
pub use render::{MAX_URLS_PER_SITEMAP, UrlRenderer};
pub use sitemap_url::{ChangeFreq, SitemapUrl, WebSitemapUrl};
pub use validator::{DocumentValidator, SchemaKind, default_validator};
#[cfg(feature = "libxml2")]
pub use validator::{LibXml2Validator, SitemapSchemas};
pub use variants::*;
