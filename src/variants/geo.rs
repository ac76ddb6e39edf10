//! Google geo sitemaps (`geo:geo` children)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::date_format::W3cDateFormat;
use crate::generator::SitemapGenerator;
use crate::render::{UrlRenderer, render_tag, render_url_element};
use crate::sitemap_url::{SitemapUrl, WebSitemapUrl};

pub const GEO_NAMESPACE: &str = r#"xmlns:geo="http://www.google.com/geo/schemas/sitemap/1.0""#;

/// Encoding of the geographic content behind the URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoFormat {
    Kml,
    GeoRss,
}

impl fmt::Display for GeoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoFormat::Kml => write!(f, "kml"),
            GeoFormat::GeoRss => write!(f, "georss"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoSitemapUrl {
    base: WebSitemapUrl,
    format: GeoFormat,
}

impl GeoSitemapUrl {
    pub fn new(base: WebSitemapUrl, format: GeoFormat) -> Self {
        Self { base, format }
    }

    pub fn format(&self) -> GeoFormat {
        self.format
    }
}

impl SitemapUrl for GeoSitemapUrl {
    fn base(&self) -> &WebSitemapUrl {
        &self.base
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GeoRenderer;

impl UrlRenderer for GeoRenderer {
    type Url = GeoSitemapUrl;

    fn xml_namespaces(&self) -> &'static [&'static str] {
        &[GEO_NAMESPACE]
    }

    fn render(&self, url: &GeoSitemapUrl, date_format: &W3cDateFormat) -> String {
        let mut ext = String::from("    <geo:geo>\n");
        render_tag(&mut ext, "geo", "format", Some(url.format));
        ext.push_str("    </geo:geo>\n");
        render_url_element(&url.base, date_format, &ext)
    }
}

pub type GeoSitemapGenerator = SitemapGenerator<GeoRenderer>;
