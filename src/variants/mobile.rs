//! Google mobile sitemaps (`<mobile:mobile/>` marker)

use url::Url;

use crate::date_format::W3cDateFormat;
use crate::generator::SitemapGenerator;
use crate::render::{UrlRenderer, render_url_element};
use crate::sitemap_url::{SitemapUrl, WebSitemapUrl};

pub const MOBILE_NAMESPACE: &str =
    r#"xmlns:mobile="http://www.google.com/schemas/sitemap-mobile/1.0""#;

/// A page served in a mobile-specific markup
#[derive(Debug, Clone, PartialEq)]
pub struct MobileSitemapUrl {
    base: WebSitemapUrl,
}

impl MobileSitemapUrl {
    pub fn new(base: WebSitemapUrl) -> Self {
        Self { base }
    }
}

impl SitemapUrl for MobileSitemapUrl {
    fn base(&self) -> &WebSitemapUrl {
        &self.base
    }
}

impl From<Url> for MobileSitemapUrl {
    fn from(url: Url) -> Self {
        Self::new(WebSitemapUrl::new(url))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MobileRenderer;

impl UrlRenderer for MobileRenderer {
    type Url = MobileSitemapUrl;

    fn xml_namespaces(&self) -> &'static [&'static str] {
        &[MOBILE_NAMESPACE]
    }

    fn render(&self, url: &MobileSitemapUrl, date_format: &W3cDateFormat) -> String {
        render_url_element(&url.base, date_format, "    <mobile:mobile/>\n")
    }
}

pub type MobileSitemapGenerator = SitemapGenerator<MobileRenderer>;
