use crate::date_format::W3cDateFormat;
use crate::generator::SitemapGenerator;
use crate::render::{UrlRenderer, render_url_element};
use crate::sitemap_url::WebSitemapUrl;

/// Plain sitemaps.org documents with no extension vocabulary
#[derive(Debug, Clone, Copy, Default)]
pub struct WebRenderer;

impl UrlRenderer for WebRenderer {
    type Url = WebSitemapUrl;

    fn xml_namespaces(&self) -> &'static [&'static str] {
        &[]
    }

    fn render(&self, url: &WebSitemapUrl, date_format: &W3cDateFormat) -> String {
        render_url_element(url, date_format, "")
    }
}

pub type WebSitemapGenerator = SitemapGenerator<WebRenderer>;
