//! XML rendering shared by all sitemap variants
//!
//! A variant is described by a [`UrlRenderer`]: the namespaces it declares on
//! the `<urlset>` root and the markup it emits for one record. The helpers in
//! this module produce the common `<url>` envelope so that every variant lays
//! out its documents identically.

use std::borrow::Cow;
use std::fmt::Display;

use quick_xml::escape::escape;

use crate::date_format::W3cDateFormat;
use crate::sitemap_url::{SitemapUrl, WebSitemapUrl};

pub const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Upper bound on records in one sitemap document allowed by the protocol
pub const MAX_URLS_PER_SITEMAP: usize = 50_000;

/// Rendering capability of one sitemap variant
pub trait UrlRenderer {
    type Url: SitemapUrl;

    /// Largest number of records a single document of this variant may hold
    fn max_urls(&self) -> usize {
        MAX_URLS_PER_SITEMAP
    }

    /// Extra namespace declarations for the root element, e.g.
    /// `xmlns:image="http://www.google.com/schemas/sitemap-image/1.1"`
    fn xml_namespaces(&self) -> &'static [&'static str];

    /// Render the complete `<url>` element for `url`
    fn render(&self, url: &Self::Url, date_format: &W3cDateFormat) -> String;
}

/// Render a complete `<urlset>` document holding `urls`
pub fn render_urlset<R: UrlRenderer>(
    renderer: &R,
    urls: &[R::Url],
    date_format: &W3cDateFormat,
) -> String {
    let mut doc = String::with_capacity(256 + urls.len() * 128);
    doc.push_str(XML_HEADER);
    doc.push('\n');
    doc.push_str("<urlset xmlns=\"");
    doc.push_str(SITEMAP_NAMESPACE);
    doc.push_str("\" ");
    for namespace in renderer.xml_namespaces() {
        doc.push_str(namespace);
        doc.push(' ');
    }
    doc.push_str(">\n");
    for url in urls {
        doc.push_str(&renderer.render(url, date_format));
    }
    doc.push_str("</urlset>");
    doc
}

/// Render the `<url>` envelope with the common fields, followed by `extension`
///
/// `extension` is variant markup and is inserted verbatim before `</url>`.
pub fn render_url_element(
    url: &WebSitemapUrl,
    date_format: &W3cDateFormat,
    extension: &str,
) -> String {
    let mut out = String::with_capacity(128 + extension.len());
    out.push_str("  <url>\n");
    out.push_str("    <loc>");
    out.push_str(&escape_xml(url.url().as_str()));
    out.push_str("</loc>\n");
    if let Some(last_mod) = url.last_mod() {
        out.push_str("    <lastmod>");
        out.push_str(&date_format.format(&last_mod));
        out.push_str("</lastmod>\n");
    }
    if let Some(change_freq) = url.change_freq() {
        out.push_str("    <changefreq>");
        out.push_str(change_freq.as_str());
        out.push_str("</changefreq>\n");
    }
    if let Some(priority) = url.priority() {
        out.push_str("    <priority>");
        out.push_str(&format_decimal(priority));
        out.push_str("</priority>\n");
    }
    out.push_str(extension);
    out.push_str("  </url>\n");
    out
}

/// Append `<namespace:tag>value</namespace:tag>` at extension depth, if set
pub fn render_tag<T: Display>(out: &mut String, namespace: &str, tag: &str, value: Option<T>) {
    render_tag_indented(out, 6, namespace, tag, value);
}

pub fn render_tag_indented<T: Display>(
    out: &mut String,
    indent: usize,
    namespace: &str,
    tag: &str,
    value: Option<T>,
) {
    let Some(value) = value else {
        return;
    };
    let value = value.to_string();
    for _ in 0..indent {
        out.push(' ');
    }
    out.push('<');
    out.push_str(namespace);
    out.push(':');
    out.push_str(tag);
    out.push('>');
    out.push_str(&escape_xml(&value));
    out.push_str("</");
    out.push_str(namespace);
    out.push(':');
    out.push_str(tag);
    out.push_str(">\n");
}

/// Escape the five XML special characters (`& < > ' "`)
pub fn escape_xml(s: &str) -> Cow<'_, str> {
    escape(s)
}

/// Render a decimal so that whole numbers keep one fractional digit (`1.0`)
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// `Yes`/`No` flag used by several extension vocabularies
pub(crate) fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}
