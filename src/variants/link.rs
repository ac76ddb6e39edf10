//! Alternate-language and alternate-media links (`xhtml:link`)

use url::Url;

use crate::date_format::W3cDateFormat;
use crate::error::{Result, SitemapError};
use crate::generator::SitemapGenerator;
use crate::render::{UrlRenderer, escape_xml, render_url_element};
use crate::sitemap_url::{SitemapUrl, WebSitemapUrl};

pub const XHTML_NAMESPACE: &str = r#"xmlns:xhtml="http://www.w3.org/1999/xhtml""#;

/// One alternate version of a page
///
/// Attributes are rendered in insertion order between `rel` and `href`, e.g.
/// `hreflang="en-GB"` or `media="only screen and (max-width: 640px)"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAlternate {
    href: Url,
    attributes: Vec<(String, String)>,
}

impl LinkAlternate {
    pub fn new(href: Url) -> Self {
        Self {
            href,
            attributes: Vec::new(),
        }
    }

    pub fn hreflang(href: Url, language: impl Into<String>) -> Self {
        Self::new(href).push_attribute("hreflang".to_string(), language.into())
    }

    pub fn media(href: Url, query: impl Into<String>) -> Self {
        Self::new(href).push_attribute("media".to_string(), query.into())
    }

    /// Add an attribute, rendered verbatim by name
    ///
    /// `name` must be an XML name and may not be `rel` or `href`, which the
    /// renderer writes itself.
    pub fn with_attribute(
        self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        if !is_attribute_name(&name) || name == "rel" || name == "href" {
            return Err(SitemapError::InvalidAttributeName { name });
        }
        Ok(self.push_attribute(name, value.into()))
    }

    fn push_attribute(mut self, name: String, value: String) -> Self {
        self.attributes.push((name, value));
        self
    }

    pub fn href(&self) -> &Url {
        &self.href
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
}

fn is_attribute_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => chars
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.')),
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinkSitemapUrl {
    base: WebSitemapUrl,
    alternates: Vec<LinkAlternate>,
}

impl LinkSitemapUrl {
    pub fn new(base: WebSitemapUrl) -> Self {
        Self {
            base,
            alternates: Vec::new(),
        }
    }

    pub fn with_alternate(mut self, alternate: LinkAlternate) -> Self {
        self.alternates.push(alternate);
        self
    }

    pub fn with_alternates(
        mut self,
        alternates: impl IntoIterator<Item = LinkAlternate>,
    ) -> Self {
        self.alternates.extend(alternates);
        self
    }

    pub fn alternates(&self) -> &[LinkAlternate] {
        &self.alternates
    }
}

impl SitemapUrl for LinkSitemapUrl {
    fn base(&self) -> &WebSitemapUrl {
        &self.base
    }
}

impl From<Url> for LinkSitemapUrl {
    fn from(url: Url) -> Self {
        Self::new(WebSitemapUrl::new(url))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LinkRenderer;

impl UrlRenderer for LinkRenderer {
    type Url = LinkSitemapUrl;

    fn xml_namespaces(&self) -> &'static [&'static str] {
        &[XHTML_NAMESPACE]
    }

    fn render(&self, url: &LinkSitemapUrl, date_format: &W3cDateFormat) -> String {
        let mut ext = String::new();
        for alternate in &url.alternates {
            ext.push_str("    <xhtml:link\n      rel=\"alternate\"\n");
            for (name, value) in &alternate.attributes {
                ext.push_str("      ");
                ext.push_str(name);
                ext.push_str("=\"");
                ext.push_str(&escape_xml(value));
                ext.push_str("\"\n");
            }
            ext.push_str("      href=\"");
            ext.push_str(&escape_xml(alternate.href.as_str()));
            ext.push_str("\"\n    />\n");
        }
        render_url_element(&url.base, date_format, &ext)
    }
}

pub type LinkSitemapGenerator = SitemapGenerator<LinkRenderer>;
