//! Google News sitemaps (`news:news` children)
//!
//! News documents are capped at 1,000 records. A renderer built with
//! [`NewsRenderer::with_images`] additionally declares the image namespace and
//! emits `image:image` blocks after the news metadata.

use chrono::{DateTime, Utc};

use crate::date_format::W3cDateFormat;
use crate::generator::SitemapGenerator;
use crate::render::{UrlRenderer, render_tag, render_tag_indented, render_url_element};
use crate::sitemap_url::{SitemapUrl, WebSitemapUrl};
use crate::variants::image::{IMAGE_NAMESPACE, Image, render_images};

pub const NEWS_NAMESPACE: &str =
    r#"xmlns:news="http://www.google.com/schemas/sitemap-news/0.9""#;

/// Records allowed in a single news sitemap
pub const MAX_NEWS_URLS: usize = 1000;

/// The publication an article belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsPublication {
    pub name: String,
    pub language: String,
}

impl NewsPublication {
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsSitemapUrl {
    base: WebSitemapUrl,
    publication: NewsPublication,
    publication_date: DateTime<Utc>,
    title: String,
    genres: Vec<String>,
    keywords: Vec<String>,
    images: Vec<Image>,
}

impl NewsSitemapUrl {
    pub fn new(
        base: WebSitemapUrl,
        publication: NewsPublication,
        publication_date: DateTime<Utc>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            base,
            publication,
            publication_date,
            title: title.into(),
            genres: Vec::new(),
            keywords: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Only rendered by a renderer built with [`NewsRenderer::with_images`]
    pub fn with_image(mut self, image: Image) -> Self {
        self.images.push(image);
        self
    }

    pub fn publication(&self) -> &NewsPublication {
        &self.publication
    }

    pub fn publication_date(&self) -> DateTime<Utc> {
        self.publication_date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }
}

impl SitemapUrl for NewsSitemapUrl {
    fn base(&self) -> &WebSitemapUrl {
        &self.base
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NewsRenderer {
    images: bool,
}

impl NewsRenderer {
    pub fn with_images() -> Self {
        Self { images: true }
    }
}

fn comma_joined(values: &[String]) -> Option<String> {
    (!values.is_empty()).then(|| values.join(", "))
}

impl UrlRenderer for NewsRenderer {
    type Url = NewsSitemapUrl;

    fn max_urls(&self) -> usize {
        MAX_NEWS_URLS
    }

    fn xml_namespaces(&self) -> &'static [&'static str] {
        if self.images {
            &[NEWS_NAMESPACE, IMAGE_NAMESPACE]
        } else {
            &[NEWS_NAMESPACE]
        }
    }

    fn render(&self, url: &NewsSitemapUrl, date_format: &W3cDateFormat) -> String {
        let mut ext = String::from("    <news:news>\n      <news:publication>\n");
        render_tag_indented(&mut ext, 8, "news", "name", Some(&url.publication.name));
        render_tag_indented(&mut ext, 8, "news", "language", Some(&url.publication.language));
        ext.push_str("      </news:publication>\n");
        render_tag(&mut ext, "news", "genres", comma_joined(&url.genres));
        render_tag(
            &mut ext,
            "news",
            "publication_date",
            Some(date_format.format(&url.publication_date)),
        );
        render_tag(&mut ext, "news", "title", Some(&url.title));
        render_tag(&mut ext, "news", "keywords", comma_joined(&url.keywords));
        ext.push_str("    </news:news>\n");
        if self.images {
            render_images(&mut ext, &url.images, 8);
        }

        render_url_element(&url.base, date_format, &ext)
    }
}

pub type NewsSitemapGenerator = SitemapGenerator<NewsRenderer>;
