//! Google video sitemaps (`video:video` children)

use chrono::{DateTime, Utc};
use url::Url;

use crate::date_format::W3cDateFormat;
use crate::generator::SitemapGenerator;
use crate::render::{
    UrlRenderer, escape_xml, format_decimal, render_tag, render_url_element, yes_no,
};
use crate::sitemap_url::{SitemapUrl, WebSitemapUrl};

pub const VIDEO_NAMESPACE: &str =
    r#"xmlns:video="http://www.google.com/schemas/sitemap-video/1.1""#;

/// A landing page hosting one video
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSitemapUrl {
    base: WebSitemapUrl,
    content_url: Url,
    player_url: Option<Url>,
    allow_embed: bool,
    thumbnail_url: Option<Url>,
    title: Option<String>,
    description: Option<String>,
    rating: Option<f64>,
    view_count: Option<u64>,
    publication_date: Option<DateTime<Utc>>,
    tags: Vec<String>,
    category: Option<String>,
    family_friendly: Option<bool>,
    duration_secs: Option<u32>,
}

impl VideoSitemapUrl {
    pub fn new(base: WebSitemapUrl, content_url: Url) -> Self {
        Self {
            base,
            content_url,
            player_url: None,
            allow_embed: false,
            thumbnail_url: None,
            title: None,
            description: None,
            rating: None,
            view_count: None,
            publication_date: None,
            tags: Vec::new(),
            category: None,
            family_friendly: None,
            duration_secs: None,
        }
    }

    /// Embeddable player; `allow_embed` renders as the `allow_embed` attribute
    pub fn with_player_url(mut self, player_url: Url, allow_embed: bool) -> Self {
        self.player_url = Some(player_url);
        self.allow_embed = allow_embed;
        self
    }

    pub fn with_thumbnail_url(mut self, thumbnail_url: Url) -> Self {
        self.thumbnail_url = Some(thumbnail_url);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_view_count(mut self, view_count: u64) -> Self {
        self.view_count = Some(view_count);
        self
    }

    pub fn with_publication_date(mut self, publication_date: DateTime<Utc>) -> Self {
        self.publication_date = Some(publication_date);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_family_friendly(mut self, family_friendly: bool) -> Self {
        self.family_friendly = Some(family_friendly);
        self
    }

    pub fn with_duration_secs(mut self, duration_secs: u32) -> Self {
        self.duration_secs = Some(duration_secs);
        self
    }

    pub fn content_url(&self) -> &Url {
        &self.content_url
    }

    pub fn player_url(&self) -> Option<&Url> {
        self.player_url.as_ref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl SitemapUrl for VideoSitemapUrl {
    fn base(&self) -> &WebSitemapUrl {
        &self.base
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VideoRenderer;

impl UrlRenderer for VideoRenderer {
    type Url = VideoSitemapUrl;

    fn xml_namespaces(&self) -> &'static [&'static str] {
        &[VIDEO_NAMESPACE]
    }

    fn render(&self, url: &VideoSitemapUrl, date_format: &W3cDateFormat) -> String {
        let mut ext = String::from("    <video:video>\n");
        render_tag(&mut ext, "video", "content_loc", Some(&url.content_url));
        if let Some(player_url) = &url.player_url {
            ext.push_str("      <video:player_loc allow_embed=\"");
            ext.push_str(yes_no(url.allow_embed));
            ext.push_str("\">");
            ext.push_str(&escape_xml(player_url.as_str()));
            ext.push_str("</video:player_loc>\n");
        }
        render_tag(&mut ext, "video", "thumbnail_loc", url.thumbnail_url.as_ref());
        render_tag(&mut ext, "video", "title", url.title.as_deref());
        render_tag(&mut ext, "video", "description", url.description.as_deref());
        render_tag(&mut ext, "video", "rating", url.rating.map(format_decimal));
        render_tag(&mut ext, "video", "view_count", url.view_count);
        render_tag(
            &mut ext,
            "video",
            "publication_date",
            url.publication_date.map(|d| date_format.format(&d)),
        );
        for tag in &url.tags {
            render_tag(&mut ext, "video", "tag", Some(tag));
        }
        render_tag(&mut ext, "video", "category", url.category.as_deref());
        render_tag(&mut ext, "video", "family_friendly", url.family_friendly.map(yes_no));
        render_tag(&mut ext, "video", "duration", url.duration_secs);
        ext.push_str("    </video:video>\n");

        render_url_element(&url.base, date_format, &ext)
    }
}

pub type VideoSitemapGenerator = SitemapGenerator<VideoRenderer>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_format::zulu;
    use crate::render::render_urlset;

    const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
        <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
        xmlns:video=\"http://www.google.com/schemas/sitemap-video/1.1\" >\n";

    fn video() -> VideoSitemapUrl {
        VideoSitemapUrl::new(
            WebSitemapUrl::parse("http://www.example.com/index.html").unwrap(),
            Url::parse("http://www.example.com/index.flv").unwrap(),
        )
    }

    #[test]
    fn test_simple_url() {
        let doc = render_urlset(&VideoRenderer, &[video()], &W3cDateFormat::default());
        let expected = format!(
            "{HEADER}  <url>\n\
            \x20   <loc>http://www.example.com/index.html</loc>\n\
            \x20   <video:video>\n\
            \x20     <video:content_loc>http://www.example.com/index.flv</video:content_loc>\n\
            \x20   </video:video>\n\
            \x20 </url>\n\
            </urlset>"
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_options() {
        let date_format = W3cDateFormat::default().with_offset(zulu());
        let url = video()
            .with_player_url(Url::parse("http://www.example.com/index.swf").unwrap(), true)
            .with_thumbnail_url(Url::parse("http://www.example.com/thumbnail.jpg").unwrap())
            .with_title("This is a video!")
            .with_description("A great video about dinosaurs")
            .with_rating(5.0)
            .with_view_count(500_000)
            .with_publication_date(DateTime::from_timestamp_millis(0).unwrap())
            .with_tags(["dinosaurs", "example", "awesome"])
            .with_category("example")
            .with_family_friendly(false)
            .with_duration_secs(60 * 30);

        let doc = render_urlset(&VideoRenderer, &[url], &date_format);
        let expected = format!(
            "{HEADER}  <url>\n\
            \x20   <loc>http://www.example.com/index.html</loc>\n\
            \x20   <video:video>\n\
            \x20     <video:content_loc>\
            http://www.example.com/index.flv</video:content_loc>\n\
            \x20     <video:player_loc allow_embed=\"Yes\">\
            http://www.example.com/index.swf</video:player_loc>\n\
            \x20     <video:thumbnail_loc>\
            http://www.example.com/thumbnail.jpg</video:thumbnail_loc>\n\
            \x20     <video:title>This is a video!</video:title>\n\
            \x20     <video:description>A great video about dinosaurs</video:description>\n\
            \x20     <video:rating>5.0</video:rating>\n\
            \x20     <video:view_count>500000</video:view_count>\n\
            \x20     <video:publication_date>1970-01-01</video:publication_date>\n\
            \x20     <video:tag>dinosaurs</video:tag>\n\
            \x20     <video:tag>example</video:tag>\n\
            \x20     <video:tag>awesome</video:tag>\n\
            \x20     <video:category>example</video:category>\n\
            \x20     <video:family_friendly>No</video:family_friendly>\n\
            \x20     <video:duration>1800</video:duration>\n\
            \x20   </video:video>\n\
            \x20 </url>\n\
            </urlset>"
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_player_without_embed() {
        let player = Url::parse("http://www.example.com/p.swf").unwrap();
        let url = video().with_player_url(player, false);
        let rendered = VideoRenderer.render(&url, &W3cDateFormat::default());
        assert!(rendered.contains("<video:player_loc allow_embed=\"No\">"));
    }
}
