//! Google image sitemaps (`image:image` children)

use url::Url;

use crate::date_format::W3cDateFormat;
use crate::error::Result;
use crate::generator::SitemapGenerator;
use crate::render::{UrlRenderer, render_tag_indented, render_url_element};
use crate::sitemap_url::{SitemapUrl, WebSitemapUrl, parse_url};

pub const IMAGE_NAMESPACE: &str =
    r#"xmlns:image="http://www.google.com/schemas/sitemap-image/1.1""#;

/// One image attached to a page
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    url: Url,
    caption: Option<String>,
    geo_location: Option<String>,
    title: Option<String>,
    license: Option<Url>,
}

impl Image {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            caption: None,
            geo_location: None,
            title: None,
            license: None,
        }
    }

    pub fn parse(url: &str) -> Result<Self> {
        parse_url(url).map(Self::new)
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_geo_location(mut self, geo_location: impl Into<String>) -> Self {
        self.geo_location = Some(geo_location.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_license(mut self, license: Url) -> Self {
        self.license = Some(license);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn geo_location(&self) -> Option<&str> {
        self.geo_location.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn license(&self) -> Option<&Url> {
        self.license.as_ref()
    }
}

/// Render `<image:image>` blocks; children sit `child_indent` spaces deep
pub(crate) fn render_images(out: &mut String, images: &[Image], child_indent: usize) {
    for image in images {
        out.push_str("    <image:image>\n");
        render_tag_indented(out, child_indent, "image", "loc", Some(image.url()));
        render_tag_indented(out, child_indent, "image", "caption", image.caption());
        render_tag_indented(out, child_indent, "image", "geo_location", image.geo_location());
        render_tag_indented(out, child_indent, "image", "title", image.title());
        render_tag_indented(out, child_indent, "image", "license", image.license());
        out.push_str("    </image:image>\n");
    }
}

/// A page together with the images that appear on it
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSitemapUrl {
    base: WebSitemapUrl,
    images: Vec<Image>,
}

impl ImageSitemapUrl {
    pub fn new(base: WebSitemapUrl) -> Self {
        Self {
            base,
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: Image) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_images(mut self, images: impl IntoIterator<Item = Image>) -> Self {
        self.images.extend(images);
        self
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }
}

impl SitemapUrl for ImageSitemapUrl {
    fn base(&self) -> &WebSitemapUrl {
        &self.base
    }
}

impl From<Url> for ImageSitemapUrl {
    fn from(url: Url) -> Self {
        Self::new(WebSitemapUrl::new(url))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRenderer;

impl UrlRenderer for ImageRenderer {
    type Url = ImageSitemapUrl;

    fn xml_namespaces(&self) -> &'static [&'static str] {
        &[IMAGE_NAMESPACE]
    }

    fn render(&self, url: &ImageSitemapUrl, date_format: &W3cDateFormat) -> String {
        let mut extension = String::new();
        render_images(&mut extension, url.images(), 6);
        render_url_element(url.base(), date_format, &extension)
    }
}

pub type ImageSitemapGenerator = SitemapGenerator<ImageRenderer>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_format::parse_timezone;
    use crate::render::render_urlset;
    use crate::sitemap_url::ChangeFreq;
    use chrono::DateTime;

    const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
        <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" \
        xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\" >\n";

    fn landing() -> WebSitemapUrl {
        WebSitemapUrl::parse("http://www.example.com/index.html").unwrap()
    }

    #[test]
    fn test_simple_url() {
        let url = ImageSitemapUrl::new(landing())
            .with_image(Image::parse("http://cdn.example.com/image1.jpg").unwrap())
            .with_image(Image::parse("http://cdn.example.com/image2.jpg").unwrap());

        let doc = render_urlset(&ImageRenderer, &[url], &W3cDateFormat::default());
        let expected = format!(
            "{HEADER}  <url>\n\
            \x20   <loc>http://www.example.com/index.html</loc>\n\
            \x20   <image:image>\n\
            \x20     <image:loc>http://cdn.example.com/image1.jpg</image:loc>\n\
            \x20   </image:image>\n\
            \x20   <image:image>\n\
            \x20     <image:loc>http://cdn.example.com/image2.jpg</image:loc>\n\
            \x20   </image:image>\n\
            \x20 </url>\n\
            </urlset>"
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_image_options_with_timezone() {
        let date_format = W3cDateFormat::default().with_offset(parse_timezone("+08:00").unwrap());
        let image = |n: u32| {
            Image::parse(&format!("http://cdn.example.com/image{n}.jpg"))
                .unwrap()
                .with_caption(format!("An image of the number {n}"))
                .with_title(format!("image{n}.jpg"))
                .with_geo_location("Pyongyang, North Korea")
                .with_license(
                    Url::parse("http://cdn.example.com/licenses/imagelicense.txt").unwrap(),
                )
        };
        let url = ImageSitemapUrl::new(
            landing()
                .with_last_mod(DateTime::from_timestamp_millis(0).unwrap())
                .with_change_freq(ChangeFreq::Weekly)
                .with_priority(0.5),
        )
        .with_images([image(1), image(2)]);

        let rendered = ImageRenderer.render(&url, &date_format);
        assert!(rendered.contains("    <lastmod>1970-01-01T08:00+08:00</lastmod>\n"));
        assert!(rendered.contains("    <changefreq>weekly</changefreq>\n"));
        assert!(rendered.contains("    <priority>0.5</priority>\n"));
        assert!(
            rendered.contains("      <image:caption>An image of the number 2</image:caption>\n")
        );
        assert!(rendered.contains(
            "      <image:license>\
             http://cdn.example.com/licenses/imagelicense.txt</image:license>\n"
        ));
        assert_eq!(rendered.matches("<image:image>").count(), 2);
    }

    #[test]
    fn test_image_text_is_escaped() {
        let url = ImageSitemapUrl::new(landing()).with_image(
            Image::parse("http://cdn.example.com/a.jpg")
                .unwrap()
                .with_caption("Fish & <Chips>"),
        );
        let rendered = ImageRenderer.render(&url, &W3cDateFormat::default());
        assert!(rendered.contains("<image:caption>Fish &amp; &lt;Chips&gt;</image:caption>"));
    }

    #[test]
    fn test_from_url_has_no_images() {
        let url = ImageSitemapUrl::from(Url::parse("http://www.example.com/").unwrap());
        assert!(url.images().is_empty());
        let rendered = ImageRenderer.render(&url, &W3cDateFormat::default());
        assert!(!rendered.contains("image:image"));
    }
}
