use std::sync::Arc;

use chrono::DateTime;
use url::Url;

use sitemap_generator::{
    DatePattern, GeneratorOptions, Image, ImageSitemapGenerator, ImageSitemapUrl, IndexOptions,
    SchemaKind, SitemapError, SitemapIndexGenerator, StateError, VideoSitemapGenerator,
    VideoSitemapUrl, W3cDateFormat, WebSitemapGenerator, WebSitemapUrl,
};

use crate::common::mocks::MockValidator;
use crate::common::test_helpers::{
    BASE_URL, OutputDir, compact, page, read_file, read_gzip_file,
};

#[test]
fn test_single_url_written_to_directory() {
    let out = OutputDir::new();
    let mut generator = WebSitemapGenerator::with_options(out.options()).unwrap();
    generator
        .add_url_str("http://www.example.com/index.html")
        .unwrap();

    let units = generator.finish().unwrap();
    assert_eq!(out.file_names(), ["sitemap.xml"]);
    assert_eq!(units[0].path.as_deref(), Some(out.file("sitemap.xml").as_path()));

    let written = read_file(&out.file("sitemap.xml"));
    assert_eq!(written, units[0].document);
    assert_eq!(
        compact(&written),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" >\
         <url><loc>http://www.example.com/index.html</loc></url></urlset>"
    );
}

#[test]
fn test_domain_mismatch_writes_nothing() {
    let out = OutputDir::new();
    let mut generator = WebSitemapGenerator::with_options(out.options()).unwrap();

    let result = generator.add_url_str("http://example.org/index.html");
    assert!(matches!(result, Err(SitemapError::DomainMismatch { .. })));
    assert_eq!(generator.pending_urls(), 0);
    assert!(out.file_names().is_empty());
}

#[test]
fn test_twenty_urls_split_into_two_sitemaps() {
    let out = OutputDir::new();
    let mut generator = WebSitemapGenerator::with_options(out.options().max_urls(10)).unwrap();
    generator.add_urls((0..20).map(page)).unwrap();

    let units = generator.finish().unwrap();
    assert_eq!(out.file_names(), ["sitemap1.xml", "sitemap2.xml"]);
    assert_eq!(units.len(), 2);
    for (unit, first) in units.iter().zip([0, 10]) {
        assert_eq!(unit.url_count, 10);
        let doc = read_file(unit.path.as_ref().unwrap());
        assert_eq!(doc.matches("<url>").count(), 10);
        assert!(doc.contains(&format!("<loc>{}/{}</loc>", BASE_URL, first)));
    }
}

#[test]
fn test_capacity_exceeded_without_multiple_sitemaps() {
    let out = OutputDir::new();
    let options = out.options().max_urls(10).allow_multiple_sitemaps(false);
    let mut generator = WebSitemapGenerator::with_options(options).unwrap();
    generator.add_urls((0..10).map(page)).unwrap();

    assert!(matches!(
        generator.add_url(page(10)),
        Err(SitemapError::CapacityExceeded { max_urls: 10 })
    ));

    // The ten accepted URLs still make a complete single sitemap
    let units = generator.finish().unwrap();
    assert_eq!(units[0].url_count, 10);
    assert_eq!(out.file_names(), ["sitemap.xml"]);
}

#[test]
fn test_finish_twice() {
    let mut generator =
        WebSitemapGenerator::with_options(GeneratorOptions::in_memory(BASE_URL).unwrap()).unwrap();
    generator.add_url(page(1)).unwrap();
    generator.finish().unwrap();

    assert!(matches!(
        generator.finish(),
        Err(SitemapError::State(StateError::AlreadyFinished))
    ));
}

#[test]
fn test_empty_sitemap() {
    let out = OutputDir::new();
    let mut generator = WebSitemapGenerator::with_options(out.options()).unwrap();
    assert!(matches!(
        generator.finish(),
        Err(SitemapError::State(StateError::Empty))
    ));
    assert!(out.file_names().is_empty());

    let mut generator =
        WebSitemapGenerator::with_options(out.options().allow_empty_sitemap(true)).unwrap();
    generator.finish().unwrap();
    assert_eq!(
        compact(&read_file(&out.file("sitemap.xml"))),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\" ></urlset>"
    );
}

#[test]
fn test_gzip_output() {
    let out = OutputDir::new();
    let mut generator =
        WebSitemapGenerator::with_options(out.options().max_urls(2).gzip(true)).unwrap();
    generator.add_urls((0..3).map(page)).unwrap();

    let units = generator.finish().unwrap();
    assert_eq!(out.file_names(), ["sitemap1.xml.gz", "sitemap2.xml.gz"]);
    for unit in &units {
        assert_eq!(read_gzip_file(unit.path.as_ref().unwrap()), unit.document);
    }
}

#[test]
fn test_custom_prefix() {
    let out = OutputDir::new();
    let mut generator =
        WebSitemapGenerator::with_options(out.options().file_name_prefix("pages")).unwrap();
    generator.add_url(page(0)).unwrap();
    generator.finish().unwrap();

    assert_eq!(out.file_names(), ["pages.xml"]);
}

#[test]
fn test_memory_output_writes_no_files() {
    let out = OutputDir::new();
    let options = GeneratorOptions::in_memory(BASE_URL).unwrap().max_urls(1);
    let mut generator = WebSitemapGenerator::with_options(options).unwrap();
    generator.add_urls((0..3).map(page)).unwrap();

    let units = generator.finish().unwrap();
    assert_eq!(units.len(), 3);
    assert!(units.iter().all(|unit| unit.path.is_none()));
    assert!(out.file_names().is_empty());
}

#[test]
fn test_sitemaps_with_index() {
    let out = OutputDir::new();
    let day = W3cDateFormat::new(DatePattern::Day);
    let mut generator =
        WebSitemapGenerator::with_options(out.options().max_urls(2).date_format(day)).unwrap();
    let last_mod = DateTime::from_timestamp(86_400, 0).unwrap();
    generator
        .add_url(page(0).with_last_mod(last_mod))
        .unwrap()
        .add_urls((1..3).map(page))
        .unwrap();
    generator.finish().unwrap();

    let index_path = out.file("sitemap_index.xml");
    let index = generator.write_sitemaps_with_index(&index_path).unwrap();
    assert_eq!(read_file(&index_path), index);
    assert_eq!(
        index,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n\
         \x20 <sitemap>\n\
         \x20   <loc>http://www.example.com/sitemap1.xml</loc>\n\
         \x20   <lastmod>1970-01-02</lastmod>\n\
         \x20 </sitemap>\n\
         \x20 <sitemap>\n\
         \x20   <loc>http://www.example.com/sitemap2.xml</loc>\n\
         \x20 </sitemap>\n\
         </sitemapindex>"
    );
}

#[test]
fn test_standalone_index_by_prefix() {
    let out = OutputDir::new();
    let index_path = out.file("sitemap_index.xml");
    let options = IndexOptions::parse(BASE_URL).unwrap().out_file(&index_path);

    let mut index = SitemapIndexGenerator::new(options).unwrap();
    index.add_urls_by_prefix("sitemap", ".xml.gz", 3).unwrap();
    let doc = index.write().unwrap();

    assert_eq!(read_file(&index_path), doc);
    for i in 1..=3 {
        assert!(doc.contains(&format!("<loc>http://www.example.com/sitemap{}.xml.gz</loc>", i)));
    }
}

#[test]
fn test_validator_called_once_per_document() {
    let out = OutputDir::new();
    let mut mock = MockValidator::new();
    mock.expect_validate()
        .withf(|_, _, kind| *kind == SchemaKind::Sitemap)
        .times(3)
        .returning(|_, _, _| Ok(()));
    mock.expect_validate()
        .withf(|_, _, kind| *kind == SchemaKind::SitemapIndex)
        .times(1)
        .returning(|_, _, _| Ok(()));

    let options = out
        .options()
        .max_urls(1)
        .auto_validate(true)
        .validator(Arc::new(mock));
    let mut generator = WebSitemapGenerator::with_options(options).unwrap();
    generator.add_urls((0..3).map(page)).unwrap();
    generator.finish().unwrap();
    generator
        .write_sitemaps_with_index(out.file("sitemap_index.xml"))
        .unwrap();
}

#[test]
fn test_image_sitemap() {
    let out = OutputDir::new();
    let mut generator = ImageSitemapGenerator::with_options(out.options()).unwrap();
    let url = ImageSitemapUrl::new(WebSitemapUrl::parse("http://www.example.com/gallery").unwrap())
        .with_image(
            Image::parse("http://cdn.example.com/cat.jpg")
                .unwrap()
                .with_caption("Cats & dogs"),
        );
    generator.add_url(url).unwrap();
    generator.finish().unwrap();

    let doc = read_file(&out.file("sitemap.xml"));
    assert!(doc.contains("xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\""));
    assert!(doc.contains("<image:loc>http://cdn.example.com/cat.jpg</image:loc>"));
    assert!(doc.contains("<image:caption>Cats &amp; dogs</image:caption>"));
}

#[test]
fn test_video_sitemap() {
    let out = OutputDir::new();
    let mut generator = VideoSitemapGenerator::with_options(out.options()).unwrap();
    let url = VideoSitemapUrl::new(
        WebSitemapUrl::parse("http://www.example.com/watch").unwrap(),
        Url::parse("http://www.example.com/video.flv").unwrap(),
    )
    .with_title("Grilling steaks")
    .with_rating(4.0);
    generator.add_url(url).unwrap();
    generator.finish().unwrap();

    let doc = read_file(&out.file("sitemap.xml"));
    assert!(doc.contains("xmlns:video=\"http://www.google.com/schemas/sitemap-video/1.1\""));
    assert!(
        doc.contains("<video:content_loc>http://www.example.com/video.flv</video:content_loc>")
    );
    assert!(doc.contains("<video:rating>4.0</video:rating>"));
}
