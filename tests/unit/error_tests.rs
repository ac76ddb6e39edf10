//! Error type tests
//!
//! Tests for error messages and conversions across the public error surface.

use std::error::Error;

use sitemap_generator::{
    ConfigError, DateFormatError, GeneratorOptions, SitemapError, StateError, W3cDateFormat,
    WebSitemapUrl,
};

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let sitemap_error: SitemapError = io_error.into();

    assert!(matches!(sitemap_error, SitemapError::Io(_)));
    assert!(sitemap_error.to_string().contains("File not found"));
}

#[test]
fn test_invalid_url_keeps_source() {
    let err = WebSitemapUrl::parse("no scheme here").unwrap_err();

    match &err {
        SitemapError::InvalidUrl { url, .. } => assert_eq!(url, "no scheme here"),
        other => panic!("Expected InvalidUrl, got {:?}", other),
    }
    assert!(err.source().is_some());
}

#[test]
fn test_domain_mismatch_message() {
    let err = SitemapError::DomainMismatch {
        url: "http://example.org/".to_string(),
        base_url: "http://www.example.com/".to_string(),
    };

    let message = err.to_string();
    assert!(message.contains("http://example.org/"));
    assert!(message.contains("http://www.example.com/"));
}

#[test]
fn test_capacity_exceeded_message() {
    let message = SitemapError::CapacityExceeded { max_urls: 10 }.to_string();
    assert!(message.contains("10"));
    assert!(message.contains("multiple sitemaps"));
}

#[test]
fn test_state_errors() {
    let err: SitemapError = StateError::AlreadyFinished.into();
    assert!(matches!(err, SitemapError::State(StateError::AlreadyFinished)));
    assert!(err.to_string().contains("already written"));

    assert!(StateError::Empty.to_string().contains("empty"));
    assert!(StateError::NotFinished.to_string().contains("finish()"));
}

#[test]
fn test_date_format_error_conversion() {
    let parse_error = W3cDateFormat::default().parse("yesterday").unwrap_err();
    assert!(matches!(parse_error, DateFormatError::Malformed { .. }));

    let sitemap_error: SitemapError = parse_error.into();
    assert!(matches!(sitemap_error, SitemapError::DateFormat(_)));
    assert!(sitemap_error.to_string().contains("yesterday"));
}

#[test]
fn test_schema_validation_message() {
    let err = SitemapError::SchemaValidation {
        document: "sitemap1.xml".to_string(),
        details: "line 3: element 'priority' is not valid".to_string(),
    };

    let message = err.to_string();
    assert!(message.contains("sitemap1.xml"));
    assert!(message.contains("priority"));
}

#[test]
fn test_config_error_conversion() {
    let err: SitemapError = ConfigError::UnsupportedFormat("yaml".to_string()).into();
    assert!(matches!(err, SitemapError::Config(ref msg) if msg.contains("yaml")));

    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: SitemapError = ConfigError::Io(io).into();
    assert!(matches!(err, SitemapError::Io(_)));
}

#[test]
fn test_options_reject_relative_base() {
    assert!(matches!(
        GeneratorOptions::in_memory("/relative/path"),
        Err(SitemapError::InvalidUrl { .. })
    ));
}
