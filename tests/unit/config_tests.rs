use std::fs;

use tempfile::TempDir;

use sitemap_generator::{
    Config, ConfigManager, DatePattern, GeneratorOptions, IndexOptions, OutputTarget,
    SitemapError, SitemapIndexGenerator, WebSitemapGenerator,
};

fn write_config(temp_dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = temp_dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.generator.file_name_prefix, "sitemap");
    assert!(config.generator.allow_multiple_sitemaps);
    assert_eq!(config.dates.pattern, DatePattern::Auto);
    assert_eq!(config.index.file_name, "sitemap_index.xml");
}

#[test]
fn test_load_config_from_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        "sitemap.toml",
        r#"
[generator]
base_url = "https://www.example.com"
max_urls = 25
"#,
    );

    let config = ConfigManager::load_config(Some(&path)).unwrap();
    assert_eq!(config.generator.max_urls, Some(25));
}

#[test]
fn test_load_config_rejects_invalid_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        "sitemap.json",
        r#"{ "generator": { "max_urls": 60000 } }"#,
    );

    assert!(ConfigManager::load_config(Some(&path)).is_err());
}

#[test]
fn test_generator_options_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.generator.base_url = Some("http://www.example.com".to_string());
    config.generator.output_dir = Some(temp_dir.path().to_path_buf());
    config.generator.max_urls = Some(2);
    config.dates.pattern = DatePattern::Day;

    let options = GeneratorOptions::from_config(&config).unwrap();
    assert_eq!(
        options.output(),
        &OutputTarget::Directory(temp_dir.path().to_path_buf())
    );
    assert_eq!(options.base_url().as_str(), "http://www.example.com/");

    let mut generator = WebSitemapGenerator::with_options(options).unwrap();
    assert_eq!(generator.max_urls(), 2);
    generator
        .add_url_strs([
            "http://www.example.com/a",
            "http://www.example.com/b",
            "http://www.example.com/c",
        ])
        .unwrap();
    let units = generator.finish().unwrap();
    assert_eq!(units.len(), 2);
    assert!(temp_dir.path().join("sitemap1.xml").exists());
    assert!(temp_dir.path().join("sitemap2.xml").exists());
}

#[test]
fn test_gzip_config_names_compressed_units() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.generator.base_url = Some("http://www.example.com".to_string());
    config.generator.output_dir = Some(temp_dir.path().to_path_buf());
    config.generator.gzip = true;

    let options = GeneratorOptions::from_config(&config).unwrap();
    let mut generator = WebSitemapGenerator::with_options(options).unwrap();
    generator.add_url_str("http://www.example.com/a").unwrap();
    let units = generator.finish().unwrap();

    assert_eq!(units[0].file_name, "sitemap.xml.gz");
    assert!(temp_dir.path().join("sitemap.xml.gz").exists());
}

#[test]
fn test_generator_options_require_base_url() {
    let result = GeneratorOptions::from_config(&Config::default());
    assert!(matches!(result, Err(SitemapError::Config(_))));
}

#[test]
fn test_generator_options_reject_bad_timezone() {
    let mut config = Config::default();
    config.generator.base_url = Some("http://www.example.com".to_string());
    config.dates.timezone = "noon".to_string();

    assert!(matches!(
        GeneratorOptions::from_config(&config),
        Err(SitemapError::DateFormat(_))
    ));
}

#[test]
fn test_index_options_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.generator.base_url = Some("http://www.example.com".to_string());
    config.generator.output_dir = Some(temp_dir.path().to_path_buf());
    config.dates.pattern = DatePattern::Day;
    config.index.file_name = "index.xml".to_string();
    config.index.default_last_mod = Some("2009-03-05".to_string());

    let options = IndexOptions::from_config(&config).unwrap();
    let mut index = SitemapIndexGenerator::new(options).unwrap();
    index.add_urls_by_prefix("sitemap", ".xml", 2).unwrap();
    let doc = index.write().unwrap();

    assert!(doc.contains("<lastmod>2009-03-05</lastmod>"));
    assert_eq!(fs::read_to_string(temp_dir.path().join("index.xml")).unwrap(), doc);
}
