use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tempfile::TempDir;

use sitemap_generator::{GeneratorOptions, WebSitemapUrl};

pub const BASE_URL: &str = "http://www.example.com";

/// Temporary output directory plus generator options writing into it
pub struct OutputDir {
    pub temp_dir: TempDir,
}

impl OutputDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }

    pub fn options(&self) -> GeneratorOptions {
        GeneratorOptions::for_directory(BASE_URL, self.path()).unwrap()
    }

    /// Sorted names of every file written so far
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for OutputDir {
    fn default() -> Self {
        Self::new()
    }
}

pub fn read_file(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

pub fn read_gzip_file(path: &Path) -> String {
    let mut decoder = GzDecoder::new(std::fs::File::open(path).unwrap());
    let mut content = String::new();
    decoder.read_to_string(&mut content).unwrap();
    content
}

/// Document with line breaks and indentation removed
pub fn compact(document: &str) -> String {
    document.lines().map(str::trim).collect()
}

pub fn page(n: usize) -> WebSitemapUrl {
    WebSitemapUrl::parse(&format!("{}/{}", BASE_URL, n)).unwrap()
}
