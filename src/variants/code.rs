//! Google code search sitemaps (`codesearch:codesearch` children)

use std::fmt;

use url::Url;

use crate::date_format::W3cDateFormat;
use crate::generator::SitemapGenerator;
use crate::render::{UrlRenderer, render_tag, render_url_element};
use crate::sitemap_url::{SitemapUrl, WebSitemapUrl};

pub const CODE_NAMESPACE: &str =
    r#"xmlns:codesearch="http://www.google.com/codesearch/schemas/sitemap/1.0""#;

/// Language or packaging of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeFileType {
    Archive,
    C,
    Cpp,
    CSharp,
    Java,
    JavaScript,
    Perl,
    Php,
    Python,
    Ruby,
    Rust,
    Shell,
    Other,
}

impl CodeFileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeFileType::Archive => "archive",
            CodeFileType::C => "c",
            CodeFileType::Cpp => "c++",
            CodeFileType::CSharp => "c#",
            CodeFileType::Java => "java",
            CodeFileType::JavaScript => "javascript",
            CodeFileType::Perl => "perl",
            CodeFileType::Php => "php",
            CodeFileType::Python => "python",
            CodeFileType::Ruby => "ruby",
            CodeFileType::Rust => "rust",
            CodeFileType::Shell => "shell",
            CodeFileType::Other => "other",
        }
    }
}

impl fmt::Display for CodeFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeLicense {
    Apache,
    Artistic,
    Bsd,
    Cpl,
    Gpl,
    Lgpl,
    Mit,
    Mozilla,
    Python,
    Zope,
    Disclaimer,
}

impl CodeLicense {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeLicense::Apache => "apache",
            CodeLicense::Artistic => "artistic",
            CodeLicense::Bsd => "bsd",
            CodeLicense::Cpl => "cpl",
            CodeLicense::Gpl => "gpl",
            CodeLicense::Lgpl => "lgpl",
            CodeLicense::Mit => "mit",
            CodeLicense::Mozilla => "mozilla",
            CodeLicense::Python => "python",
            CodeLicense::Zope => "zope",
            CodeLicense::Disclaimer => "disclaimer",
        }
    }
}

impl fmt::Display for CodeLicense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source file or source archive
#[derive(Debug, Clone, PartialEq)]
pub struct CodeSitemapUrl {
    base: WebSitemapUrl,
    file_type: CodeFileType,
    license: Option<CodeLicense>,
    file_name: Option<String>,
    package_url: Option<Url>,
    package_map: Option<String>,
}

impl CodeSitemapUrl {
    pub fn new(base: WebSitemapUrl, file_type: CodeFileType) -> Self {
        Self {
            base,
            file_type,
            license: None,
            file_name: None,
            package_url: None,
            package_map: None,
        }
    }

    pub fn with_license(mut self, license: CodeLicense) -> Self {
        self.license = Some(license);
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_package_url(mut self, package_url: Url) -> Self {
        self.package_url = Some(package_url);
        self
    }

    /// Path of the package map inside an archive
    pub fn with_package_map(mut self, package_map: impl Into<String>) -> Self {
        self.package_map = Some(package_map.into());
        self
    }

    pub fn file_type(&self) -> CodeFileType {
        self.file_type
    }
}

impl SitemapUrl for CodeSitemapUrl {
    fn base(&self) -> &WebSitemapUrl {
        &self.base
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CodeRenderer;

impl UrlRenderer for CodeRenderer {
    type Url = CodeSitemapUrl;

    fn xml_namespaces(&self) -> &'static [&'static str] {
        &[CODE_NAMESPACE]
    }

    fn render(&self, url: &CodeSitemapUrl, date_format: &W3cDateFormat) -> String {
        let mut ext = String::from("    <codesearch:codesearch>\n");
        render_tag(&mut ext, "codesearch", "filetype", Some(url.file_type));
        render_tag(&mut ext, "codesearch", "license", url.license);
        render_tag(&mut ext, "codesearch", "filename", url.file_name.as_deref());
        render_tag(&mut ext, "codesearch", "packageurl", url.package_url.as_ref());
        render_tag(&mut ext, "codesearch", "packagemap", url.package_map.as_deref());
        ext.push_str("    </codesearch:codesearch>\n");
        render_url_element(&url.base, date_format, &ext)
    }
}

pub type CodeSitemapGenerator = SitemapGenerator<CodeRenderer>;
