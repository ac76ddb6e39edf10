use thiserror::Error;

/// Main library error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {url} - {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid link attribute name: '{name}'")]
    InvalidAttributeName { name: String },

    #[error("Domain of URL {url} doesn't match base URL {base_url}")]
    DomainMismatch { url: String, base_url: String },

    #[error(
        "More than {max_urls} urls, but multiple sitemaps are not allowed; \
         enable them to split the sitemap into multiple files with a sitemap index"
    )]
    CapacityExceeded { max_urls: usize },

    #[error("Invalid generator state: {0}")]
    State(#[from] StateError),

    #[error("Date format error: {0}")]
    DateFormat(#[from] DateFormatError),

    #[error("Sitemap failed schema validation: {document} - {details}")]
    SchemaValidation { document: String, details: String },

    #[error("LibXML2 internal error: {details}")]
    LibXml2Internal { details: String },
}

/// Lifecycle violations of a generator or index
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Sitemap already written; you must create a new generator to make more sitemaps")]
    AlreadyFinished,

    #[error("No URLs added, sitemap would be empty; add some URLs or allow empty sitemaps")]
    Empty,

    #[error("Sitemaps not written yet; call finish() first")]
    NotFinished,
}

/// W3C datetime parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateFormatError {
    #[error("Malformed W3C datetime '{input}': {reason}")]
    Malformed { input: String, reason: String },

    #[error("Datetime '{input}' does not match pattern {pattern}")]
    PatternMismatch { input: String, pattern: String },

    #[error("Invalid timezone offset: {0}")]
    InvalidOffset(String),
}

/// LibXML2-specific error types
#[derive(Error, Debug)]
pub enum LibXml2Error {
    #[error("Schema parsing failed: null pointer returned")]
    SchemaParseFailed,

    #[error("Validation context creation failed")]
    ValidationContextCreationFailed,

    #[error("Document parsing failed: {name}")]
    DocumentParseFailed { name: String },

    #[error("Memory allocation failed in libxml2")]
    MemoryAllocation,

    #[error("Document too large for libxml2: {size} bytes")]
    DocumentTooLarge { size: usize },

    #[error("Schema validation internal error: {code}")]
    InternalError { code: i32 },
}

impl From<LibXml2Error> for SitemapError {
    fn from(err: LibXml2Error) -> Self {
        SitemapError::LibXml2Internal {
            details: err.to_string(),
        }
    }
}

impl SitemapError {
    pub(crate) fn invalid_url(url: &str, source: url::ParseError) -> Self {
        SitemapError::InvalidUrl {
            url: url.to_string(),
            source,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Date format result type alias
pub type DateFormatResult<T> = std::result::Result<T, DateFormatError>;

/// LibXML2 result type alias
pub type LibXml2Result<T> = std::result::Result<T, LibXml2Error>;
