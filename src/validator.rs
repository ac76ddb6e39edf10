//! Schema validation of rendered documents
//!
//! Generators call a [`DocumentValidator`] after each document is produced when
//! auto-validation is enabled. The libxml2-backed [`LibXml2Validator`] checks
//! documents against the sitemaps.org schemas embedded in this crate; the
//! schemas are parsed once per process and shared by every validator.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;

/// Which protocol schema a document must satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// `<urlset>` documents
    Sitemap,
    /// `<sitemapindex>` documents
    SitemapIndex,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::Sitemap => write!(f, "sitemap"),
            SchemaKind::SitemapIndex => write!(f, "sitemap index"),
        }
    }
}

/// Pass/fail check of a complete rendered document
#[cfg_attr(test, mockall::automock)]
pub trait DocumentValidator: Send + Sync {
    /// `name` identifies the document (usually its file name) in error reports
    fn validate(&self, name: &str, document: &str, kind: SchemaKind) -> Result<()>;
}

/// The validator used when auto-validation is requested without injecting one
pub fn default_validator() -> Result<Arc<dyn DocumentValidator>> {
    #[cfg(feature = "libxml2")]
    {
        Ok(Arc::new(LibXml2Validator::global()?))
    }
    #[cfg(not(feature = "libxml2"))]
    {
        Err(crate::error::SitemapError::Config(
            "auto-validation needs a document validator; enable the libxml2 feature or supply one"
                .to_string(),
        ))
    }
}

#[cfg(feature = "libxml2")]
pub use self::libxml2_backend::{LibXml2Validator, SitemapSchemas};

#[cfg(feature = "libxml2")]
mod libxml2_backend {
    use std::sync::{Arc, OnceLock};

    use tracing::debug;

    use super::{DocumentValidator, SchemaKind};
    use crate::error::{LibXml2Result, Result, SitemapError};
    use crate::libxml2::{LibXml2Wrapper, ValidationResult, XmlSchemaPtr};

    const SITEMAP_XSD: &str = include_str!("schemas/sitemap.xsd");
    const SITEINDEX_XSD: &str = include_str!("schemas/siteindex.xsd");

    static GLOBAL_SCHEMAS: OnceLock<Arc<SitemapSchemas>> = OnceLock::new();

    /// Parsed sitemap and sitemap-index schemas
    #[derive(Debug, Clone)]
    pub struct SitemapSchemas {
        sitemap: XmlSchemaPtr,
        sitemap_index: XmlSchemaPtr,
    }

    impl SitemapSchemas {
        /// Parse the embedded schemas
        pub fn load(wrapper: &LibXml2Wrapper) -> LibXml2Result<Self> {
            Ok(Self {
                sitemap: wrapper.parse_schema_from_memory(SITEMAP_XSD.as_bytes())?,
                sitemap_index: wrapper.parse_schema_from_memory(SITEINDEX_XSD.as_bytes())?,
            })
        }

        /// Process-wide schemas, parsed on first use
        pub fn global() -> Result<Arc<SitemapSchemas>> {
            if let Some(schemas) = GLOBAL_SCHEMAS.get() {
                return Ok(Arc::clone(schemas));
            }

            let loaded = Arc::new(Self::load(&LibXml2Wrapper::new())?);
            debug!("Parsed embedded sitemap schemas");
            Ok(Arc::clone(GLOBAL_SCHEMAS.get_or_init(|| loaded)))
        }

        pub fn schema(&self, kind: SchemaKind) -> &XmlSchemaPtr {
            match kind {
                SchemaKind::Sitemap => &self.sitemap,
                SchemaKind::SitemapIndex => &self.sitemap_index,
            }
        }
    }

    /// [`DocumentValidator`] backed by libxml2
    #[derive(Debug, Clone)]
    pub struct LibXml2Validator {
        wrapper: Arc<LibXml2Wrapper>,
        schemas: Arc<SitemapSchemas>,
    }

    impl LibXml2Validator {
        pub fn new(schemas: Arc<SitemapSchemas>) -> Self {
            Self {
                wrapper: Arc::new(LibXml2Wrapper::new()),
                schemas,
            }
        }

        /// Validator sharing the process-wide schemas
        pub fn global() -> Result<Self> {
            SitemapSchemas::global().map(Self::new)
        }
    }

    impl DocumentValidator for LibXml2Validator {
        fn validate(&self, name: &str, document: &str, kind: SchemaKind) -> Result<()> {
            let schema = self.schemas.schema(kind);
            match self
                .wrapper
                .validate_memory(schema, document.as_bytes(), name)?
            {
                ValidationResult::Valid => {
                    debug!(document = name, %kind, "Document passed schema validation");
                    Ok(())
                }
                ValidationResult::Invalid { error_count, errors } => {
                    let details = if errors.is_empty() {
                        format!("{} error(s)", error_count)
                    } else {
                        errors.join("; ")
                    };
                    Err(SitemapError::SchemaValidation {
                        document: name.to_string(),
                        details,
                    })
                }
                ValidationResult::InternalError { code } => Err(SitemapError::LibXml2Internal {
                    details: format!("validation of {} returned {}", name, code),
                }),
            }
        }
    }

}
