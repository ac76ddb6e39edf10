use mockall::mock;

use sitemap_generator::{DocumentValidator, Result, SchemaKind};

// Mock schema validator for checking what the generators hand over
mock! {
    pub Validator {}

    impl DocumentValidator for Validator {
        fn validate(&self, name: &str, document: &str, kind: SchemaKind) -> Result<()>;
    }
}
