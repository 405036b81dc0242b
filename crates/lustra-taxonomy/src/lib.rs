pub mod load;
pub mod resolver;
pub mod types;

pub use load::load_taxonomy;
pub use resolver::{resolve, Resolution};
pub use types::{BrandCatalog, BrandKind, CatalogFile, CategoryNode, Taxonomy};

use thiserror::Error;

/// Errors produced while loading or validating the catalog taxonomy.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("catalog validation failed: {0}")]
    Validation(String),
}
