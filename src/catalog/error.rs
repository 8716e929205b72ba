use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures at the process boundary: reading, parsing, writing the catalog, and config.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unable to read '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse json '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to serialize catalog")]
    Serialize(#[source] serde_json::Error),

    #[error("unable to write '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("product with id '{0}' not found")]
    ProductNotFound(String),

    #[error("invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
