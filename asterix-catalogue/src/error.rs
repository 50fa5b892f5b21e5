use std::path::PathBuf;

use thiserror::Error;

/// A catalogue load failure. Loader failures are fatal for the catalogue
/// as a whole: no partial catalogue is ever returned.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error("category {0} is defined more than once")]
    DuplicateCategory(u8),
    #[error("BDS register {0:02X} is defined more than once")]
    DuplicateRegister(u8),
    #[error("unrecognised document root <{0}>")]
    UnknownRoot(String),
    #[error("{context}: {message}")]
    Schema { context: String, message: String },
}

impl CatalogueError {
    pub(crate) fn schema(context: &str, message: impl Into<String>) -> Self {
        CatalogueError::Schema { context: context.into(), message: message.into() }
    }
}
