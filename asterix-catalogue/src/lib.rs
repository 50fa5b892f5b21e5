//! # asterix-catalogue
//!
//! Loads XML category definitions and the shared BDS register table into
//! the immutable [`Catalogue`] the decoding engine runs against.
//!
//! A catalogue is assembled from a set of documents: one `<Category …>`
//! per category version plus an optional `<BDS>` register table. Loading
//! is all-or-nothing: a schema violation in any document fails the whole
//! load and no partial catalogue is returned.
//!
//! ```no_run
//! use asterix_catalogue::load_catalogue;
//!
//! let catalogue = load_catalogue(["config/cat048.xml", "config/bds.xml"])?;
//! assert!(catalogue.category(48).is_some());
//! # Ok::<(), asterix_catalogue::CatalogueError>(())
//! ```

use std::fs;
use std::path::Path;

use asterix_core::Catalogue;
use log::debug;

pub mod error;
pub mod parse;
pub mod transform;

pub use error::CatalogueError;

use parse::parser::{document_root, parse_document};
use parse::xml_model::DocumentXml;
use transform::transformer::{to_bds_registers, to_category};

/// A validated definition document.
#[derive(Debug)]
pub enum Document {
    Category(asterix_core::Category),
    BdsTable(Vec<asterix_core::BdsRegister>),
}

/// Parses and validates a single XML document.
pub fn load_document(xml: &str) -> Result<Document, CatalogueError> {
    // A root other than the two known document kinds gets its own error;
    // a missing root falls through to the deserializer's XML error.
    if let Some(root) = document_root(xml) {
        if root != "Category" && root != "BDS" {
            return Err(CatalogueError::UnknownRoot(root));
        }
    }
    match parse_document(xml)? {
        DocumentXml::Category(category) => Ok(Document::Category(to_category(category)?)),
        DocumentXml::Bds(table) => Ok(Document::BdsTable(to_bds_registers(table)?)),
    }
}

fn merge(catalogue: &mut Catalogue, document: Document) -> Result<(), CatalogueError> {
    match document {
        Document::Category(category) => {
            let id = category.id;
            debug!("loaded category {:03} ({} items)", id, category.items.len());
            if catalogue.insert_category(category).is_some() {
                return Err(CatalogueError::DuplicateCategory(id));
            }
        }
        Document::BdsTable(registers) => {
            debug!("loaded BDS register table ({} registers)", registers.len());
            for register in registers {
                let code = register.code;
                if catalogue.insert_bds_register(register).is_some() {
                    return Err(CatalogueError::DuplicateRegister(code));
                }
            }
        }
    }
    Ok(())
}

/// Builds a catalogue from in-memory documents. Used by tests and
/// embedders that carry their definitions compiled in.
pub fn catalogue_from_strs<S: AsRef<str>>(
    documents: impl IntoIterator<Item = S>,
) -> Result<Catalogue, CatalogueError> {
    let mut catalogue = Catalogue::new();
    for document in documents {
        merge(&mut catalogue, load_document(document.as_ref())?)?;
    }
    Ok(catalogue)
}

/// Builds a catalogue from definition files.
///
/// Fails on the first unreadable file, malformed document, duplicate
/// category, or duplicate BDS register; nothing is returned on failure.
pub fn load_catalogue<P: AsRef<Path>>(
    paths: impl IntoIterator<Item = P>,
) -> Result<Catalogue, CatalogueError> {
    let mut catalogue = Catalogue::new();
    for path in paths {
        let path = path.as_ref();
        let xml = fs::read_to_string(path).map_err(|source| CatalogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        merge(&mut catalogue, load_document(&xml)?)?;
    }
    Ok(catalogue)
}
