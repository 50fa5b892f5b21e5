//! Asterix - ASTERIX surveillance data decoding library.
//!
//! This crate re-exports the decoding engine (`asterix-core`) and the XML
//! catalogue loader (`asterix-catalogue`) for convenient single-import
//! usage.
//!
//! ## Crate Structure
//!
//! - [`engine`] - The decoding engine (bit extraction, item formats,
//!   FSPEC, records, blocks)
//! - [`catalogue`] - XML category and BDS register loading
//!
//! ## Usage
//!
//! ```no_run
//! use asterix::{load_catalogue, parse, Options};
//!
//! let catalogue = load_catalogue(["config/cat048.xml", "config/bds.xml"])?;
//! let datagram: &[u8] = &[/* one or more data blocks */];
//! let result = parse(&catalogue, datagram, &Options::default());
//! for block in &result.blocks {
//!     println!("CAT{:03}: {} records", block.category, block.records.len());
//! }
//! # Ok::<(), asterix::CatalogueError>(())
//! ```

/// Re-export of asterix-core.
///
/// Contains the decoding engine:
/// - [`parse`](engine::parse) - The datagram parse entry point
/// - [`Catalogue`](engine::Catalogue) - Read-only category dictionary
/// - [`DataBlock`](engine::DataBlock) / [`DataRecord`](engine::DataRecord) /
///   [`DataItem`](engine::DataItem) - The decoded tree
/// - [`DecodeError`](engine::DecodeError) - Located decode failures
pub mod engine {
    pub use asterix_core::*;
}

/// Re-export of asterix-catalogue.
///
/// Contains catalogue loading:
/// - [`load_catalogue`](catalogue::load_catalogue) - Load definition files
/// - [`catalogue_from_strs`](catalogue::catalogue_from_strs) - Load
///   in-memory documents
/// - [`CatalogueError`](catalogue::CatalogueError) - Load failures
pub mod catalogue {
    pub use asterix_catalogue::*;
}

// Re-export commonly used types at the crate root for convenience
pub use asterix_catalogue::{catalogue_from_strs, load_catalogue, CatalogueError};
pub use asterix_core::{
    parse, BitValue, Catalogue, DataBlock, DataItem, DataRecord, DecodeError, ErrorKind,
    ItemValue, Options, ParseResult,
};
