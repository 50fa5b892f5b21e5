//! # asterix-core
//!
//! Core decoding engine for ASTERIX surveillance data.
//!
//! This crate turns framed ASTERIX datagrams into structured records,
//! driven entirely by a runtime [`Catalogue`] of category definitions
//! (loaded from XML by the `asterix-catalogue` crate). It performs no I/O
//! and holds no global state: callers pass `&Catalogue` into every entry
//! point and may parse independent datagrams from multiple threads.
//!
//! ## Key components
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Catalogue`] | Read-only category and BDS register dictionary |
//! | [`ItemFormat`] | The six wire layouts a data item can declare |
//! | [`Fspec`] | Field Specification bitmap (bounded, capped) |
//! | [`DataBlock`] / [`DataRecord`] / [`DataItem`] | The decoded tree |
//! | [`ItemValue`] / [`BitField`] | Structured decoded values |
//! | [`DecodeError`] | Located, breadcrumbed decode failure |
//!
//! ## Example
//!
//! ```rust
//! use asterix_core::{parse, Catalogue, Options};
//!
//! // An empty catalogue decodes nothing, but the call is total: malformed
//! // or unknown input comes back as errors, never a panic.
//! let catalogue = Catalogue::new();
//! let result = parse(&catalogue, &[0x30, 0x00, 0x04, 0x00], &Options::default());
//! assert!(result.blocks.is_empty());
//! assert_eq!(result.errors.len(), 1);
//! ```
//!
//! Malformed input is the normal case on a surveillance network; every
//! length and repetition field is validated against the remaining input
//! before it is trusted, and a failed record keeps what decoded and
//! reports the rest.

pub mod bits;
pub mod catalogue;
pub mod data_block;
pub mod decode;
pub mod error;
pub mod format;
pub mod fspec;
pub mod item;
pub mod record;
pub mod value;

pub use bits::{BitValue, ICAO_ALPHABET};
pub use catalogue::{
    BdsRegister, Catalogue, Category, DataItemDescription, Rule, Uap, UapItem, UapPresence,
    UapSelector, UapSlot,
};
pub use data_block::{parse, DataBlock, Options, ParseResult, DATA_BLOCK_HEADER_SIZE};
pub use decode::{MAX_ITEM_SIZE, MAX_VARIABLE_PARTS};
pub use error::{DecodeError, ErrorKind};
pub use format::{
    BitsDescriptor, BitsEncoding, Compound, Explicit, Fixed, ItemFormat, Repetitive, Variable,
};
pub use fspec::{frn_to_position, Fspec, MAX_FSPEC_LEN};
pub use item::DataItem;
pub use record::DataRecord;
pub use value::{BdsRegisterValue, BitField, ItemValue, Subfield};
