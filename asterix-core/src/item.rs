//! Data-item driver.
//!
//! Thin indirection between the record parser and the format decoders: it
//! resolves the item description, applies the UAP-level length override,
//! captures the raw bytes consumed, and turns relative format errors into
//! located, breadcrumbed [`DecodeError`]s.

use crate::catalogue::{Catalogue, Category, DataItemDescription, UapItem};
use crate::decode::{self, FormatError};
use crate::error::DecodeError;
use crate::value::ItemValue;

/// One decoded data item within a record.
#[derive(Debug, Clone)]
pub struct DataItem<'a> {
    pub description: &'a DataItemDescription,
    /// The exact wire bytes of this item (a sub-slice of the parse input).
    pub raw: &'a [u8],
    /// Absolute byte offset of `raw` within the parse input.
    pub offset: usize,
    pub value: ItemValue<'a>,
}

impl<'a> DataItem<'a> {
    pub fn id(&self) -> &'a str {
        &self.description.id
    }
}

fn locate(
    error: FormatError,
    category: &Category,
    description: &DataItemDescription,
    offset: usize,
) -> DecodeError {
    let mut path = Vec::with_capacity(1 + error.chain.len());
    path.push(category.item_reference(&description.id));
    path.extend(error.chain);
    DecodeError::with_path(error.kind, offset + error.rel_offset, path)
}

/// Decodes the item a UAP slot references from the front of `bytes`.
///
/// `offset` is the absolute position of `bytes` in the parse input.
/// Non-fatal conditions are appended to `warnings`; the returned item is
/// still complete.
pub(crate) fn decode_data_item<'a>(
    category: &'a Category,
    uap_item: &'a UapItem,
    description: &'a DataItemDescription,
    bytes: &'a [u8],
    offset: usize,
    catalogue: &'a Catalogue,
    verbose: bool,
    warnings: &mut Vec<DecodeError>,
) -> Result<DataItem<'a>, DecodeError> {
    let decoded =
        decode::decode_format(bytes, &description.format, catalogue, verbose, uap_item.length)
            .map_err(|e| locate(e, category, description, offset))?;

    warnings.extend(
        decoded
            .warnings
            .into_iter()
            .map(|w| locate(w, category, description, offset)),
    );

    Ok(DataItem {
        description,
        raw: &bytes[..decoded.consumed],
        offset,
        value: decoded.value,
    })
}
