//! Data-block framing and the parse entry point.
//!
//! A datagram is one or more concatenated blocks, each led by a 3-byte
//! header (`category: u8`, `length: u16` big-endian, length covering the
//! header). The length field is trusted only after validation against the
//! remaining input. A header that fails validation stops the stream; no
//! resynchronisation is attempted mid-stream.

use std::time::Duration;

use crate::catalogue::Catalogue;
use crate::error::{DecodeError, ErrorKind};
use crate::record::{self, DataRecord};

/// Bytes in the data block header: category plus big-endian length.
pub const DATA_BLOCK_HEADER_SIZE: usize = 1 + 2;

/// Caller-supplied parse options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Keep nameless (spare) bit fields in decoded output.
    pub verbose: bool,
    /// Only decode blocks of this category; others are skipped silently.
    pub category_filter: Option<u8>,
    /// Stop after this many records, across blocks.
    pub max_records: Option<usize>,
    /// Capture time inherited by every block and record; the core never
    /// consults the clock.
    pub timestamp: Option<Duration>,
}

/// One parsed ASTERIX data block.
#[derive(Debug, Clone)]
pub struct DataBlock<'a> {
    pub category: u8,
    /// Declared length, header included.
    pub length: u16,
    /// The block's wire bytes (a sub-slice of the parse input).
    pub raw: &'a [u8],
    /// Absolute byte offset of `raw` within the parse input.
    pub offset: usize,
    pub records: Vec<DataRecord<'a>>,
    /// False when record decoding stopped before the payload was exhausted.
    pub ok: bool,
    pub timestamp: Option<Duration>,
}

/// Everything a parse call produced: the decoded blocks plus every error
/// and warning met along the way.
#[derive(Debug, Clone, Default)]
pub struct ParseResult<'a> {
    pub blocks: Vec<DataBlock<'a>>,
    pub errors: Vec<DecodeError>,
}

impl<'a> ParseResult<'a> {
    /// True when every block decoded fully and no errors were recorded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.blocks.iter().all(|block| block.ok)
    }

    /// Iterates every record across all blocks, in wire order.
    pub fn records(&self) -> impl Iterator<Item = &DataRecord<'a>> {
        self.blocks.iter().flat_map(|block| block.records.iter())
    }
}

/// Decodes a framed datagram against the catalogue.
///
/// Never panics: malformed input surfaces through
/// [`ParseResult::errors`] and the `ok` flags, with whatever decoded
/// cleanly retained.
pub fn parse<'a>(catalogue: &'a Catalogue, bytes: &'a [u8], options: &Options) -> ParseResult<'a> {
    let mut result = ParseResult::default();
    let mut cursor = 0usize;
    let mut emitted = 0usize;

    while cursor < bytes.len() {
        if options.max_records.is_some_and(|max| emitted >= max) {
            break;
        }

        let remaining = bytes.len() - cursor;
        if remaining < DATA_BLOCK_HEADER_SIZE {
            result
                .errors
                .push(DecodeError::new(ErrorKind::BlockHeaderTruncated { remaining }, cursor));
            break;
        }
        let category = bytes[cursor];
        let declared = u16::from_be_bytes([bytes[cursor + 1], bytes[cursor + 2]]);
        let length = declared as usize;
        if length <= DATA_BLOCK_HEADER_SIZE {
            result
                .errors
                .push(DecodeError::new(ErrorKind::BlockLengthTooShort { declared }, cursor));
            break;
        }
        if length > remaining {
            result.errors.push(DecodeError::new(
                ErrorKind::BlockLengthOverrun { declared, available: remaining },
                cursor,
            ));
            break;
        }

        // From here on the declared length is trustworthy: whatever happens
        // inside the payload, the next block starts at cursor + length.
        if options.category_filter.is_some_and(|filter| filter != category) {
            cursor += length;
            continue;
        }
        let Some(category_def) = catalogue.category(category) else {
            result
                .errors
                .push(DecodeError::new(ErrorKind::UnknownCategory(category), cursor));
            cursor += length;
            continue;
        };

        let raw = &bytes[cursor..cursor + length];
        let payload = &raw[DATA_BLOCK_HEADER_SIZE..];
        let mut records = Vec::new();
        let mut ok = true;
        let mut consumed = 0usize;

        while consumed < payload.len() {
            if options
                .max_records
                .is_some_and(|max| emitted + records.len() >= max)
            {
                break;
            }
            let record_offset = cursor + DATA_BLOCK_HEADER_SIZE + consumed;
            match record::parse_record(
                catalogue,
                category_def,
                &payload[consumed..],
                record_offset,
                options,
                &mut result.errors,
            ) {
                Ok(record) => {
                    let record_len = record.raw.len();
                    let failed = !record.ok;
                    records.push(record);
                    if failed {
                        ok = false;
                        break;
                    }
                    consumed += record_len;
                }
                Err(err) => {
                    result.errors.push(err);
                    ok = false;
                    break;
                }
            }
        }

        emitted += records.len();
        result.blocks.push(DataBlock {
            category,
            length: declared,
            raw,
            offset: cursor,
            records,
            ok,
            timestamp: options.timestamp,
        });
        cursor += length;
    }

    result
}
