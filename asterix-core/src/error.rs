use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

/// What went wrong while decoding, independent of where.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    #[error("input ends inside a data block header ({remaining} of 3 bytes)")]
    BlockHeaderTruncated { remaining: usize },
    #[error("data block declares length {declared}, below the 4 byte minimum")]
    BlockLengthTooShort { declared: u16 },
    #[error("data block declares length {declared} but only {available} bytes remain")]
    BlockLengthOverrun { declared: u16, available: usize },
    #[error("{left} payload bytes left over after the last record")]
    TrailingBlockBytes { left: usize },
    #[error("FSPEC continuation chain exceeds 32 octets")]
    FspecOverrun,
    #[error("item needs {needed} bytes but only {remaining} remain")]
    Underflow { needed: usize, remaining: usize },
    #[error("item declares length {declared} but only {remaining} bytes remain")]
    LengthOverrun { declared: usize, remaining: usize },
    #[error("explicit item declares a zero length")]
    EmptyExplicit,
    #[error("data item {0} is not defined for this category")]
    UnknownDataItem(String),
    #[error("FSPEC selects FRN {frn}, a spare slot in the active UAP")]
    SpareFrnSet { frn: u8 },
    #[error("FSPEC selects FRN {frn}, beyond the active UAP")]
    UnassignedFrn { frn: u8 },
    #[error("{count} repetitions of {sub_len} bytes exceed the 65536 byte item limit")]
    RepetitionOverflow { count: u64, sub_len: usize },
    #[error("bit range {from}..={to} lies outside a {len} byte field")]
    BitRange { from: u16, to: u16, len: usize },
    #[error("numeric field of {width} bits is wider than 64")]
    NumericWidth { width: u16 },
    #[error("compound subfield {presence} has no declared secondary")]
    CompoundSubfield { presence: u8 },
    #[error("variable item exceeds {0} extensions")]
    VariableOverrun(usize),
    #[error("variable item chain re-entered its part list")]
    VariableWrap,
    #[error("no user application profile matches the record")]
    NoUap,
    #[error("category {0} is not present in the catalogue")]
    UnknownCategory(u8),
    #[error("malformed item format: {0}")]
    MalformedFormat(&'static str),
}

impl ErrorKind {
    /// Non-fatal kinds are reported in the error stream but do not mark the
    /// surrounding record as failed.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ErrorKind::VariableWrap)
    }
}

/// A decode failure located in the input.
///
/// `offset` is the absolute byte offset into the buffer handed to
/// [`parse`](crate::data_block::parse); `path` is the item breadcrumb chain
/// leading to the failure (outermost first), e.g. `["I048/250", "BDS"]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    pub kind: ErrorKind,
    pub offset: usize,
    pub path: Vec<String>,
}

impl DecodeError {
    pub fn new(kind: ErrorKind, offset: usize) -> Self {
        Self { kind, offset, path: Vec::new() }
    }

    pub fn with_path(kind: ErrorKind, offset: usize, path: Vec<String>) -> Self {
        Self { kind, offset, path }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.path.is_empty() {
            write!(f, "{}: ", self.path.join("/"))?;
        }
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
