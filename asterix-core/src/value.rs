//! Decoded item values.
//!
//! The decoder returns a structured tree, not rendered text: formatters
//! downstream walk [`ItemValue`] and print whatever representation they
//! need. Nodes borrow their descriptors from the catalogue and their raw
//! bytes from the parsed input, so a [`ParseResult`](crate::ParseResult)
//! is only bounded by the lifetimes of those two.

use crate::bits::BitValue;
use crate::format::BitsDescriptor;

/// A single decoded bit field plus its descriptor metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct BitField<'a> {
    pub descriptor: &'a BitsDescriptor,
    pub value: BitValue,
    /// Enumerated meaning of the decoded integer, when the descriptor
    /// declares one.
    pub meaning: Option<&'a str>,
}

impl<'a> BitField<'a> {
    pub fn name(&self) -> Option<&'a str> {
        self.descriptor.name.as_deref()
    }
}

/// The decoded content of one data item, shaped by its format.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemValue<'a> {
    /// One field list for the whole item.
    Fixed(Vec<BitField<'a>>),
    /// One field list per consumed extension part.
    Variable(Vec<Vec<BitField<'a>>>),
    /// One field list per repetition.
    Repetitive(Vec<Vec<BitField<'a>>>),
    /// Present subfields in ascending presence order.
    Compound(Vec<Subfield<'a>>),
    /// Declared parts plus whatever payload they did not cover.
    Explicit { parts: Vec<ItemValue<'a>>, trailing: &'a [u8] },
    /// Mode-S registers in wire order.
    Bds(Vec<BdsRegisterValue<'a>>),
}

/// A present compound secondary.
#[derive(Debug, Clone, PartialEq)]
pub struct Subfield<'a> {
    /// Presence ordinal announced by the primary, 1-indexed.
    pub presence: u8,
    pub name: Option<&'a str>,
    pub raw: &'a [u8],
    pub value: Box<ItemValue<'a>>,
}

/// One 8-byte Mode-S register block.
#[derive(Debug, Clone, PartialEq)]
pub struct BdsRegisterValue<'a> {
    /// The BDS1/BDS2 code byte leading the block.
    pub code: u8,
    /// The 7 payload bytes.
    pub raw: &'a [u8],
    /// Decoded fields when the catalogue knows the register; `None` keeps
    /// the payload opaque.
    pub fields: Option<Vec<BitField<'a>>>,
}

impl BdsRegisterValue<'_> {
    /// Hex rendering of the payload, for opaque registers.
    pub fn opaque_hex(&self) -> String {
        to_hex(self.raw)
    }
}

/// Lowercase hex string of a byte slice.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

impl<'a> ItemValue<'a> {
    /// Flat iteration over every decoded field in the tree, in decode
    /// order.
    pub fn fields(&self) -> Vec<&BitField<'a>> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'s>(&'s self, out: &mut Vec<&'s BitField<'a>>) {
        match self {
            ItemValue::Fixed(fields) => out.extend(fields.iter()),
            ItemValue::Variable(parts) | ItemValue::Repetitive(parts) => {
                for part in parts {
                    out.extend(part.iter());
                }
            }
            ItemValue::Compound(subfields) => {
                for sub in subfields {
                    sub.value.collect_fields(out);
                }
            }
            ItemValue::Explicit { parts, .. } => {
                for part in parts {
                    part.collect_fields(out);
                }
            }
            ItemValue::Bds(registers) => {
                for register in registers {
                    if let Some(fields) = &register.fields {
                        out.extend(fields.iter());
                    }
                }
            }
        }
    }

    /// Looks up a field anywhere in the tree by its descriptor name.
    pub fn field(&self, name: &str) -> Option<&BitField<'a>> {
        self.fields().into_iter().find(|f| f.name() == Some(name))
    }
}
