//! The category catalogue.
//!
//! A [`Catalogue`] maps category numbers to their [`Category`] definitions
//! and holds the shared Mode-S BDS register table. It is built once by the
//! loader, then shared immutably: every parse entry point takes
//! `&Catalogue` and multiple threads may decode against the same catalogue
//! concurrently.

use std::collections::HashMap;

use crate::format::{Fixed, ItemFormat};

/// Process-wide read-only mapping from category number to definition.
#[derive(Debug, Default, Clone)]
pub struct Catalogue {
    categories: HashMap<u8, Category>,
    bds: HashMap<u8, BdsRegister>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a category, returning the previous definition if the id
    /// was already present. The loader treats a replacement as a duplicate
    /// and fails the load.
    pub fn insert_category(&mut self, category: Category) -> Option<Category> {
        self.categories.insert(category.id, category)
    }

    /// Registers a BDS register schema, returning the previous one if the
    /// code was already present.
    pub fn insert_bds_register(&mut self, register: BdsRegister) -> Option<BdsRegister> {
        self.bds.insert(register.code, register)
    }

    pub fn category(&self, id: u8) -> Option<&Category> {
        self.categories.get(&id)
    }

    pub fn bds_register(&self, code: u8) -> Option<&BdsRegister> {
        self.bds.get(&code)
    }

    pub fn category_ids(&self) -> impl Iterator<Item = u8> + '_ {
        self.categories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// One ASTERIX category: its data item dictionary and UAP variants.
#[derive(Debug, Clone)]
pub struct Category {
    pub id: u8,
    pub name: String,
    pub version: String,
    /// Item descriptions in document order.
    pub items: Vec<DataItemDescription>,
    /// One or more UAP variants; see [`Uap::selector`].
    pub uaps: Vec<Uap>,
}

impl Category {
    pub fn data_item(&self, id: &str) -> Option<&DataItemDescription> {
        self.items.iter().find(|item| item.id == id)
    }

    /// `I048/250`-style reference for logs and error breadcrumbs.
    pub fn item_reference(&self, item_id: &str) -> String {
        format!("I{:03}/{}", self.id, item_id)
    }
}

/// Whether a data item must appear in every record of its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rule {
    Mandatory,
    #[default]
    Optional,
}

/// Schema of a single data item.
#[derive(Debug, Clone)]
pub struct DataItemDescription {
    /// Three-character item id, e.g. `"010"`.
    pub id: String,
    pub name: String,
    pub definition: Option<String>,
    pub rule: Rule,
    pub format: ItemFormat,
}

/// User Application Profile: the FRN-to-item table of a category.
#[derive(Debug, Clone)]
pub struct Uap {
    pub name: Option<String>,
    /// When several UAPs exist, the first whose selector matches the record
    /// bytes wins. A UAP without a selector only applies as the default.
    pub selector: Option<UapSelector>,
    pub default: bool,
    /// Entries ordered by FRN, FRN 1 first.
    pub items: Vec<UapItem>,
}

impl Uap {
    /// Looks up the entry for a 1-indexed FRN.
    pub fn item(&self, frn: u8) -> Option<&UapItem> {
        let index = (frn as usize).checked_sub(1)?;
        self.items.get(index)
    }

    pub fn max_frn(&self) -> u8 {
        self.items.len() as u8
    }

    /// Evaluates this UAP's selector against the record bytes (octet 1 is
    /// the first FSPEC byte). A selector reaching past the record does not
    /// match.
    pub fn matches(&self, record: &[u8]) -> bool {
        match &self.selector {
            None => false,
            Some(UapSelector::BitSet { octet, bit }) => octet
                .checked_sub(1)
                .and_then(|i| record.get(i))
                .is_some_and(|b| b & (1 << (bit - 1)) != 0),
            Some(UapSelector::ByteEquals { octet, value }) => {
                octet.checked_sub(1).and_then(|i| record.get(i)) == Some(value)
            }
        }
    }
}

/// Record-based rule choosing between UAP variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UapSelector {
    /// Bit `bit` (1 = LSB) of 1-indexed `octet` must be set.
    BitSet { octet: usize, bit: u8 },
    /// 1-indexed `octet` must equal `value`.
    ByteEquals { octet: usize, value: u8 },
}

/// One FRN slot of a UAP.
#[derive(Debug, Clone)]
pub struct UapItem {
    /// 1-indexed field reference number, FX bits excluded.
    pub frn: u8,
    pub item: UapSlot,
    /// Length override applied to fixed-format items at this slot.
    pub length: Option<usize>,
    pub presence: UapPresence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UapSlot {
    /// References a data item by id.
    Item(String),
    /// Reserved slot; a set FSPEC bit here is malformed input.
    Spare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UapPresence {
    Mandatory,
    #[default]
    Optional,
    Spare,
}

/// Schema for one Mode-S register in the shared BDS table.
#[derive(Debug, Clone)]
pub struct BdsRegister {
    /// The BDS1/BDS2 byte, e.g. `0x60`.
    pub code: u8,
    pub name: Option<String>,
    /// Always 7 bytes long; covers the register payload after the code
    /// byte.
    pub format: Fixed,
}
