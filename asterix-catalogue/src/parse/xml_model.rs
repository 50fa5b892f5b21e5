//! Serde document model for category and BDS register definitions.
//!
//! One struct per element, with `$value` child enums so that an unknown
//! element fails deserialization while unknown attributes are ignored.
//! This layer is purely structural; semantic validation happens in the
//! transformer.

use serde::Deserialize;

//
// Document roots
//
#[derive(Debug, Deserialize)]
pub enum DocumentXml {
    Category(CategoryXml),
    #[serde(rename = "BDS")]
    Bds(BdsDocumentXml),
}

//
// Category definitions
//
#[derive(Debug, Deserialize)]
pub struct CategoryXml {
    #[serde(rename = "@id")]
    pub id: u8,

    #[serde(rename = "@name")]
    pub name: Option<String>,

    #[serde(rename = "@ver")]
    pub ver: Option<String>,

    #[serde(rename = "$value", default)]
    pub children: Vec<CategoryChildXml>,
}

#[derive(Debug, Deserialize)]
pub enum CategoryChildXml {
    DataItem(DataItemXml),
    #[serde(rename = "UAP")]
    Uap(UapXml),
}

#[derive(Debug, Deserialize)]
pub struct DataItemXml {
    #[serde(rename = "@id")]
    pub id: String,

    #[serde(rename = "@rule")]
    pub rule: Option<String>,

    #[serde(rename = "$value", default)]
    pub children: Vec<DataItemChildXml>,
}

#[derive(Debug, Deserialize)]
pub enum DataItemChildXml {
    DataItemName(String),
    DataItemDefinition(String),
    DataItemFormat(DataItemFormatXml),
}

#[derive(Debug, Deserialize)]
pub struct DataItemFormatXml {
    #[serde(rename = "$value")]
    pub format: Box<FormatXml>,
}

//
// Item formats (recursive)
//
#[derive(Debug, Deserialize)]
pub enum FormatXml {
    Fixed(FixedXml),
    Variable(VariableXml),
    Repetitive(RepetitiveXml),
    Compound(CompoundXml),
    Explicit(ExplicitXml),
    #[serde(rename = "BDS")]
    Bds,
}

#[derive(Debug, Deserialize)]
pub struct FixedXml {
    #[serde(rename = "@length")]
    pub length: usize,

    #[serde(rename = "@name")]
    pub name: Option<String>,

    #[serde(rename = "$value", default)]
    pub children: Vec<FixedChildXml>,
}

#[derive(Debug, Deserialize)]
pub enum FixedChildXml {
    Bits(BitsXml),
}

#[derive(Debug, Deserialize)]
pub struct VariableXml {
    #[serde(rename = "@name")]
    pub name: Option<String>,

    #[serde(rename = "$value", default)]
    pub children: Vec<FormatXml>,
}

#[derive(Debug, Deserialize)]
pub struct RepetitiveXml {
    #[serde(rename = "@name")]
    pub name: Option<String>,

    #[serde(rename = "$value", default)]
    pub children: Vec<FormatXml>,
}

#[derive(Debug, Deserialize)]
pub struct CompoundXml {
    #[serde(rename = "@name")]
    pub name: Option<String>,

    #[serde(rename = "$value", default)]
    pub children: Vec<FormatXml>,
}

#[derive(Debug, Deserialize)]
pub struct ExplicitXml {
    #[serde(rename = "@name")]
    pub name: Option<String>,

    #[serde(rename = "$value", default)]
    pub children: Vec<FormatXml>,
}

//
// Bit field descriptors
//
#[derive(Debug, Deserialize)]
pub struct BitsXml {
    #[serde(rename = "@from")]
    pub from: u16,

    #[serde(rename = "@to")]
    pub to: u16,

    #[serde(rename = "@encode")]
    pub encode: Option<String>,

    #[serde(rename = "@presence")]
    pub presence: Option<u8>,

    #[serde(rename = "$value", default)]
    pub children: Vec<BitsChildXml>,
}

#[derive(Debug, Deserialize)]
pub enum BitsChildXml {
    BitsName(String),
    BitsShortName(String),
    BitsUnit(BitsUnitXml),
    BitsConst(String),
    BitsValue(BitsValueXml),
}

#[derive(Debug, Deserialize)]
pub struct BitsUnitXml {
    #[serde(rename = "@scale")]
    pub scale: Option<f64>,

    #[serde(rename = "$text", default)]
    pub unit: String,
}

#[derive(Debug, Deserialize)]
pub struct BitsValueXml {
    #[serde(rename = "@val")]
    pub val: i64,

    #[serde(rename = "$text", default)]
    pub meaning: String,
}

//
// User Application Profiles
//
#[derive(Debug, Deserialize)]
pub struct UapXml {
    #[serde(rename = "@name")]
    pub name: Option<String>,

    #[serde(rename = "@default")]
    pub default: Option<bool>,

    #[serde(rename = "@octet")]
    pub octet: Option<usize>,

    #[serde(rename = "@bit")]
    pub bit: Option<u8>,

    #[serde(rename = "@value")]
    pub value: Option<u8>,

    #[serde(rename = "$value", default)]
    pub children: Vec<UapChildXml>,
}

#[derive(Debug, Deserialize)]
pub enum UapChildXml {
    #[serde(rename = "UAPItem")]
    UapItem(UapItemXml),
}

#[derive(Debug, Deserialize)]
pub struct UapItemXml {
    #[serde(rename = "@bit")]
    pub bit: u8,

    #[serde(rename = "@frn")]
    pub frn: u8,

    #[serde(rename = "@len")]
    pub len: Option<usize>,

    #[serde(rename = "@presence")]
    pub presence: Option<String>,

    #[serde(rename = "$text", default)]
    pub item: String,
}

//
// BDS register table
//
#[derive(Debug, Deserialize)]
pub struct BdsDocumentXml {
    #[serde(rename = "$value", default)]
    pub children: Vec<BdsDocumentChildXml>,
}

#[derive(Debug, Deserialize)]
pub enum BdsDocumentChildXml {
    Register(RegisterXml),
}

#[derive(Debug, Deserialize)]
pub struct RegisterXml {
    /// Two hex digits, the BDS1/BDS2 byte (e.g. `"60"`).
    #[serde(rename = "@code")]
    pub code: String,

    #[serde(rename = "@name")]
    pub name: Option<String>,

    #[serde(rename = "$value")]
    pub format: Box<FormatXml>,
}
