//! Transforms the parsed XML model into the validated core catalogue
//! model.
//!
//! Every precondition the decoder relies on is enforced here, so a
//! malformed catalogue fails the load instead of degrading into parse
//! failures later: fixed lengths and bit ranges, the structural shape of
//! variable/repetitive/compound formats, UAP completeness, and the
//! presence wiring of compound subfields.

use asterix_core::{
    BdsRegister, BitsDescriptor, BitsEncoding, Category, Compound, DataItemDescription, Explicit,
    Fixed, ItemFormat, Repetitive, Rule, Uap, UapItem, UapPresence, UapSelector, UapSlot, Variable,
};

use crate::error::CatalogueError;
use crate::parse::xml_model::*;

/// Fixed lengths beyond this cannot appear in a record anyway; the decoder
/// caps single items at the same bound.
const MAX_FIXED_LENGTH: usize = asterix_core::MAX_ITEM_SIZE;

type Result<T> = std::result::Result<T, CatalogueError>;

pub fn to_category(xml: CategoryXml) -> Result<Category> {
    let context = format!("category {:03}", xml.id);

    let mut items = Vec::new();
    let mut uaps = Vec::new();
    for child in xml.children {
        match child {
            CategoryChildXml::DataItem(item) => items.push(to_data_item(item, &context)?),
            CategoryChildXml::Uap(uap) => uaps.push(uap),
        }
    }

    for (index, item) in items.iter().enumerate() {
        if items[..index].iter().any(|other| other.id == item.id) {
            return Err(CatalogueError::schema(
                &context,
                format!("data item {} is defined more than once", item.id),
            ));
        }
    }

    if uaps.is_empty() {
        return Err(CatalogueError::schema(&context, "no UAP defined"));
    }
    let uaps = uaps
        .into_iter()
        .map(|uap| to_uap(uap, &items, &context))
        .collect::<Result<Vec<_>>>()?;
    if uaps.iter().filter(|uap| uap.default).count() > 1 {
        return Err(CatalogueError::schema(&context, "more than one UAP marked default"));
    }

    Ok(Category {
        id: xml.id,
        name: xml.name.unwrap_or_default(),
        version: xml.ver.unwrap_or_default(),
        items,
        uaps,
    })
}

pub fn to_bds_registers(xml: BdsDocumentXml) -> Result<Vec<BdsRegister>> {
    let mut registers = Vec::new();
    for BdsDocumentChildXml::Register(register) in xml.children {
        let context = format!("BDS register {}", register.code);
        let code = u8::from_str_radix(&register.code, 16).map_err(|_| {
            CatalogueError::schema(&context, "code must be two hexadecimal digits")
        })?;
        let format = match *register.format {
            FormatXml::Fixed(fixed) => to_fixed(fixed, &context)?,
            other => {
                return Err(CatalogueError::schema(
                    &context,
                    format!("register format must be Fixed, found {}", format_tag(&other)),
                ));
            }
        };
        if format.length != 7 {
            return Err(CatalogueError::schema(
                &context,
                format!("register must cover exactly 7 bytes, declares {}", format.length),
            ));
        }
        registers.push(BdsRegister { code, name: register.name, format });
    }
    Ok(registers)
}

fn to_data_item(xml: DataItemXml, category: &str) -> Result<DataItemDescription> {
    let context = format!("{category}, item {}", xml.id);

    let rule = match xml.rule.as_deref() {
        None => Rule::Optional,
        Some(rule) => match rule.to_ascii_lowercase().as_str() {
            "mandatory" => Rule::Mandatory,
            "optional" => Rule::Optional,
            other => {
                return Err(CatalogueError::schema(
                    &context,
                    format!("unknown rule {other:?}"),
                ));
            }
        },
    };

    let mut name = String::new();
    let mut definition = None;
    let mut format = None;
    for child in xml.children {
        match child {
            DataItemChildXml::DataItemName(n) => name = n,
            DataItemChildXml::DataItemDefinition(d) => definition = Some(d),
            DataItemChildXml::DataItemFormat(f) => {
                if format.is_some() {
                    return Err(CatalogueError::schema(
                        &context,
                        "more than one DataItemFormat",
                    ));
                }
                format = Some(to_format(*f.format, &context)?);
            }
        }
    }
    let Some(format) = format else {
        return Err(CatalogueError::schema(&context, "missing DataItemFormat"));
    };

    Ok(DataItemDescription { id: xml.id, name, definition, rule, format })
}

fn format_tag(xml: &FormatXml) -> &'static str {
    match xml {
        FormatXml::Fixed(_) => "Fixed",
        FormatXml::Variable(_) => "Variable",
        FormatXml::Repetitive(_) => "Repetitive",
        FormatXml::Compound(_) => "Compound",
        FormatXml::Explicit(_) => "Explicit",
        FormatXml::Bds => "BDS",
    }
}

fn to_format(xml: FormatXml, context: &str) -> Result<ItemFormat> {
    match xml {
        FormatXml::Fixed(fixed) => Ok(ItemFormat::Fixed(to_fixed(fixed, context)?)),
        FormatXml::Variable(variable) => {
            Ok(ItemFormat::Variable(to_variable(variable, context)?))
        }
        FormatXml::Repetitive(repetitive) => {
            let mut children = repetitive.children;
            if children.len() != 1 {
                return Err(CatalogueError::schema(
                    context,
                    format!("Repetitive must have exactly one Fixed child, has {}", children.len()),
                ));
            }
            match children.pop().expect("checked length") {
                FormatXml::Fixed(fixed) => Ok(ItemFormat::Repetitive(Repetitive {
                    name: repetitive.name,
                    part: to_fixed(fixed, context)?,
                })),
                other => Err(CatalogueError::schema(
                    context,
                    format!("Repetitive child must be Fixed, found {}", format_tag(&other)),
                )),
            }
        }
        FormatXml::Compound(compound) => {
            let mut children = compound.children.into_iter();
            let primary = match children.next() {
                Some(FormatXml::Variable(variable)) => to_variable(variable, context)?,
                Some(other) => {
                    return Err(CatalogueError::schema(
                        context,
                        format!(
                            "Compound primary must be Variable, found {}",
                            format_tag(&other)
                        ),
                    ));
                }
                None => {
                    return Err(CatalogueError::schema(context, "Compound has no primary"));
                }
            };
            let secondaries = children
                .map(|child| to_format(child, context))
                .collect::<Result<Vec<_>>>()?;

            // Every presence ordinal announced by the primary must have a
            // secondary behind it.
            for part in &primary.parts {
                for bits in &part.bits {
                    if let Some(presence) = bits.presence {
                        if presence == 0 || presence as usize > secondaries.len() {
                            return Err(CatalogueError::schema(
                                context,
                                format!(
                                    "presence {presence} has no secondary ({} declared)",
                                    secondaries.len()
                                ),
                            ));
                        }
                    }
                }
            }

            Ok(ItemFormat::Compound(Compound { name: compound.name, primary, secondaries }))
        }
        FormatXml::Explicit(explicit) => {
            let parts = explicit
                .children
                .into_iter()
                .map(|child| to_format(child, context))
                .collect::<Result<Vec<_>>>()?;
            Ok(ItemFormat::Explicit(Explicit { name: explicit.name, parts }))
        }
        FormatXml::Bds => Ok(ItemFormat::Bds),
    }
}

fn to_variable(xml: VariableXml, context: &str) -> Result<Variable> {
    if xml.children.is_empty() {
        return Err(CatalogueError::schema(context, "Variable has no parts"));
    }
    let parts = xml
        .children
        .into_iter()
        .map(|child| match child {
            FormatXml::Fixed(fixed) => to_fixed(fixed, context),
            other => Err(CatalogueError::schema(
                context,
                format!("Variable part must be Fixed, found {}", format_tag(&other)),
            )),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Variable { name: xml.name, parts })
}

fn to_fixed(xml: FixedXml, context: &str) -> Result<Fixed> {
    if xml.length == 0 || xml.length > MAX_FIXED_LENGTH {
        return Err(CatalogueError::schema(
            context,
            format!("Fixed length {} outside 1..={MAX_FIXED_LENGTH}", xml.length),
        ));
    }
    let bits = xml
        .children
        .into_iter()
        .map(|FixedChildXml::Bits(bits)| to_bits(bits, xml.length, context))
        .collect::<Result<Vec<_>>>()?;
    Ok(Fixed { name: xml.name, length: xml.length, bits })
}

fn to_encoding(encode: Option<&str>, context: &str) -> Result<BitsEncoding> {
    let Some(encode) = encode else {
        return Ok(BitsEncoding::Unsigned);
    };
    match encode.to_ascii_lowercase().as_str() {
        "unsigned" => Ok(BitsEncoding::Unsigned),
        "signed" => Ok(BitsEncoding::Signed),
        "octal" => Ok(BitsEncoding::Octal),
        "six-bit-char" | "6bitschar" => Ok(BitsEncoding::SixBitChar),
        "hex-bit" | "hexbit" | "hex" => Ok(BitsEncoding::HexBit),
        "ascii" => Ok(BitsEncoding::Ascii),
        other => Err(CatalogueError::schema(
            context,
            format!("unknown encoding {other:?}"),
        )),
    }
}

fn to_bits(xml: BitsXml, fixed_length: usize, context: &str) -> Result<BitsDescriptor> {
    // The XML writes ranges high-to-low; either order is accepted and
    // normalised to from <= to.
    let (from, to) = if xml.from <= xml.to { (xml.from, xml.to) } else { (xml.to, xml.from) };
    if from < 1 || to as usize > fixed_length * 8 {
        return Err(CatalogueError::schema(
            context,
            format!("bits {}..{} outside the {fixed_length} byte field", xml.from, xml.to),
        ));
    }

    let encoding = to_encoding(xml.encode.as_deref(), context)?;
    let width = to - from + 1;
    let numeric = matches!(encoding, BitsEncoding::Unsigned | BitsEncoding::Signed);
    if numeric && width > 64 {
        return Err(CatalogueError::schema(
            context,
            format!("numeric field of {width} bits is wider than 64"),
        ));
    }

    let mut name = None;
    let mut short_name = None;
    let mut scale = None;
    let mut unit = None;
    let mut const_value = None;
    let mut values = Vec::new();
    for child in xml.children {
        match child {
            BitsChildXml::BitsName(n) => name = Some(n),
            BitsChildXml::BitsShortName(n) => short_name = Some(n),
            BitsChildXml::BitsUnit(u) => {
                scale = u.scale;
                if !u.unit.is_empty() {
                    unit = Some(u.unit);
                }
            }
            BitsChildXml::BitsConst(c) => {
                const_value = Some(c.trim().parse::<u64>().map_err(|_| {
                    CatalogueError::schema(context, format!("bad BitsConst value {c:?}"))
                })?);
            }
            BitsChildXml::BitsValue(v) => values.push((v.val, v.meaning)),
        }
    }

    if (scale.is_some() || unit.is_some()) && !numeric {
        return Err(CatalogueError::schema(
            context,
            "scale and unit only apply to numeric encodings",
        ));
    }

    values.sort_by_key(|(val, _)| *val);

    Ok(BitsDescriptor {
        from,
        to,
        encoding,
        presence: xml.presence,
        scale,
        unit,
        name,
        short_name,
        const_value,
        values,
    })
}

fn to_uap(xml: UapXml, items: &[DataItemDescription], context: &str) -> Result<Uap> {
    let context = match &xml.name {
        Some(name) => format!("{context}, UAP {name:?}"),
        None => format!("{context}, UAP"),
    };

    let selector = match (xml.octet, xml.bit, xml.value) {
        (None, None, None) => None,
        (Some(octet), Some(bit), None) => {
            if octet == 0 || !(1..=8).contains(&bit) {
                return Err(CatalogueError::schema(
                    &context,
                    "selector needs octet >= 1 and bit in 1..=8",
                ));
            }
            Some(UapSelector::BitSet { octet, bit })
        }
        (Some(octet), None, Some(value)) => {
            if octet == 0 {
                return Err(CatalogueError::schema(&context, "selector needs octet >= 1"));
            }
            Some(UapSelector::ByteEquals { octet, value })
        }
        _ => {
            return Err(CatalogueError::schema(
                &context,
                "selector must pair octet with exactly one of bit or value",
            ));
        }
    };

    let mut uap_items = Vec::new();
    for UapChildXml::UapItem(entry) in xml.children {
        let frn = uap_items.len() as u8 + 1;
        if entry.frn != frn {
            return Err(CatalogueError::schema(
                &context,
                format!("UAPItem frn {} out of order, expected {frn}", entry.frn),
            ));
        }
        if entry.bit != frn - 1 {
            return Err(CatalogueError::schema(
                &context,
                format!("UAPItem bit {} does not match frn {frn}", entry.bit),
            ));
        }

        let item_ref = entry.item.trim();
        let slot = if item_ref.is_empty() || item_ref == "-" {
            UapSlot::Spare
        } else {
            if !items.iter().any(|item| item.id == item_ref) {
                return Err(CatalogueError::schema(
                    &context,
                    format!("FRN {frn} references undefined data item {item_ref}"),
                ));
            }
            UapSlot::Item(item_ref.to_string())
        };

        let presence = match entry.presence.as_deref() {
            None => {
                if slot == UapSlot::Spare {
                    UapPresence::Spare
                } else {
                    UapPresence::Optional
                }
            }
            Some(p) => match p.to_ascii_lowercase().as_str() {
                "mandatory" => UapPresence::Mandatory,
                "optional" => UapPresence::Optional,
                "spare" => UapPresence::Spare,
                other => {
                    return Err(CatalogueError::schema(
                        &context,
                        format!("unknown presence {other:?}"),
                    ));
                }
            },
        };

        uap_items.push(UapItem { frn, item: slot, length: entry.len, presence });
    }

    if uap_items.len() < 7 {
        return Err(CatalogueError::schema(
            &context,
            format!("UAP has {} entries, at least 7 required", uap_items.len()),
        ));
    }

    Ok(Uap {
        name: xml.name,
        selector,
        default: xml.default.unwrap_or(false),
        items: uap_items,
    })
}
