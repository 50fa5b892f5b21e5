//! The six item-format decoders.
//!
//! Each decoder consumes bytes from the front of a bounded slice and
//! yields `(consumed_length, ItemValue)`. Length and repetition fields are
//! adversary-controlled: every consumption is checked against the slice
//! before it happens, and arithmetic on declared counts is guarded so it
//! can neither wrap nor run the cursor out of the record.

use crate::bits;
use crate::catalogue::Catalogue;
use crate::error::ErrorKind;
use crate::format::{Compound, Explicit, Fixed, ItemFormat, Repetitive, Variable};
use crate::value::{BdsRegisterValue, BitField, ItemValue, Subfield};

/// Upper bound on the wire size of a single decoded item.
pub const MAX_ITEM_SIZE: usize = 65_536;

/// Hard cap on variable-item extension parts.
pub const MAX_VARIABLE_PARTS: usize = 32;

/// Bytes in one Mode-S register block: the BDS code plus 7 payload bytes.
const BDS_BLOCK_LEN: usize = 8;

/// A decode failure relative to the start of the item, with the subfield
/// breadcrumbs collected on the way out.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FormatError {
    pub kind: ErrorKind,
    pub rel_offset: usize,
    pub chain: Vec<String>,
}

impl FormatError {
    fn new(kind: ErrorKind, rel_offset: usize) -> Self {
        Self { kind, rel_offset, chain: Vec::new() }
    }

    /// Shifts the offset into the parent's frame and prepends a breadcrumb.
    fn within(mut self, name: Option<&str>, base: usize) -> Self {
        self.rel_offset += base;
        if let Some(name) = name {
            self.chain.insert(0, name.to_string());
        }
        self
    }
}

/// A successful decode: consumed length, value tree, and any non-fatal
/// conditions met on the way.
#[derive(Debug)]
pub(crate) struct Decoded<'a> {
    pub consumed: usize,
    pub value: ItemValue<'a>,
    pub warnings: Vec<FormatError>,
}

impl<'a> Decoded<'a> {
    fn clean(consumed: usize, value: ItemValue<'a>) -> Self {
        Self { consumed, value, warnings: Vec::new() }
    }
}

/// Decodes one item format from the front of `bytes`.
///
/// `length_override` replaces the declared length of a fixed-format item
/// (UAP-level override); other formats ignore it.
pub(crate) fn decode_format<'a>(
    bytes: &'a [u8],
    format: &'a ItemFormat,
    catalogue: &'a Catalogue,
    verbose: bool,
    length_override: Option<usize>,
) -> Result<Decoded<'a>, FormatError> {
    match format {
        ItemFormat::Fixed(fixed) => decode_fixed(bytes, fixed, verbose, length_override),
        ItemFormat::Variable(variable) => decode_variable(bytes, variable, verbose),
        ItemFormat::Repetitive(repetitive) => decode_repetitive(bytes, repetitive, verbose),
        ItemFormat::Compound(compound) => decode_compound(bytes, compound, catalogue, verbose),
        ItemFormat::Explicit(explicit) => decode_explicit(bytes, explicit, catalogue, verbose),
        ItemFormat::Bds => decode_bds(bytes, catalogue, verbose),
    }
}

/// Extracts the fields of one fixed part from `slice` (exactly the part's
/// bytes).
fn extract_fields<'a>(
    slice: &'a [u8],
    fixed: &'a Fixed,
    verbose: bool,
) -> Result<Vec<BitField<'a>>, FormatError> {
    let mut fields = Vec::with_capacity(fixed.bits.len());
    for descriptor in &fixed.bits {
        if !verbose && descriptor.is_spare() {
            continue;
        }
        let value = bits::extract(slice, descriptor).map_err(|kind| FormatError::new(kind, 0))?;
        let meaning = if descriptor.values.is_empty() {
            None
        } else {
            value.as_integer().and_then(|v| descriptor.meaning(v))
        };
        fields.push(BitField { descriptor, value, meaning });
    }
    Ok(fields)
}

fn decode_fixed<'a>(
    bytes: &'a [u8],
    fixed: &'a Fixed,
    verbose: bool,
    length_override: Option<usize>,
) -> Result<Decoded<'a>, FormatError> {
    let length = length_override.unwrap_or(fixed.length);
    if length == 0 {
        return Err(FormatError::new(
            ErrorKind::MalformedFormat("fixed item with zero length"),
            0,
        ));
    }
    if bytes.len() < length {
        return Err(FormatError::new(
            ErrorKind::Underflow { needed: length, remaining: bytes.len() },
            0,
        ));
    }
    let fields = extract_fields(&bytes[..length], fixed, verbose)?;
    Ok(Decoded::clean(length, ItemValue::Fixed(fields)))
}

/// One consumed extension part: which declared part shaped it and where it
/// starts within the item.
struct VariablePart {
    declared: usize,
    offset: usize,
    length: usize,
}

/// Walks a variable item's FX chain without extracting fields; shared by
/// the variable and compound decoders.
fn walk_variable(
    bytes: &[u8],
    variable: &Variable,
) -> Result<(Vec<VariablePart>, usize, bool), FormatError> {
    if variable.parts.is_empty() {
        return Err(FormatError::new(
            ErrorKind::MalformedFormat("variable item with no parts"),
            0,
        ));
    }

    let mut chain = Vec::new();
    let mut offset = 0usize;
    let mut wrapped = false;

    for index in 0.. {
        if index == MAX_VARIABLE_PARTS {
            return Err(FormatError::new(ErrorKind::VariableOverrun(MAX_VARIABLE_PARTS), offset));
        }
        let declared = if index < variable.parts.len() {
            index
        } else if cfg!(feature = "legacy-variable-wrap") {
            // Legacy continuation policy: the chain re-enters the part
            // list from the top.
            wrapped = true;
            index % variable.parts.len()
        } else {
            return Err(FormatError::new(
                ErrorKind::MalformedFormat("FX chain extends past the declared part list"),
                offset,
            ));
        };

        let length = variable.parts[declared].length;
        if bytes.len() < offset + length {
            return Err(FormatError::new(
                ErrorKind::Underflow { needed: offset + length, remaining: bytes.len() },
                offset,
            ));
        }
        chain.push(VariablePart { declared, offset, length });
        let fx = bytes[offset + length - 1] & 0x01;
        offset += length;
        if fx == 0 {
            break;
        }
    }

    Ok((chain, offset, wrapped))
}

fn decode_variable<'a>(
    bytes: &'a [u8],
    variable: &'a Variable,
    verbose: bool,
) -> Result<Decoded<'a>, FormatError> {
    let (chain, consumed, wrapped) = walk_variable(bytes, variable)?;

    let mut parts = Vec::with_capacity(chain.len());
    for part in &chain {
        let slice = &bytes[part.offset..part.offset + part.length];
        let fields = extract_fields(slice, &variable.parts[part.declared], verbose)
            .map_err(|e| e.within(None, part.offset))?;
        parts.push(fields);
    }

    let mut decoded = Decoded::clean(consumed, ItemValue::Variable(parts));
    if wrapped {
        decoded
            .warnings
            .push(FormatError::new(ErrorKind::VariableWrap, 0));
    }
    Ok(decoded)
}

fn decode_repetitive<'a>(
    bytes: &'a [u8],
    repetitive: &'a Repetitive,
    verbose: bool,
) -> Result<Decoded<'a>, FormatError> {
    let Some(&count) = bytes.first() else {
        return Err(FormatError::new(ErrorKind::Underflow { needed: 1, remaining: 0 }, 0));
    };
    let count = count as usize;
    let sub_len = repetitive.part.length;

    if sub_len > 0 && count > (MAX_ITEM_SIZE - 1) / sub_len {
        return Err(FormatError::new(
            ErrorKind::RepetitionOverflow { count: count as u64, sub_len },
            0,
        ));
    }
    let total = 1 + count * sub_len;
    if total > bytes.len() {
        return Err(FormatError::new(
            ErrorKind::Underflow { needed: total, remaining: bytes.len() },
            0,
        ));
    }

    let mut records = Vec::with_capacity(count);
    for rep in 0..count {
        let offset = 1 + rep * sub_len;
        let slice = &bytes[offset..offset + sub_len];
        let fields = extract_fields(slice, &repetitive.part, verbose)
            .map_err(|e| e.within(None, offset))?;
        records.push(fields);
    }

    Ok(Decoded::clean(total, ItemValue::Repetitive(records)))
}

fn decode_compound<'a>(
    bytes: &'a [u8],
    compound: &'a Compound,
    catalogue: &'a Catalogue,
    verbose: bool,
) -> Result<Decoded<'a>, FormatError> {
    let (chain, primary_len, wrapped) = walk_variable(bytes, &compound.primary)?;

    // Collect announced subfields from the primary's presence bits,
    // independent of the verbose field filtering.
    let mut announced = Vec::new();
    for part in &chain {
        let slice = &bytes[part.offset..part.offset + part.length];
        for descriptor in &compound.primary.parts[part.declared].bits {
            let Some(presence) = descriptor.presence else {
                continue;
            };
            let set = bits::extract(slice, descriptor)
                .map_err(|kind| FormatError::new(kind, part.offset))?
                .as_integer()
                .is_some_and(|v| v != 0);
            if set {
                announced.push(presence);
            }
        }
    }
    announced.sort_unstable();
    announced.dedup();

    let mut warnings = Vec::new();
    if wrapped {
        warnings.push(FormatError::new(ErrorKind::VariableWrap, 0));
    }

    let mut subfields = Vec::with_capacity(announced.len());
    let mut offset = primary_len;
    for presence in announced {
        let secondary = (presence as usize)
            .checked_sub(1)
            .and_then(|index| compound.secondaries.get(index));
        let Some(secondary) = secondary else {
            return Err(FormatError::new(ErrorKind::CompoundSubfield { presence }, offset));
        };
        let name = secondary.name();
        let inner = decode_format(&bytes[offset..], secondary, catalogue, verbose, None)
            .map_err(|e| e.within(name, offset))?;
        warnings.extend(
            inner
                .warnings
                .into_iter()
                .map(|w| w.within(name, offset)),
        );
        subfields.push(Subfield {
            presence,
            name,
            raw: &bytes[offset..offset + inner.consumed],
            value: Box::new(inner.value),
        });
        offset += inner.consumed;
    }

    Ok(Decoded { consumed: offset, value: ItemValue::Compound(subfields), warnings })
}

fn decode_explicit<'a>(
    bytes: &'a [u8],
    explicit: &'a Explicit,
    catalogue: &'a Catalogue,
    verbose: bool,
) -> Result<Decoded<'a>, FormatError> {
    let Some(&declared) = bytes.first() else {
        return Err(FormatError::new(ErrorKind::Underflow { needed: 1, remaining: 0 }, 0));
    };
    let declared = declared as usize;
    if declared == 0 {
        return Err(FormatError::new(ErrorKind::EmptyExplicit, 0));
    }
    if declared > bytes.len() {
        return Err(FormatError::new(
            ErrorKind::LengthOverrun { declared, remaining: bytes.len() },
            0,
        ));
    }

    let payload = &bytes[1..declared];
    let mut parts = Vec::with_capacity(explicit.parts.len());
    let mut warnings = Vec::new();
    let mut offset = 0usize;
    for part in &explicit.parts {
        let inner = decode_format(&payload[offset..], part, catalogue, verbose, None)
            .map_err(|e| e.within(part.name(), 1 + offset))?;
        warnings.extend(
            inner
                .warnings
                .into_iter()
                .map(|w| w.within(part.name(), 1 + offset)),
        );
        parts.push(inner.value);
        offset += inner.consumed;
    }

    Ok(Decoded {
        consumed: declared,
        value: ItemValue::Explicit { parts, trailing: &payload[offset..] },
        warnings,
    })
}

fn decode_bds<'a>(
    bytes: &'a [u8],
    catalogue: &'a Catalogue,
    verbose: bool,
) -> Result<Decoded<'a>, FormatError> {
    let Some(&count) = bytes.first() else {
        return Err(FormatError::new(ErrorKind::Underflow { needed: 1, remaining: 0 }, 0));
    };
    let count = count as usize;
    let total = 1 + count * BDS_BLOCK_LEN;
    if total > bytes.len() {
        return Err(FormatError::new(
            ErrorKind::Underflow { needed: total, remaining: bytes.len() },
            0,
        ));
    }

    let mut registers = Vec::with_capacity(count);
    for rep in 0..count {
        let offset = 1 + rep * BDS_BLOCK_LEN;
        let block = &bytes[offset..offset + BDS_BLOCK_LEN];
        let code = block[0];
        let payload = &block[1..];
        // Unknown registers and registers that fail to extract both stay
        // opaque; neither is a decode error.
        let fields = catalogue
            .bds_register(code)
            .and_then(|register| extract_fields(payload, &register.format, verbose).ok());
        registers.push(BdsRegisterValue { code, raw: payload, fields });
    }

    Ok(Decoded::clean(total, ItemValue::Bds(registers)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::BdsRegister;
    use crate::format::{BitsDescriptor, BitsEncoding};

    fn fixed(length: usize, bits: Vec<BitsDescriptor>) -> Fixed {
        Fixed { name: None, length, bits }
    }

    fn two_byte_fixed() -> ItemFormat {
        ItemFormat::Fixed(fixed(
            2,
            vec![
                BitsDescriptor::unsigned("SAC", 9, 16),
                BitsDescriptor::unsigned("SIC", 1, 8),
            ],
        ))
    }

    fn empty_catalogue() -> Catalogue {
        Catalogue::new()
    }

    // ── Fixed ─────────────────────────────────────────────────────────────

    #[test]
    fn fixed_consumes_exactly_its_length() {
        let catalogue = empty_catalogue();
        let format = two_byte_fixed();
        let bytes = [0x19, 0xC9, 0xFF];
        let decoded = decode_format(&bytes, &format, &catalogue, true, None).unwrap();
        assert_eq!(decoded.consumed, 2);
        match decoded.value {
            ItemValue::Fixed(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].value, bits::BitValue::Unsigned(0x19));
                assert_eq!(fields[1].value, bits::BitValue::Unsigned(0xC9));
            }
            other => panic!("expected Fixed value, got {other:?}"),
        }
    }

    #[test]
    fn fixed_underflow() {
        let catalogue = empty_catalogue();
        let format = two_byte_fixed();
        let err = decode_format(&[0x19], &format, &catalogue, true, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Underflow { needed: 2, remaining: 1 });
    }

    #[test]
    fn fixed_length_override_applies() {
        let catalogue = empty_catalogue();
        let format = ItemFormat::Fixed(fixed(2, vec![BitsDescriptor::unsigned("A", 1, 8)]));
        let bytes = [0xAA, 0xBB, 0xCC, 0xDD];
        let decoded = decode_format(&bytes, &format, &catalogue, true, Some(4)).unwrap();
        assert_eq!(decoded.consumed, 4);
    }

    #[test]
    fn fixed_skips_spares_unless_verbose() {
        let catalogue = empty_catalogue();
        let mut spare = BitsDescriptor::unsigned("x", 13, 16);
        spare.name = None;
        let format = ItemFormat::Fixed(fixed(
            2,
            vec![spare, BitsDescriptor::unsigned("CODE", 1, 12)],
        ));
        let bytes = [0x02, 0x00];

        let terse = decode_format(&bytes, &format, &catalogue, false, None).unwrap();
        assert_eq!(terse.value.fields().len(), 1);

        let verbose = decode_format(&bytes, &format, &catalogue, true, None).unwrap();
        assert_eq!(verbose.value.fields().len(), 2);
    }

    #[test]
    fn fixed_attaches_meanings() {
        let catalogue = empty_catalogue();
        let mut typ = BitsDescriptor::unsigned("TYP", 6, 8);
        typ.values = vec![(5, "Single ModeS Roll-Call".to_string())];
        let format = ItemFormat::Fixed(fixed(1, vec![typ]));
        let decoded = decode_format(&[0xA0], &format, &catalogue, true, None).unwrap();
        let fields = decoded.value.fields();
        assert_eq!(fields[0].meaning, Some("Single ModeS Roll-Call"));
    }

    // ── Variable ──────────────────────────────────────────────────────────

    fn variable_two_parts() -> ItemFormat {
        ItemFormat::Variable(Variable {
            name: None,
            parts: vec![
                fixed(
                    1,
                    vec![
                        BitsDescriptor::unsigned("TYP", 6, 8),
                        BitsDescriptor::unsigned("FX", 1, 1),
                    ],
                ),
                fixed(
                    1,
                    vec![
                        BitsDescriptor::unsigned("TST", 8, 8),
                        BitsDescriptor::unsigned("FX", 1, 1),
                    ],
                ),
            ],
        })
    }

    #[test]
    fn variable_stops_on_clear_fx() {
        let catalogue = empty_catalogue();
        let format = variable_two_parts();
        let decoded = decode_format(&[0xA0, 0xFF], &format, &catalogue, true, None).unwrap();
        assert_eq!(decoded.consumed, 1);
        assert!(decoded.warnings.is_empty());
    }

    #[test]
    fn variable_follows_fx_into_second_part() {
        let catalogue = empty_catalogue();
        let format = variable_two_parts();
        let decoded = decode_format(&[0xA1, 0x80], &format, &catalogue, true, None).unwrap();
        assert_eq!(decoded.consumed, 2);
        match decoded.value {
            ItemValue::Variable(parts) => assert_eq!(parts.len(), 2),
            other => panic!("expected Variable value, got {other:?}"),
        }
    }

    #[test]
    fn variable_underflow_when_chain_outruns_input() {
        let catalogue = empty_catalogue();
        let format = variable_two_parts();
        let err = decode_format(&[0xA1], &format, &catalogue, true, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Underflow { needed: 2, remaining: 1 });
    }

    #[cfg(feature = "legacy-variable-wrap")]
    #[test]
    fn variable_wraps_past_declared_parts_with_warning() {
        let catalogue = empty_catalogue();
        let format = variable_two_parts();
        // Three extensions against two declared parts.
        let decoded = decode_format(&[0xA1, 0x81, 0x01, 0x00], &format, &catalogue, true, None)
            .unwrap();
        assert_eq!(decoded.consumed, 4);
        assert_eq!(decoded.warnings.len(), 1);
        assert_eq!(decoded.warnings[0].kind, ErrorKind::VariableWrap);
    }

    #[test]
    fn variable_chain_is_capped() {
        let catalogue = empty_catalogue();
        let format = variable_two_parts();
        let endless = [0x01u8; 64];
        let err = decode_format(&endless, &format, &catalogue, true, None).unwrap_err();
        #[cfg(feature = "legacy-variable-wrap")]
        assert_eq!(err.kind, ErrorKind::VariableOverrun(MAX_VARIABLE_PARTS));
        #[cfg(not(feature = "legacy-variable-wrap"))]
        assert!(matches!(err.kind, ErrorKind::MalformedFormat(_)));
    }

    // ── Repetitive ────────────────────────────────────────────────────────

    fn repetitive(sub_len: usize) -> ItemFormat {
        ItemFormat::Repetitive(Repetitive {
            name: None,
            part: fixed(sub_len, vec![BitsDescriptor::unsigned("V", 1, 8)]),
        })
    }

    #[test]
    fn repetitive_decodes_count_sub_records() {
        let catalogue = empty_catalogue();
        let format = repetitive(2);
        let bytes = [0x02, 0xAA, 0x01, 0xBB, 0x02];
        let decoded = decode_format(&bytes, &format, &catalogue, true, None).unwrap();
        assert_eq!(decoded.consumed, 5);
        match decoded.value {
            ItemValue::Repetitive(records) => assert_eq!(records.len(), 2),
            other => panic!("expected Repetitive value, got {other:?}"),
        }
    }

    #[test]
    fn repetitive_zero_count_consumes_one_byte() {
        let catalogue = empty_catalogue();
        let format = repetitive(2);
        let decoded = decode_format(&[0x00], &format, &catalogue, true, None).unwrap();
        assert_eq!(decoded.consumed, 1);
    }

    #[test]
    fn repetition_overflow_fires_at_the_item_size_limit() {
        let catalogue = empty_catalogue();
        // 255 * 300 = 76500 > 65535.
        let format = repetitive(300);
        let mut bytes = vec![0xFF];
        bytes.resize(80_000, 0);
        let err = decode_format(&bytes, &format, &catalogue, true, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RepetitionOverflow { count: 255, sub_len: 300 });
    }

    #[test]
    fn repetition_at_the_boundary_is_underflow_not_overflow() {
        let catalogue = empty_catalogue();
        // 255 * 257 = 65535 = MAX_ITEM_SIZE - 1: allowed by the guard, so
        // the short input surfaces as underflow.
        let format = repetitive(257);
        let err = decode_format(&[0xFF, 0x00], &format, &catalogue, true, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Underflow { needed: 65536, remaining: 2 });
    }

    // ── Compound ──────────────────────────────────────────────────────────

    fn compound_two_secondaries() -> ItemFormat {
        let mut srl = BitsDescriptor::unsigned("SRL", 8, 8);
        srl.presence = Some(1);
        let mut srr = BitsDescriptor::unsigned("SRR", 7, 7);
        srr.presence = Some(2);
        ItemFormat::Compound(Compound {
            name: None,
            primary: Variable {
                name: None,
                parts: vec![fixed(1, vec![srl, srr, BitsDescriptor::unsigned("FX", 1, 1)])],
            },
            secondaries: vec![
                ItemFormat::Fixed(Fixed {
                    name: Some("SRL".to_string()),
                    length: 1,
                    bits: vec![BitsDescriptor::unsigned("value", 1, 8)],
                }),
                ItemFormat::Fixed(Fixed {
                    name: Some("SRR".to_string()),
                    length: 2,
                    bits: vec![BitsDescriptor::unsigned("value", 1, 16)],
                }),
            ],
        })
    }

    #[test]
    fn compound_decodes_announced_secondaries_in_presence_order() {
        let catalogue = empty_catalogue();
        let format = compound_two_secondaries();
        // Primary 0xC0: both subfields announced; 1 + 2 secondary bytes.
        let bytes = [0xC0, 0x11, 0x22, 0x33];
        let decoded = decode_format(&bytes, &format, &catalogue, true, None).unwrap();
        assert_eq!(decoded.consumed, 4);
        match decoded.value {
            ItemValue::Compound(subs) => {
                assert_eq!(subs.len(), 2);
                assert_eq!(subs[0].presence, 1);
                assert_eq!(subs[0].raw, &[0x11]);
                assert_eq!(subs[1].presence, 2);
                assert_eq!(subs[1].raw, &[0x22, 0x33]);
            }
            other => panic!("expected Compound value, got {other:?}"),
        }
    }

    #[test]
    fn compound_with_only_second_subfield() {
        let catalogue = empty_catalogue();
        let format = compound_two_secondaries();
        let bytes = [0x40, 0x22, 0x33];
        let decoded = decode_format(&bytes, &format, &catalogue, true, None).unwrap();
        assert_eq!(decoded.consumed, 3);
        match decoded.value {
            ItemValue::Compound(subs) => {
                assert_eq!(subs.len(), 1);
                assert_eq!(subs[0].presence, 2);
            }
            other => panic!("expected Compound value, got {other:?}"),
        }
    }

    #[test]
    fn compound_secondary_underflow_carries_breadcrumb() {
        let catalogue = empty_catalogue();
        let format = compound_two_secondaries();
        let err = decode_format(&[0x40, 0x22], &format, &catalogue, true, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Underflow { needed: 2, remaining: 1 });
        assert_eq!(err.rel_offset, 1);
        assert_eq!(err.chain, vec!["SRR".to_string()]);
    }

    #[test]
    fn compound_missing_secondary_definition() {
        let catalogue = empty_catalogue();
        let mut stray = BitsDescriptor::unsigned("STRAY", 6, 6);
        stray.presence = Some(9);
        let format = ItemFormat::Compound(Compound {
            name: None,
            primary: Variable {
                name: None,
                parts: vec![fixed(1, vec![stray, BitsDescriptor::unsigned("FX", 1, 1)])],
            },
            secondaries: vec![],
        });
        let err = decode_format(&[0x20], &format, &catalogue, true, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::CompoundSubfield { presence: 9 });
    }

    // ── Explicit ──────────────────────────────────────────────────────────

    #[test]
    fn explicit_consumes_declared_length() {
        let catalogue = empty_catalogue();
        let format = ItemFormat::Explicit(Explicit {
            name: None,
            parts: vec![ItemFormat::Fixed(fixed(2, vec![BitsDescriptor::unsigned("V", 1, 16)]))],
        });
        let bytes = [0x04, 0xAB, 0xCD, 0xEF, 0x99];
        let decoded = decode_format(&bytes, &format, &catalogue, true, None).unwrap();
        assert_eq!(decoded.consumed, 4);
        match decoded.value {
            ItemValue::Explicit { parts, trailing } => {
                assert_eq!(parts.len(), 1);
                assert_eq!(trailing, &[0xEF]);
            }
            other => panic!("expected Explicit value, got {other:?}"),
        }
    }

    #[test]
    fn explicit_without_declared_parts_keeps_payload_opaque() {
        let catalogue = empty_catalogue();
        let format = ItemFormat::Explicit(Explicit { name: None, parts: vec![] });
        let decoded = decode_format(&[0x03, 0x01, 0x02], &format, &catalogue, true, None).unwrap();
        assert_eq!(decoded.consumed, 3);
        match decoded.value {
            ItemValue::Explicit { parts, trailing } => {
                assert!(parts.is_empty());
                assert_eq!(trailing, &[0x01, 0x02]);
            }
            other => panic!("expected Explicit value, got {other:?}"),
        }
    }

    #[test]
    fn explicit_zero_length_is_an_error() {
        let catalogue = empty_catalogue();
        let format = ItemFormat::Explicit(Explicit { name: None, parts: vec![] });
        let err = decode_format(&[0x00, 0x01], &format, &catalogue, true, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyExplicit);
    }

    #[test]
    fn explicit_length_past_input_is_an_error() {
        let catalogue = empty_catalogue();
        let format = ItemFormat::Explicit(Explicit { name: None, parts: vec![] });
        let err = decode_format(&[0x09, 0x01], &format, &catalogue, true, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LengthOverrun { declared: 9, remaining: 2 });
    }

    // ── BDS ───────────────────────────────────────────────────────────────

    fn catalogue_with_bds60() -> Catalogue {
        let mut catalogue = Catalogue::new();
        let mut heading = BitsDescriptor::unsigned("MAGHDG", 45, 55);
        heading.encoding = BitsEncoding::Unsigned;
        catalogue.insert_bds_register(BdsRegister {
            code: 0x60,
            name: Some("Heading and speed report".to_string()),
            format: fixed(7, vec![heading]),
        });
        catalogue
    }

    #[test]
    fn bds_decodes_known_register() {
        let catalogue = catalogue_with_bds60();
        let bytes = [0x01, 0x60, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let decoded = decode_format(&bytes, &ItemFormat::Bds, &catalogue, true, None).unwrap();
        assert_eq!(decoded.consumed, 9);
        match decoded.value {
            ItemValue::Bds(registers) => {
                assert_eq!(registers.len(), 1);
                assert_eq!(registers[0].code, 0x60);
                assert!(registers[0].fields.is_some());
            }
            other => panic!("expected Bds value, got {other:?}"),
        }
    }

    #[test]
    fn bds_unknown_register_stays_opaque() {
        let catalogue = catalogue_with_bds60();
        let bytes = [0x01, 0xC0, 0x78, 0x00, 0x31, 0xBC, 0x00, 0x00, 0x40];
        let decoded = decode_format(&bytes, &ItemFormat::Bds, &catalogue, true, None).unwrap();
        match decoded.value {
            ItemValue::Bds(registers) => {
                assert_eq!(registers[0].code, 0xC0);
                assert!(registers[0].fields.is_none());
                assert_eq!(registers[0].opaque_hex(), "780031bc000040");
            }
            other => panic!("expected Bds value, got {other:?}"),
        }
    }

    #[test]
    fn bds_count_outrunning_input_is_underflow() {
        let catalogue = catalogue_with_bds60();
        let mut bytes = vec![0xFF];
        bytes.resize(42, 0);
        let err = decode_format(&bytes, &ItemFormat::Bds, &catalogue, true, None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Underflow { needed: 2041, remaining: 42 });
    }
}
