//! Data-record parsing: FSPEC plus UAP dispatch.
//!
//! A record has no length field; it ends when every item its FSPEC
//! announces has been consumed. Anything that makes the next item's length
//! unknowable (a spare or unassigned FRN, an undefined item id, a decoder
//! failure) terminates the record: what decoded so far is kept with
//! `ok = false` and the unconsumed payload is preserved opaque.

use std::time::Duration;

use log::warn;

use crate::catalogue::{Catalogue, Category, Uap, UapPresence, UapSlot};
use crate::data_block::Options;
use crate::error::{DecodeError, ErrorKind};
use crate::fspec::Fspec;
use crate::item::{self, DataItem};

/// One parsed record within a data block.
#[derive(Debug, Clone)]
pub struct DataRecord<'a> {
    /// The consumed record bytes: FSPEC plus every decoded item.
    pub raw: &'a [u8],
    /// Absolute byte offset of `raw` within the parse input.
    pub offset: usize,
    pub fspec: Fspec,
    /// The UAP variant this record was decoded against.
    pub uap: &'a Uap,
    /// Decoded items in UAP order.
    pub items: Vec<DataItem<'a>>,
    /// False when decoding stopped early; `unparsed` then holds the rest of
    /// the block payload.
    pub ok: bool,
    pub unparsed: &'a [u8],
    pub timestamp: Option<Duration>,
}

impl<'a> DataRecord<'a> {
    pub fn item(&self, id: &str) -> Option<&DataItem<'a>> {
        self.items.iter().find(|item| item.id() == id)
    }
}

/// Picks the UAP variant for a record, per the selection rules: first
/// matching selector, else the declared default, else the first in
/// document order (with a warning).
fn select_uap<'a>(category: &'a Category, record: &[u8]) -> Result<&'a Uap, ErrorKind> {
    match category.uaps.as_slice() {
        [] => Err(ErrorKind::NoUap),
        [single] => Ok(single),
        uaps => {
            if let Some(matched) = uaps.iter().find(|uap| uap.matches(record)) {
                return Ok(matched);
            }
            if let Some(default) = uaps.iter().find(|uap| uap.default) {
                return Ok(default);
            }
            warn!(
                "category {}: no UAP selector matched and none is default, using the first",
                category.id
            );
            Ok(&uaps[0])
        }
    }
}

fn warn_missing_mandatory(category: &Category, uap: &Uap, fspec: &Fspec) {
    for uap_item in &uap.items {
        let UapSlot::Item(id) = &uap_item.item else {
            continue;
        };
        let mandatory = uap_item.presence == UapPresence::Mandatory
            || category
                .data_item(id)
                .is_some_and(|d| d.rule == crate::catalogue::Rule::Mandatory);
        if mandatory && !fspec.frn_is_set(uap_item.frn) {
            warn!("{}: mandatory item absent from FSPEC", category.item_reference(id));
        }
    }
}

/// Parses one record from the front of `payload` (the unconsumed part of a
/// block's payload). `offset` is the absolute position of `payload`.
///
/// `Ok` is returned whenever there is a record to keep, even a failed one
/// (`ok = false`); `Err` means the payload does not contain a record at all
/// (bad FSPEC or no usable UAP). Item-level errors and non-fatal warnings
/// are appended to `errors` in both cases.
pub(crate) fn parse_record<'a>(
    catalogue: &'a Catalogue,
    category: &'a Category,
    payload: &'a [u8],
    offset: usize,
    options: &Options,
    errors: &mut Vec<DecodeError>,
) -> Result<DataRecord<'a>, DecodeError> {
    let fspec = Fspec::read(payload).map_err(|kind| {
        // A truncated FSPEC means the leftover payload cannot hold a
        // record: report it as trailing garbage within the block.
        let kind = match kind {
            ErrorKind::Underflow { .. } => {
                ErrorKind::TrailingBlockBytes { left: payload.len() }
            }
            other => other,
        };
        DecodeError::new(kind, offset)
    })?;

    let uap = select_uap(category, payload).map_err(|kind| DecodeError::new(kind, offset))?;
    warn_missing_mandatory(category, uap, &fspec);

    let mut items = Vec::new();
    let mut cursor = fspec.len();
    let mut ok = true;

    for frn in fspec.set_frns() {
        let failure = match uap.item(frn) {
            None => Some(ErrorKind::UnassignedFrn { frn }),
            Some(uap_item) => match &uap_item.item {
                UapSlot::Spare => Some(ErrorKind::SpareFrnSet { frn }),
                UapSlot::Item(id) => match category.data_item(id) {
                    None => Some(ErrorKind::UnknownDataItem(category.item_reference(id))),
                    Some(description) => {
                        match item::decode_data_item(
                            category,
                            uap_item,
                            description,
                            &payload[cursor..],
                            offset + cursor,
                            catalogue,
                            options.verbose,
                            errors,
                        ) {
                            Ok(item) => {
                                cursor += item.raw.len();
                                items.push(item);
                                None
                            }
                            Err(err) => {
                                errors.push(err);
                                ok = false;
                                break;
                            }
                        }
                    }
                },
            },
        };
        if let Some(kind) = failure {
            errors.push(DecodeError::new(kind, offset + cursor));
            ok = false;
            break;
        }
    }

    Ok(DataRecord {
        raw: &payload[..cursor],
        offset,
        fspec,
        uap,
        items,
        ok,
        unparsed: if ok { &[] } else { &payload[cursor..] },
        timestamp: options.timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{
        DataItemDescription, Rule, UapItem, UapSelector,
    };
    use crate::format::{BitsDescriptor, Fixed, ItemFormat};

    fn fixed_item(id: &str, length: usize) -> DataItemDescription {
        DataItemDescription {
            id: id.to_string(),
            name: format!("Item {id}"),
            definition: None,
            rule: Rule::Optional,
            format: ItemFormat::Fixed(Fixed {
                name: None,
                length,
                bits: vec![BitsDescriptor::unsigned("V", 1, (length * 8) as u16)],
            }),
        }
    }

    fn uap_slot(frn: u8, id: &str) -> UapItem {
        UapItem {
            frn,
            item: UapSlot::Item(id.to_string()),
            length: None,
            presence: UapPresence::Optional,
        }
    }

    fn spare_slot(frn: u8) -> UapItem {
        UapItem { frn, item: UapSlot::Spare, length: None, presence: UapPresence::Spare }
    }

    /// Seven slots: 010, 020, 030 then spares.
    fn test_category() -> Category {
        Category {
            id: 99,
            name: "Test".to_string(),
            version: "1.0".to_string(),
            items: vec![fixed_item("010", 2), fixed_item("020", 1), fixed_item("030", 3)],
            uaps: vec![Uap {
                name: None,
                selector: None,
                default: false,
                items: vec![
                    uap_slot(1, "010"),
                    uap_slot(2, "020"),
                    uap_slot(3, "030"),
                    spare_slot(4),
                    spare_slot(5),
                    spare_slot(6),
                    spare_slot(7),
                ],
            }],
        }
    }

    fn parse_one<'a>(
        category: &'a Category,
        catalogue: &'a Catalogue,
        payload: &'a [u8],
        errors: &mut Vec<DecodeError>,
    ) -> Result<DataRecord<'a>, DecodeError> {
        parse_record(catalogue, category, payload, 0, &Options::default(), errors)
    }

    #[test]
    fn record_items_follow_uap_order() {
        let catalogue = Catalogue::new();
        let category = test_category();
        // FSPEC A0: FRN 1 and 3.
        let payload = [0xA0, 0x19, 0xC9, 0x01, 0x02, 0x03];
        let mut errors = Vec::new();

        let record = parse_one(&category, &catalogue, &payload, &mut errors).unwrap();
        assert!(record.ok);
        assert!(errors.is_empty());
        assert_eq!(record.raw.len(), 6);
        let ids: Vec<&str> = record.items.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["010", "030"]);
        assert_eq!(record.item("010").unwrap().raw, &[0x19, 0xC9]);
        assert_eq!(record.item("030").unwrap().raw, &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn record_item_raw_slices_are_contiguous() {
        let catalogue = Catalogue::new();
        let category = test_category();
        let payload = [0xE0, 0x19, 0xC9, 0x07, 0x01, 0x02, 0x03];
        let mut errors = Vec::new();

        let record = parse_one(&category, &catalogue, &payload, &mut errors).unwrap();
        let rebuilt: Vec<u8> =
            record.items.iter().flat_map(|i| i.raw.iter().copied()).collect();
        assert_eq!(&rebuilt, &payload[record.fspec.len()..]);
    }

    #[test]
    fn item_failure_keeps_preceding_items() {
        let catalogue = Catalogue::new();
        let category = test_category();
        // FRN 1 and 3 announced but item 030 is short one byte.
        let payload = [0xA0, 0x19, 0xC9, 0x01, 0x02];
        let mut errors = Vec::new();

        let record = parse_one(&category, &catalogue, &payload, &mut errors).unwrap();
        assert!(!record.ok);
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].id(), "010");
        assert_eq!(record.unparsed, &[0x01, 0x02]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, vec!["I099/030".to_string()]);
    }

    #[test]
    fn spare_frn_set_aborts_the_record() {
        let catalogue = Catalogue::new();
        let category = test_category();
        // FSPEC 10: FRN 4 (spare).
        let payload = [0x10, 0xAA];
        let mut errors = Vec::new();

        let record = parse_one(&category, &catalogue, &payload, &mut errors).unwrap();
        assert!(!record.ok);
        assert!(record.items.is_empty());
        assert_eq!(errors[0].kind, ErrorKind::SpareFrnSet { frn: 4 });
    }

    #[test]
    fn frn_beyond_the_uap_aborts_the_record() {
        let catalogue = Catalogue::new();
        let category = test_category();
        // Two FSPEC octets announcing FRN 8, past the 7-entry UAP.
        let payload = [0x01, 0x80, 0xAA];
        let mut errors = Vec::new();

        let record = parse_one(&category, &catalogue, &payload, &mut errors).unwrap();
        assert!(!record.ok);
        assert_eq!(errors[0].kind, ErrorKind::UnassignedFrn { frn: 8 });
    }

    #[test]
    fn undefined_item_id_aborts_the_record() {
        let catalogue = Catalogue::new();
        let mut category = test_category();
        category.uaps[0].items[1] = uap_slot(2, "140");
        // FSPEC 40: FRN 2, which references an id the category lacks.
        let payload = [0x40, 0xAA];
        let mut errors = Vec::new();

        let record = parse_one(&category, &catalogue, &payload, &mut errors).unwrap();
        assert!(!record.ok);
        assert_eq!(
            errors[0].kind,
            ErrorKind::UnknownDataItem("I099/140".to_string())
        );
    }

    #[test]
    fn truncated_fspec_is_trailing_bytes() {
        let catalogue = Catalogue::new();
        let category = test_category();
        // FX set, nothing follows.
        let payload = [0x01];
        let mut errors = Vec::new();

        let err = parse_one(&category, &catalogue, &payload, &mut errors).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TrailingBlockBytes { left: 1 });
    }

    #[test]
    fn empty_fspec_yields_empty_record() {
        let catalogue = Catalogue::new();
        let category = test_category();
        let payload = [0x00];
        let mut errors = Vec::new();

        let record = parse_one(&category, &catalogue, &payload, &mut errors).unwrap();
        assert!(record.ok);
        assert!(record.items.is_empty());
        assert_eq!(record.raw, &[0x00]);
    }

    #[test]
    fn selector_chooses_between_uaps() {
        let catalogue = Catalogue::new();
        let mut category = test_category();
        let mut track = category.uaps[0].clone();
        track.name = Some("track".to_string());
        track.selector = Some(UapSelector::BitSet { octet: 2, bit: 8 });
        let mut plot = category.uaps[0].clone();
        plot.name = Some("plot".to_string());
        plot.default = true;
        category.uaps = vec![track, plot];

        let mut errors = Vec::new();
        // First data byte 0x99 has bit 8 set: track UAP.
        let payload = [0x80, 0x99, 0x01];
        let record = parse_one(&category, &catalogue, &payload, &mut errors).unwrap();
        assert_eq!(record.uap.name.as_deref(), Some("track"));

        // Bit 8 clear: falls back to the default.
        let payload = [0x80, 0x19, 0x01];
        let record = parse_one(&category, &catalogue, &payload, &mut errors).unwrap();
        assert_eq!(record.uap.name.as_deref(), Some("plot"));
    }

    #[test]
    fn no_uap_at_all_is_an_error() {
        let catalogue = Catalogue::new();
        let mut category = test_category();
        category.uaps.clear();
        let mut errors = Vec::new();

        let err = parse_one(&category, &catalogue, &[0x00], &mut errors).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoUap);
    }
}
