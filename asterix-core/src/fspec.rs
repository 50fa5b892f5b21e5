//! Field Specification handling.
//!
//! The FSPEC is the per-record bit vector announcing which UAP entries
//! follow. Each octet carries seven item bits (MSB first) and an FX
//! continuation bit in the LSB. Reads are slice-bounded and capped; an
//! FSPEC that runs past the record or chains forever is malformed input,
//! reported as an error rather than walked.

use crate::error::ErrorKind;

/// Hard cap on FSPEC octets (224 FRNs), far beyond any published category.
pub const MAX_FSPEC_LEN: usize = 32;

/// Maps a 1-indexed FRN to its (octet, bit) position, FX bits excluded.
/// Bit 0 is the octet's MSB.
pub fn frn_to_position(frn: u8) -> (usize, u8) {
    let index = (frn as usize).saturating_sub(1);
    (index / 7, (index % 7) as u8)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fspec {
    bytes: Vec<u8>,
}

impl Fspec {
    /// Reads an FSPEC from the start of `input`, following FX bits.
    ///
    /// Fails when the chain runs past the input or exceeds
    /// [`MAX_FSPEC_LEN`] octets.
    pub fn read(input: &[u8]) -> Result<Self, ErrorKind> {
        let mut bytes = Vec::with_capacity(1);

        loop {
            if bytes.len() == MAX_FSPEC_LEN {
                return Err(ErrorKind::FspecOverrun);
            }
            let Some(&b) = input.get(bytes.len()) else {
                return Err(ErrorKind::Underflow {
                    needed: bytes.len() + 1,
                    remaining: input.len(),
                });
            };
            bytes.push(b);

            // FX bit (LSB)
            if b & 0x01 == 0 {
                break;
            }
        }

        Ok(Self { bytes })
    }

    /// Octets consumed from the record.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether bit `bit` (0 = MSB) of octet `byte` is set. Positions past
    /// the FSPEC read as unset.
    pub fn is_set(&self, byte: usize, bit: u8) -> bool {
        self.bytes
            .get(byte)
            .map(|b| (b & (1 << (7 - bit))) != 0)
            .unwrap_or(false)
    }

    /// Whether the item bit for a 1-indexed FRN is set.
    pub fn frn_is_set(&self, frn: u8) -> bool {
        if frn == 0 {
            return false;
        }
        let (byte, bit) = frn_to_position(frn);
        self.is_set(byte, bit)
    }

    /// The highest FRN this FSPEC can address.
    pub fn frn_capacity(&self) -> u8 {
        (self.bytes.len() * 7) as u8
    }

    /// Iterates the set FRNs in ascending order.
    pub fn set_frns(&self) -> impl Iterator<Item = u8> + '_ {
        (1..=self.frn_capacity()).filter(|&frn| self.frn_is_set(frn))
    }
}
