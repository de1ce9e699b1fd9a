use bitvec::prelude::*;

use crate::field::{bit_of, parse_hex, to_binary_digits};
use crate::layout::{Field, LineRecord};
use crate::parity::{erratum_for, parity, Coverage, ParityBits, PC_COVERAGE, PN_COVERAGE, PS_COVERAGE};

pub const WORD_BITS: usize = 56;
/// Positions 0..=54 carry data; 55 is the fixed end marker.
pub const MEANINGFUL_BITS: usize = 55;
pub const ADDRESS_BITS: usize = 12;

pub type WordBits = BitArr!(for WORD_BITS, in u64, Msb0);

/// Where each verbatim bit-group field lands in the word.
pub const PLACEMENT: &[(Field, usize)] = &[
    (Field::Ch, 9),
    (Field::Cl, 13),
    (Field::Cm, 17),
    (Field::Cu, 20),
    (Field::Ca, 22),
    (Field::Cb, 26),
    (Field::Ck, 28),
    (Field::Pk, 32),
    (Field::Cd, 34),
    (Field::Cf, 38),
    (Field::Cg, 41),
    (Field::Cv, 43),
    (Field::Cc, 45),
    (Field::Cs, 48),
    (Field::Aa, 52),
    (Field::As, 53),
    (Field::Ak, 54),
];

const CN_POSITION: usize = 1;
const CN_WIDTH: usize = 6;

/// One packed control-store word.
#[derive(Debug, Clone, Copy)]
pub struct ControlWord {
    address: u16,
    bits: WordBits,
}

impl PartialEq for ControlWord {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.bits() == other.bits()
    }
}

impl Eq for ControlWord {}

impl ControlWord {
    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn bits(&self) -> &BitSlice<u64, Msb0> {
        &self.bits[..WORD_BITS]
    }

    pub fn bit(&self, pos: usize) -> bool {
        self.bits[pos]
    }

    pub fn parity_bit(&self, which: ParityBits) -> Option<bool> {
        which.position().map(|p| self.bits[p])
    }

    /// All 56 positions, MSB first.
    pub fn to_bit_string(&self) -> String {
        render_bits(&self.bits[..WORD_BITS])
    }

    /// Positions 0..=54, the form historically emitted into the VHDL table.
    pub fn meaningful_bits(&self) -> String {
        render_bits(&self.bits[..MEANINGFUL_BITS])
    }
}

fn render_bits(bits: &BitSlice<u64, Msb0>) -> String {
    bits.iter().by_vals().map(|b| if b { '1' } else { '0' }).collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WordPacker;

impl WordPacker {
    pub fn new() -> Self {
        Self
    }

    pub fn pack(&self, rec: &LineRecord<'_>) -> ControlWord {
        let mut word = self.pack_unflipped(rec);
        let flip = erratum_for(word.address);
        for which in flip.iter() {
            if let Some(p) = which.position() {
                let cur = word.bits[p];
                word.bits.set(p, !cur);
            }
        }
        word
    }

    /// Packed word with the general-case parity, before any erratum flips.
    pub fn pack_unflipped(&self, rec: &LineRecord<'_>) -> ControlWord {
        let address = (parse_hex(rec.field(Field::Addr)) & 0xFFF) as u16;
        let addr_binary = to_binary_digits(address, ADDRESS_BITS);

        // Placeholders for PN, PS, PA, PC stay clear; position 55 is the end marker.
        let mut bits = WordBits::ZERO;

        // Only the top six bits of the 8-bit CN rendering are kept.
        let cn = to_binary_digits(parse_hex(rec.field(Field::Cn)), 8);
        for (i, ch) in cn.bytes().take(CN_WIDTH).enumerate() {
            bits.set(CN_POSITION + i, bit_of(ch));
        }

        // `?` and any other non-'1' character land as a clear bit.
        for &(field, pos) in PLACEMENT {
            for (i, &ch) in rec.field(field).iter().enumerate() {
                bits.set(pos + i, bit_of(ch));
            }
        }

        let pa = parity(true, addr_binary.bytes().map(bit_of));
        bits.set(8, pa);

        for cov in [PN_COVERAGE, PS_COVERAGE, PC_COVERAGE] {
            let p = cover(&bits, &cov);
            if let Some(pos) = cov.bit.position() {
                bits.set(pos, p);
            }
        }

        ControlWord { address, bits }
    }
}

fn cover(bits: &WordBits, cov: &Coverage) -> bool {
    parity(true, cov.positions().map(|p| bits[p]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FIELDS;

    #[test]
    fn placement_is_contiguous_and_disjoint() {
        let mut used = [false; WORD_BITS];
        for p in [0, 7, 8, 33, 55] {
            used[p] = true;
        }
        for i in 0..CN_WIDTH {
            used[CN_POSITION + i] = true;
        }
        for &(field, pos) in PLACEMENT {
            for i in 0..field.desc().width {
                assert!(!used[pos + i], "overlap at {}", pos + i);
                used[pos + i] = true;
            }
        }
        assert!(used.iter().all(|&u| u));
        // every bit-group field except the hex ones is placed
        assert_eq!(PLACEMENT.len(), FIELDS.len() - 2);
    }
}
