use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParityBits: u8 {
const PN = 1 << 0; // word bit 0, over CN
const PS = 1 << 1; // word bit 7
const PA = 1 << 2; // word bit 8, over the address
const PC = 1 << 3; // word bit 33
}
}

impl ParityBits {
    /// Position of a single parity bit in the 56-bit word.
    pub fn position(self) -> Option<usize> {
        const POSITIONS: [(ParityBits, usize); 4] = [
            (ParityBits::PN, 0),
            (ParityBits::PS, 7),
            (ParityBits::PA, 8),
            (ParityBits::PC, 33),
        ];
        POSITIONS.iter().find(|(f, _)| *f == self).map(|&(_, p)| p)
    }
}

/// Odd-parity fold: `seed` XORed with every bit in `bits`.
pub fn parity<I>(seed: bool, bits: I) -> bool
where
    I: IntoIterator<Item = bool>,
{
    bits.into_iter().fold(seed, |acc, b| acc ^ b)
}

/// Word positions folded into each parity bit. PA is computed over the address instead.
#[derive(Debug, Clone, Copy)]
pub struct Coverage {
    pub bit: ParityBits,
    pub ranges: &'static [(usize, usize)],
}

impl Coverage {
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranges.iter().flat_map(|&(lo, hi)| lo..=hi)
    }
}

pub const PN_COVERAGE: Coverage = Coverage {
    bit: ParityBits::PN,
    ranges: &[(1, 6)],
};

// PA through PK, then AA and AK
pub const PS_COVERAGE: Coverage = Coverage {
    bit: ParityBits::PS,
    ranges: &[(8, 32), (52, 52), (54, 54)],
};

// CD through CS, then AS
pub const PC_COVERAGE: Coverage = Coverage {
    bit: ParityBits::PC,
    ranges: &[(34, 51), (53, 53)],
};

/// Hardware erratum: parity bits inverted at one control-store address.
#[derive(Debug, Clone, Copy)]
pub struct Erratum {
    pub address: u16,
    pub flip: ParityBits,
}

pub const ERRATA: &[Erratum] = &[
    Erratum {
        address: 0xBA0,
        flip: ParityBits::PA.union(ParityBits::PC),
    },
    Erratum {
        address: 0xB60,
        flip: ParityBits::PN
            .union(ParityBits::PS)
            .union(ParityBits::PA)
            .union(ParityBits::PC),
    },
];

pub fn erratum_for(address: u16) -> ParityBits {
    ERRATA
        .iter()
        .filter(|e| e.address == address)
        .fold(ParityBits::empty(), |acc, e| acc | e.flip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_is_seeded_xor() {
        assert!(parity(true, []));
        assert!(!parity(true, [true]));
        assert!(parity(true, [true, true]));
        assert!(!parity(false, [false, false]));
    }

    #[test]
    fn coverage_lengths() {
        assert_eq!(PN_COVERAGE.positions().count(), 6);
        assert_eq!(PS_COVERAGE.positions().count(), 27);
        assert_eq!(PC_COVERAGE.positions().count(), 19);
    }

    #[test]
    fn errata_only_for_known_addresses() {
        assert_eq!(erratum_for(0xBA0), ParityBits::PA | ParityBits::PC);
        assert_eq!(erratum_for(0xB60), ParityBits::all());
        assert!(erratum_for(0xBA1).is_empty());
        assert!(erratum_for(0x000).is_empty());
    }

    #[test]
    fn single_flags_have_positions() {
        let pos: Vec<_> = ParityBits::all().iter().filter_map(ParityBits::position).collect();
        assert_eq!(pos, vec![0, 7, 8, 33]);
        assert_eq!((ParityBits::PA | ParityBits::PC).position(), None);
    }
}
