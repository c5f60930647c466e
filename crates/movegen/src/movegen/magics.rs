//! Magic bitboard tables for sliding piece attack generation.
//!
//! Magic bitboards use a perfect hashing technique to map blocker configurations
//! to precomputed attack bitboards in O(1) time. Each square owns a slice of
//! one contiguous table per slider, sized by its relevant-mask width.
//!
//! The tables are filled from the hyperbola-quintessence reference. A
//! hard-coded multiplier that maps two occupancies with different attacks to
//! the same slot is rejected and replaced by a randomized search.

use super::geometry::{bishop_relevant_mask, rook_relevant_mask};
use super::sliding::{bishop_attacks_slow, rook_attacks_slow};
use crate::Bitboard;
use movegen_core::Square;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::OnceLock;
use std::time::Instant;

/// Seed of the fallback search, fixed so that table layout is reproducible.
const FALLBACK_SEED: u64 = 0x5EED_F00D_BA11_AD55;

/// The two sliding move patterns that use magic tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slider {
    Bishop,
    Rook,
}

impl Slider {
    /// Squares whose occupancy affects attacks from `sq`.
    pub fn relevant_mask(self, sq: Square) -> Bitboard {
        match self {
            Slider::Bishop => bishop_relevant_mask(sq),
            Slider::Rook => rook_relevant_mask(sq),
        }
    }

    /// Attacks computed without tables.
    pub fn reference_attacks(self, sq: Square, occupied: Bitboard) -> Bitboard {
        match self {
            Slider::Bishop => bishop_attacks_slow(sq, occupied),
            Slider::Rook => rook_attacks_slow(sq, occupied),
        }
    }

    fn index_bits(self, sq: Square) -> u8 {
        match self {
            Slider::Bishop => BISHOP_BITS[sq.index() as usize],
            Slider::Rook => ROOK_BITS[sq.index() as usize],
        }
    }

    fn known_magic(self, sq: Square) -> u64 {
        match self {
            Slider::Bishop => BISHOP_MAGICS[sq.index() as usize],
            Slider::Rook => ROOK_MAGICS[sq.index() as usize],
        }
    }
}

/// Magic entry for a single square.
#[derive(Debug, Clone, Copy)]
pub struct Magic {
    /// Mask of relevant blocker squares (excludes edges).
    pub mask: Bitboard,
    /// The magic number for this square.
    pub magic: u64,
    /// Right shift amount (64 - number of bits in mask).
    pub shift: u8,
    /// Offset into the attack table.
    pub offset: usize,
}

impl Magic {
    const UNSET: Magic = Magic {
        mask: Bitboard::EMPTY,
        magic: 0,
        shift: 64,
        offset: 0,
    };

    /// Computes the table index for a given blocker configuration.
    #[inline]
    fn index(&self, blockers: Bitboard) -> usize {
        let relevant = blockers & self.mask;
        (relevant.0.wrapping_mul(self.magic) >> self.shift) as usize
    }
}

/// Attack table and per-square entries for one slider.
struct SliderTable {
    attacks: Vec<Bitboard>,
    magics: [Magic; 64],
}

/// Stores all precomputed attack tables.
struct AttackTables {
    bishop: SliderTable,
    rook: SliderTable,
}

static ATTACK_TABLES: OnceLock<AttackTables> = OnceLock::new();

/// Gets the global attack tables, initializing if necessary.
fn attack_tables() -> &'static AttackTables {
    ATTACK_TABLES.get_or_init(|| {
        let start = Instant::now();
        let tables = AttackTables {
            bishop: SliderTable::build(Slider::Bishop),
            rook: SliderTable::build(Slider::Rook),
        };
        tracing::debug!(
            bishop_entries = tables.bishop.attacks.len(),
            rook_entries = tables.rook.attacks.len(),
            elapsed = ?start.elapsed(),
            "magic attack tables built"
        );
        tables
    })
}

/// Builds the magic tables now rather than on the first lookup.
pub fn init() {
    attack_tables();
}

// Bishop multipliers, one per square, a1 first.
const BISHOP_MAGICS: [u64; 64] = [
    0x89a1121896040240,
    0x2004844802002010,
    0x2068080051921000,
    0x62880a0220200808,
    0x0004042004000000,
    0x0100822020200011,
    0xc00444222012000a,
    0x0028808801216001,
    0x0400492088408100,
    0x0201c401040c0084,
    0x00840800910a0010,
    0x0000082080240060,
    0x2000840504006000,
    0x30010c4108405004,
    0x1008005410080802,
    0x8144042209100900,
    0x0208081020014400,
    0x004800201208ca00,
    0x0f18140408012008,
    0x1004002802102001,
    0x0841000820080811,
    0x0040200200a42008,
    0x0000800054042000,
    0x88010400410c9000,
    0x0520040470104290,
    0x1004040051500081,
    0x2002081833080021,
    0x000400c00c010142,
    0x941408200c002000,
    0x0658810000806011,
    0x0188071040440a00,
    0x4800404002011c00,
    0x0104442040404200,
    0x440110080ad09582,
    0x0004022401120400,
    0x80c0040400080120,
    0x8040010040820802,
    0x0480810700020090,
    0x0102008e00040242,
    0x0809005202050100,
    0x8002024220104080,
    0x0431008804142000,
    0x0019001802081400,
    0x0200014208040080,
    0x3308082008200100,
    0x041010500040c020,
    0x4012020c04210308,
    0x208220a202004080,
    0x0111040120082000,
    0x6803040141280a00,
    0x2101004202410000,
    0x8200000041108022,
    0x0000021082088000,
    0x0002410204010040,
    0x0040100400809000,
    0x0822088220820214,
    0x0040808090012004,
    0x00910224040218c9,
    0x0402814422015008,
    0x0090014004842410,
    0x0001000042304105,
    0x0010008830412a00,
    0x2520081090008908,
    0x40102000a0a60140,
];

// Rook multipliers.
const ROOK_MAGICS: [u64; 64] = [
    0x0a8002c000108020,
    0x06c00049b0002001,
    0x0100200010090040,
    0x2480041000800801,
    0x0280028004000800,
    0x0900410008040022,
    0x0280020001001080,
    0x2880002041000080,
    0xa000800080400034,
    0x0004808020004000,
    0x2290802004801000,
    0x0411000d00100020,
    0x0402800800040080,
    0x000b000401004208,
    0x2409000100040200,
    0x0001002100004082,
    0x0022878001e24000,
    0x1090810021004010,
    0x0801030040200012,
    0x0500808008001000,
    0x0a08018014000880,
    0x8000808004000200,
    0x0201008080010200,
    0x0801020000441091,
    0x0000800080204005,
    0x1040200040100048,
    0x0000120200402082,
    0x0d14880480100080,
    0x0012040280080080,
    0x0100040080020080,
    0x9020010080800200,
    0x0813241200148449,
    0x0491604001800080,
    0x0100401000402001,
    0x4820010021001040,
    0x0400402202000812,
    0x0209009005000802,
    0x0810800601800400,
    0x4301083214000150,
    0x204026458e001401,
    0x0040204000808000,
    0x8001008040010020,
    0x8410820820420010,
    0x1003001000090020,
    0x0804040008008080,
    0x0012000810020004,
    0x1000100200040208,
    0x430000a044020001,
    0x0280009023410300,
    0x00e0100040002240,
    0x0000200100401700,
    0x2244100408008080,
    0x0008000400801980,
    0x0002000810040200,
    0x8010100228810400,
    0x2000009044210200,
    0x4080008040102101,
    0x0040002080411d01,
    0x2005524060000901,
    0x0502001008400422,
    0x489a000810200402,
    0x0001004400080a13,
    0x4000011008020084,
    0x0026002114058042,
];

// Index width per square: the size of the bishop's relevant mask.
const BISHOP_BITS: [u8; 64] = [
    6, 5, 5, 5, 5, 5, 5, 6,
    5, 5, 5, 5, 5, 5, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 5, 5, 5, 5, 5, 5,
    6, 5, 5, 5, 5, 5, 5, 6,
];

// Index width per square for rooks.
const ROOK_BITS: [u8; 64] = [
    12, 11, 11, 11, 11, 11, 11, 12,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    12, 11, 11, 11, 11, 11, 11, 12,
];

impl SliderTable {
    fn build(slider: Slider) -> Self {
        let mut attacks = Vec::new();
        let mut magics = [Magic::UNSET; 64];
        let mut rng = StdRng::seed_from_u64(FALLBACK_SEED);

        for sq in Square::all() {
            let mask = slider.relevant_mask(sq);
            let bits = slider.index_bits(sq);
            let occupancies = subsets(mask);
            let reference: Vec<Bitboard> = occupancies
                .iter()
                .map(|&occupied| slider.reference_attacks(sq, occupied))
                .collect();

            let known = slider.known_magic(sq);
            let (magic, entries) = match fill(mask, known, bits, &occupancies, &reference) {
                Some(entries) => (known, entries),
                None => {
                    tracing::warn!(
                        ?slider,
                        square = %sq,
                        magic = known,
                        "hard-coded magic collides, searching for a replacement"
                    );
                    search(mask, bits, &occupancies, &reference, &mut rng)
                }
            };

            magics[sq.index() as usize] = Magic {
                mask,
                magic,
                shift: 64 - bits,
                offset: attacks.len(),
            };
            attacks.extend(entries);
        }

        SliderTable { attacks, magics }
    }

    #[inline]
    fn lookup(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let magic = &self.magics[sq.index() as usize];
        self.attacks[magic.offset + magic.index(occupied)]
    }
}

/// Every subset of `mask`, empty set first (Carry-Rippler enumeration).
pub fn subsets(mask: Bitboard) -> Vec<Bitboard> {
    let mut out = Vec::with_capacity(1 << mask.count());
    let mut blockers = Bitboard::EMPTY;
    loop {
        out.push(blockers);
        blockers = Bitboard(blockers.0.wrapping_sub(mask.0) & mask.0);
        if blockers.is_empty() {
            break;
        }
    }
    out
}

/// Hashes every occupancy with `magic`; `None` on a destructive collision.
fn fill(
    mask: Bitboard,
    magic: u64,
    bits: u8,
    occupancies: &[Bitboard],
    reference: &[Bitboard],
) -> Option<Vec<Bitboard>> {
    let entry = Magic {
        mask,
        magic,
        shift: 64 - bits,
        offset: 0,
    };
    let mut slots: Vec<Option<Bitboard>> = vec![None; 1 << bits];

    for (&occupied, &attacks) in occupancies.iter().zip(reference) {
        let slot = &mut slots[entry.index(occupied)];
        match *slot {
            None => *slot = Some(attacks),
            Some(existing) if existing == attacks => {}
            Some(_) => return None,
        }
    }

    Some(slots.into_iter().map(Option::unwrap_or_default).collect())
}

/// Tries sparse random multipliers until one hashes without collisions.
fn search(
    mask: Bitboard,
    bits: u8,
    occupancies: &[Bitboard],
    reference: &[Bitboard],
    rng: &mut StdRng,
) -> (u64, Vec<Bitboard>) {
    loop {
        let candidate = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        // Too few bits in the top byte of the product rarely spread well.
        if (mask.0.wrapping_mul(candidate) >> 56).count_ones() < 6 {
            continue;
        }
        if let Some(entries) = fill(mask, candidate, bits, occupancies, reference) {
            return (candidate, entries);
        }
    }
}

/// Finds a collision-free multiplier for `slider` on `sq` by randomized
/// search, using the same index width as the built-in tables.
///
/// The same seed always yields the same magic.
pub fn find_magic(slider: Slider, sq: Square, seed: u64) -> u64 {
    let mask = slider.relevant_mask(sq);
    let occupancies = subsets(mask);
    let reference: Vec<Bitboard> = occupancies
        .iter()
        .map(|&occupied| slider.reference_attacks(sq, occupied))
        .collect();
    let mut rng = StdRng::seed_from_u64(seed);
    search(mask, slider.index_bits(sq), &occupancies, &reference, &mut rng).0
}

/// The magic entry the tables use for `slider` on `sq`.
pub fn magic_entry(slider: Slider, sq: Square) -> Magic {
    let tables = attack_tables();
    match slider {
        Slider::Bishop => tables.bishop.magics[sq.index() as usize],
        Slider::Rook => tables.rook.magics[sq.index() as usize],
    }
}

/// Returns bishop attacks for a square given occupied squares.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    attack_tables().bishop.lookup(sq, occupied)
}

/// Returns rook attacks for a square given occupied squares.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    attack_tables().rook.lookup(sq, occupied)
}

/// Returns queen attacks (bishop + rook).
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}
