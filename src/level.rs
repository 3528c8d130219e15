/*
 * @file level.rs
 * @author The bbhash developers
 * @copyright 2026 The bbhash developers
 *
 * One level of the MPHF: the slots that exactly one key hashed to
 * under this level's seed, plus the number of keys placed before it.
 */

use crate::mix::bucket;
use crate::succinct::{BitVector,RankIndex};

/** Seed of the first level is INITIAL_SEED+1 */
pub const INITIAL_SEED : u64 = 41;

/** Seed used by the level at `index` in the chain */
#[inline(always)]
pub fn seed_for_level(index:usize) -> u64 {
    INITIAL_SEED + index as u64 + 1
}

#[derive(Eq,PartialEq,Clone,Debug)]
pub struct Level {
    pub(crate) seed: u64,
    pub(crate) offset: u64,
    pub(crate) bits: BitVector,
    pub(crate) ranks: RankIndex
}

impl Level {
    /** A finished level, with its rank checkpoints computed */
    pub(crate) fn new(seed:u64, offset:u64, bits:BitVector) -> Self {
        let ranks = RankIndex::build(&bits);
        Level { seed, offset, bits, ranks }
    }

    /** Hash seed for this level */
    pub fn seed(&self) -> u64 { self.seed }

    /** Number of keys placed by all earlier levels */
    pub fn offset(&self) -> u64 { self.offset }

    /** Number of slots in this level */
    pub fn bit_count(&self) -> usize { self.bits.len() }

    /** Number of keys this level places */
    pub fn placed(&self) -> u64 { self.bits.count_ones() as u64 }

    /** Collision-free slots */
    pub fn bits(&self) -> &BitVector { &self.bits }

    pub fn ranks(&self) -> &RankIndex { &self.ranks }

    /** Bits occupied by the slot vector and the checkpoints */
    pub fn size_in_bits(&self) -> usize {
        (self.bits.words().len() + self.ranks.len()) * u64::BITS as usize
    }

    /** If this level places `key`, return its global index */
    #[inline]
    pub fn lookup(&self, key:u64) -> Option<u64> {
        let idx = bucket(key, self.seed, self.bits.len());
        if self.bits.get(idx) {
            Some(self.offset + self.ranks.rank(&self.bits, idx))
        } else {
            None
        }
    }
}
