/*
 * @file rank.rs
 * @author The bbhash developers
 * @copyright 2026 The bbhash developers
 *
 * Checkpointed rank over a BitVector.  One cumulative popcount is
 * stored per block of BLOCK_WORDS words, so a rank query scans at
 * most BLOCK_WORDS-1 whole words plus one partial word.
 */

use crate::succinct::bitvec::{BitVector,WORD_BITS};

/** Words per checkpoint block */
pub const BLOCK_WORDS : usize = 8;

/** Bits per checkpoint block */
pub const BLOCK_BITS : usize = BLOCK_WORDS * WORD_BITS;

/** Number of checkpoints for a vector of `bits` bits */
#[inline(always)]
pub const fn checkpoints_for(bits:usize) -> usize {
    bits.div_ceil(BLOCK_BITS)
}

#[derive(Eq,PartialEq,Clone,Debug,Default)]
pub struct RankIndex {
    /** checkpoints[i] = number of ones in all words before block i */
    checkpoints: Vec<u64>
}

impl RankIndex {
    /** Compute the checkpoints of `bits` in one pass */
    pub fn build(bits:&BitVector) -> Self {
        let mut checkpoints = Vec::with_capacity(checkpoints_for(bits.len()));
        let mut total = 0u64;
        for block in bits.words().chunks(BLOCK_WORDS) {
            checkpoints.push(total);
            for w in block { total += w.count_ones() as u64; }
        }
        RankIndex { checkpoints }
    }

    /**
     * Wrap checkpoints read from storage.  The caller is responsible
     * for checking them against the vector they index.
     */
    pub fn from_checkpoints(checkpoints:Vec<u64>) -> Self {
        RankIndex { checkpoints }
    }

    #[inline(always)]
    pub fn checkpoints(&self) -> &[u64] { &self.checkpoints }

    #[inline(always)]
    pub fn len(&self) -> usize { self.checkpoints.len() }

    #[inline(always)]
    pub fn is_empty(&self) -> bool { self.checkpoints.is_empty() }

    /**
     * Number of set bits of `bits` at positions strictly less than `pos`.
     * `bits` must be the vector this index was built from.
     */
    #[inline]
    pub fn rank(&self, bits:&BitVector, pos:usize) -> u64 {
        assert!(pos < bits.len(), "rank position {} out of range for length {}", pos, bits.len());
        let words = bits.words();
        let word = pos / WORD_BITS;
        let block = word / BLOCK_WORDS;

        let mut ret = self.checkpoints[block];
        for w in &words[block*BLOCK_WORDS .. word] {
            ret += w.count_ones() as u64;
        }
        let mask = (1u64 << (pos % WORD_BITS)) - 1;
        ret + (words[word] & mask).count_ones() as u64
    }
}
