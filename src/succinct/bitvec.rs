/*
 * @file bitvec.rs
 * @author The bbhash developers
 * @copyright 2026 The bbhash developers
 *
 * Fixed-capacity bit vector.  Bits past the logical length in the
 * final word are always kept clear, so whole-word popcounts and
 * zero tests need no masking.
 */

use std::collections::TryReserveError;

/** Bits per storage word */
pub const WORD_BITS : usize = u64::BITS as usize;

/** Number of words needed to hold `bits` bits */
#[inline(always)]
pub const fn words_for(bits:usize) -> usize {
    bits.div_ceil(WORD_BITS)
}

/** Mask of the used bits in the last word of a `bits`-long vector */
#[inline(always)]
fn tail_mask(bits:usize) -> u64 {
    match bits % WORD_BITS {
        0 => !0,
        r => (1u64 << r) - 1
    }
}

#[derive(Eq,PartialEq,Clone,Debug,Default)]
pub struct BitVector {
    bit_count: usize,
    words: Vec<u64>
}

impl BitVector {
    /** Create a zero-filled vector of `bit_count` bits */
    pub fn new(bit_count:usize) -> Self {
        BitVector { bit_count, words: vec![0; words_for(bit_count)] }
    }

    /** Like `new`, but report allocation failure instead of aborting */
    pub fn try_new(bit_count:usize) -> Result<Self, TryReserveError> {
        let mut words = Vec::new();
        words.try_reserve_exact(words_for(bit_count))?;
        words.resize(words_for(bit_count), 0);
        Ok(BitVector { bit_count, words })
    }

    /**
     * Rebuild a vector from its storage words.
     * Returns None if the word count is wrong or if any bit
     * past `bit_count` is set.
     */
    pub fn from_words(bit_count:usize, words:Vec<u64>) -> Option<Self> {
        if words.len() != words_for(bit_count) { return None; }
        if let Some(last) = words.last() {
            if last & !tail_mask(bit_count) != 0 { return None; }
        }
        Some(BitVector { bit_count, words })
    }

    /** Logical number of bits */
    #[inline(always)]
    pub fn len(&self) -> usize { self.bit_count }

    #[inline(always)]
    pub fn is_empty(&self) -> bool { self.bit_count == 0 }

    /** Storage words; always exactly `words_for(len())` of them */
    #[inline(always)]
    pub fn words(&self) -> &[u64] { &self.words }

    /** Set a bit */
    #[inline(always)]
    pub fn set(&mut self, pos:usize) {
        assert!(pos < self.bit_count, "bit {} out of range for length {}", pos, self.bit_count);
        self.words[pos/WORD_BITS] |= 1 << (pos%WORD_BITS);
    }

    /** Clear a bit */
    #[inline(always)]
    pub fn clear(&mut self, pos:usize) {
        assert!(pos < self.bit_count, "bit {} out of range for length {}", pos, self.bit_count);
        self.words[pos/WORD_BITS] &= !(1 << (pos%WORD_BITS));
    }

    /** Check a bit */
    #[inline(always)]
    pub fn get(&self, pos:usize) -> bool {
        assert!(pos < self.bit_count, "bit {} out of range for length {}", pos, self.bit_count);
        (self.words[pos/WORD_BITS] >> (pos%WORD_BITS)) & 1 != 0
    }

    /** Clear every bit in the active length */
    pub fn clear_all(&mut self) {
        self.words.fill(0);
    }

    /**
     * Reduce the logical length to `bit_count` without releasing storage,
     * so a scratch vector can be reused for a smaller round.
     */
    pub fn shrink(&mut self, bit_count:usize) {
        assert!(bit_count <= self.bit_count, "cannot grow a bit vector by shrinking ({} > {})",
            bit_count, self.bit_count);
        self.bit_count = bit_count;
        self.words.truncate(words_for(bit_count));
        if let Some(last) = self.words.last_mut() {
            *last &= tail_mask(bit_count);
        }
    }

    /** Are all bits clear? */
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /** Total number of set bits */
    pub fn count_ones(&self) -> usize {
        let mut ret = 0;
        for w in &self.words { ret += w.count_ones() as usize; }
        ret
    }

    /**
     * Set self = a & !b.  All three vectors must have the same length.
     */
    pub fn and_not(&mut self, a:&BitVector, b:&BitVector) {
        assert!(self.bit_count == a.bit_count && self.bit_count == b.bit_count,
            "and_not on vectors of different lengths ({}, {}, {})",
            self.bit_count, a.bit_count, b.bit_count);
        for ((d,x),y) in self.words.iter_mut().zip(&a.words).zip(&b.words) {
            *d = x & !y;
        }
        let bit_count = self.bit_count;
        if let Some(last) = self.words.last_mut() {
            *last &= tail_mask(bit_count);
        }
    }

    /** Iterate over the positions of set bits */
    pub fn iter_ones(&self) -> Ones<'_> {
        Ones { vec: self, offset:0, cur:0 }
    }
}

pub struct Ones<'a> {
    vec: &'a BitVector,
    offset: usize,
    cur: u64
}

impl <'a> Iterator for Ones<'a> {
    type Item = usize;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.cur != 0 {
                let ret = self.cur.trailing_zeros() as usize + (self.offset-1)*WORD_BITS;
                self.cur &= self.cur-1;
                debug_assert!(self.vec.get(ret));
                return Some(ret);
            } else if self.offset >= self.vec.words.len() {
                return None;
            } else {
                self.cur = self.vec.words[self.offset];
                self.offset += 1;
            }
        }
    }
}
