/*
 * @file mphf.rs
 * @author The bbhash developers
 * @copyright 2026 The bbhash developers
 *
 * BBHash construction and query.
 */

use crate::error::Error;
use crate::level::{Level,seed_for_level};
use crate::mix::bucket;
use crate::succinct::BitVector;
use std::cmp::max;
use std::mem::swap;
use tracing::{debug,info};

/** Smallest number of slots in any level */
pub const MIN_LEVEL_SIZE : usize = 64;

/**
 * Options to build an [`Mphf`].
 *
 * Implements `Default`, so you can get reasonable options
 * with `BuildOptions::default()`.
 */
#[derive(Copy,Clone,PartialEq,Debug)]
pub struct BuildOptions {
    /**
     * Slots per unplaced key in each level.
     *
     * 1.0 gives the smallest function (about 3.1 bits per key, counting
     * rank checkpoints) but needs many levels; 2.0 builds and queries
     * faster at about 3.7 bits per key.  Must be positive and finite.
     * A gamma too large to allocate fails with [`Error::Allocation`].
     *
     * Default: 2.0.
     */
    pub gamma: f64,

    /**
     * Log each level at `info` instead of `debug`.
     *
     * Default: false.
     */
    pub verbose: bool,

    /**
     * Give up with [`Error::TooManyLevels`] after this many levels.
     *
     * Each level places a constant fraction of the remaining keys, so
     * reaching this usually means the keys were not unique.
     *
     * Default: 256.
     */
    pub max_levels: usize
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            gamma: 2.0,
            verbose: false,
            max_levels: 256
        }
    }
}

impl BuildOptions {
    /** Default options with the given gamma */
    pub fn with_gamma(gamma:f64) -> Self {
        BuildOptions { gamma, ..Default::default() }
    }
}

/** Number of slots in a level that must place `unplaced` keys */
fn level_size(unplaced:usize, gamma:f64) -> usize {
    max(MIN_LEVEL_SIZE, (unplaced as f64 * gamma) as usize)
}

/**
 * A minimal perfect hash function over a fixed set of u64 keys.
 *
 * Each key of the construction set maps to a distinct index in
 * `0..num_keys()`.  The keys themselves are not stored.
 */
#[derive(Eq,PartialEq,Clone,Debug,Default)]
pub struct Mphf {
    pub(crate) num_keys: u64,
    pub(crate) levels: Vec<Level>
}

impl Mphf {
    /**
     * Build an MPHF over `keys`.
     *
     * The keys must be unique.  Duplicates always collide with each
     * other, so they are never placed and the build fails with
     * [`Error::TooManyLevels`] once `options.max_levels` is reached.
     *
     * The result depends only on the keys, their order and `gamma`.
     */
    pub fn build(keys:&[u64], options:&BuildOptions) -> Result<Mphf, Error> {
        let gamma = options.gamma;
        if !(gamma > 0.0 && gamma.is_finite()) {
            return Err(Error::InvalidGamma(gamma));
        }
        if keys.is_empty() {
            return Ok(Mphf::default());
        }

        /* Scratch vectors, sized for the first (largest) level and shrunk after */
        let capacity = level_size(keys.len(), gamma);
        let mut used = BitVector::try_new(capacity)?;
        let mut colliding = BitVector::try_new(capacity)?;

        let mut unplaced = keys.to_vec();
        let mut carried = Vec::with_capacity(unplaced.len());
        let mut levels = Vec::new();
        let mut offset = 0u64;

        while !unplaced.is_empty() {
            if levels.len() >= options.max_levels {
                return Err(Error::TooManyLevels(levels.len()));
            }
            let seed = seed_for_level(levels.len());
            let size = level_size(unplaced.len(), gamma);
            used.shrink(size);
            used.clear_all();
            colliding.shrink(size);
            colliding.clear_all();

            /* Bucket everything; a slot hit twice is a collision */
            for &key in &unplaced {
                let idx = bucket(key, seed, size);
                if used.get(idx) { colliding.set(idx); }
                else { used.set(idx); }
            }
            let mut free = BitVector::try_new(size)?;
            free.and_not(&used, &colliding);

            /* Keys in collision-free slots are placed; carry the rest in order */
            carried.clear();
            let mut placed = 0u64;
            for &key in &unplaced {
                if free.get(bucket(key, seed, size)) { placed += 1; }
                else { carried.push(key); }
            }
            debug_assert_eq!(placed as usize, free.count_ones());

            if options.verbose {
                info!(level = levels.len(), seed, size, placed, remaining = carried.len(), "built level");
            } else {
                debug!(level = levels.len(), seed, size, placed, remaining = carried.len(), "built level");
            }

            levels.push((seed, offset, free));
            offset += placed;
            swap(&mut unplaced, &mut carried);
        }

        let levels : Vec<Level> = levels.into_iter()
            .map(|(seed,offset,free)| Level::new(seed, offset, free))
            .collect();
        let ret = Mphf { num_keys: keys.len() as u64, levels };
        if options.verbose {
            info!(keys = ret.num_keys, levels = ret.levels.len(), bits = ret.size_in_bits(),
                bits_per_key = ret.bits_per_key(), "built MPHF");
        } else {
            debug!(keys = ret.num_keys, levels = ret.levels.len(), bits = ret.size_in_bits(), "built MPHF");
        }
        Ok(ret)
    }

    /** Build with default options except for `gamma` */
    pub fn with_gamma(keys:&[u64], gamma:f64) -> Result<Mphf, Error> {
        Self::build(keys, &BuildOptions::with_gamma(gamma))
    }

    /**
     * Return the index of `key`, in `0..num_keys()`.
     *
     * For keys in the construction set this is always `Some`, and no two
     * such keys share an index.  For any other key the result is
     * arbitrary: usually `None`, but it may be the index of some
     * unrelated key.  This is not a membership test.
     *
     * Querying an MPHF built from no keys always returns `None`.
     */
    pub fn query(&self, key:u64) -> Option<u64> {
        self.levels.iter().find_map(|level| level.lookup(key))
    }

    /** Number of keys in the construction set */
    pub fn num_keys(&self) -> u64 { self.num_keys }

    pub fn num_levels(&self) -> usize { self.levels.len() }

    /** Levels in query order */
    pub fn levels(&self) -> &[Level] { &self.levels }

    /**
     * Storage of all levels, in bits: every slot vector rounded up to
     * whole words, plus one word per rank checkpoint.
     */
    pub fn size_in_bits(&self) -> usize {
        self.levels.iter().map(Level::size_in_bits).sum()
    }

    /** `size_in_bits()` per key; 0 for an empty MPHF */
    pub fn bits_per_key(&self) -> f64 {
        if self.num_keys == 0 { 0.0 }
        else { self.size_in_bits() as f64 / self.num_keys as f64 }
    }
}
