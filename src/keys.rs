/*
 * @file keys.rs
 * @author The bbhash developers
 * @copyright 2026 The bbhash developers
 *
 * Producing key sets: the MPHF itself requires unique keys and
 * does not check for duplicates.
 */

use rand::Rng;

/**
 * Sort `keys` and remove duplicates in place.
 * Returns the number of duplicates removed.
 */
pub fn dedup(keys:&mut Vec<u64>) -> usize {
    let before = keys.len();
    keys.sort_unstable();
    keys.dedup();
    before - keys.len()
}

/** Generate `n` distinct random keys, in sorted order. */
pub fn random_unique_keys<R:Rng>(rng:&mut R, n:usize) -> Vec<u64> {
    let mut keys = Vec::with_capacity(n + n/100 + 100);
    while keys.len() < n {
        /* 1% extra covers the expected duplicates */
        let want = n - keys.len();
        keys.extend((0..want + want/100 + 1).map(|_| rng.gen::<u64>()));
        dedup(&mut keys);
    }
    keys.truncate(n);
    keys
}
