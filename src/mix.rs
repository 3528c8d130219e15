/*
 * @file mix.rs
 * @author The bbhash developers
 * @copyright 2026 The bbhash developers
 *
 * Hashing.  `mix` is the seeded finalizer that assigns keys to level
 * buckets; the fingerprint functions turn byte strings or arbitrary
 * `Hash` values into the u64 keys the MPHF is built over.
 */

use core::hash::Hash;
use siphasher::sip128::{Hasher128, SipHasher13};

/** A key for the SipHash13 fingerprint. */
pub type HasherKey = [u8; 16];

const FMIX_C1 : u64 = 0xff51afd7ed558ccd;
const FMIX_C2 : u64 = 0xc4ceb9fe1a85ec53;

/** MurmurHash3's 64-bit finalizer */
#[inline(always)]
fn fmix64(mut x:u64) -> u64 {
    x ^= x >> 33;
    x = x.wrapping_mul(FMIX_C1);
    x ^= x >> 33;
    x = x.wrapping_mul(FMIX_C2);
    x ^= x >> 33;
    x
}

/**
 * Mix a key with a per-level seed.
 *
 * This is the only hash used to place keys, so it must never change:
 * serialized MPHFs depend on it bit for bit.
 */
#[inline(always)]
pub fn mix(key:u64, seed:u64) -> u64 {
    fmix64(key ^ seed)
}

/** Bucket of `key` in a table of `size` slots under `seed` */
#[inline(always)]
pub fn bucket(key:u64, seed:u64, size:usize) -> usize {
    debug_assert!(size > 0);
    (mix(key, seed) % size as u64) as usize
}

/**
 * 64-bit fingerprint of a byte string: the first half of
 * MurmurHash3_x64_128, with both lanes seeded by `seed`.
 */
pub fn murmur3_64(data:&[u8], seed:u64) -> u64 {
    const C1 : u64 = 0x87c37b91114253d5;
    const C2 : u64 = 0x4cf5ad432745937f;

    let mut h1 = seed;
    let mut h2 = seed;

    let mut blocks = data.chunks_exact(16);
    for block in &mut blocks {
        let mut k1 = u64::from_le_bytes(block[0..8].try_into().unwrap());
        let mut k2 = u64::from_le_bytes(block[8..16].try_into().unwrap());

        k1 = k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2);
        h1 ^= k1;
        h1 = h1.rotate_left(27).wrapping_add(h2).wrapping_mul(5).wrapping_add(0x52dce729);

        k2 = k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1);
        h2 ^= k2;
        h2 = h2.rotate_left(31).wrapping_add(h1).wrapping_mul(5).wrapping_add(0x38495ab5);
    }

    /* Tail: bytes 8..15 go to k2, bytes 0..7 to k1 */
    let tail = blocks.remainder();
    let mut k1 = 0u64;
    let mut k2 = 0u64;
    for (i,&b) in tail.iter().enumerate().skip(8) {
        k2 ^= (b as u64) << ((i-8)*8);
    }
    for (i,&b) in tail.iter().enumerate().take(8) {
        k1 ^= (b as u64) << (i*8);
    }
    if tail.len() > 8 {
        h2 ^= k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1);
    }
    if !tail.is_empty() {
        h1 ^= k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2);
    }

    h1 ^= data.len() as u64;
    h2 ^= data.len() as u64;
    h1 = h1.wrapping_add(h2);
    fmix64(h1)
}

/** Seeded FNV-1a over a byte string */
pub fn fnv1a_64(data:&[u8], seed:u64) -> u64 {
    const OFFSET_BASIS : u64 = 0xcbf29ce484222325;
    const PRIME : u64 = 0x100000001b3;
    let mut hash = OFFSET_BASIS ^ seed;
    for &b in data {
        hash ^= b as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/** Keyed SipHash13 fingerprint of any `Hash` value */
pub fn sip_fingerprint<K:Hash+?Sized>(key:&HasherKey, k:&K) -> u64 {
    let mut h = SipHasher13::new_with_key(key);
    k.hash(&mut h);
    h.finish128().h1
}
