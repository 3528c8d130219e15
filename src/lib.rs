/*!
 * Minimal perfect hash functions.
 *
 * This crate provides [`Mphf`], a minimal perfect hash function over a
 * static set of distinct `u64` keys: each of the N keys maps to its own
 * index in `0..N`.  Like a compressed map, it does not store the keys, so
 * it takes only a few bits per key.  The price is that it cannot tell
 * whether a key was in the original set.
 *
 * Keys that start out as strings or other types can be turned into `u64`s
 * with the fingerprint functions in [`mix`].  Fingerprints must be unique;
 * check with [`keys::dedup`] before building.
 *
 * # Construction
 *
 * The construction is BBHash (Limasset et al., 2017).  Keys are hashed into
 * a table of `gamma * N` slots (at least [`MIN_LEVEL_SIZE`]).  Slots hit by
 * exactly one key are marked in a bit vector, and those keys are placed.  The
 * remaining keys go on to a new level with a fresh seed, and so on until every
 * key is placed.
 *
 * A key's index is the number of keys placed by earlier levels plus the rank
 * of its slot in its own level.  Each level keeps a rank checkpoint every 512
 * bits so that rank queries take constant time.
 *
 * `gamma` trades space for speed.  With `gamma = 1.0` the function takes
 * about 3.1 bits per key including checkpoints; with `gamma = 2.0` about 3.7,
 * but construction and queries touch fewer levels.
 *
 * Building is deterministic: the same keys in the same order with the same
 * `gamma` give the same function.
 *
 * # Failure
 *
 * * Duplicate keys can never be placed.  The builder does not detect them
 *   directly; it fails with [`Error::TooManyLevels`] after
 *   [`BuildOptions::max_levels`] levels.
 * * Querying a key that was not in the set returns an arbitrary result:
 *   usually `None`, but sometimes the index of an unrelated key.
 *
 * # Serialization
 *
 * [`Mphf`] implements [`Encode`](bincode::enc::Encode) and
 * [`Decode`](bincode::de::Decode).  The format is fixed little-endian
 * whatever bincode config is used, starting with the magic `BBH1`;
 * [`Mphf::save`] and [`Mphf::load`] read and write it to files.
 * Loading checks the structure thoroughly and rejects bad files with
 * [`Error::BadMagic`], [`Error::Truncated`] or [`Error::Corrupt`].
 */

pub mod succinct;
pub mod mix;
pub mod keys;
mod level;
mod mphf;
mod codec;
mod error;

#[cfg(feature = "cffi")]
pub mod cffi;

pub use level::{Level,INITIAL_SEED};
pub use mphf::{Mphf,BuildOptions,MIN_LEVEL_SIZE};
pub use codec::{MAGIC,STD_BINCODE_CONFIG,serialized_size};
pub use error::Error;
