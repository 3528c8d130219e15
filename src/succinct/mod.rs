/**
 * @file mod.rs
 * @author The bbhash developers
 * @copyright 2026 The bbhash developers
 *
 * Succinct bit storage: a fixed-capacity bit vector and a
 * checkpointed rank index over it.
 */
pub mod bitvec;
pub mod rank;

pub use bitvec::BitVector;
pub use rank::{RankIndex,BLOCK_WORDS};
