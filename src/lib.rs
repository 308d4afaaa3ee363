#![doc = include_str!("../README.md")]
#![cfg_attr(not(all(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]
#![deny(missing_docs)]
#![allow(clippy::type_complexity)]

#[cfg(not(feature = "std"))]
extern crate alloc as std;

#[cfg(feature = "std")]
extern crate std;

mod arena;
mod node;

mod error;
pub use error::Error;

mod options;
pub use options::Options;

/// Leveling policies deciding how a skiplist grows.
pub mod policy;
pub use policy::{Geometric, Halving, LevelPolicy, Profile};

/// An ordered skiplist with level storage shared through an arena.
pub mod skl;
pub use skl::{Iter, SkipList};

/// A fixed size bloom filter.
pub mod bloom;
pub use bloom::BloomFilter;

/// A fixed size count-min sketch.
pub mod sketch;
pub use sketch::CountMinSketch;

/// The default maximum number of levels of a [`SkipList`].
pub const MAX_HEIGHT: u8 = 20;

/// The default length the top level has to reach before a new level is built on top of it.
pub const GROW_THRESHOLD: u32 = 4;
