use std::collections::TryReserveError;

/// Error type for the probab crate.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
  /// Indicates that the arena is full and cannot perform any more
  /// allocations.
  #[error("allocation failed because arena is full (capacity {capacity}, requested {requested})")]
  Full {
    /// The configured capacity of the arena, in nodes.
    capacity: u32,
    /// The number of nodes the operation needed.
    requested: usize,
  },

  /// The global allocator refused to grow the arena.
  #[error(transparent)]
  Alloc(#[from] TryReserveError),

  /// A bloom filter or count-min sketch was requested with a zero sized dimension.
  #[error("invalid dimensions: {width} x {depth}")]
  InvalidDimensions {
    /// Number of bits (bloom filter) or counters per row (count-min sketch).
    width: u64,
    /// Number of hash functions.
    depth: u16,
  },
}
