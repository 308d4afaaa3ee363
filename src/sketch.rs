use core::{
  hash::{Hash, Hasher},
  marker::PhantomData,
};
use std::vec::Vec;

use siphasher::sip::SipHasher13;

use crate::Error;

const KEY: u64 = 0xbb67_ae85_84ca_a73b;

/// A count-min sketch: `depth` rows of `width` counters, one hash function per row.
///
/// [`count`](CountMinSketch::count) never underestimates how many times an item
/// was inserted. It overestimates when other items collide with it on every row.
///
/// ## Example
///
/// ```
/// use probab::CountMinSketch;
///
/// let mut sketch = CountMinSketch::new(64, 4).unwrap();
/// sketch.insert("apple");
/// sketch.insert("apple");
/// sketch.insert_n("pear", 5);
///
/// assert!(sketch.count("apple") >= 2);
/// assert!(sketch.count("pear") >= 5);
/// ```
pub struct CountMinSketch<T: ?Sized> {
  counters: Vec<u64>,
  width: u64,
  depth: u16,
  _m: PhantomData<fn(&T)>,
}

impl<T: ?Sized> Clone for CountMinSketch<T> {
  fn clone(&self) -> Self {
    Self {
      counters: self.counters.clone(),
      width: self.width,
      depth: self.depth,
      _m: PhantomData,
    }
  }
}

impl<T: ?Sized> core::fmt::Debug for CountMinSketch<T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("CountMinSketch")
      .field("width", &self.width)
      .field("depth", &self.depth)
      .finish()
  }
}

impl<T: ?Sized> CountMinSketch<T> {
  /// Creates a sketch with every counter at zero.
  ///
  /// Fails if either dimension is zero or the counters cannot be allocated.
  pub fn new(width: u64, depth: u16) -> Result<Self, Error> {
    if width == 0 || depth == 0 {
      return Err(Error::InvalidDimensions { width, depth });
    }

    let cells = width
      .checked_mul(u64::from(depth))
      .and_then(|cells| usize::try_from(cells).ok())
      .ok_or(Error::InvalidDimensions { width, depth })?;
    let mut counters = Vec::new();
    counters.try_reserve_exact(cells)?;
    counters.resize(cells, 0);
    Ok(Self {
      counters,
      width,
      depth,
      _m: PhantomData,
    })
  }

  /// Returns the number of counters per row.
  #[inline]
  pub const fn width(&self) -> u64 {
    self.width
  }

  /// Returns the number of rows.
  #[inline]
  pub const fn depth(&self) -> u16 {
    self.depth
  }

  /// Resets every counter.
  #[inline]
  pub fn clear(&mut self) {
    self.counters.fill(0);
  }
}

impl<T: ?Sized + Hash> CountMinSketch<T> {
  /// Offset of the counter `item` maps to on `row`.
  #[inline]
  fn cell(&self, item: &T, row: u16) -> usize {
    let mut hasher = SipHasher13::new_with_keys(KEY, u64::from(row));
    item.hash(&mut hasher);
    let col = hasher.finish() % self.width;
    (u64::from(row) * self.width + col) as usize
  }

  /// Counts one occurrence of `item`.
  #[inline]
  pub fn insert(&mut self, item: &T) {
    self.insert_n(item, 1);
  }

  /// Counts `n` occurrences of `item`. Counters saturate at `u64::MAX`.
  pub fn insert_n(&mut self, item: &T, n: u64) {
    for row in 0..self.depth {
      let cell = self.cell(item, row);
      self.counters[cell] = self.counters[cell].saturating_add(n);
    }
  }

  /// Returns the estimated number of occurrences of `item`.
  pub fn count(&self, item: &T) -> u64 {
    (0..self.depth)
      .map(|row| self.counters[self.cell(item, row)])
      .min()
      .unwrap_or(0)
  }
}
