use core::{
  hash::{Hash, Hasher},
  marker::PhantomData,
};
use std::vec::Vec;

use siphasher::sip::SipHasher13;

use crate::Error;

const KEY: u64 = 0x6a09_e667_f3bc_c908;

/// A bloom filter over a fixed number of bits.
///
/// [`contains`](BloomFilter::contains) never reports a false negative: `false`
/// means the item was definitely never inserted, `true` means it possibly was.
/// Items cannot be removed.
///
/// ## Example
///
/// ```
/// use probab::BloomFilter;
///
/// let mut filter = BloomFilter::new(1024, 3).unwrap();
/// filter.insert("foo");
/// filter.insert("bar");
///
/// assert!(filter.contains("foo"));
/// assert!(filter.contains("bar"));
/// assert_eq!(filter.contains_ratio("foo"), 1.0);
/// ```
pub struct BloomFilter<T: ?Sized> {
  data: Vec<u8>,
  bits: u64,
  hashes: u16,
  _m: PhantomData<fn(&T)>,
}

impl<T: ?Sized> Clone for BloomFilter<T> {
  fn clone(&self) -> Self {
    Self {
      data: self.data.clone(),
      bits: self.bits,
      hashes: self.hashes,
      _m: PhantomData,
    }
  }
}

impl<T: ?Sized> core::fmt::Debug for BloomFilter<T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("BloomFilter")
      .field("bits", &self.bits)
      .field("hashes", &self.hashes)
      .field("ones", &self.count_ones())
      .finish()
  }
}

impl<T: ?Sized> BloomFilter<T> {
  /// Creates an empty filter of `bits` bits probed by `hashes` hash functions.
  ///
  /// Fails if either dimension is zero or the bit array cannot be allocated.
  pub fn new(bits: u64, hashes: u16) -> Result<Self, Error> {
    if bits == 0 || hashes == 0 {
      return Err(Error::InvalidDimensions {
        width: bits,
        depth: hashes,
      });
    }

    let bytes = usize::try_from(bits.div_ceil(8)).map_err(|_| Error::InvalidDimensions {
      width: bits,
      depth: hashes,
    })?;
    let mut data = Vec::new();
    data.try_reserve_exact(bytes)?;
    data.resize(bytes, 0);
    Ok(Self {
      data,
      bits,
      hashes,
      _m: PhantomData,
    })
  }

  /// Returns the number of bits.
  #[inline]
  pub const fn bits(&self) -> u64 {
    self.bits
  }

  /// Returns the number of hash functions.
  #[inline]
  pub const fn hashes(&self) -> u16 {
    self.hashes
  }

  /// Returns the number of bits set.
  #[inline]
  pub fn count_ones(&self) -> u64 {
    self.data.iter().map(|b| u64::from(b.count_ones())).sum()
  }

  /// Resets every bit.
  #[inline]
  pub fn clear(&mut self) {
    self.data.fill(0);
  }

  #[inline]
  fn set_bit(&mut self, idx: u64) {
    self.data[(idx / 8) as usize] |= 1u8 << (7 - idx % 8);
  }

  #[inline]
  fn get_bit(&self, idx: u64) -> bool {
    self.data[(idx / 8) as usize] & (1u8 << (7 - idx % 8)) != 0
  }
}

impl<T: ?Sized + Hash> BloomFilter<T> {
  #[inline]
  fn index(&self, item: &T, i: u16) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(KEY, u64::from(i));
    item.hash(&mut hasher);
    hasher.finish() % self.bits
  }

  /// Records `item`.
  pub fn insert(&mut self, item: &T) {
    for i in 0..self.hashes {
      let idx = self.index(item, i);
      self.set_bit(idx);
    }
  }

  /// Returns `false` if `item` was definitely never inserted.
  pub fn contains(&self, item: &T) -> bool {
    (0..self.hashes).all(|i| self.get_bit(self.index(item, i)))
  }

  /// Returns the fraction, in `[0, 1]`, of the bits probed for `item` that are set.
  ///
  /// `1.0` is the same answer as [`contains`](BloomFilter::contains) returning `true`.
  pub fn contains_ratio(&self, item: &T) -> f64 {
    let set = (0..self.hashes)
      .filter(|&i| self.get_bit(self.index(item, i)))
      .count();
    set as f64 / f64::from(self.hashes)
  }
}
