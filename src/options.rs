use crate::{GROW_THRESHOLD, MAX_HEIGHT};

/// Options for [`SkipList`](crate::SkipList).
#[viewit::viewit(vis_all = "pub(super)", getters(skip), setters(skip))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Options {
  capacity: Option<u32>,
  max_height: u8,
  promote_ratio: (u32, u32),
  grow_threshold: u32,
  seed: Option<u64>,
}

impl Default for Options {
  #[inline]
  fn default() -> Options {
    Options::new()
  }
}

impl Options {
  /// Creates a new set of options with the default values.
  #[inline]
  pub const fn new() -> Self {
    Self {
      capacity: None,
      max_height: MAX_HEIGHT,
      promote_ratio: (1, 2),
      grow_threshold: GROW_THRESHOLD,
      seed: None,
    }
  }

  /// Sets the capacity of the node arena, counted in nodes.
  ///
  /// Every level of every element takes one node, and every level owns one
  /// sentinel head node. An insertion that would need more nodes than the
  /// capacity fails with [`Error::Full`](crate::Error::Full).
  ///
  /// By default the arena is only bounded by the global allocator.
  ///
  /// ## Example
  ///
  /// ```
  /// use probab::Options;
  ///
  /// let options = Options::new().with_capacity(1024);
  /// assert_eq!(options.capacity(), Some(1024));
  /// ```
  #[inline]
  pub const fn with_capacity(mut self, capacity: u32) -> Self {
    self.capacity = Some(capacity);
    self
  }

  /// Sets the maximum height.
  ///
  /// Default is `20`. The minimum height is `1`, smaller values are clamped.
  ///
  /// ## Example
  ///
  /// ```
  /// use probab::Options;
  ///
  /// let options = Options::new().with_max_height(5);
  /// assert_eq!(options.max_height(), 5);
  /// ```
  #[inline]
  pub const fn with_max_height(mut self, height: u8) -> Self {
    self.max_height = if height == 0 { 1 } else { height };
    self
  }

  /// Sets the probability, as `numerator / denominator`, that a freshly inserted
  /// element is promoted one more level.
  ///
  /// Default is `1 / 2`.
  ///
  /// ## Panics
  ///
  /// Panics if `denominator` is zero or `numerator > denominator`.
  ///
  /// ## Example
  ///
  /// ```
  /// use probab::Options;
  ///
  /// let options = Options::new().with_promote_ratio(1, 3);
  /// assert_eq!(options.promote_ratio(), (1, 3));
  /// ```
  #[inline]
  pub const fn with_promote_ratio(mut self, numerator: u32, denominator: u32) -> Self {
    assert!(
      denominator != 0 && numerator <= denominator,
      "promote ratio must lie in [0, 1]"
    );
    self.promote_ratio = (numerator, denominator);
    self
  }

  /// Sets the length the top level has to reach before a new level is
  /// sampled on top of it.
  ///
  /// Default is `4`. The minimum is `2`, smaller values are clamped.
  ///
  /// ## Example
  ///
  /// ```
  /// use probab::Options;
  ///
  /// let options = Options::new().with_grow_threshold(8);
  /// assert_eq!(options.grow_threshold(), 8);
  /// ```
  #[inline]
  pub const fn with_grow_threshold(mut self, threshold: u32) -> Self {
    self.grow_threshold = if threshold < 2 { 2 } else { threshold };
    self
  }

  /// Seeds the random source of the default leveling policy, which makes the
  /// shape of the skiplist reproducible.
  ///
  /// By default the policy is seeded from the operating system.
  ///
  /// ## Example
  ///
  /// ```
  /// use probab::Options;
  ///
  /// let options = Options::new().with_seed(42);
  /// assert_eq!(options.seed(), Some(42));
  /// ```
  #[inline]
  pub const fn with_seed(mut self, seed: u64) -> Self {
    self.seed = Some(seed);
    self
  }

  /// Returns the capacity of the node arena, if bounded.
  #[inline]
  pub const fn capacity(&self) -> Option<u32> {
    self.capacity
  }

  /// Returns the maximum height.
  #[inline]
  pub const fn max_height(&self) -> u8 {
    self.max_height
  }

  /// Returns the promotion probability as `(numerator, denominator)`.
  #[inline]
  pub const fn promote_ratio(&self) -> (u32, u32) {
    self.promote_ratio
  }

  /// Returns the growth threshold of the top level.
  #[inline]
  pub const fn grow_threshold(&self) -> u32 {
    self.grow_threshold
  }

  /// Returns the seed of the default leveling policy, if any.
  #[inline]
  pub const fn seed(&self) -> Option<u64> {
    self.seed
  }
}
