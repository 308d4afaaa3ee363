use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{Options, GROW_THRESHOLD};

/// A read-only view over the number of elements stored on each level of a
/// skiplist, bottom level first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile<'a> {
  lens: &'a [usize],
  max_height: usize,
}

impl<'a> Profile<'a> {
  #[inline]
  pub(crate) const fn new(lens: &'a [usize], max_height: usize) -> Self {
    Self { lens, max_height }
  }

  /// Returns the number of levels currently materialized.
  #[inline]
  pub const fn height(&self) -> usize {
    self.lens.len()
  }

  /// Returns the maximum number of levels the skiplist may grow to.
  #[inline]
  pub const fn max_height(&self) -> usize {
    self.max_height
  }

  /// Returns the number of elements on `level`, `0` if the level does not exist.
  #[inline]
  pub fn level_len(&self, level: usize) -> usize {
    self.lens.get(level).copied().unwrap_or(0)
  }

  /// Returns the number of elements on the top level.
  #[inline]
  pub fn top_len(&self) -> usize {
    self.lens.last().copied().unwrap_or(0)
  }

  /// Returns `true` if another level may still be added.
  #[inline]
  pub const fn can_grow(&self) -> bool {
    self.lens.len() < self.max_height
  }
}

/// Decides the shape of a skiplist.
///
/// A freshly inserted element always lands on level 0. The skiplist then asks
/// [`promote`](LevelPolicy::promote) for level 1, 2, ... and stops at the first
/// refusal or at the current top level. After each insertion it asks
/// [`grow`](LevelPolicy::grow) whether to sample a new level on top of the
/// current one, taking every other element of the top level.
pub trait LevelPolicy {
  /// Returns `true` if the element just inserted should also appear on `level`.
  fn promote(&mut self, level: usize, profile: Profile<'_>) -> bool;

  /// Returns `true` if a new top level should be sampled from the current one.
  fn grow(&mut self, profile: Profile<'_>) -> bool;

  /// Returns the number of levels a new element occupies, in `1..=profile.height()`.
  fn height(&mut self, profile: Profile<'_>) -> usize {
    let mut h = 1;
    while h < profile.height() && self.promote(h, profile) {
      h += 1;
    }
    h
  }
}

impl<P: LevelPolicy + ?Sized> LevelPolicy for &mut P {
  #[inline]
  fn promote(&mut self, level: usize, profile: Profile<'_>) -> bool {
    (**self).promote(level, profile)
  }

  #[inline]
  fn grow(&mut self, profile: Profile<'_>) -> bool {
    (**self).grow(profile)
  }
}

/// Promotes with a fixed probability per level, which yields geometrically
/// distributed element heights.
#[derive(Debug, Clone)]
pub struct Geometric {
  numerator: u32,
  denominator: u32,
  threshold: usize,
  rng: SmallRng,
}

impl Default for Geometric {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Geometric {
  /// Promotes with probability `1 / 2` and grows when the top level holds `4` elements,
  /// seeded from the operating system.
  #[inline]
  pub fn new() -> Self {
    Self::from_rng(SmallRng::from_os_rng())
  }

  /// Like [`Geometric::new`] but with a fixed seed, for reproducible shapes.
  #[inline]
  pub fn with_seed(seed: u64) -> Self {
    Self::from_rng(SmallRng::seed_from_u64(seed))
  }

  /// Builds the policy described by `opts`.
  pub fn from_options(opts: &Options) -> Self {
    let (numerator, denominator) = opts.promote_ratio();
    let policy = match opts.seed() {
      Some(seed) => Self::with_seed(seed),
      None => Self::new(),
    };
    policy
      .with_ratio(numerator, denominator)
      .with_threshold(opts.grow_threshold() as usize)
  }

  #[inline]
  fn from_rng(rng: SmallRng) -> Self {
    Self {
      numerator: 1,
      denominator: 2,
      threshold: GROW_THRESHOLD as usize,
      rng,
    }
  }

  /// Sets the promotion probability to `numerator / denominator`.
  ///
  /// ## Panics
  ///
  /// Panics if `denominator` is zero or `numerator > denominator`.
  #[inline]
  pub fn with_ratio(mut self, numerator: u32, denominator: u32) -> Self {
    assert!(
      denominator != 0 && numerator <= denominator,
      "promote ratio must lie in [0, 1]"
    );
    self.numerator = numerator;
    self.denominator = denominator;
    self
  }

  /// Sets the growth threshold of the top level, clamped to at least `2`.
  #[inline]
  pub fn with_threshold(mut self, threshold: usize) -> Self {
    self.threshold = threshold.max(2);
    self
  }
}

impl LevelPolicy for Geometric {
  #[inline]
  fn promote(&mut self, _level: usize, _profile: Profile<'_>) -> bool {
    self.rng.random_ratio(self.numerator, self.denominator)
  }

  #[inline]
  fn grow(&mut self, profile: Profile<'_>) -> bool {
    profile.can_grow() && profile.top_len() >= self.threshold
  }
}

/// Never promotes on insertion. The skiplist only gains levels by sampling
/// every other element of a top level that reached the threshold, so its
/// shape depends on the insertion order alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Halving {
  threshold: usize,
}

impl Default for Halving {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl Halving {
  /// Grows when the top level holds `4` elements.
  #[inline]
  pub const fn new() -> Self {
    Self {
      threshold: GROW_THRESHOLD as usize,
    }
  }

  /// Sets the growth threshold of the top level, clamped to at least `2`.
  #[inline]
  pub const fn with_threshold(mut self, threshold: usize) -> Self {
    self.threshold = if threshold < 2 { 2 } else { threshold };
    self
  }
}

impl LevelPolicy for Halving {
  #[inline]
  fn promote(&mut self, _level: usize, _profile: Profile<'_>) -> bool {
    false
  }

  #[inline]
  fn grow(&mut self, profile: Profile<'_>) -> bool {
    profile.can_grow() && profile.top_len() >= self.threshold
  }
}
