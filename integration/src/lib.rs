use probab::{LevelPolicy, SkipList};

/// Only used for testing
pub fn key(i: usize) -> String {
  format!("{:05}", i)
}

/// Only used for testing
pub fn scatter(i: u64, n: u64) -> u64 {
  i.wrapping_mul(0x9e37_79b9) % n
}

/// Only used for testing
///
/// Panics unless every level is sorted, no level is longer than the one below
/// and the top level is not empty.
pub fn assert_levels<T: Ord, P: LevelPolicy>(l: &SkipList<T, P>) {
  let lens = l.level_lens();
  assert_eq!(lens.len(), l.height());
  assert!(lens.windows(2).all(|w| w[0] >= w[1]), "{lens:?}");
  assert!(lens.len() == 1 || lens[lens.len() - 1] > 0, "{lens:?}");
  for level in 0..l.height() {
    let values = l.level(level).unwrap().collect::<Vec<_>>();
    assert_eq!(values.len(), lens[level]);
    assert!(values.windows(2).all(|w| w[0] <= w[1]), "level {level}");
  }
}
