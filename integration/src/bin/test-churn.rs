use integration::{assert_levels, scatter};
use probab::*;

fn main() {
  {
    const N: u64 = 10_000;
    let mut l = SkipList::with_options(Options::new().with_seed(7)).unwrap();
    for i in 0..N {
      l.insert(scatter(i, N)).unwrap();
    }
    assert_levels(&l);

    // minimum churn
    let before = l.iter().copied().collect::<Vec<_>>();
    for _ in 0..N {
      l.insert(0).unwrap();
      assert!(l.erase(&0));
    }
    assert_eq!(l.iter().copied().collect::<Vec<_>>(), before);
    assert_levels(&l);

    for i in 0..N {
      l.erase(&scatter(i, N));
    }
    assert!(l.is_empty(), "broken: {l:?}");
    assert_eq!(l.height(), 1);
  }

  {
    const N: u64 = 1 << 16;
    let mut l = SkipList::from_sorted(0..N).unwrap();
    assert_eq!(l.height(), 17);
    for i in (0..N).step_by(3) {
      assert!(l.erase(&i), "broken: {i}");
    }
    assert_levels(&l);
    for i in 0..N {
      assert_eq!(l.contains(&i), i % 3 != 0, "broken: {i}");
    }
  }

  {
    let mut l = SkipList::with_options(Options::new().with_capacity(64).with_seed(1)).unwrap();
    let mut i = 0u64;
    while l.insert(i).is_ok() {
      i += 1;
    }
    assert!(l.allocated() <= 64);
    assert_levels(&l);
  }
}
