use std::collections::BTreeMap;

use probab::{BloomFilter, CountMinSketch, Halving, Options, SkipList};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
  Insert(u16),
  Erase(u16),
}

fn arb_op() -> impl Strategy<Value = Op> {
  prop_oneof![
    3 => (0u16..64).prop_map(Op::Insert),
    2 => (0u16..64).prop_map(Op::Erase),
  ]
}

/// Applies `ops` to both the skiplist and a multiset model, comparing as it goes.
fn replay<P: probab::LevelPolicy>(l: &mut SkipList<u16, P>, ops: &[Op]) {
  let mut model = BTreeMap::<u16, usize>::new();
  for op in ops {
    match *op {
      Op::Insert(v) => {
        l.insert(v).unwrap();
        *model.entry(v).or_default() += 1;
      }
      Op::Erase(v) => {
        let expected = match model.get_mut(&v) {
          Some(n) => {
            *n -= 1;
            if *n == 0 {
              model.remove(&v);
            }
            true
          }
          None => false,
        };
        assert_eq!(l.erase(&v), expected);
      }
    }

    assert_eq!(l.len(), model.values().sum::<usize>());
    let lens = l.level_lens();
    assert!(lens.windows(2).all(|w| w[0] >= w[1]));
    assert!(lens.len() == 1 || lens[lens.len() - 1] > 0);
  }

  let expected = model
    .iter()
    .flat_map(|(&v, &n)| std::iter::repeat(v).take(n))
    .collect::<Vec<_>>();
  assert_eq!(l.iter().copied().collect::<Vec<_>>(), expected);
  for v in 0..64 {
    assert_eq!(l.contains(&v), model.contains_key(&v));
  }
}

proptest! {
  #[test]
  fn prop_from_sorted_keeps_input(mut input in prop::collection::vec(any::<u32>(), 0..300)) {
    input.sort_unstable();
    let l = SkipList::from_sorted(input.iter().copied()).unwrap();
    prop_assert_eq!(l.len(), input.len());
    prop_assert_eq!(l.iter().copied().collect::<Vec<_>>(), input.clone());
    for v in &input {
      prop_assert!(l.contains(v));
    }
  }

  #[test]
  fn prop_matches_multiset(seed in any::<u64>(), ops in prop::collection::vec(arb_op(), 0..400)) {
    let mut l = SkipList::with_options(Options::new().with_seed(seed)).unwrap();
    replay(&mut l, &ops);
  }

  #[test]
  fn prop_matches_multiset_halving(ops in prop::collection::vec(arb_op(), 0..400)) {
    let mut l = SkipList::with_policy(Options::new(), Halving::new()).unwrap();
    replay(&mut l, &ops);
  }

  #[test]
  fn prop_erase_absent_is_noop(values in prop::collection::vec(0u32..1000, 0..200), probe in 1000u32..2000) {
    let mut l = SkipList::with_options(Options::new().with_seed(5)).unwrap();
    for v in values {
      l.insert(v).unwrap();
    }
    let shape = l.to_string();
    prop_assert!(!l.erase(&probe));
    prop_assert_eq!(l.to_string(), shape);
  }

  #[test]
  fn prop_minimum_churn(values in prop::collection::vec(1u32..1000, 1..200), rounds in 1usize..20) {
    let mut l = SkipList::with_options(Options::new().with_seed(17)).unwrap();
    for v in values {
      l.insert(v).unwrap();
    }
    let before = l.iter().copied().collect::<Vec<_>>();
    for _ in 0..rounds {
      l.insert(0).unwrap();
      prop_assert_eq!(l.first(), Some(&0));
      prop_assert!(l.erase(&0));
    }
    prop_assert_eq!(l.iter().copied().collect::<Vec<_>>(), before);
  }

  #[test]
  fn prop_bloom_no_false_negatives(items in prop::collection::vec(".{0,16}", 0..100)) {
    let mut filter = BloomFilter::<str>::new(2048, 4).unwrap();
    for item in &items {
      filter.insert(item);
    }
    for item in &items {
      prop_assert!(filter.contains(item));
    }
  }

  #[test]
  fn prop_sketch_never_underestimates(items in prop::collection::vec(0u8..32, 0..500)) {
    let mut sketch = CountMinSketch::<u8>::new(16, 3).unwrap();
    let mut model = BTreeMap::<u8, u64>::new();
    for item in &items {
      sketch.insert(item);
      *model.entry(*item).or_default() += 1;
    }
    for (item, n) in model {
      prop_assert!(sketch.count(&item) >= n);
    }
  }
}
