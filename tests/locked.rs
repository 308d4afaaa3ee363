use std::{sync::Arc, thread};

use parking_lot::Mutex;
use probab::{Options, SkipList};

#[test]
fn concurrent_insert_erase() {
  let list = Arc::new(Mutex::new(
    SkipList::<u32>::with_options(Options::new().with_seed(1)).unwrap(),
  ));

  let handles = (0..4u32)
    .map(|t| {
      let list = list.clone();
      thread::spawn(move || {
        for i in 0..1000 {
          list.lock().insert(t * 1000 + i).unwrap();
        }
        for i in (0..1000).step_by(2) {
          assert!(list.lock().erase(&(t * 1000 + i)));
        }
      })
    })
    .collect::<Vec<_>>();
  for h in handles {
    h.join().unwrap();
  }

  let list = list.lock();
  assert_eq!(list.len(), 2000);
  for t in 0..4u32 {
    for i in 0..1000 {
      assert_eq!(list.contains(&(t * 1000 + i)), i % 2 == 1);
    }
  }
}

#[test]
fn readers_see_sorted_levels() {
  let list = Arc::new(Mutex::new(SkipList::<u64>::new()));

  let writer = {
    let list = list.clone();
    thread::spawn(move || {
      for i in (0..2000u64).rev() {
        list.lock().insert(i).unwrap();
      }
    })
  };

  let readers = (0..2)
    .map(|_| {
      let list = list.clone();
      thread::spawn(move || {
        for _ in 0..50 {
          let l = list.lock();
          for level in 0..l.height() {
            let values = l.level(level).unwrap().copied().collect::<Vec<_>>();
            assert!(values.windows(2).all(|w| w[0] <= w[1]));
          }
        }
      })
    })
    .collect::<Vec<_>>();

  writer.join().unwrap();
  for r in readers {
    r.join().unwrap();
  }
  assert_eq!(list.lock().len(), 2000);
}
