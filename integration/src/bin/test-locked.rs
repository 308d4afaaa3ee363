use integration::{assert_levels, key};
use parking_lot::Mutex;
use probab::*;
use std::sync::Arc;

fn main() {
  const N: usize = 1000;
  let l = Arc::new(Mutex::new(SkipList::<String>::new()));
  let handles = (0..N)
    .map(|i| {
      let l = l.clone();
      std::thread::spawn(move || {
        l.lock().insert(key(i)).unwrap();
      })
    })
    .collect::<Vec<_>>();
  for h in handles {
    h.join().unwrap();
  }

  let l = l.lock();
  assert_eq!(N, l.len());
  assert_levels(&*l);
  for i in 0..N {
    assert_eq!(l.get(key(i).as_str()), Some(&key(i)), "broken: {i}");
  }
}
