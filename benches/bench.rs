use criterion::*;
use parking_lot::Mutex;
use probab::*;
use rand::prelude::*;
use std::{
  collections::BTreeSet,
  sync::{atomic::*, *},
  thread,
};

const N: u64 = 100_000;

fn filled(n: u64) -> SkipList<u64> {
  let mut l = SkipList::with_options(Options::new().with_seed(42)).unwrap();
  let mut rng = rand::rng();
  for _ in 0..n {
    l.insert(rng.random_range(0..n * 4)).unwrap();
  }
  l
}

fn bench_insert(c: &mut Criterion) {
  let mut group = c.benchmark_group("insert");
  let mut rng = rand::rng();
  let mut l = filled(N);
  group.bench_function("skiplist", |b| {
    b.iter_batched(
      || rng.random_range(0..N * 4),
      |v| l.insert(v).unwrap(),
      BatchSize::SmallInput,
    )
  });

  let mut halving = SkipList::with_policy(Options::new(), Halving::new()).unwrap();
  group.bench_function("skiplist_halving", |b| {
    b.iter_batched(
      || rng.random_range(0..N * 4),
      |v| halving.insert(v).unwrap(),
      BatchSize::SmallInput,
    )
  });

  let mut set = (0..N).map(|_| rng.random_range(0..N * 4)).collect::<BTreeSet<_>>();
  group.bench_function("btreeset", |b| {
    b.iter_batched(
      || rng.random_range(0..N * 4),
      |v| set.insert(v),
      BatchSize::SmallInput,
    )
  });
  group.finish();
}

fn bench_contains(c: &mut Criterion) {
  let l = SkipList::from_sorted(0..N).unwrap();
  let mut rng = rand::rng();
  c.bench_function("contains_from_sorted", |b| {
    b.iter_batched(
      || rng.random_range(0..N * 2),
      |v| black_box(l.contains(&v)),
      BatchSize::SmallInput,
    )
  });

  let l = filled(N);
  c.bench_function("contains_random", |b| {
    b.iter_batched(
      || rng.random_range(0..N * 4),
      |v| black_box(l.contains(&v)),
      BatchSize::SmallInput,
    )
  });
}

fn bench_churn(c: &mut Criterion) {
  let mut l = filled(N);
  let mut rng = rand::rng();
  c.bench_function("erase_insert", |b| {
    b.iter_batched(
      || rng.random_range(0..N * 4),
      |v| {
        if !l.erase(&v) {
          l.insert(v).unwrap();
        }
      },
      BatchSize::SmallInput,
    )
  });
}

fn bench_read_write_locked_frac(b: &mut Bencher<'_>, frac: &u64) {
  let frac = *frac;
  let list = Arc::new(Mutex::new(filled(N / 10)));
  let l = list.clone();
  let stop = Arc::new(AtomicBool::new(false));
  let s = stop.clone();
  let j = thread::spawn(move || {
    let mut rng = rand::rng();
    while !s.load(Ordering::SeqCst) {
      let v = rng.random_range(0..N);
      if frac > rng.random_range(0..11) {
        black_box(l.lock().contains(&v));
      } else {
        l.lock().insert(v).unwrap();
      }
    }
  });
  let mut rng = rand::rng();
  b.iter_batched(
    || (rng.random_range(0..N), frac > rng.random_range(0..11)),
    |(v, read)| {
      if read {
        black_box(list.lock().contains(&v));
      } else {
        list.lock().insert(v).unwrap();
      }
    },
    BatchSize::SmallInput,
  );
  stop.store(true, Ordering::SeqCst);
  j.join().unwrap();
}

fn bench_read_write_locked(c: &mut Criterion) {
  let mut group = c.benchmark_group("locked_skiplist_read_write");
  for i in [0u64, 5, 10] {
    group.bench_with_input(
      BenchmarkId::from_parameter(i),
      &i,
      bench_read_write_locked_frac,
    );
  }
  group.finish();
}

fn bench_filters(c: &mut Criterion) {
  let mut rng = rand::rng();
  let mut filter = BloomFilter::<u64>::new(1 << 20, 7).unwrap();
  let mut sketch = CountMinSketch::<u64>::new(1 << 12, 5).unwrap();
  c.bench_function("bloom_insert_contains", |b| {
    b.iter_batched(
      || rng.random::<u64>(),
      |v| {
        filter.insert(&v);
        black_box(filter.contains(&v))
      },
      BatchSize::SmallInput,
    )
  });
  c.bench_function("sketch_insert_count", |b| {
    b.iter_batched(
      || rng.random_range(0..N),
      |v| {
        sketch.insert(&v);
        black_box(sketch.count(&v))
      },
      BatchSize::SmallInput,
    )
  });
}

criterion_group!(
  benches,
  bench_insert,
  bench_contains,
  bench_churn,
  bench_read_write_locked,
  bench_filters,
);
criterion_main!(benches);
