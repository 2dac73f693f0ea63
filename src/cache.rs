//! Bounded, single-flight memoization for the pure engine functions.
//!
//! Identical parameter tuples recur constantly across redraws, so the
//! expensive transforms are worth caching. The cache here is explicit
//! and bounded (LRU eviction) rather than an unbounded process-wide
//! global, and it guarantees single-flight per key: concurrent requests
//! for the same key share one computation instead of duplicating it.

use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use ndarray::Array2;
use num_complex::Complex64;
use once_cell::sync::{Lazy, OnceCell};

use crate::diffraction::bessel::BesselOrderTable;
use crate::fourier::resample::{
    fourier_resample_unchecked, validate_resample_args, ResampleError,
};

/// Bounded LRU memo with single-flight computation per key.
///
/// Entries hold an `Arc<OnceCell<..>>`: the map lock is released before
/// the value is computed, and `OnceCell::get_or_init` blocks any
/// concurrent caller with the same key until the first computation
/// finishes. Evicting a key mid-computation is harmless; in-flight
/// callers keep their own `Arc`.
pub struct Memo<K, V> {
    capacity: usize,
    inner: Mutex<MemoInner<K, V>>,
}

struct MemoInner<K, V> {
    map: HashMap<K, Arc<OnceCell<Arc<V>>>>,
    order: VecDeque<K>,
}

impl<K: Eq + Hash + Clone, V> Memo<K, V> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "memo capacity must be positive");
        Self {
            capacity,
            inner: Mutex::new(MemoInner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Fetch the cached value for `key`, computing it with `f` on a miss.
    pub fn get_or_compute(&self, key: K, f: impl FnOnce() -> V) -> Arc<V> {
        let cell = {
            let mut inner = self.inner.lock().expect("memo lock poisoned");
            // refresh recency
            if let Some(pos) = inner.order.iter().position(|k| *k == key) {
                inner.order.remove(pos);
            }
            inner.order.push_back(key.clone());
            let cell = inner
                .map
                .entry(key)
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone();
            while inner.map.len() > self.capacity {
                if let Some(old) = inner.order.pop_front() {
                    inner.map.remove(&old);
                } else {
                    break;
                }
            }
            cell
        };
        let hit = cell.get().is_some();
        let value = cell.get_or_init(|| Arc::new(f())).clone();
        log::debug!(
            "memo {}: {} entries",
            if hit { "hit" } else { "miss" },
            self.len()
        );
        value
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("memo lock poisoned").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hashable, comparable key wrapper for f64 arguments (bit pattern).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct F64Key(u64);

impl From<f64> for F64Key {
    fn from(v: f64) -> Self {
        Self(v.to_bits())
    }
}

/// Content digest of an image, for content-addressed cache keys.
fn image_digest(image: &Array2<f64>) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    image.dim().hash(&mut hasher);
    for v in image.iter() {
        v.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

type ResampleKey = (u64, (usize, usize), F64Key, (F64Key, F64Key), (usize, usize));

static BESSEL_TABLES: Lazy<Memo<F64Key, BesselOrderTable>> = Lazy::new(|| Memo::new(32));
static RESAMPLES: Lazy<Memo<ResampleKey, Array2<Complex64>>> = Lazy::new(|| Memo::new(16));

/// Cached [`BesselOrderTable::build`].
pub fn bessel_table_cached(max_arg: f64) -> Arc<BesselOrderTable> {
    BESSEL_TABLES.get_or_compute(max_arg.into(), || BesselOrderTable::build(max_arg))
}

/// Cached [`crate::fourier::fourier_resample`], keyed by a content digest
/// of the image plus the full scalar argument tuple.
pub fn fourier_resample_cached(
    image: &Array2<f64>,
    pixel_size: f64,
    cutoff_res: (f64, f64),
    output_size: (usize, usize),
) -> Result<Arc<Array2<Complex64>>, ResampleError> {
    validate_resample_args(image.dim(), pixel_size, cutoff_res, output_size)?;
    let key: ResampleKey = (
        image_digest(image),
        image.dim(),
        pixel_size.into(),
        (cutoff_res.0.into(), cutoff_res.1.into()),
        output_size,
    );
    Ok(RESAMPLES.get_or_compute(key, || {
        fourier_resample_unchecked(image, pixel_size, cutoff_res, output_size)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn second_lookup_shares_the_value() {
        let memo: Memo<u32, Vec<u32>> = Memo::new(4);
        let calls = AtomicUsize::new(0);
        let a = memo.get_or_compute(1, || {
            calls.fetch_add(1, Ordering::SeqCst);
            vec![1, 2, 3]
        });
        let b = memo.get_or_compute(1, || {
            calls.fetch_add(1, Ordering::SeqCst);
            vec![9, 9, 9]
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn lru_eviction_is_bounded() {
        let memo: Memo<u32, u32> = Memo::new(2);
        memo.get_or_compute(1, || 1);
        memo.get_or_compute(2, || 2);
        memo.get_or_compute(3, || 3);
        assert_eq!(memo.len(), 2);
        // key 1 was the least recently used; recomputing it counts a miss
        let calls = AtomicUsize::new(0);
        memo.get_or_compute(1, || {
            calls.fetch_add(1, Ordering::SeqCst);
            1
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn recency_refresh_protects_hot_keys() {
        let memo: Memo<u32, u32> = Memo::new(2);
        memo.get_or_compute(1, || 1);
        memo.get_or_compute(2, || 2);
        memo.get_or_compute(1, || 1); // touch 1
        memo.get_or_compute(3, || 3); // evicts 2, not 1
        let calls = AtomicUsize::new(0);
        memo.get_or_compute(1, || {
            calls.fetch_add(1, Ordering::SeqCst);
            1
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn concurrent_requests_compute_once() {
        use std::sync::Barrier;
        let memo: Arc<Memo<u32, u64>> = Arc::new(Memo::new(4));
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let memo = memo.clone();
                let calls = calls.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    *memo.get_or_compute(7, || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(20));
                        123
                    })
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), 123);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn resample_cache_round_trips() {
        let image = Array2::from_shape_fn((8, 8), |(i, j)| (i + j) as f64);
        let a = fourier_resample_cached(&image, 1.0, (2.0, 2.0), (8, 8)).unwrap();
        let b = fourier_resample_cached(&image, 1.0, (2.0, 2.0), (8, 8)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let direct = crate::fourier::fourier_resample(&image, 1.0, (2.0, 2.0), (8, 8)).unwrap();
        assert_eq!(*a, direct);
    }

    #[test]
    fn bessel_table_cache_matches_direct_build() {
        let cached = bessel_table_cached(10.0);
        let direct = BesselOrderTable::build(10.0);
        assert_eq!(*cached, direct);
    }
}
