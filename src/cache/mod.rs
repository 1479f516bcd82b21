//! Single-slot TTL cache with single-flight recompute.

use std::future::Future;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// A cached value with an absolute expiry instant.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    /// An entry is expired once the current time reaches `expires_at`.
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// One process-wide cache slot holding the latest computed value.
///
/// The slot behaves as a last-write-wins register: it is either empty or
/// holds exactly one complete value with its expiry. Time comes from
/// `tokio::time`, so tests can drive expiry with a paused clock.
pub struct CacheSlot<T> {
    slot: Mutex<Option<CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> CacheSlot<T> {
    /// Create an empty slot whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    /// Return the cached value while fresh; otherwise run `compute`, store
    /// the result with a new expiry, and return it.
    ///
    /// The slot lock is held across `compute`, so concurrent callers hitting
    /// a cold or expired slot collapse into one computation (single-flight):
    /// the winner recomputes and stores, waiters then observe the fresh
    /// entry. A failed computation leaves the slot untouched, and dropping
    /// the returned future mid-compute releases the lock without writing.
    pub async fn get_or_compute<F, Fut, E>(&self, compute: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.as_ref() {
            if !entry.is_expired() {
                return Ok(entry.value.clone());
            }
        }

        let value = compute().await?;
        *slot = Some(CacheEntry::new(value.clone(), self.ttl));
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn counted(counter: &AtomicUsize, value: i32) -> Result<i32, String> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }

    #[tokio::test(start_paused = true)]
    async fn serves_cached_value_within_window() {
        let cache = CacheSlot::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_compute(|| counted(&calls, 1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(59)).await;
        let second = cache.get_or_compute(|| counted(&calls, 2)).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn recomputes_exactly_at_expiry_boundary() {
        let cache = CacheSlot::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_compute(|| counted(&calls, 1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(60)).await;
        let second = cache.get_or_compute(|| counted(&calls, 2)).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn error_on_cold_slot_propagates() {
        let cache: CacheSlot<i32> = CacheSlot::new(Duration::from_secs(60));

        let result = cache
            .get_or_compute(|| async { Err::<i32, _>("store offline".to_string()) })
            .await;

        assert_eq!(result.unwrap_err(), "store offline");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_recompute_leaves_slot_untouched() {
        let cache = CacheSlot::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        cache.get_or_compute(|| counted(&calls, 1)).await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;

        let failed = cache
            .get_or_compute(|| async { Err::<i32, _>("boom".to_string()) })
            .await;
        assert!(failed.is_err());

        // The slot was not poisoned: the next successful call recomputes.
        let recovered = cache.get_or_compute(|| counted(&calls, 2)).await.unwrap();
        assert_eq!(recovered, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_caller_mid_compute_writes_nothing() {
        let cache: Arc<CacheSlot<i32>> = Arc::new(CacheSlot::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let parked = {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .get_or_compute(|| async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Ok::<_, String>(1)
                    })
                    .await
            })
        };

        // Let the task enter the computation, then cancel it mid-flight.
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        parked.abort();
        assert!(parked.await.unwrap_err().is_cancelled());

        // Nothing was stored and the lock was released: the next call
        // computes from scratch instead of serving a partial value.
        let value = cache.get_or_compute(|| counted(&calls, 2)).await.unwrap();
        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_misses_collapse_into_one_computation() {
        let cache = Arc::new(CacheSlot::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_compute(|| async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        // Simulate a slow store read while holding the slot.
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, String>(42)
                    })
                    .await
                    .unwrap()
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
