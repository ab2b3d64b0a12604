use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

///
/// CacheMode
///
/// Retention policy for a cached item. `TimeSpan` intervals are seconds;
/// `RepeatedRequestLimit` intervals count reads.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CacheMode {
    None,
    #[default]
    Permanent,
    TimeSpan,
    RepeatedRequestLimit,
}

///
/// CacheItem
///
/// A value plus the bookkeeping its cache mode needs to decide expiry.
///

#[derive(Debug)]
pub struct CacheItem<T> {
    item: T,
    mode: CacheMode,
    interval: f64,
    calls: AtomicU64,
    timestamp: Instant,
}

impl<T> CacheItem<T> {
    /// Wrap a value. A non-positive (or missing) interval means `Permanent`.
    pub fn new(item: T, mode: CacheMode, interval: Option<f64>) -> Self {
        let interval = interval.unwrap_or(0.0);
        let mode = if interval > 0.0 {
            mode
        } else {
            CacheMode::Permanent
        };

        Self {
            item,
            mode,
            interval,
            calls: AtomicU64::new(0),
            timestamp: Instant::now(),
        }
    }

    pub fn permanent(item: T) -> Self {
        Self::new(item, CacheMode::Permanent, None)
    }

    /// Read the value; every read counts as a call.
    pub fn item(&self) -> &T {
        self.calls.fetch_add(1, Ordering::Relaxed);
        &self.item
    }

    #[must_use]
    pub const fn mode(&self) -> CacheMode {
        self.mode
    }

    #[must_use]
    pub const fn interval(&self) -> f64 {
        self.interval
    }

    #[must_use]
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    #[must_use]
    pub const fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Reset the call counter and the timestamp.
    pub fn renew_intervals(&mut self) {
        *self.calls.get_mut() = 0;
        self.timestamp = Instant::now();
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.mode {
            CacheMode::None => true,
            CacheMode::Permanent => false,
            CacheMode::TimeSpan => Duration::try_from_secs_f64(self.interval)
                .is_ok_and(|span| now.saturating_duration_since(self.timestamp) >= span),
            CacheMode::RepeatedRequestLimit => self.call_count() as f64 >= self.interval,
        }
    }
}
