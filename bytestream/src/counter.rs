//! Reporting sinks for stream statistics.

use std::sync::atomic::{AtomicI64, Ordering};

/// Receives the number of bytes a stream read between open and close.
pub trait BytesReadSink: Send + Sync {
    fn add(&self, bytes: u64);
}

/// Named monotonically updated counter, shareable across threads.
#[derive(Debug)]
pub struct Counter {
    name: String,
    value: AtomicI64,
}

impl Counter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AtomicI64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn update(&self, delta: i64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn set(&self, value: i64) {
        self.value.store(value, Ordering::Relaxed);
    }
}

impl BytesReadSink for Counter {
    fn add(&self, bytes: u64) {
        self.update(i64::try_from(bytes).unwrap_or(i64::MAX));
    }
}

/// Sink that drops every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl BytesReadSink for NullSink {
    fn add(&self, _bytes: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counter_accumulates_from_threads() {
        let counter = Arc::new(Counter::new("BytesRead"));
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..100 {
                        c.add(10);
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        assert_eq!(counter.value(), 4000);
        assert_eq!(counter.name(), "BytesRead");
        counter.set(0);
        assert_eq!(counter.value(), 0);
    }
}
