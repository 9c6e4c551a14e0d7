//! Progress reporting hook for chunking runs.

/// Receives units of completed work. Every strategy ticks once per finished document.
///
/// Implementations must not block; they may be called from any thread a
/// chunker runs on.
pub trait ProgressTicker: Send + Sync {
    fn tick(&self, n: usize);
}

impl<F> ProgressTicker for F
where
    F: Fn(usize) + Send + Sync,
{
    fn tick(&self, n: usize) {
        self(n)
    }
}

/// Ticker that discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressTicker for NoProgress {
    fn tick(&self, _n: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_closure_ticker() {
        let total = AtomicUsize::new(0);
        let ticker = |n: usize| {
            total.fetch_add(n, Ordering::Relaxed);
        };
        ticker.tick(2);
        ProgressTicker::tick(&ticker, 3);
        assert_eq!(total.load(Ordering::Relaxed), 5);

        NoProgress.tick(10);
    }
}
