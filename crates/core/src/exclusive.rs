//! Advisory exclusive-access flag.
//!
//! A single atomic flag with non-blocking acquisition. There is no waiter
//! queue, no fairness and no re-entrancy: a holder that tries to acquire again
//! fails like anyone else. There is no blocking acquire.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

/// Non-blocking, non-reentrant exclusive region.
#[derive(Debug, Default)]
pub struct ExclusiveFlag {
    held: AtomicBool,
}

impl ExclusiveFlag {
    pub const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    /// Try to take the flag. Returns `false` if it is already held.
    pub fn try_acquire(&self) -> bool {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Give the flag back.
    ///
    /// Releasing a flag that is not held is a caller bug; it is logged and
    /// otherwise ignored.
    pub fn release(&self) {
        if !self.held.swap(false, Ordering::Release) {
            warn!("released an exclusive flag that was not held");
        }
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Try to take the flag, releasing it when the guard drops.
    pub fn try_guard(&self) -> Option<ExclusiveGuard<'_>> {
        self.try_acquire().then(|| ExclusiveGuard { flag: self })
    }
}

/// Holds an [`ExclusiveFlag`] until dropped.
#[derive(Debug)]
pub struct ExclusiveGuard<'a> {
    flag: &'a ExclusiveFlag,
}

impl Drop for ExclusiveGuard<'_> {
    fn drop(&mut self) {
        self.flag.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_try_acquire_is_exclusive() {
        let flag = ExclusiveFlag::new();
        assert!(flag.try_acquire());
        assert!(flag.is_held());
        assert!(!flag.try_acquire());
        flag.release();
        assert!(!flag.is_held());
        assert!(flag.try_acquire());
    }

    #[test]
    fn test_not_reentrant() {
        let flag = ExclusiveFlag::new();
        let _guard = flag.try_guard().expect("free");
        assert!(flag.try_guard().is_none());
        // A failed attempt must not release the current holder.
        assert!(flag.is_held());
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let flag = ExclusiveFlag::new();
        {
            let _guard = flag.try_guard().expect("free");
            assert!(flag.is_held());
        }
        assert!(!flag.is_held());
    }

    #[test]
    fn test_release_when_free_is_harmless() {
        let flag = ExclusiveFlag::new();
        flag.release();
        assert!(!flag.is_held());
        assert!(flag.try_acquire());
    }

    #[test]
    fn test_single_winner_across_threads() {
        let flag = Arc::new(ExclusiveFlag::new());
        let wins = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let flag = Arc::clone(&flag);
                let wins = Arc::clone(&wins);
                thread::spawn(move || {
                    if flag.try_acquire() {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(wins.load(Ordering::SeqCst), 1);
        assert!(flag.is_held());
    }
}
