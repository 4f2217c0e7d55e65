// Fault injection for failure-path tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Switches that make the in-memory store fail on demand
#[derive(Debug, Default)]
pub struct FaultInjector {
    commit_failures: AtomicUsize,
    offline: AtomicBool,
}

impl FaultInjector {
    /// Make the next `n` commits fail after all prior steps succeeded
    pub fn fail_next_commits(&self, n: usize) {
        self.commit_failures.store(n, Ordering::SeqCst);
    }

    /// Simulate a store that cannot be reached
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    /// Consume one pending commit failure, if any
    pub(crate) fn take_commit_failure(&self) -> bool {
        self.commit_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_failures_are_consumed() {
        let faults = FaultInjector::default();
        assert!(!faults.take_commit_failure());

        faults.fail_next_commits(2);
        assert!(faults.take_commit_failure());
        assert!(faults.take_commit_failure());
        assert!(!faults.take_commit_failure());
    }

    #[test]
    fn test_offline_toggle() {
        let faults = FaultInjector::default();
        faults.set_offline(true);
        assert!(faults.is_offline());
        faults.set_offline(false);
        assert!(!faults.is_offline());
    }
}
