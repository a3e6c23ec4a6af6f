#![cfg_attr(target_arch = "wasm32", feature(stdarch_wasm_atomic_wait))]
//! Cooperative suspension gate between engine callbacks and the controller.
//!
//! Every bridge callback halts here until the external controller signals
//! readiness to continue. The gate first sleeps for the callback's configured
//! wait, then polls a level-triggered resume signal at a fixed cadence,
//! ceding the CPU between checks. The gate only ever reads the signal;
//! resetting it before a wait is the controller's responsibility.

pub mod wait;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default cadence for re-checking the resume signal.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Read-only view of the controller's "may resume" state.
///
/// Implementations must be callable from whichever thread the engine uses to
/// invoke callbacks. Staleness is benign: the poll loop re-checks until a
/// true read is observed.
pub trait ResumeSignal: Send + Sync {
    /// Whether the controller currently permits resuming.
    fn can_resume(&self) -> bool;
}

/// Shared atomic resume flag, mutated only by the controller.
///
/// Cloning yields another handle to the same flag, so a session's controller
/// and gate observe one state. Independent sessions construct independent
/// flags; there is no process-global instance.
#[derive(Clone, Debug, Default)]
pub struct ResumeFlag {
    inner: Arc<AtomicBool>,
}

impl ResumeFlag {
    /// Creates a flag in the "may not resume" state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller-side write. Level-triggered: only the value observed at
    /// poll time matters.
    pub fn set(&self, may_resume: bool) {
        self.inner.store(may_resume, Ordering::Relaxed);
    }
}

impl ResumeSignal for ResumeFlag {
    fn can_resume(&self) -> bool {
        self.inner.load(Ordering::Relaxed)
    }
}

/// Suspends engine callbacks until the controller signals resume.
#[derive(Clone)]
pub struct Gate {
    signal: Arc<dyn ResumeSignal>,
    poll_interval: Duration,
}

impl Gate {
    /// Creates a gate polling `signal` at the default cadence.
    pub fn new(signal: Arc<dyn ResumeSignal>) -> Self {
        Self {
            signal,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Overrides the polling cadence (tests use short intervals).
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Sleeps cooperatively for `wait`, then blocks until the resume signal
    /// reads true at least once.
    ///
    /// Cannot fail. A controller that never resumes suspends the caller
    /// indefinitely; ending the session externally is the only way out.
    pub fn wait_and_suspend(&self, wait: Duration) {
        wait::sleep(wait);
        while !self.signal.can_resume() {
            wait::sleep(self.poll_interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    fn fast_gate(flag: &ResumeFlag) -> Gate {
        Gate::new(Arc::new(flag.clone())).with_poll_interval(Duration::from_millis(5))
    }

    /// A flag already set before the wait lets the gate pass after the
    /// initial sleep alone.
    #[test]
    fn preset_resume_passes_immediately() {
        let flag = ResumeFlag::new();
        flag.set(true);
        let start = Instant::now();
        fast_gate(&flag).wait_and_suspend(Duration::from_millis(1));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    /// The gate must not return before the signal has been observed true
    /// after being reset false.
    #[test]
    fn suspend_holds_until_delayed_resume() {
        let flag = ResumeFlag::new();
        flag.set(false);
        let delay = Duration::from_millis(60);

        let setter = {
            let flag = flag.clone();
            thread::spawn(move || {
                thread::sleep(delay);
                flag.set(true);
            })
        };

        let start = Instant::now();
        fast_gate(&flag).wait_and_suspend(Duration::from_millis(1));
        let elapsed = start.elapsed();
        setter.join().unwrap();

        assert!(
            elapsed >= delay,
            "gate returned after {elapsed:?}, before the {delay:?} resume"
        );
        assert!(elapsed < Duration::from_secs(5));
    }

    /// Intermediate toggles while nobody is polling are invisible; only the
    /// last observed value matters.
    #[test]
    fn level_triggered_last_write_wins() {
        let flag = ResumeFlag::new();
        flag.set(true);
        flag.set(false);
        flag.set(true);
        let start = Instant::now();
        fast_gate(&flag).wait_and_suspend(Duration::ZERO);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
