//! Cross-platform cooperative sleep shims used by the suspension gate.
//!
//! Native targets park the calling engine thread with `std::thread::sleep`,
//! leaving the controller's own thread untouched. On wasm32 the engine runs
//! inside a dedicated worker and parks on a timed linear-memory atomic wait,
//! which yields the CPU to the main-thread controller for the duration.

use std::time::Duration;

#[cfg(target_arch = "wasm32")]
mod imp {
    use core::arch::wasm32::memory_atomic_wait32;
    use std::sync::atomic::AtomicU32;
    use std::time::Duration;

    #[inline]
    pub(crate) fn sleep(duration: Duration) {
        if duration.is_zero() {
            return;
        }
        let parked = AtomicU32::new(0);
        let timeout_ns = duration.as_nanos().min(i64::MAX as u128) as i64;
        // SAFETY: The atomic lives on this worker's stack within the shared
        // linear memory; no other thread notifies it, so the wait always
        // elapses via the timeout.
        unsafe {
            memory_atomic_wait32(&parked as *const _ as *mut i32, 0, timeout_ns);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use std::time::Duration;

    #[inline]
    pub(crate) fn sleep(duration: Duration) {
        if duration.is_zero() {
            return;
        }
        std::thread::sleep(duration);
    }
}

/// Parks the calling thread for approximately `duration` without spinning.
#[inline]
pub fn sleep(duration: Duration) {
    imp::sleep(duration)
}
