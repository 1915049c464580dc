//! Wall-clock access for pacing and periodic debug pushes.
//!
//! Tests run against `fake_clock`, native builds against `std::time` with
//! `spin_sleep`, and wasm32 builds against the JavaScript `Date` clock,
//! where blocking the thread is not possible.

use std::time::Duration;

#[cfg(test)]
pub(crate) use fake_clock::FakeClock as Instant;
#[cfg(all(not(test), not(target_arch = "wasm32")))]
pub(crate) use std::time::Instant;
#[cfg(all(not(test), target_arch = "wasm32"))]
pub(crate) use self::host::Instant;

/// Blocks for `duration`. Returns `false` where the host cannot block, in
/// which case the caller should yield instead.
#[cfg(all(not(test), not(target_arch = "wasm32")))]
pub(crate) fn sleep(duration: Duration) -> bool {
    spin_sleep::sleep(duration);
    true
}

#[cfg(test)]
pub(crate) fn sleep(duration: Duration) -> bool {
    Instant::advance_time(duration.as_millis() as u64);
    true
}

#[cfg(all(not(test), target_arch = "wasm32"))]
pub(crate) fn sleep(_duration: Duration) -> bool {
    false
}

/// Seconds since the Unix epoch, or 0 if the host clock is unusable.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn unix_timestamp() -> u64 {
    (js_sys::Date::now() / 1000.0) as u64
}

#[cfg(all(not(test), target_arch = "wasm32"))]
mod host {
    use std::time::Duration;

    /// Millisecond instant backed by `Date.now()`.
    #[derive(Debug, Clone, Copy)]
    pub struct Instant {
        millis: f64,
    }

    impl Instant {
        pub fn now() -> Self {
            Self {
                millis: js_sys::Date::now(),
            }
        }

        pub fn elapsed(&self) -> Duration {
            let delta = (js_sys::Date::now() - self.millis).max(0.0);
            Duration::from_micros((delta * 1000.0) as u64)
        }
    }
}
