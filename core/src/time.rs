use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Returns the number of milliseconds since UNIX EPOCH
#[inline]
pub fn unix_now() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|x| x.as_millis() as u64).unwrap_or_default()
}

/// Returns the number of seconds since UNIX EPOCH
#[inline]
pub fn unix_now_secs() -> u64 {
    unix_now() / 1000
}

/// Stopwatch which reports on drop if the timed operation passed the threshold `TR` in milliseconds
pub struct Stopwatch<const TR: u64 = 1000> {
    name: &'static str,
    start: Instant,
}

impl<const TR: u64> Stopwatch<TR> {
    pub fn with_threshold(name: &'static str) -> Self {
        Self { name, start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl<const TR: u64> Drop for Stopwatch<TR> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        if elapsed > Duration::from_millis(TR.saturating_mul(4)) {
            crate::debug!("[{}] Extreme abnormal time: {:#?}", self.name, elapsed);
        } else if elapsed > Duration::from_millis(TR) {
            crate::trace!("[{}] Abnormal time: {:#?}", self.name, elapsed);
        }
    }
}
