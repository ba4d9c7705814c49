use std::time::{Duration, Instant};

/// Counts frames and reports average ms/frame once per second.
///
/// The window advances by exactly one second per report rather than snapping to
/// `now`, so a slow frame does not shift the cadence.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    window: Duration,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            window: Duration::from_secs(1),
        }
    }

    /// Records one frame. Returns ms/frame when a full window has elapsed.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;

        if now.saturating_duration_since(self.window_start) < self.window {
            return None;
        }

        let ms_per_frame = 1000.0 / f64::from(self.frames);
        self.frames = 0;
        self.window_start += self.window;
        Some(ms_per_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_second() {
        let t0 = Instant::now();
        let mut fps = FpsCounter::new(t0);

        for i in 1..=9 {
            assert_eq!(fps.tick(t0 + Duration::from_millis(i * 100)), None);
        }
        let report = fps.tick(t0 + Duration::from_millis(1000)).unwrap();
        assert!((report - 100.0).abs() < 1e-9);
    }

    #[test]
    fn window_advances_by_fixed_step() {
        let t0 = Instant::now();
        let mut fps = FpsCounter::new(t0);

        assert!(fps.tick(t0 + Duration::from_millis(1500)).is_some());
        // Next window closes at t0 + 2s, not t0 + 2.5s.
        assert_eq!(fps.tick(t0 + Duration::from_millis(1900)), None);
        let report = fps.tick(t0 + Duration::from_millis(2000)).unwrap();
        assert!((report - 500.0).abs() < 1e-9);
    }
}
