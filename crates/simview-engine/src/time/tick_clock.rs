use std::time::Instant;

/// Wall-clock timer measuring the gap between consecutive ticks.
///
/// The first tick has no baseline and reports zero. Every tick moves the
/// baseline to "now", so the host loop can feed the returned value straight
/// into its simulation step.
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    last: Option<Instant>,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous call, or `0.0` on the first call.
    pub fn elapsed_since_last_tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    pub(crate) fn tick_at(&mut self, now: Instant) -> f64 {
        let elapsed = self
            .last
            .map_or(0.0, |last| now.saturating_duration_since(last).as_secs_f64());
        self.last = Some(now);
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut clock = TickClock::new();
        assert_eq!(clock.elapsed_since_last_tick(), 0.0);
    }

    #[test]
    fn measures_gap_between_ticks() {
        let mut clock = TickClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let dt = clock.tick_at(t0 + Duration::from_millis(250));
        assert!((dt - 0.25).abs() < 1e-9);
        let dt = clock.tick_at(t0 + Duration::from_millis(300));
        assert!((dt - 0.05).abs() < 1e-9);
    }

    #[test]
    fn backwards_instant_saturates_to_zero() {
        let mut clock = TickClock::new();
        let t0 = Instant::now() + Duration::from_secs(1);
        clock.tick_at(t0);
        assert_eq!(clock.tick_at(t0 - Duration::from_millis(10)), 0.0);
    }

    #[test]
    fn tracks_real_time() {
        let mut clock = TickClock::new();
        clock.elapsed_since_last_tick();
        std::thread::sleep(Duration::from_millis(20));
        let dt = clock.elapsed_since_last_tick();
        assert!(dt >= 0.019, "elapsed {dt} shorter than the sleep");
        assert!(dt < 2.0, "elapsed {dt} far longer than the sleep");
    }
}
