use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock session timer with pause accounting.
///
/// All readings are pure functions of the stored timestamps, so the
/// live value can be polled every frame without touching state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSessionTimer {
    started_at: DateTime<Utc>,
    pause_started_at: Option<DateTime<Utc>>,
    paused_millis: i64,
    finalized_seconds: Option<u64>,
}

impl GameSessionTimer {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        GameSessionTimer {
            started_at,
            pause_started_at: None,
            paused_millis: 0,
            finalized_seconds: None,
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_paused(&self) -> bool {
        self.pause_started_at.is_some()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized_seconds.is_some()
    }

    pub fn finalized_seconds(&self) -> Option<u64> {
        self.finalized_seconds
    }

    /// Ignored while already paused or once finalized
    pub fn begin_pause(&mut self, at: DateTime<Utc>) {
        if self.finalized_seconds.is_some() || self.pause_started_at.is_some() {
            return;
        }
        self.pause_started_at = Some(at);
    }

    pub fn end_pause(&mut self, at: DateTime<Utc>) {
        if let Some(began) = self.pause_started_at.take() {
            self.paused_millis += (at - began).num_milliseconds().max(0);
        }
    }

    /// Elapsed seconds excluding pauses (including one still open)
    pub fn live_elapsed_seconds(&self, as_of: DateTime<Utc>) -> f64 {
        if let Some(seconds) = self.finalized_seconds {
            return seconds as f64;
        }
        let open_pause = self
            .pause_started_at
            .map_or(0, |began| (as_of - began).num_milliseconds().max(0));
        let running = (as_of - self.started_at).num_milliseconds() - self.paused_millis - open_pause;
        running.max(0) as f64 / 1000.0
    }

    /// Freeze the elapsed time, rounded to the nearest second. Later calls
    /// return the frozen value whatever the reference time.
    pub fn finalize(&mut self, reference: DateTime<Utc>) -> u64 {
        if let Some(seconds) = self.finalized_seconds {
            return seconds;
        }
        let seconds = self.live_elapsed_seconds(reference).round() as u64;
        self.pause_started_at = None;
        self.finalized_seconds = Some(seconds);
        seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_live_elapsed_is_pure() {
        let timer = GameSessionTimer::new(t0());
        let at = t0() + Duration::milliseconds(12_500);
        assert_eq!(timer.live_elapsed_seconds(at), 12.5);
        assert_eq!(timer.live_elapsed_seconds(at), 12.5);
        assert_eq!(timer.live_elapsed_seconds(t0() - Duration::seconds(3)), 0.0);
    }

    #[test]
    fn test_pauses_are_excluded() {
        let mut timer = GameSessionTimer::new(t0());
        timer.begin_pause(t0() + Duration::seconds(10));
        assert!(timer.is_paused());
        assert_eq!(timer.live_elapsed_seconds(t0() + Duration::seconds(25)), 10.0);

        timer.end_pause(t0() + Duration::seconds(40));
        assert_eq!(timer.live_elapsed_seconds(t0() + Duration::seconds(45)), 15.0);
        assert_eq!(timer.finalize(t0() + Duration::seconds(45)), 15);
    }

    #[test]
    fn test_nested_begin_pause_is_ignored() {
        let mut timer = GameSessionTimer::new(t0());
        timer.begin_pause(t0() + Duration::seconds(5));
        timer.begin_pause(t0() + Duration::seconds(8));
        timer.end_pause(t0() + Duration::seconds(10));
        timer.end_pause(t0() + Duration::seconds(20));
        assert_eq!(timer.live_elapsed_seconds(t0() + Duration::seconds(30)), 25.0);
    }

    #[test]
    fn test_finalize_rounds_to_nearest_second() {
        let mut down = GameSessionTimer::new(t0());
        assert_eq!(down.finalize(t0() + Duration::milliseconds(7_499)), 7);

        let mut up = GameSessionTimer::new(t0());
        assert_eq!(up.finalize(t0() + Duration::milliseconds(7_500)), 8);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut timer = GameSessionTimer::new(t0());
        assert_eq!(timer.finalize(t0() + Duration::seconds(30)), 30);
        assert_eq!(timer.finalize(t0() + Duration::seconds(300)), 30);
        assert_eq!(timer.live_elapsed_seconds(t0() + Duration::seconds(900)), 30.0);

        timer.begin_pause(t0() + Duration::seconds(400));
        assert!(!timer.is_paused());
        assert_eq!(timer.finalized_seconds(), Some(30));
    }
}
