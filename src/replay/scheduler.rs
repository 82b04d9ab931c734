use std::{
    str::FromStr,
    time::{Duration, Instant},
};

use crate::error::{Error, Result};

/// Playback speed selector, mapped to a tick interval.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::Slow, Speed::Normal, Speed::Fast];

    pub fn name(self) -> &'static str {
        match self {
            Speed::Slow => "slow",
            Speed::Normal => "normal",
            Speed::Fast => "fast",
        }
    }

    /// Time between two automatically applied steps.
    pub fn interval(self) -> Duration {
        match self {
            Speed::Slow => Duration::from_millis(50),
            Speed::Normal => Duration::from_millis(8),
            Speed::Fast => Duration::from_millis(1),
        }
    }

    /// Next faster speed, saturating at `Fast`.
    pub fn faster(self) -> Speed {
        match self {
            Speed::Slow => Speed::Normal,
            Speed::Normal | Speed::Fast => Speed::Fast,
        }
    }

    /// Next slower speed, saturating at `Slow`.
    pub fn slower(self) -> Speed {
        match self {
            Speed::Fast => Speed::Normal,
            Speed::Normal | Speed::Slow => Speed::Slow,
        }
    }
}

impl std::fmt::Display for Speed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} ms)", self.name(), self.interval().as_millis())
    }
}

impl FromStr for Speed {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        Speed::ALL
            .into_iter()
            .find(|speed| speed.name() == s)
            .ok_or(Error::UnknownSelector { kind: "speed", value: s })
    }
}

/// Cooperative one-shot timer. At most one tick is pending at a time;
/// cancelling clears it so a later poll can never fire it.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval: Duration,
    pending: Option<Instant>,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Scheduler {
            interval,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the cadence. A pending tick is moved so it fires one new
    /// interval after it was armed.
    pub fn set_interval(&mut self, interval: Duration) {
        if let Some(deadline) = self.pending {
            let armed_at = deadline.checked_sub(self.interval).unwrap_or(deadline);
            self.pending = Some(armed_at + interval);
        }
        self.interval = interval;
    }

    /// Schedule the next tick one interval after `now`, replacing any
    /// pending one.
    pub fn arm(&mut self, now: Instant) {
        self.pending = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// Time left until the pending tick is due, zero if it is overdue.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Consume the pending tick if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if deadline <= now => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_intervals_and_parsing() {
        assert_eq!(Speed::Slow.interval(), Duration::from_millis(50));
        assert_eq!(Speed::Normal.interval(), Duration::from_millis(8));
        assert_eq!(Speed::Fast.interval(), Duration::from_millis(1));
        assert_eq!(" FAST ".parse::<Speed>().unwrap(), Speed::Fast);
        assert!("warp".parse::<Speed>().is_err());
        assert_eq!(Speed::Fast.faster(), Speed::Fast);
        assert_eq!(Speed::Fast.slower().slower(), Speed::Slow);
    }

    #[test]
    fn test_poll_fires_once_when_due() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new(Duration::from_millis(10));
        assert!(!scheduler.poll(now));

        scheduler.arm(now);
        assert!(!scheduler.poll(now + Duration::from_millis(5)));
        assert!(scheduler.poll(now + Duration::from_millis(10)));
        // One-shot: the tick is consumed
        assert!(!scheduler.poll(now + Duration::from_millis(20)));
    }

    #[test]
    fn test_cancel_prevents_stale_tick() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new(Duration::from_millis(1));
        scheduler.arm(now);
        scheduler.cancel();
        assert!(!scheduler.is_armed());
        assert!(!scheduler.poll(now + Duration::from_secs(1)));
    }

    #[test]
    fn test_set_interval_moves_pending_deadline() {
        let now = Instant::now();
        let mut scheduler = Scheduler::new(Duration::from_millis(50));
        scheduler.arm(now);
        scheduler.set_interval(Duration::from_millis(1));
        assert_eq!(scheduler.deadline(), Some(now + Duration::from_millis(1)));
        assert_eq!(
            scheduler.time_until_due(now + Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
    }
}
