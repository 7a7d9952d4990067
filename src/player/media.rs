use crate::messages::MediaEvent;
use tokio::time::Instant;

/// The subset of a media element the player drives
pub trait MediaElement: Send {
    fn play(&mut self);
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    /// NaN until the duration is known
    fn duration(&self) -> f64;
    fn volume(&self) -> f64;
    fn set_volume(&mut self, volume: f64);
    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
    /// Point the element at a new source and rewind
    fn load(&mut self, src: &str);
    /// Let the element catch up to `now`; elements that drive themselves
    /// report nothing
    fn poll(&mut self, _now: Instant) -> Option<MediaEvent> {
        None
    }
}

/// A playback clock standing in for a real media element.
///
/// Every source is treated as `duration` seconds long. Time only moves on
/// [`MediaElement::poll`], which makes the clock deterministic under test.
#[derive(Debug, Clone)]
pub struct SimulatedMedia {
    duration: f64,
    position: f64,
    paused: bool,
    volume: f64,
    muted: bool,
    last_tick: Option<Instant>,
}

impl SimulatedMedia {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            position: 0.0,
            paused: true,
            volume: 1.0,
            muted: false,
            last_tick: None,
        }
    }

    pub fn ended(&self) -> bool {
        self.duration.is_finite() && self.position >= self.duration
    }
}

impl MediaElement for SimulatedMedia {
    fn play(&mut self) {
        if self.ended() {
            self.position = 0.0;
        }
        self.paused = false;
        self.last_tick = None;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        let upper = if self.duration.is_finite() {
            self.duration
        } else {
            f64::MAX
        };
        self.position = if seconds.is_nan() {
            0.0
        } else {
            seconds.clamp(0.0, upper)
        };
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = super::format::clamp_fraction(volume);
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn load(&mut self, src: &str) {
        tracing::debug!("Simulating {:.0}s of playback for {}", self.duration, src);
        self.position = 0.0;
        self.last_tick = None;
    }

    /// Reports `TimeUpdate` while playing and `Ended` (pausing itself) once
    /// the end is reached
    fn poll(&mut self, now: Instant) -> Option<MediaEvent> {
        let last = self.last_tick.replace(now);
        if self.paused {
            return None;
        }

        if let Some(last) = last {
            self.position += now.saturating_duration_since(last).as_secs_f64();
        }

        if self.ended() {
            self.position = self.duration;
            self.paused = true;
            return Some(MediaEvent::Ended);
        }
        Some(MediaEvent::TimeUpdate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_clock_only_moves_while_playing() {
        let start = Instant::now();
        let mut media = SimulatedMedia::new(10.0);

        assert_eq!(media.poll(start + Duration::from_secs(3)), None);
        assert_eq!(media.current_time(), 0.0);

        media.play();
        media.poll(start + Duration::from_secs(3));
        assert_eq!(
            media.poll(start + Duration::from_secs(5)),
            Some(MediaEvent::TimeUpdate)
        );
        assert_eq!(media.current_time(), 2.0);

        media.pause();
        media.poll(start + Duration::from_secs(9));
        assert_eq!(media.current_time(), 2.0);
    }

    #[test]
    fn test_clock_stops_at_end() {
        let start = Instant::now();
        let mut media = SimulatedMedia::new(4.0);
        media.play();
        media.poll(start);
        assert_eq!(
            media.poll(start + Duration::from_secs(6)),
            Some(MediaEvent::Ended)
        );
        assert_eq!(media.current_time(), 4.0);
        assert!(media.is_paused());

        // Playing again restarts from the top
        media.play();
        assert_eq!(media.current_time(), 0.0);
    }

    #[test]
    fn test_seek_and_volume_are_clamped() {
        let mut media = SimulatedMedia::new(30.0);
        media.set_current_time(45.0);
        assert_eq!(media.current_time(), 30.0);
        media.set_current_time(-3.0);
        assert_eq!(media.current_time(), 0.0);

        media.set_volume(1.7);
        assert_eq!(media.volume(), 1.0);
        media.set_volume(-0.2);
        assert_eq!(media.volume(), 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_follows_tokio_time() {
        let mut media = SimulatedMedia::new(10.0);
        media.play();
        media.poll(Instant::now());

        tokio::time::advance(Duration::from_millis(2_500)).await;
        assert_eq!(media.poll(Instant::now()), Some(MediaEvent::TimeUpdate));
        assert_eq!(media.current_time(), 2.5);

        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(media.poll(Instant::now()), Some(MediaEvent::Ended));
        assert_eq!(media.current_time(), 10.0);
    }

    #[test]
    fn test_unknown_duration_never_ends() {
        let mut media = SimulatedMedia::new(f64::NAN);
        media.set_current_time(1_000.0);
        assert_eq!(media.current_time(), 1_000.0);
        assert!(!media.ended());
    }
}
