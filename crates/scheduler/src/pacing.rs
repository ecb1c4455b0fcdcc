use std::{ops::RangeInclusive, time::Duration};

use rand::Rng;

/// Delay bounds pacing the conversation, in seconds.
#[derive(Debug, Clone)]
pub struct Pacing {
    /// Wait between a delivery and the receiver's reply.
    pub before_reply: RangeInclusive<f64>,
    /// Wait after a receiver replied.
    pub after_reply: RangeInclusive<f64>,
    /// Wait before moving on to the next receiver in a pass.
    pub next_receiver: RangeInclusive<f64>,
    /// Fixed pause between full cycles of the sender script.
    pub cycle_pause: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            before_reply: 1.0..=3.0,
            after_reply: 1.0..=5.0,
            next_receiver: 3.0..=5.0,
            cycle_pause: Duration::from_secs(10),
        }
    }
}

impl Pacing {
    /// Draw a jittered duration from the given bounds.
    pub fn draw(range: &RangeInclusive<f64>) -> Duration {
        let secs = rand::rng().random_range(range.clone());
        Duration::from_secs_f64(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_stays_within_bounds() {
        let range = 1.0..=3.0;
        for _ in 0..200 {
            let d = Pacing::draw(&range);
            assert!(d >= Duration::from_secs_f64(1.0));
            assert!(d <= Duration::from_secs_f64(3.0));
        }
    }

    #[test]
    fn default_matches_conversation_rhythm() {
        let pacing = Pacing::default();
        assert_eq!(pacing.before_reply, 1.0..=3.0);
        assert_eq!(pacing.after_reply, 1.0..=5.0);
        assert_eq!(pacing.next_receiver, 3.0..=5.0);
        assert_eq!(pacing.cycle_pause, Duration::from_secs(10));
    }
}
