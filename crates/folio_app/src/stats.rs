// SPDX-License-Identifier: MIT OR Apache-2.0
//! Stats cards with a count-up animation.

use crate::config::StatConfig;
use folio_carousel::Easing;
use std::time::Duration;

/// Time a card takes to count from zero to its value
pub const COUNT_UP_DURATION: Duration = Duration::from_secs(2);

/// Number animating from zero to a target, started once
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountUp {
    target: u32,
    started_at: Option<Duration>,
    easing: Easing,
}

impl CountUp {
    /// Counter for `target`, not started yet
    pub fn new(target: u32) -> Self {
        Self {
            target,
            started_at: None,
            easing: Easing::EaseOut,
        }
    }

    /// Start counting at `now`; later calls do nothing
    pub fn trigger(&mut self, now: Duration) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    /// Whether counting has started
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Displayed value at `now`
    pub fn value(&self, now: Duration) -> u32 {
        let Some(started_at) = self.started_at else {
            return 0;
        };
        let elapsed = now.saturating_sub(started_at);
        if elapsed >= COUNT_UP_DURATION {
            return self.target;
        }

        let t = elapsed.as_secs_f32() / COUNT_UP_DURATION.as_secs_f32();
        let value = (self.target as f32 * self.easing.apply(t)).round();
        (value.max(0.0) as u32).min(self.target)
    }

    /// Whether the final value has been reached
    pub fn is_finished(&self, now: Duration) -> bool {
        self.started_at
            .is_some_and(|started_at| now.saturating_sub(started_at) >= COUNT_UP_DURATION)
    }
}

/// One stats card
#[derive(Debug, Clone)]
pub struct StatCard {
    /// Caption
    pub label: String,
    /// Text appended to the number
    pub suffix: String,
    /// Animated number
    pub count: CountUp,
}

impl StatCard {
    /// Card for a configured stat
    pub fn new(config: &StatConfig) -> Self {
        Self {
            label: config.label.clone(),
            suffix: config.suffix.clone(),
            count: CountUp::new(config.value),
        }
    }

    /// Number and suffix as shown at `now`
    pub fn display(&self, now: Duration) -> String {
        format!("{}{}", self.count.value(now), self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_up_endpoints() {
        let mut count = CountUp::new(98);
        assert_eq!(count.value(Duration::from_secs(10)), 0, "not triggered yet");

        count.trigger(Duration::from_secs(1));
        assert_eq!(count.value(Duration::from_secs(1)), 0);
        assert_eq!(count.value(Duration::from_secs(3)), 98);
        assert_eq!(count.value(Duration::from_secs(60)), 98);
        assert!(count.is_finished(Duration::from_secs(3)));
        assert!(!count.is_finished(Duration::from_millis(2999)));
    }

    #[test]
    fn test_count_up_is_monotonic_and_eased() {
        let mut count = CountUp::new(20);
        count.trigger(Duration::ZERO);

        let mut last = 0;
        for ms in (0..=2000).step_by(50) {
            let value = count.value(Duration::from_millis(ms));
            assert!(value >= last);
            last = value;
        }
        // Ease-out covers more than half the distance in the first half.
        assert!(count.value(Duration::from_secs(1)) > 10);
    }

    #[test]
    fn test_trigger_only_once() {
        let mut count = CountUp::new(24);
        count.trigger(Duration::from_secs(5));
        count.trigger(Duration::from_secs(6));
        assert_eq!(count.value(Duration::from_secs(7)), 24);
    }

    #[test]
    fn test_card_display() {
        let mut card = StatCard::new(&StatConfig {
            value: 2,
            label: "Years Experience".to_string(),
            suffix: "yrs".to_string(),
        });
        assert_eq!(card.display(Duration::ZERO), "0yrs");
        card.count.trigger(Duration::ZERO);
        assert_eq!(card.display(Duration::from_secs(2)), "2yrs");
    }
}
