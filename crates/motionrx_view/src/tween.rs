use core::time::Duration;

use motionrx_core::prelude::*;

use crate::config::AnimationDefaults;
use crate::toolkit::Timing;

/// Caller-facing options of a single animation request.
///
/// Unset fields fall back to the [`AnimationDefaults`] of the
/// animator.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tween {
    pub duration: Option<Duration>,
    pub ease: Option<Ease>,
    pub start_delay: Option<Duration>,
    /// Animate back to the value captured at request time once the
    /// forward animation completed.
    pub reverse: bool,
}

impl Tween {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn millis(duration: u64) -> Self {
        Self::new().with_duration(Duration::from_millis(duration))
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    pub fn with_start_delay(mut self, start_delay: Duration) -> Self {
        self.start_delay = Some(start_delay);
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Timing of the forward leg.
    pub fn forward(&self, defaults: &AnimationDefaults) -> Timing {
        self.backward(defaults)
            .with_start_delay(self.start_delay.unwrap_or_default())
    }

    /// Timing of the backward leg, the start delay only applies to
    /// the forward leg.
    pub fn backward(&self, defaults: &AnimationDefaults) -> Timing {
        let duration =
            self.duration.unwrap_or_else(|| defaults.duration());
        let ease = self.ease.unwrap_or(defaults.ease);
        Timing::new(duration).with_ease(ease)
    }
}
