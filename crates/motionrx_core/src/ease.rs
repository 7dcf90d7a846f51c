//! Easing curves handed to the host toolkit.
//!
//! The toolkit evaluates the curve per frame, motionrx only describes
//! it. All built-in curves (except [`Ease::Cycle`]) map `0.0` to
//! exactly `0.0` and `1.0` to exactly `1.0`, so a finished animation
//! lands on its target value bit for bit.

use core::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Easing function on a [`f32`] time.
pub type EaseFn = fn(t: f32) -> f32;

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    /// Starts and ends slowly, the toolkit default.
    #[default]
    AccelerateDecelerate,
    Accelerate,
    Decelerate,
    /// Oscillates `cycles` times following a sine wave, returning
    /// to the start value at the end.
    Cycle(f32),
    /// A user supplied curve. Cannot be (de)serialized.
    #[serde(skip)]
    Custom(EaseFn),
}

impl Ease {
    /// Maps a linear time fraction to the eased fraction.
    ///
    /// `t` is clamped to `0.0..=1.0` first.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match *self {
            Ease::Linear => t,
            Ease::AccelerateDecelerate => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    ((t + 1.0) * PI).cos() / 2.0 + 0.5
                }
            }
            Ease::Accelerate => t * t,
            Ease::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Cycle(cycles) => (2.0 * cycles * PI * t).sin(),
            Ease::Custom(ease) => ease(t),
        }
    }

    /// Whether the curve ends exactly on the target value.
    pub fn lands_on_target(&self) -> bool {
        !matches!(self, Ease::Cycle(_) | Ease::Custom(_))
    }
}
