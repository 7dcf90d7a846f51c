//! Small fixed choreographies built from the property helpers.

use core::time::Duration;

use motionrx_core::prelude::*;

use crate::animator::ViewAnimator;
use crate::config::ShakeConfig;
use crate::toolkit::{
    FloatProperty, PropertyAnimation, Timing, Toolkit,
};
use crate::tween::Tween;

impl<T: Toolkit> ViewAnimator<T> {
    /// Shakes the view horizontally with the configured defaults.
    pub fn shake(&self) -> Completion {
        self.shake_with(&self.defaults.shake)
    }

    /// Oscillates the horizontal translation around its current
    /// value. The view ends up where it started, nothing needs
    /// reversing.
    pub fn shake_with(&self, shake: &ShakeConfig) -> Completion {
        let current = match self
            .toolkit
            .property(self.view, FloatProperty::TranslationX)
        {
            Ok(current) => current,
            Err(error) => return Completion::error(error),
        };
        let amplitude =
            self.toolkit.density().dp_to_px(shake.translation_dp);

        let timing = Timing::new(shake.duration())
            .with_ease(Ease::Cycle(shake.shakes));
        let animation = PropertyAnimation::new(timing)
            .with(FloatProperty::TranslationX, current + amplitude);

        self.properties("shake", animation)
    }

    /// Scales down to the configured depth and back.
    pub fn press(&self) -> Completion {
        self.press_with(self.defaults.press.depth, Tween::new())
    }

    /// Scales down to `depth` and back, each half taking half of the
    /// tween's duration.
    pub fn press_with(&self, depth: f32, tween: Tween) -> Completion {
        let duration = tween
            .duration
            .unwrap_or_else(|| self.defaults.press.duration());
        let half = tween.with_duration(duration / 2).reversed();

        self.scale(depth, half)
    }

    /// Fades the text out, replaces it and fades it back in after a
    /// pause. Reversing repeats the swap with the text captured at
    /// request time.
    pub fn text(
        &self,
        text: impl Into<String>,
        tween: Tween,
    ) -> Completion {
        let captured = match self.toolkit.text(self.view) {
            Ok(captured) => captured,
            Err(error) => return Completion::error(error),
        };

        let duration = tween
            .duration
            .unwrap_or_else(|| self.defaults.text.duration());
        let half =
            tween.with_duration(duration / 2).with_reverse(false);
        let pause = self.defaults.text.pause();

        let this = self.clone();
        let back = Tween {
            start_delay: None,
            ..half
        };
        self.swap_text(text.into(), half, pause)
            .reverse_with(tween.reverse, move || {
                this.swap_text(captured, back, pause)
            })
    }

    fn swap_text(
        &self,
        text: String,
        half: Tween,
        pause: Duration,
    ) -> Completion {
        let this = self.clone();
        self.fade_out(half).and_then_with(move || {
            match this.toolkit.set_text(this.view, &text) {
                Ok(()) => this.fade_in(half.with_start_delay(pause)),
                Err(error) => Completion::error(error),
            }
        })
    }
}
