use std::cell::RefCell;
use std::rc::Rc;

use bevy_color::Srgba;
use motionrx_core::prelude::*;

use crate::animator::ViewAnimator;
use crate::toolkit::Toolkit;
use crate::tween::Tween;
use crate::value::{reversible_value, Apply};

impl<T: Toolkit> ViewAnimator<T> {
    /// Animates the background from `from` to `to`, mixing in linear
    /// color space.
    pub fn background_color(
        &self,
        from: Srgba,
        to: Srgba,
        tween: Tween,
    ) -> Completion {
        let toolkit = self.toolkit.clone();
        let view = self.view;
        let apply: Apply<Srgba> = Rc::new(RefCell::new(move |color| {
            toolkit.set_background_color(view, color)
        }));

        reversible_value(
            &self.toolkit,
            from,
            to,
            tween,
            &self.defaults,
            apply,
        )
    }

    /// Animates the background from its current color to `to`.
    pub fn background_color_to(
        &self,
        to: Srgba,
        tween: Tween,
    ) -> Completion {
        match self.toolkit.background_color(self.view) {
            Ok(from) => self.background_color(from, to, tween),
            Err(error) => Completion::error(error),
        }
    }
}
