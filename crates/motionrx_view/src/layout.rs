//! Size animations, driven through layout changes.

use std::cell::RefCell;
use std::rc::Rc;

use bevy_math::UVec2;
use motionrx_core::prelude::*;

use crate::animator::ViewAnimator;
use crate::toolkit::{Axis, Timing, Toolkit};
use crate::tween::Tween;
use crate::value::{reversible_value, value_leg, Apply};

impl<T: Toolkit> ViewAnimator<T> {
    /// Animates the layout width to `width` dp.
    pub fn width(&self, width: u32, tween: Tween) -> Completion {
        self.dimension(Axis::Width, width, tween)
    }

    /// Animates the layout height to `height` dp.
    pub fn height(&self, height: u32, tween: Tween) -> Completion {
        self.dimension(Axis::Height, height, tween)
    }

    /// Animates width and height together. The way back restores the
    /// size in pixels captured at request time.
    pub fn resize(
        &self,
        width: u32,
        height: u32,
        tween: Tween,
    ) -> Completion {
        let snapshot = match self.toolkit.size(self.view) {
            Ok(size) => size,
            Err(error) => return Completion::error(error),
        };
        let density = self.toolkit.density();
        let target = UVec2::new(
            density.dp_to_px_int(width),
            density.dp_to_px_int(height),
        );

        let this = self.clone();
        let forward = tween.forward(&self.defaults);
        let backward = tween.backward(&self.defaults);
        self.size_legs(snapshot, target, forward)
            .reverse_with(tween.reverse, move || {
                this.size_legs(target, snapshot, backward)
            })
    }

    fn dimension(
        &self,
        axis: Axis,
        dp: u32,
        tween: Tween,
    ) -> Completion {
        let from = match self.toolkit.size(self.view) {
            Ok(size) => along(size, axis),
            Err(error) => return Completion::error(error),
        };
        let to = self.toolkit.density().dp_to_px_int(dp);

        reversible_value(
            &self.toolkit,
            from,
            to,
            tween,
            &self.defaults,
            self.size_sink(axis),
        )
    }

    fn size_legs(
        &self,
        from: UVec2,
        to: UVec2,
        timing: Timing,
    ) -> Completion {
        [Axis::Width, Axis::Height]
            .map(|axis| {
                value_leg(
                    &self.toolkit,
                    along(from, axis),
                    along(to, axis),
                    timing,
                    self.size_sink(axis),
                )
            })
            .ord_together()
    }

    fn size_sink(&self, axis: Axis) -> Apply<u32> {
        let toolkit = self.toolkit.clone();
        let view = self.view;
        Rc::new(RefCell::new(move |px| {
            toolkit.set_size(view, axis, px)
        }))
    }
}

fn along(size: UVec2, axis: Axis) -> u32 {
    match axis {
        Axis::Width => size.x,
        Axis::Height => size.y,
    }
}

#[cfg(all(test, feature = "headless"))]
mod tests {
    use core::time::Duration;

    use crate::headless::{Headless, Playback, ViewState};
    use crate::units::Density;

    use super::*;

    #[test]
    fn width_converts_dp() {
        let toolkit = Headless::new().with_density(Density(1.5));
        let size = UVec2::new(10, 10);
        let state = ViewState::default().with_size(size);
        let view = toolkit.spawn(state);
        let animator = ViewAnimator::new(toolkit.clone(), view);

        toolkit.run(animator.width(3, Tween::millis(30))).unwrap();
        let state = toolkit.state(view).unwrap();
        assert_eq!(state.size, UVec2::new(4, 10));
        assert!(state.layout_requests > 0);

        toolkit.run(animator.height(20, Tween::millis(30))).unwrap();
        let size = toolkit.state(view).unwrap().size;
        assert_eq!(size, UVec2::new(4, 30));
    }

    #[test]
    fn resize_runs_both_axes_in_parallel() {
        let toolkit = Headless::new();
        let size = UVec2::new(50, 80);
        let state = ViewState::default().with_size(size);
        let view = toolkit.spawn(state);
        let animator = ViewAnimator::new(toolkit.clone(), view);

        let mut playback = Playback::new(&toolkit);
        let tween = Tween::millis(100);
        let outcome = playback.spawn(animator.resize(150, 20, tween));
        playback.advance(Duration::from_millis(50));

        let size = toolkit.state(view).unwrap().size;
        assert!(size.x > 50 && size.x < 150, "{size}");
        assert!(size.y < 80 && size.y > 20, "{size}");

        playback.advance(Duration::from_millis(50));
        assert_eq!(outcome.result(), Some(Ok(())));
        let size = toolkit.state(view).unwrap().size;
        assert_eq!(size, UVec2::new(150, 20));
    }

    #[test]
    fn reversed_resize_restores_pixels() {
        // Odd pixel sizes do not survive a round trip through dp.
        let toolkit = Headless::new().with_density(Density(2.625));
        let start = UVec2::new(103, 61);
        let view =
            toolkit.spawn(ViewState::default().with_size(start));
        let animator = ViewAnimator::new(toolkit.clone(), view);

        let tween = Tween::millis(120).reversed();
        let elapsed =
            toolkit.run(animator.resize(64, 64, tween)).unwrap();

        assert_eq!(elapsed, Duration::from_millis(240));
        assert_eq!(toolkit.state(view).unwrap().size, start);
    }
}
