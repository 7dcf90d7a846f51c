//! Reversible property animations of a single view.
//!
//! Every request snapshots the animated properties right away, so a
//! reversed animation returns to the values the view had when the
//! animation was asked for, not when it started running.

use motionrx_core::prelude::*;
use smallvec::SmallVec;

use crate::config::AnimationDefaults;
use crate::toolkit::{FloatProperty, PropertyAnimation, Toolkit};
use crate::tween::Tween;

type Targets = SmallVec<[(FloatProperty, f32); 2]>;

/// Builds [`Completion`]s animating one view of a [`Toolkit`].
#[derive(Debug, Clone)]
pub struct ViewAnimator<T: Toolkit> {
    pub(crate) toolkit: T,
    pub(crate) view: T::View,
    pub(crate) defaults: AnimationDefaults,
}

impl<T: Toolkit> ViewAnimator<T> {
    pub fn new(toolkit: T, view: T::View) -> Self {
        let defaults = AnimationDefaults::default();
        Self::with_defaults(toolkit, view, defaults)
    }

    pub fn with_defaults(
        toolkit: T,
        view: T::View,
        defaults: AnimationDefaults,
    ) -> Self {
        Self {
            toolkit,
            view,
            defaults,
        }
    }

    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn view(&self) -> T::View {
        self.view
    }

    pub fn defaults(&self) -> &AnimationDefaults {
        &self.defaults
    }

    /// Animates each property to its target. With
    /// [`Tween::reverse`] the properties are animated back to their
    /// current values afterwards.
    pub fn animate(
        &self,
        targets: &[(FloatProperty, f32)],
        tween: Tween,
    ) -> Completion {
        self.reversible("properties", targets, tween)
    }

    pub(crate) fn reversible(
        &self,
        label: &'static str,
        targets: &[(FloatProperty, f32)],
        tween: Tween,
    ) -> Completion {
        let snapshot = match self.snapshot(targets) {
            Ok(snapshot) => snapshot,
            Err(error) => return Completion::error(error),
        };

        let forward = targets.iter().fold(
            PropertyAnimation::new(tween.forward(&self.defaults)),
            |animation, &(property, target)| {
                animation.with(property, target)
            },
        );
        let backward = PropertyAnimation {
            targets: snapshot,
            timing: tween.backward(&self.defaults),
        };

        let this = self.clone();
        self.properties(label, forward)
            .reverse_with(tween.reverse, move || {
                this.properties(label, backward)
            })
    }

    /// A single, non reversible run of the property animator.
    pub(crate) fn properties(
        &self,
        label: &'static str,
        animation: PropertyAnimation,
    ) -> Completion {
        let toolkit = self.toolkit.clone();
        let view = self.view;
        Completion::create(label, move |done| {
            toolkit.animate_properties(view, &animation, done)
        })
    }

    fn snapshot(
        &self,
        targets: &[(FloatProperty, f32)],
    ) -> Result<Targets, AnimationError> {
        targets
            .iter()
            .map(|&(property, _)| {
                let current =
                    self.toolkit.property(self.view, property)?;
                Ok((property, current))
            })
            .collect()
    }

    fn dp(&self, dp: f32) -> f32 {
        self.toolkit.density().dp_to_px(dp)
    }

    pub fn alpha(&self, alpha: f32, tween: Tween) -> Completion {
        let targets = [(FloatProperty::Alpha, alpha)];
        self.reversible("alpha", &targets, tween)
    }

    pub fn fade_in(&self, tween: Tween) -> Completion {
        self.alpha(1.0, tween)
    }

    pub fn fade_out(&self, tween: Tween) -> Completion {
        self.alpha(0.0, tween)
    }

    /// Translation in dp.
    pub fn translation(
        &self,
        x: f32,
        y: f32,
        tween: Tween,
    ) -> Completion {
        let targets = [
            (FloatProperty::TranslationX, self.dp(x)),
            (FloatProperty::TranslationY, self.dp(y)),
        ];
        self.reversible("translation", &targets, tween)
    }

    /// Horizontal translation in dp.
    pub fn translation_x(&self, x: f32, tween: Tween) -> Completion {
        let targets = [(FloatProperty::TranslationX, self.dp(x))];
        self.reversible("translation_x", &targets, tween)
    }

    /// Vertical translation in dp.
    pub fn translation_y(&self, y: f32, tween: Tween) -> Completion {
        let targets = [(FloatProperty::TranslationY, self.dp(y))];
        self.reversible("translation_y", &targets, tween)
    }

    /// Scales both axes.
    pub fn scale(&self, scale: f32, tween: Tween) -> Completion {
        let targets = [
            (FloatProperty::ScaleX, scale),
            (FloatProperty::ScaleY, scale),
        ];
        self.reversible("scale", &targets, tween)
    }

    pub fn scale_x(&self, scale: f32, tween: Tween) -> Completion {
        let targets = [(FloatProperty::ScaleX, scale)];
        self.reversible("scale_x", &targets, tween)
    }

    pub fn scale_y(&self, scale: f32, tween: Tween) -> Completion {
        let targets = [(FloatProperty::ScaleY, scale)];
        self.reversible("scale_y", &targets, tween)
    }

    /// Rotation around the z axis, in degrees.
    pub fn rotation(&self, degrees: f32, tween: Tween) -> Completion {
        let targets = [(FloatProperty::Rotation, degrees)];
        self.reversible("rotation", &targets, tween)
    }

    pub fn rotation_x(
        &self,
        degrees: f32,
        tween: Tween,
    ) -> Completion {
        let targets = [(FloatProperty::RotationX, degrees)];
        self.reversible("rotation_x", &targets, tween)
    }

    pub fn rotation_y(
        &self,
        degrees: f32,
        tween: Tween,
    ) -> Completion {
        let targets = [(FloatProperty::RotationY, degrees)];
        self.reversible("rotation_y", &targets, tween)
    }

    /// Moves to a position in pixels. Only the given coordinates are
    /// animated.
    pub fn xyz(
        &self,
        x: Option<f32>,
        y: Option<f32>,
        z: Option<f32>,
        tween: Tween,
    ) -> Completion {
        let targets: Targets = [
            (FloatProperty::X, x),
            (FloatProperty::Y, y),
            (FloatProperty::Z, z),
        ]
        .into_iter()
        .filter_map(|(property, value)| Some((property, value?)))
        .collect();

        self.reversible("xyz", &targets, tween)
    }

    pub fn x(&self, x: f32, tween: Tween) -> Completion {
        self.reversible("x", &[(FloatProperty::X, x)], tween)
    }

    pub fn y(&self, y: f32, tween: Tween) -> Completion {
        self.reversible("y", &[(FloatProperty::Y, y)], tween)
    }

    pub fn z(&self, z: f32, tween: Tween) -> Completion {
        self.reversible("z", &[(FloatProperty::Z, z)], tween)
    }
}

/// Runs the animation built by `animate` on every view together.
pub fn each<T, I, F>(
    toolkit: &T,
    views: I,
    mut animate: F,
) -> Completion
where
    T: Toolkit,
    I: IntoIterator<Item = T::View>,
    F: FnMut(ViewAnimator<T>) -> Completion,
{
    together(views.into_iter().map(|view| {
        animate(ViewAnimator::new(toolkit.clone(), view))
    }))
}

#[cfg(all(test, feature = "headless"))]
mod tests {
    use core::time::Duration;

    use bevy_math::{Vec2, Vec3};

    use crate::headless::{
        Activity, EventKind, Headless, Playback, ViewState,
    };
    use crate::units::Density;

    use super::*;

    #[test]
    fn fade_and_scale_together() {
        let toolkit = Headless::new();
        let state =
            ViewState::default().with_alpha(0.0).with_scale(0.5);
        let view = toolkit.spawn(state);
        let animator = ViewAnimator::new(toolkit.clone(), view);

        let unit = together([
            animator.alpha(1.0, Tween::millis(500)),
            animator.scale(1.0, Tween::millis(500)),
        ]);
        let elapsed = toolkit.run(unit).unwrap();

        let state = toolkit.state(view).unwrap();
        assert_eq!(elapsed, Duration::from_millis(500));
        assert_eq!(state.alpha, 1.0);
        assert_eq!(state.scale, Vec2::ONE);
    }

    #[test]
    fn scale_then_rotate() {
        let toolkit = Headless::new();
        let view =
            toolkit.spawn(ViewState::default().with_scale(0.5));
        let animator = ViewAnimator::new(toolkit.clone(), view);

        let unit = sequentially([
            animator.scale(1.0, Tween::millis(300)),
            animator.rotation(360.0, Tween::millis(300)),
        ]);

        let mut playback = Playback::new(&toolkit);
        let outcome = playback.spawn(unit);
        while !outcome.is_done() {
            playback.step();
            let state = toolkit.state(view).unwrap();
            if state.rotation.z != 0.0 {
                assert_eq!(state.scale, Vec2::ONE);
            }
        }

        assert_eq!(outcome.result(), Some(Ok(())));
        let finished_at = outcome.finished_at();
        assert_eq!(finished_at, Some(Duration::from_millis(600)));
        assert_eq!(toolkit.state(view).unwrap().rotation.z, 360.0);

        let history = toolkit.history();
        let scale_done = history
            .iter()
            .find(|e| e.id == 0 && e.kind == EventKind::Finished)
            .map(|e| e.at);
        let rotation_requested = history
            .iter()
            .find(|e| e.id == 1 && e.kind == EventKind::Requested)
            .map(|e| e.at);
        assert_eq!(scale_done, Some(Duration::from_millis(300)));
        assert_eq!(rotation_requested, scale_done);
    }

    #[test]
    fn reverse_restores_snapshot_exactly() {
        let toolkit = Headless::new();
        let start = ViewState::default()
            .with_alpha(0.37)
            .with_rotation(Vec3::new(3.3, -7.1, 12.9))
            .with_translation(Vec3::new(1.1, 2.2, 0.0));
        let view = toolkit.spawn(start.clone());
        let animator = ViewAnimator::new(toolkit.clone(), view);

        let unit = together([
            animator.alpha(0.91, Tween::millis(130).reversed()),
            animator.rotation(181.7, Tween::millis(70).reversed()),
            animator.rotation_x(-45.0, Tween::millis(90).reversed()),
            animator.rotation_y(33.3, Tween::millis(50).reversed()),
            animator.translation(
                13.7,
                -4.4,
                Tween::millis(110).reversed(),
            ),
        ]);
        toolkit.run(unit).unwrap();

        assert_eq!(toolkit.state(view).unwrap(), start);
    }

    #[test]
    fn backward_leg_skips_start_delay() {
        let toolkit = Headless::new();
        let view = toolkit.spawn(ViewState::default());
        let animator = ViewAnimator::new(toolkit.clone(), view);

        let tween = Tween::millis(100)
            .with_start_delay(Duration::from_millis(50))
            .reversed();
        let elapsed = toolkit.run(animator.fade_out(tween)).unwrap();

        assert_eq!(elapsed, Duration::from_millis(250));
        assert_eq!(toolkit.state(view).unwrap().alpha, 1.0);
    }

    #[test]
    fn translation_is_in_dp() {
        let toolkit = Headless::new().with_density(Density(2.0));
        let view = toolkit.spawn(ViewState::default());
        let animator = ViewAnimator::new(toolkit.clone(), view);

        toolkit
            .run(animator.translation(10.0, -3.0, Tween::millis(50)))
            .unwrap();
        assert_eq!(
            toolkit.state(view).unwrap().translation,
            Vec3::new(20.0, -6.0, 0.0)
        );

        // The way back targets the pixels captured at request time.
        let tween = Tween::millis(50).reversed();
        toolkit.run(animator.translation_x(4.0, tween)).unwrap();
        assert_eq!(toolkit.state(view).unwrap().translation.x, 20.0);
    }

    #[test]
    fn xyz_animates_given_axes_only() {
        let toolkit = Headless::new();
        let view = toolkit.spawn(
            ViewState::default()
                .with_origin(Vec2::new(100.0, 50.0))
                .with_elevation(2.0),
        );
        let animator = ViewAnimator::new(toolkit.clone(), view);

        let tween = Tween::millis(50);
        toolkit
            .run(animator.xyz(Some(120.0), None, Some(8.0), tween))
            .unwrap();
        let state = toolkit.state(view).unwrap();
        assert_eq!(state.translation, Vec3::new(20.0, 0.0, 6.0));

        toolkit.run(animator.y(10.0, Tween::millis(50))).unwrap();
        assert_eq!(toolkit.state(view).unwrap().translation.y, -40.0);
    }

    #[test]
    fn per_axis_scale() {
        let toolkit = Headless::new();
        let view = toolkit.spawn(ViewState::default());
        let animator = ViewAnimator::new(toolkit.clone(), view);

        let unit = animator
            .scale_x(2.0, Tween::millis(40))
            .merge_with(animator.scale_y(0.5, Tween::millis(60)));
        assert_eq!(toolkit.run(unit), Ok(Duration::from_millis(60)));
        let scale = toolkit.state(view).unwrap().scale;
        assert_eq!(scale, Vec2::new(2.0, 0.5));
    }

    #[test]
    fn snapshot_of_detached_view_fails() {
        let toolkit = Headless::new();
        let view = toolkit.spawn(ViewState::default());
        toolkit.detach(view);

        let unit = ViewAnimator::new(toolkit.clone(), view)
            .alpha(0.0, Tween::millis(10).reversed());
        assert!(matches!(
            toolkit.run(unit),
            Err(AnimationError::Detached { .. })
        ));
    }

    #[test]
    fn cancelled_chain_starts_no_backward_leg() {
        let toolkit = Headless::new();
        let view = toolkit.spawn(ViewState::default());
        let animator = ViewAnimator::new(toolkit.clone(), view);

        let (unit, handle) = animator
            .alpha(0.0, Tween::millis(100).reversed())
            .cancellable();

        let mut playback = Playback::new(&toolkit);
        let outcome = playback.spawn(unit);
        playback.advance(Duration::from_millis(50));
        handle.cancel();
        playback.advance(Duration::from_millis(200));

        let result = outcome.result();
        assert_eq!(result, Some(Err(AnimationError::Cancelled)));
        let alpha = toolkit.state(view).unwrap().alpha;
        assert!(alpha > 0.0 && alpha < 1.0, "{alpha}");
        assert!(toolkit
            .history()
            .iter()
            .all(|e| e.id == 0 && e.kind != EventKind::Finished));
    }

    #[test]
    fn each_view_animates_together() {
        let toolkit = Headless::new();
        let views: Vec<_> = (0..3)
            .map(|_| {
                toolkit.spawn(ViewState::default().with_alpha(0.0))
            })
            .collect();

        let unit = each(&toolkit, views.iter().copied(), |animator| {
            animator.fade_in(Tween::millis(100))
        });
        assert_eq!(toolkit.run(unit), Ok(Duration::from_millis(100)));

        for view in views {
            assert_eq!(toolkit.state(view).unwrap().alpha, 1.0);
        }
    }

    #[test]
    fn reverse_targets_value_at_request_time() {
        let toolkit = Headless::new();
        let view = toolkit.spawn(ViewState::default());
        let animator = ViewAnimator::new(toolkit.clone(), view);

        // Both units are requested while the scale is still 1.
        let unit = sequentially([
            animator.scale(2.0, Tween::millis(100)),
            animator.scale(0.5, Tween::millis(100).reversed()),
        ]);
        assert_eq!(toolkit.run(unit), Ok(Duration::from_millis(300)));
        assert_eq!(toolkit.state(view).unwrap().scale, Vec2::ONE);

        // Requested once the first unit finished, at scale 2.
        let unit = animator
            .scale(2.0, Tween::millis(100))
            .and_then_with({
                let animator = animator.clone();
                move || {
                    animator.scale(0.5, Tween::millis(100).reversed())
                }
            });
        toolkit.run(unit).unwrap();
        let scale = toolkit.state(view).unwrap().scale;
        assert_eq!(scale, Vec2::splat(2.0));
    }

    #[test]
    fn flow_staggers_starts() {
        let toolkit = Headless::new();
        let views: Vec<_> = (0..3)
            .map(|_| {
                toolkit.spawn(ViewState::default().with_alpha(0.0))
            })
            .collect();

        let unit = views
            .iter()
            .map(|&view| {
                ViewAnimator::new(toolkit.clone(), view)
                    .fade_in(Tween::millis(100))
            })
            .ord_flow(&toolkit, Duration::from_millis(100));
        assert_eq!(toolkit.run(unit), Ok(Duration::from_millis(300)));

        let requested: Vec<_> = toolkit
            .history()
            .iter()
            .filter(|e| e.kind == EventKind::Requested)
            .filter_map(|e| match e.activity {
                Activity::Properties(view) => Some((view, e.at)),
                _ => None,
            })
            .collect();
        let expected: Vec<_> = views
            .iter()
            .zip([0, 100, 200].map(Duration::from_millis))
            .map(|(&view, at)| (view, at))
            .collect();
        assert_eq!(requested, expected);
        for view in views {
            assert_eq!(toolkit.state(view).unwrap().alpha, 1.0);
        }
    }

    #[test]
    fn empty_combinators_touch_nothing() {
        let toolkit = Headless::new();
        let none: [Completion; 0] = [];

        assert_eq!(toolkit.run(together(none)), Ok(Duration::ZERO));
        let none: [Completion; 0] = [];
        let unit = sequentially(none);
        assert_eq!(toolkit.run(unit), Ok(Duration::ZERO));
        let unit = each(&toolkit, [], |a| a.fade_in(Tween::new()));
        assert_eq!(toolkit.run(unit), Ok(Duration::ZERO));
        assert!(toolkit.history().is_empty());
    }
}
