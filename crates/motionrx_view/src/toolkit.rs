//! The boundary between motionrx and the host widget toolkit.
//!
//! A [`Toolkit`] owns the widgets and their animators. motionrx only
//! reads properties, describes animations and waits for the
//! toolkit's end callbacks.

use core::fmt::Debug;
use core::hash::Hash;
use core::time::Duration;

use bevy_color::Srgba;
use bevy_math::UVec2;
use motionrx_core::prelude::*;
use smallvec::SmallVec;

/// An identifier of a widget living inside a [`Toolkit`].
pub trait ViewId: Debug + Copy + Eq + Hash + 'static {}

impl<T> ViewId for T where T: Debug + Copy + Eq + Hash + 'static {}

/// A float property driven by the toolkit's native property animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FloatProperty {
    Alpha,
    TranslationX,
    TranslationY,
    ScaleX,
    ScaleY,
    /// Rotation around the z axis, in degrees.
    Rotation,
    RotationX,
    RotationY,
    /// Horizontal position, `left + translation_x`, in pixels.
    X,
    /// Vertical position, `top + translation_y`, in pixels.
    Y,
    /// Depth, `elevation + translation_z`, in pixels.
    Z,
}

/// A layout dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Width,
    Height,
}

/// Fully resolved timing of one toolkit animation.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub duration: Duration,
    pub ease: Ease,
    pub start_delay: Duration,
}

impl Timing {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            ease: Ease::default(),
            start_delay: Duration::ZERO,
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn with_start_delay(mut self, start_delay: Duration) -> Self {
        self.start_delay = start_delay;
        self
    }
}

/// A request for the native property animator: move each listed
/// property from its current value to the target.
#[derive(Debug, Clone)]
pub struct PropertyAnimation {
    pub targets: SmallVec<[(FloatProperty, f32); 2]>,
    pub timing: Timing,
}

impl PropertyAnimation {
    pub fn new(timing: Timing) -> Self {
        Self {
            targets: SmallVec::new(),
            timing,
        }
    }

    /// Adds or replaces the target of `property`.
    pub fn with(
        mut self,
        property: FloatProperty,
        target: f32,
    ) -> Self {
        match self.targets.iter_mut().find(|(p, _)| *p == property) {
            Some((_, value)) => *value = target,
            None => self.targets.push((property, target)),
        }
        self
    }

    pub fn target(&self, property: FloatProperty) -> Option<f32> {
        self.targets
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }
}

/// Per-frame callback of the value animator, receiving the eased
/// fraction. Returning an error stops the animation and fails its
/// completion.
pub type FrameFn = Box<dyn FnMut(f32) -> Result<(), AnimationError>>;

/// The host widget toolkit.
///
/// Implementations are cheap handles (usually reference counted) to
/// the toolkit living on the UI thread. Every accessor fails with
/// [`AnimationError::Detached`] for views that are no longer part of
/// the toolkit.
pub trait Toolkit: Scheduler + Clone + 'static {
    type View: ViewId;

    /// Display density used for dp to px conversions.
    fn density(&self) -> crate::units::Density;

    fn property(
        &self,
        view: Self::View,
        property: FloatProperty,
    ) -> Result<f32, AnimationError>;

    /// Laid out size in pixels.
    fn size(&self, view: Self::View) -> Result<UVec2, AnimationError>;

    /// Changes the layout size along `axis` and requests a relayout.
    fn set_size(
        &self,
        view: Self::View,
        axis: Axis,
        px: u32,
    ) -> Result<(), AnimationError>;

    fn background_color(
        &self,
        view: Self::View,
    ) -> Result<Srgba, AnimationError>;

    fn set_background_color(
        &self,
        view: Self::View,
        color: Srgba,
    ) -> Result<(), AnimationError>;

    fn text(
        &self,
        view: Self::View,
    ) -> Result<String, AnimationError>;

    fn set_text(
        &self,
        view: Self::View,
        text: &str,
    ) -> Result<(), AnimationError>;

    /// Starts the native property animator on `view`. `done` must be
    /// fired once, when the animation ended.
    fn animate_properties(
        &self,
        view: Self::View,
        animation: &PropertyAnimation,
        done: Completer,
    ) -> Result<AnimationGuard, AnimationError>;

    /// Starts a free-form value animator calling `on_frame` with the
    /// eased fraction every frame, ending with the fraction at
    /// `t = 1.0`.
    fn animate_fraction(
        &self,
        timing: &Timing,
        on_frame: FrameFn,
        done: Completer,
    ) -> Result<AnimationGuard, AnimationError>;
}
