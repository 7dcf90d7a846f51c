//! [`Toolkit`]: toolkit::Toolkit
//! [`ViewAnimator`]: animator::ViewAnimator
//! [`Tween`]: tween::Tween
//!
//! # motionrx view
//!
//! Widget animations on top of [`motionrx_core`].
//!
//! - **[`Toolkit`]**: the host widget toolkit, reached through its
//!   native property animator and a free-form value animator.
//!
//! - **[`ViewAnimator`]**: builds reversible completions for one
//!   widget: fades, translations, scales, rotations, positions,
//!   sizes, background colors, shakes, presses and text swaps.
//!
//! - **[`Tween`]**: per request duration, ease, start delay and
//!   reverse flag, falling back to
//!   [`AnimationDefaults`](config::AnimationDefaults).
//!
//! The `headless` feature provides an in-memory toolkit stepped by a
//! manual clock.

pub mod animator;
pub mod color;
pub mod config;
pub mod effect;
pub mod layout;
pub mod toolkit;
pub mod tween;
pub mod units;
pub mod value;

#[cfg(feature = "headless")]
pub mod headless;

pub mod prelude {
    pub use crate::animator::{each, ViewAnimator};
    pub use crate::config::{AnimationDefaults, ConfigError};
    pub use crate::toolkit::{
        Axis, FloatProperty, PropertyAnimation, Timing, Toolkit,
        ViewId,
    };
    pub use crate::tween::Tween;
    pub use crate::units::Density;
    pub use crate::value::{animate_value, range_float, range_int};

    pub use motionrx_core::prelude::*;
}
