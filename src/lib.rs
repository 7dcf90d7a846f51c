//! [`Completion`]: motionrx_core::completion::Completion
//! [`together`]: motionrx_core::ordering::together
//! [`sequentially`]: motionrx_core::ordering::sequentially
//!
//! motionrx composes widget animations as futures. Every animation a
//! host toolkit runs becomes a [`Completion`] that resolves once when
//! the toolkit reports the end of the animation. Completions are
//! combined with [`together`] and [`sequentially`] instead of nesting
//! end-of-animation listeners.
//!
//! ```
//! # #[cfg(feature = "view")] {
//! use core::time::Duration;
//! use motionrx::prelude::*;
//! use motionrx::view::headless::{Headless, ViewState};
//!
//! let toolkit = Headless::new();
//! let state = ViewState::default().with_alpha(0.0).with_scale(0.5);
//! let view = toolkit.spawn(state);
//! let animator = ViewAnimator::new(toolkit.clone(), view);
//!
//! let intro = sequentially([
//!     together([
//!         animator.fade_in(Tween::millis(500)),
//!         animator.scale(1.0, Tween::millis(500)),
//!     ]),
//!     animator.rotation(360.0, Tween::millis(300)),
//! ])
//! // Snapshots are taken on request, so press once scaled up.
//! .and_then_with({
//!     let animator = animator.clone();
//!     move || animator.press()
//! });
//!
//! assert_eq!(toolkit.run(intro), Ok(Duration::from_millis(1100)));
//! assert_eq!(toolkit.state(view).unwrap().scale.x, 1.0);
//! # }
//! ```

pub use motionrx_core;

#[cfg(feature = "view")]
pub use motionrx_view as view;

pub mod prelude {
    pub use motionrx_core::prelude::*;

    #[cfg(feature = "view")]
    pub use motionrx_view::prelude::*;
}
