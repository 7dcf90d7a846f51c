//! [`Completion`]: completion::Completion
//! [`Completer`]: completion::Completer
//! [`together`]: ordering::together
//! [`sequentially`]: ordering::sequentially
//! [`Scheduler`]: scheduler::Scheduler
//!
//! # motionrx core
//!
//! The toolkit-agnostic half of motionrx: a single-completion unit
//! and the combinators that compose it.
//!
//! - **[`Completion`]**: a lazy future that resolves exactly once,
//!   with no payload, when the animation(s) it stands for ended. It
//!   carries an [`AnimationError`](error::AnimationError) channel so
//!   a lost toolkit callback surfaces as an error instead of a hang.
//!
//! - **[`Completer`]**: the callback end of a completion, handed to
//!   the host toolkit when the animation is started.
//!
//! - **[`together`] / [`sequentially`]**: fan-out/join-all and
//!   strictly ordered chaining. Both complete immediately when given
//!   nothing.
//!
//! - **[`Scheduler`]**: an explicit timer source, used by
//!   [`delay`](scheduler::delay) and [`flow`](ordering::flow).

pub mod completion;
pub mod ease;
pub mod error;
pub mod interpolation;
pub mod ordering;
pub mod scheduler;

pub mod prelude {
    pub use crate::completion::{
        AnimationGuard, CancelHandle, Completer, Completion,
    };
    pub use crate::ease::{Ease, EaseFn};
    pub use crate::error::{AnimationError, AnimationResult};
    pub use crate::interpolation::Interpolation;
    pub use crate::ordering::{
        any, flow, sequentially, together, CompletionOrdering,
    };
    pub use crate::scheduler::{delay, Scheduler};
}
