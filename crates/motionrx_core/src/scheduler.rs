use core::time::Duration;

use crate::completion::{AnimationGuard, Completer, Completion};
use crate::error::AnimationError;

/// An explicit timer source, usually the host toolkit's main-thread
/// handler.
pub trait Scheduler {
    /// Fires `done` once `delay` has elapsed.
    fn schedule(
        &self,
        delay: Duration,
        done: Completer,
    ) -> Result<AnimationGuard, AnimationError>;
}

/// A unit that completes once `duration` has elapsed on `scheduler`.
pub fn delay<S>(scheduler: &S, duration: Duration) -> Completion
where
    S: Scheduler + Clone + 'static,
{
    let scheduler = scheduler.clone();
    Completion::create("delay", move |done| {
        scheduler.schedule(duration, done)
    })
}
