//! The single-completion unit and the adapter that bridges a
//! callback-driven toolkit animation into it.
//!
//! A [`Completion`] is a lazy future. Nothing happens until it is
//! polled for the first time, at which point the start closure
//! given to [`Completion::create`] is invoked with a [`Completer`].
//! The toolkit keeps the completer and fires it once its animation
//! ends. The completion then resolves to `Ok(())`.
//!
//! ```
//! use futures::executor::block_on;
//! use motionrx_core::prelude::*;
//!
//! // A "toolkit" that finishes synchronously.
//! let unit = Completion::create("instant", |done| {
//!     done.complete();
//!     Ok(AnimationGuard::noop())
//! });
//!
//! assert_eq!(block_on(unit), Ok(()));
//! ```

use core::fmt;
use core::future::Future;
use core::mem;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::{self, AbortHandle, Abortable, LocalBoxFuture};
use futures::FutureExt;

use crate::error::{AnimationError, AnimationResult};
use crate::ordering::{sequentially, together};

/// A delayed, exactly-once "done" signal.
///
/// It resolves to `Ok(())` when every underlying animation finished,
/// or to the first [`AnimationError`] encountered. Dropping a pending
/// completion cancels the toolkit animation it is waiting on.
#[must_use = "Completions are lazy and do nothing unless awaited."]
pub struct Completion {
    inner: LocalBoxFuture<'static, AnimationResult>,
}

impl Completion {
    /// Adapts one callback-driven toolkit animation.
    ///
    /// `start` runs on the first poll. It must hand the [`Completer`]
    /// to the toolkit and return an [`AnimationGuard`] able to stop
    /// the animation, or fail right away.
    pub fn create<F>(label: &'static str, start: F) -> Self
    where
        F: FnOnce(Completer) -> Result<AnimationGuard, AnimationError>
            + 'static,
    {
        Self::from_future(Leg {
            label,
            state: LegState::Idle(Box::new(start)),
        })
    }

    /// An already completed unit.
    pub fn complete() -> Self {
        Self::from_future(future::ready(Ok(())))
    }

    /// A unit that fails with `error` as soon as it is polled.
    pub fn error(error: AnimationError) -> Self {
        Self::from_future(future::ready(Err(error)))
    }

    pub fn from_future(
        future: impl Future<Output = AnimationResult> + 'static,
    ) -> Self {
        Self {
            inner: future.boxed_local(),
        }
    }

    /// Builds the unit only when it is first polled.
    pub fn defer(
        build: impl FnOnce() -> Completion + 'static,
    ) -> Self {
        Self::from_future(async move { build().await })
    }

    /// Runs `next` after `self` completed successfully.
    pub fn and_then(self, next: Completion) -> Self {
        sequentially([self, next])
    }

    /// Runs the unit built by `next` after `self` completed
    /// successfully. `next` is not invoked at all if `self` fails.
    pub fn and_then_with(
        self,
        next: impl FnOnce() -> Completion + 'static,
    ) -> Self {
        self.and_then(Completion::defer(next))
    }

    /// Runs `self` and `other` together.
    pub fn merge_with(self, other: Completion) -> Self {
        together([self, other])
    }

    /// Appends the unit built by `backward` when `reverse` is set.
    pub fn reverse_with(
        self,
        reverse: bool,
        backward: impl FnOnce() -> Completion + 'static,
    ) -> Self {
        if reverse {
            self.and_then_with(backward)
        } else {
            self
        }
    }

    /// Invokes `f` once `self` completed successfully.
    pub fn on_complete(self, f: impl FnOnce() + 'static) -> Self {
        Self::from_future(async move {
            self.await?;
            f();
            Ok(())
        })
    }

    /// Returns a unit that can be stopped from the outside.
    ///
    /// Cancelling resolves the unit with
    /// [`AnimationError::Cancelled`] and drops the inner chain, which
    /// stops the currently running toolkit animation and keeps later
    /// steps from starting.
    pub fn cancellable(self) -> (Completion, CancelHandle) {
        let (handle, registration) = AbortHandle::new_pair();
        let abortable = Abortable::new(self, registration);

        let completion = Self::from_future(async move {
            match abortable.await {
                Ok(result) => result,
                Err(future::Aborted) => {
                    tracing::debug!("completion cancelled");
                    Err(AnimationError::Cancelled)
                }
            }
        });

        (completion, CancelHandle(handle))
    }
}

impl Future for Completion {
    type Output = AnimationResult;

    fn poll(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}

/// Stops a [`Completion`] created by [`Completion::cancellable`].
#[derive(Debug, Clone)]
pub struct CancelHandle(AbortHandle);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.is_aborted()
    }
}

/// The one-shot callback handed to the toolkit.
///
/// Consuming methods make a second completion impossible. Dropping
/// the completer without firing it resolves the completion with
/// [`AnimationError::Interrupted`].
#[derive(Debug)]
pub struct Completer {
    tx: oneshot::Sender<AnimationResult>,
}

impl Completer {
    /// Reports that the animation ended.
    pub fn complete(self) {
        // The receiver is gone when the completion was dropped.
        let _ = self.tx.send(Ok(()));
    }

    /// Reports that the animation could not finish.
    pub fn fail(self, error: AnimationError) {
        let _ = self.tx.send(Err(error));
    }

    /// Whether the waiting completion was dropped.
    pub fn is_canceled(&self) -> bool {
        self.tx.is_canceled()
    }

    /// Converts into a callback for toolkits that may invoke their
    /// end listener more than once. Only the first call counts.
    pub fn into_callback(self) -> impl FnMut() {
        let mut completer = Some(self);
        move || {
            if let Some(completer) = completer.take() {
                completer.complete();
            }
        }
    }
}

/// Stops an in-flight toolkit animation when dropped while armed.
#[must_use = "Dropping the guard cancels the animation."]
pub struct AnimationGuard {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl AnimationGuard {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A guard for animations that cannot be stopped.
    pub fn noop() -> Self {
        Self { cancel: None }
    }

    /// Keeps the animation alive past the guard.
    pub fn disarm(mut self) {
        self.cancel = None;
    }
}

impl Drop for AnimationGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for AnimationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationGuard")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

type StartFn = Box<
    dyn FnOnce(Completer) -> Result<AnimationGuard, AnimationError>,
>;

/// A single toolkit animation, see [`Completion::create`].
struct Leg {
    label: &'static str,
    state: LegState,
}

enum LegState {
    Idle(StartFn),
    Running {
        rx: oneshot::Receiver<AnimationResult>,
        guard: AnimationGuard,
    },
    Done,
}

impl Future for Leg {
    type Output = AnimationResult;

    fn poll(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Self::Output> {
        let label = self.label;

        loop {
            match mem::replace(&mut self.state, LegState::Done) {
                LegState::Idle(start) => {
                    let (tx, rx) = oneshot::channel();
                    tracing::debug!(label, "animation started");

                    match start(Completer { tx }) {
                        Ok(guard) => {
                            self.state =
                                LegState::Running { rx, guard };
                        }
                        Err(error) => {
                            tracing::warn!(
                                label,
                                %error,
                                "animation failed to start"
                            );
                            return Poll::Ready(Err(error));
                        }
                    }
                }
                LegState::Running { mut rx, guard } => {
                    let result = match rx.poll_unpin(cx) {
                        Poll::Pending => {
                            self.state =
                                LegState::Running { rx, guard };
                            return Poll::Pending;
                        }
                        Poll::Ready(Ok(result)) => result,
                        Poll::Ready(Err(oneshot::Canceled)) => {
                            Err(AnimationError::Interrupted { label })
                        }
                    };
                    // The toolkit is done with it, nothing to cancel.
                    guard.disarm();

                    match &result {
                        Ok(()) => tracing::trace!(label, "completed"),
                        Err(error) => {
                            tracing::warn!(label, %error, "failed")
                        }
                    }
                    return Poll::Ready(result);
                }
                LegState::Done => {
                    panic!("`Completion` polled after it resolved")
                }
            }
        }
    }
}

impl Drop for Leg {
    fn drop(&mut self) {
        if let LegState::Running { .. } = self.state {
            tracing::debug!(
                label = self.label,
                "animation cancelled"
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::executor::block_on;

    use super::*;

    /// A toolkit stand-in that keeps completers until told to fire.
    #[derive(Default, Clone)]
    pub(crate) struct Manual {
        pub(crate) pending:
            Rc<RefCell<Vec<(&'static str, Completer)>>>,
        pub(crate) started: Rc<RefCell<Vec<&'static str>>>,
        pub(crate) cancelled: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Manual {
        pub(crate) fn unit(&self, label: &'static str) -> Completion {
            let this = self.clone();
            Completion::create(label, move |done| {
                this.started.borrow_mut().push(label);
                this.pending.borrow_mut().push((label, done));
                let cancelled = this.cancelled.clone();
                Ok(AnimationGuard::new(move || {
                    cancelled.borrow_mut().push(label)
                }))
            })
        }

        /// Fires the completer registered under `label`.
        pub(crate) fn finish(&self, label: &str) {
            let mut pending = self.pending.borrow_mut();
            let index = pending
                .iter()
                .position(|(l, _)| *l == label)
                .unwrap_or_else(|| {
                    panic!("`{label}` is not running")
                });
            let (_, done) = pending.remove(index);
            done.complete();
        }

        pub(crate) fn started(&self) -> Vec<&'static str> {
            self.started.borrow().clone()
        }

        pub(crate) fn cancelled(&self) -> Vec<&'static str> {
            self.cancelled.borrow().clone()
        }
    }

    #[test]
    fn lazy_until_polled() {
        let manual = Manual::default();
        let mut unit = manual.unit("a");
        assert!(manual.started().is_empty());

        assert!(block_on(poll_once(&mut unit)).is_none());
        assert_eq!(manual.started(), ["a"]);
    }

    #[test]
    fn completes_once_toolkit_fires() {
        let manual = Manual::default();
        let mut unit = manual.unit("a");

        assert!(block_on(poll_once(&mut unit)).is_none());
        manual.finish("a");
        assert_eq!(block_on(poll_once(&mut unit)), Some(Ok(())));
        assert!(manual.cancelled().is_empty());
    }

    #[test]
    fn synchronous_completion_resolves_on_first_poll() {
        let mut unit = Completion::create("sync", |done| {
            done.complete();
            Ok(AnimationGuard::noop())
        });
        assert_eq!(block_on(poll_once(&mut unit)), Some(Ok(())));
    }

    #[test]
    fn dropped_completer_interrupts() {
        let unit = Completion::create("lost", |done| {
            drop(done);
            Ok(AnimationGuard::noop())
        });
        assert_eq!(
            block_on(unit),
            Err(AnimationError::Interrupted { label: "lost" })
        );
    }

    #[test]
    fn failing_start_and_failing_toolkit() {
        let unit = Completion::create("start", |_| {
            Err(AnimationError::detached("view#1"))
        });
        assert_eq!(
            block_on(unit),
            Err(AnimationError::Detached {
                view: "\"view#1\"".into()
            })
        );

        let unit = Completion::create("fail", |done| {
            done.fail(AnimationError::Toolkit("boom".into()));
            Ok(AnimationGuard::noop())
        });
        assert_eq!(
            block_on(unit),
            Err(AnimationError::Toolkit("boom".into()))
        );
    }

    #[test]
    fn duplicate_callbacks_complete_once() {
        let fired = Rc::new(RefCell::new(0));
        let counter = fired.clone();
        let unit = Completion::create("twice", move |done| {
            let mut callback = done.into_callback();
            callback();
            callback();
            *counter.borrow_mut() += 1;
            Ok(AnimationGuard::noop())
        })
        .on_complete({
            let fired = fired.clone();
            move || *fired.borrow_mut() += 10
        });

        assert_eq!(block_on(unit), Ok(()));
        assert_eq!(*fired.borrow(), 11);
    }

    #[test]
    fn dropping_pending_unit_cancels_toolkit_animation() {
        let manual = Manual::default();
        let mut unit = manual.unit("a");
        assert!(block_on(poll_once(&mut unit)).is_none());

        drop(unit);
        assert_eq!(manual.cancelled(), ["a"]);
        // The toolkit side notices the completion is gone.
        assert!(manual.pending.borrow()[0].1.is_canceled());
    }

    #[test]
    fn cancel_handle_stops_the_chain() {
        let manual = Manual::default();
        let chain = manual.unit("a").and_then(manual.unit("b"));
        let (mut chain, handle) = chain.cancellable();

        assert!(block_on(poll_once(&mut chain)).is_none());
        handle.cancel();
        assert!(handle.is_cancelled());

        assert_eq!(
            block_on(poll_once(&mut chain)),
            Some(Err(AnimationError::Cancelled))
        );
        assert_eq!(manual.started(), ["a"]);
        assert_eq!(manual.cancelled(), ["a"]);
    }

    #[test]
    fn reverse_with_is_lazy() {
        let manual = Manual::default();
        let backward = {
            let manual = manual.clone();
            move || manual.unit("backward")
        };
        let mut unit =
            manual.unit("forward").reverse_with(true, backward);

        assert!(block_on(poll_once(&mut unit)).is_none());
        assert_eq!(manual.started(), ["forward"]);

        manual.finish("forward");
        assert!(block_on(poll_once(&mut unit)).is_none());
        assert_eq!(manual.started(), ["forward", "backward"]);

        manual.finish("backward");
        assert_eq!(block_on(poll_once(&mut unit)), Some(Ok(())));
    }

    /// Polls `unit` a single time.
    pub(crate) async fn poll_once(
        unit: &mut Completion,
    ) -> Option<AnimationResult> {
        match futures::poll!(&mut *unit) {
            Poll::Ready(result) => Some(result),
            Poll::Pending => None,
        }
    }
}
