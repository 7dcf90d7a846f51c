//! Combinators that build a [`Completion`] out of other completions.

use core::time::Duration;

use futures::future::{select_all, try_join_all};
use nonempty::NonEmpty;

use crate::completion::Completion;
use crate::scheduler::{self, Scheduler};

pub trait CompletionOrdering {
    /// Run all [`Completion`]s simultaneously.
    fn ord_together(self) -> Completion;
    /// Run all [`Completion`]s one after another.
    fn ord_sequentially(self) -> Completion;
    /// Run all [`Completion`]s simultaneously until any of them
    /// resolves.
    fn ord_any(self) -> Completion;
    /// Start one [`Completion`] after another with a fixed delay.
    fn ord_flow<S>(self, scheduler: &S, delay: Duration) -> Completion
    where
        S: Scheduler + Clone + 'static;
}

impl<T> CompletionOrdering for T
where
    T: IntoIterator<Item = Completion>,
{
    fn ord_together(self) -> Completion {
        together(self)
    }

    fn ord_sequentially(self) -> Completion {
        sequentially(self)
    }

    fn ord_any(self) -> Completion {
        any(self)
    }

    fn ord_flow<S>(self, scheduler: &S, delay: Duration) -> Completion
    where
        S: Scheduler + Clone + 'static,
    {
        flow(scheduler, delay, self)
    }
}

/// Run all [`Completion`]s together and wait for all of them to
/// finish.
///
/// Every unit is started on the first poll. The first failure drops
/// the remaining units, which cancels their animations. With no units
/// the result completes immediately.
#[must_use = "This function consumes all the given completions and returns a combined one."]
pub fn together(
    units: impl IntoIterator<Item = Completion>,
) -> Completion {
    let units: Vec<_> = units.into_iter().collect();
    if units.is_empty() {
        return Completion::complete();
    }

    tracing::trace!(count = units.len(), "together");
    Completion::from_future(async move {
        try_join_all(units).await?;
        Ok(())
    })
}

/// Run all [`Completion`]s one after another.
///
/// A unit is only started once its predecessor completed
/// successfully, the first failure ends the chain without starting
/// the rest. With no units the result completes immediately, a single
/// unit is returned as is.
#[must_use = "This function consumes all the given completions and returns a combined one."]
pub fn sequentially(
    units: impl IntoIterator<Item = Completion>,
) -> Completion {
    let Some(chain) = NonEmpty::from_vec(units.into_iter().collect())
    else {
        return Completion::complete();
    };

    if chain.tail.is_empty() {
        return chain.head;
    }

    tracing::trace!(count = chain.len(), "sequentially");
    Completion::from_future(async move {
        for unit in chain {
            unit.await?;
        }
        Ok(())
    })
}

/// Run all [`Completion`]s together and resolve with the first one
/// to resolve. The others are dropped, which cancels them.
#[must_use = "This function consumes all the given completions and returns a combined one."]
pub fn any(
    units: impl IntoIterator<Item = Completion>,
) -> Completion {
    let units: Vec<_> = units.into_iter().collect();
    if units.is_empty() {
        return Completion::complete();
    }

    Completion::from_future(async move {
        let (result, _, _rest) = select_all(units).await;
        result
    })
}

/// Start each [`Completion`] `delay` after the previous one started
/// and wait for all of them to finish.
#[must_use = "This function consumes all the given completions and returns a combined one."]
pub fn flow<S>(
    scheduler: &S,
    delay: Duration,
    units: impl IntoIterator<Item = Completion>,
) -> Completion
where
    S: Scheduler + Clone + 'static,
{
    let mut offset: Option<Duration> = None;
    together(units.into_iter().map(|unit| match offset {
        None => {
            offset = Some(Duration::ZERO);
            unit
        }
        Some(previous) => {
            let start = previous.saturating_add(delay);
            offset = Some(start);
            scheduler::delay(scheduler, start).and_then(unit)
        }
    }))
}
