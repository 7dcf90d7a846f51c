//! Free-form value animations driven by the toolkit's value
//! animator, for properties the native property animator does not
//! cover (layout sizes, colors, corner radii, ...).

use std::cell::RefCell;
use std::rc::Rc;

use motionrx_core::prelude::*;

use crate::config::AnimationDefaults;
use crate::toolkit::{Timing, Toolkit};
use crate::tween::Tween;

/// Shared frame sink, so the forward and backward legs can write
/// through the same callback.
pub(crate) type Apply<V> =
    Rc<RefCell<dyn FnMut(V) -> Result<(), AnimationError>>>;

/// Animates from `from` to `to`, handing every interpolated value to
/// `apply`.
pub fn animate_value<T, V>(
    toolkit: &T,
    from: V,
    to: V,
    timing: Timing,
    apply: impl FnMut(V) -> Result<(), AnimationError> + 'static,
) -> Completion
where
    T: Toolkit,
    V: Interpolation + Clone + 'static,
{
    value_leg(toolkit, from, to, timing, Rc::new(RefCell::new(apply)))
}

pub(crate) fn value_leg<T, V>(
    toolkit: &T,
    from: V,
    to: V,
    timing: Timing,
    apply: Apply<V>,
) -> Completion
where
    T: Toolkit,
    V: Interpolation + Clone + 'static,
{
    let toolkit = toolkit.clone();
    Completion::create("value", move |done| {
        let on_frame = Box::new(move |t: f32| {
            let value = V::interp(&from, &to, t);
            (&mut *apply.borrow_mut())(value)
        });
        toolkit.animate_fraction(&timing, on_frame, done)
    })
}

/// A value animation from `from` to `to` that optionally returns to
/// `from` afterwards. The start delay only applies to the forward
/// leg.
pub(crate) fn reversible_value<T, V>(
    toolkit: &T,
    from: V,
    to: V,
    tween: Tween,
    defaults: &AnimationDefaults,
    apply: Apply<V>,
) -> Completion
where
    T: Toolkit,
    V: Interpolation + Clone + 'static,
{
    let forward = value_leg(
        toolkit,
        from.clone(),
        to.clone(),
        tween.forward(defaults),
        apply.clone(),
    );

    let toolkit = toolkit.clone();
    let backward = tween.backward(defaults);
    forward.reverse_with(tween.reverse, move || {
        value_leg(&toolkit, to, from, backward, apply)
    })
}

/// Animates a float range, e.g. a custom corner radius. Unset
/// fields of `tween` fall back to `defaults`.
pub fn range_float<T: Toolkit>(
    toolkit: &T,
    defaults: &AnimationDefaults,
    (from, to): (f32, f32),
    tween: Tween,
    mut action: impl FnMut(f32) + 'static,
) -> Completion {
    let apply: Apply<f32> = Rc::new(RefCell::new(
        move |v: f32| -> Result<(), AnimationError> {
            action(v);
            Ok(())
        },
    ));
    reversible_value(toolkit, from, to, tween, defaults, apply)
}

/// Animates an integer range.
pub fn range_int<T: Toolkit>(
    toolkit: &T,
    defaults: &AnimationDefaults,
    (from, to): (i32, i32),
    tween: Tween,
    mut action: impl FnMut(i32) + 'static,
) -> Completion {
    let apply: Apply<i32> = Rc::new(RefCell::new(
        move |v: i32| -> Result<(), AnimationError> {
            action(v);
            Ok(())
        },
    ));
    reversible_value(toolkit, from, to, tween, defaults, apply)
}
