use bevy_math::*;

/// Trait for interpolating between 2 values based on a f32 `t` value.
///
/// Implementations return `a` for `t == 0.0` and `b` for `t == 1.0`
/// exactly, which is what makes a reversed animation restore the
/// snapshotted value bit for bit.
pub trait Interpolation<T = Self, U = Self> {
    /// Interpolate between 2 values based on a f32 `t` value.
    fn interp(a: &Self, b: &T, t: f32) -> U;
}

#[macro_export]
macro_rules! impl_float_interpolation {
    ($ty:ty, $base:ty) => {
        impl $crate::interpolation::Interpolation for $ty {
            #[inline]
            fn interp(a: &Self, b: &Self, t: f32) -> Self {
                let t = <$base>::from(t);
                (*a) * (1.0 - t) + (*b) * t
            }
        }
    };
}

macro_rules! impl_rounded_interpolation {
    ($ty:ty) => {
        impl $crate::interpolation::Interpolation for $ty {
            #[inline]
            fn interp(a: &Self, b: &Self, t: f32) -> Self {
                let a = *a as f64;
                let b = *b as f64;
                let t = f64::from(t);

                (a * (1.0 - t) + b * t).round() as $ty
            }
        }
    };
}

impl_float_interpolation!(f32, f32);
impl_float_interpolation!(Vec2, f32);
impl_float_interpolation!(Vec3, f32);
impl_float_interpolation!(Vec4, f32);
impl_float_interpolation!(f64, f64);

impl_rounded_interpolation!(u8);
impl_rounded_interpolation!(u32);
impl_rounded_interpolation!(i32);

impl Interpolation for bool {
    #[inline]
    fn interp(a: &Self, b: &Self, t: f32) -> Self {
        step(*a, *b, t)
    }
}

pub mod color {
    use bevy_color::prelude::*;
    use bevy_color::Mix;

    use super::Interpolation;

    impl Interpolation for LinearRgba {
        #[inline]
        fn interp(a: &Self, b: &Self, t: f32) -> Self {
            (*a) * (1.0 - t) + (*b) * t
        }
    }

    /// Interpolated in linear space, the endpoints are returned
    /// untouched to avoid conversion round trips.
    impl Interpolation for Srgba {
        fn interp(a: &Self, b: &Self, t: f32) -> Self {
            if t == 0.0 {
                return *a;
            }
            if t == 1.0 {
                return *b;
            }

            let linear = Interpolation::interp(
                &LinearRgba::from(*a),
                &LinearRgba::from(*b),
                t,
            );
            Srgba::from(linear)
        }
    }

    impl Interpolation for Color {
        #[inline]
        fn interp(a: &Self, b: &Self, t: f32) -> Self {
            if t == 1.0 {
                return *b;
            }
            Color::mix(a, b, t)
        }
    }
}

/// Steps between two different discrete values of any type.
/// Returns `a` if `t < 1.0`, otherwise returns `b`.
#[inline]
pub fn step<T>(a: T, b: T, t: f32) -> T {
    if t < 1.0 {
        a
    } else {
        b
    }
}
