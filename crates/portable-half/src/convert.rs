//! Format dispatch: routes any supported primitive to the cast routine of the
//! resolved type for a format.
//!
//! The per-format entry points ([`cast_to_half`], [`cast_from_bhalf`], ...)
//! are thin wrappers over the generic trampolines [`cast_to_wrapper`] and
//! [`cast_from_wrapper`], which is how the generic wrapper stays
//! format-agnostic. Every conversion is total: out-of-range and
//! precision-losing inputs silently round or saturate per the underlying
//! conversion's policy, and nothing here adds overflow checking on top.

use crate::storage::HalfStorage;
use crate::wrapper::FloatWrapper;
use crate::{PortableFloat, bhalf16, half16};

/// The closed set of numeric primitives the cast entry points accept and
/// produce.
///
/// Conversions travel through `f64`, which holds every supported width
/// exactly, so narrowing happens in a single rounding step.
pub trait Primitive: Copy {
    /// Widens to `f64` without loss.
    fn into_f64(self) -> f64;

    /// Narrows from `f64`, saturating or rounding silently.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_primitive_int {
    ($($ty:ty),*) => {$(
        impl Primitive for $ty {
            #[inline]
            fn into_f64(self) -> f64 {
                self as f64
            }

            // `as` saturates at the target's bounds and maps NaN to zero.
            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $ty
            }
        }
    )*};
}

impl_primitive_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl Primitive for f32 {
    #[inline]
    fn into_f64(self) -> f64 {
        f64::from(self)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Primitive for f64 {
    #[inline]
    fn into_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

impl Primitive for bool {
    #[inline]
    fn into_f64(self) -> f64 {
        if self { 1.0 } else { 0.0 }
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value != 0.0
    }
}

// The wrapper is itself a member of the set, which yields the identity cast
// and cross-format casts through the same entry points.
impl<S: HalfStorage> Primitive for FloatWrapper<S> {
    #[inline]
    fn into_f64(self) -> f64 {
        self.to_f64()
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        FloatWrapper::from_f64(value)
    }
}

/// Narrows any supported primitive into the resolved binary16 type.
#[inline]
pub fn cast_to_half<T: Primitive>(value: T) -> half16 {
    cast_to_wrapper(value)
}

/// Widens the resolved binary16 type back out to `T`.
#[inline]
pub fn cast_from_half<T: Primitive>(value: half16) -> T {
    cast_from_wrapper(value)
}

/// Narrows any supported primitive into the resolved bfloat16 type.
#[inline]
pub fn cast_to_bhalf<T: Primitive>(value: T) -> bhalf16 {
    cast_to_wrapper(value)
}

/// Widens the resolved bfloat16 type back out to `T`.
#[inline]
pub fn cast_from_bhalf<T: Primitive>(value: bhalf16) -> T {
    cast_from_wrapper(value)
}

/// Routes a primitive to whichever resolution `H` is, real wrapper or `f32`
/// fallback.
#[inline]
pub fn cast_to_wrapper<H: PortableFloat, T: Primitive>(value: T) -> H {
    H::from_f64(value.into_f64())
}

/// Routes a resolved value back out to a primitive.
#[inline]
pub fn cast_from_wrapper<T: Primitive, H: PortableFloat>(value: H) -> T {
    T::from_f64(value.to_f64())
}
