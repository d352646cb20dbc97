#![cfg_attr(not(feature = "std"), no_std)]

//! Portable 16-bit floating point value types.
//!
//! No single representation of half precision exists everywhere: some targets
//! expose a fully functional native arithmetic type, some only a bit-storage
//! container, and some nothing at all. This crate presents one uniform value
//! type per 16-bit layout — binary16 ([`half16`]) and bfloat16 ([`bhalf16`])
//! — and selects the cheapest available strategy at build configuration time,
//! with no runtime branching:
//!
//! - the `binary16`/`bfloat16` features (default on) resolve each format to
//!   the real wrapper over its storage representation;
//! - with a format's feature off, its alias degenerates to plain `f32` with
//!   identity conversions;
//! - the `native-arith` feature routes arithmetic through the storage type's
//!   own operators instead of promoting through `f32`. The promotion path is
//!   the authoritative semantics either way.
//!
//! Code meant to compile under every resolution should be written against
//! [`PortableFloat`], which both the wrappers and the `f32` fallback
//! implement.

pub mod bits;
pub mod convert;
pub mod storage;
pub mod wrapper;

pub use bits::BitPattern;
pub use convert::{
    Primitive, cast_from_bhalf, cast_from_half, cast_from_wrapper, cast_to_bhalf, cast_to_half,
    cast_to_wrapper,
};
pub use storage::{HalfFormat, HalfStorage};
pub use wrapper::FloatWrapper;

/// Uniform surface over a resolved half-precision type.
///
/// Implemented by the 16-bit wrappers and by plain `f32`, so call sites
/// written against it compile unchanged whichever way a format resolves.
pub trait PortableFloat: Copy + PartialEq + PartialOrd + Send + Sync + 'static {
    /// True when this type wraps the binary16 layout.
    const IS_FLOAT16: bool;

    /// True when this type wraps the bfloat16 layout.
    const IS_BFLOAT16: bool;

    /// True for the plain `f32` fallback, which keeps full `f32` precision.
    const IS_F32_FALLBACK: bool;

    /// Narrows an `f32` into this type.
    fn from_f32(value: f32) -> Self;

    /// Narrows an `f64` into this type.
    fn from_f64(value: f64) -> Self;

    /// Widens to `f32`.
    fn to_f32(self) -> f32;

    /// Widens to `f64`.
    fn to_f64(self) -> f64;
}

impl<S: HalfStorage> PortableFloat for FloatWrapper<S> {
    const IS_FLOAT16: bool = matches!(S::FORMAT, HalfFormat::Binary16);
    const IS_BFLOAT16: bool = matches!(S::FORMAT, HalfFormat::BFloat16);
    const IS_F32_FALLBACK: bool = false;

    #[inline]
    fn from_f32(value: f32) -> Self {
        FloatWrapper::from_f32(value)
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        FloatWrapper::from_f64(value)
    }

    #[inline]
    fn to_f32(self) -> f32 {
        FloatWrapper::to_f32(self)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        FloatWrapper::to_f64(self)
    }
}

impl PortableFloat for f32 {
    const IS_FLOAT16: bool = false;
    const IS_BFLOAT16: bool = false;
    const IS_F32_FALLBACK: bool = true;

    #[inline]
    fn from_f32(value: f32) -> Self {
        value
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "binary16")] {
        /// The binary16 public type resolved for this build.
        #[allow(non_camel_case_types)]
        pub type half16 = FloatWrapper<half::f16>;

        /// True when [`half16`] is only an alias for `f32`.
        pub const HALF16_IS_F32: bool = false;
    } else {
        /// No binary16 representation on this build; the public type falls
        /// back to plain `f32` and every cast degenerates to an ordinary
        /// numeric cast.
        #[allow(non_camel_case_types)]
        pub type half16 = f32;

        /// True when [`half16`] is only an alias for `f32`.
        pub const HALF16_IS_F32: bool = true;
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "bfloat16")] {
        /// The bfloat16 public type resolved for this build.
        #[allow(non_camel_case_types)]
        pub type bhalf16 = FloatWrapper<half::bf16>;

        /// True when [`bhalf16`] is only an alias for `f32`.
        pub const BHALF16_IS_F32: bool = false;
    } else {
        /// No bfloat16 representation on this build; the public type falls
        /// back to plain `f32` and every cast degenerates to an ordinary
        /// numeric cast.
        #[allow(non_camel_case_types)]
        pub type bhalf16 = f32;

        /// True when [`bhalf16`] is only an alias for `f32`.
        pub const BHALF16_IS_F32: bool = true;
    }
}
