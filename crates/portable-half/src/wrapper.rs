use core::cmp::Ordering;
use core::fmt;
use core::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};
use core::str::FromStr;

use bytemuck::{Pod, Zeroable};
use num_traits::{Num, NumCast, One, ToPrimitive, Zero};
use paste::paste;

use crate::bits::BitPattern;
use crate::storage::{HalfFormat, HalfStorage};

/// A 16-bit floating point value over the storage representation `S`.
///
/// The wrapper never inspects the stored pattern itself: promotion, demotion
/// and the arithmetic hooks all come from [`HalfStorage`], so the same
/// machinery serves both layouts and both arithmetic strategies.
#[repr(transparent)]
#[derive(Clone, Copy, Default)]
pub struct FloatWrapper<S: HalfStorage>(S);

// Every 16-bit pattern is a defined value of the layout.
unsafe impl<S: HalfStorage> Zeroable for FloatWrapper<S> {}
unsafe impl<S: HalfStorage> Pod for FloatWrapper<S> {}

impl<S: HalfStorage> FloatWrapper<S> {
    /// The bit pattern selecting this format's exponent field.
    pub const EXPONENT_MASK: BitPattern<S> = BitPattern::new(S::FORMAT.exponent_mask());

    /// The bit pattern selecting this format's fraction field.
    pub const FRACTION_MASK: BitPattern<S> = BitPattern::new(S::FORMAT.fraction_mask());

    /// The layout this wrapper stores.
    pub const FORMAT: HalfFormat = S::FORMAT;

    /// Whether arithmetic runs natively on the storage type in this build.
    pub const NATIVE_ARITHMETIC: bool = S::NATIVE_ARITHMETIC;

    /// Reinterprets a raw pattern; no arithmetic conversion happens.
    #[inline]
    #[must_use]
    pub fn from_bits(bits: u16) -> Self {
        Self(S::from_bits(bits))
    }

    /// The raw pattern.
    #[inline]
    #[must_use]
    pub fn to_bits(self) -> u16 {
        S::to_bits(self.0)
    }

    /// Wraps a storage value as-is.
    ///
    /// Storage-only: on targets where the representation is a bare container,
    /// do not assume the value carries arithmetic meaning.
    #[inline]
    #[must_use]
    pub fn from_storage(value: S) -> Self {
        Self(value)
    }

    /// Unwraps to the storage representation. Storage-only, see
    /// [`Self::from_storage`].
    #[inline]
    #[must_use]
    pub fn to_storage(self) -> S {
        self.0
    }

    /// Narrows an `f32` into the format, rounding as the underlying
    /// conversion dictates.
    #[inline]
    #[must_use]
    pub fn from_f32(value: f32) -> Self {
        Self(S::demote(value))
    }

    /// Narrows an `f64` into the format in a single rounding step.
    #[inline]
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        Self(S::demote_f64(value))
    }

    /// Converts a `bool` to `0` or `1`.
    ///
    /// Explicit by design: a raw bit pattern of 1 is not a meaningful true
    /// value in a floating format, so `bool` never converts implicitly.
    #[inline]
    #[must_use]
    pub fn from_bool(value: bool) -> Self {
        Self::from_f32(if value { 1.0 } else { 0.0 })
    }

    /// Widens to `f32`.
    #[inline]
    #[must_use]
    pub fn to_f32(self) -> f32 {
        S::promote(self.0)
    }

    /// Widens to `f64`. The intermediate `f32` promotion is exact.
    #[inline]
    #[must_use]
    pub fn to_f64(self) -> f64 {
        S::promote(self.0) as f64
    }

    /// Truthiness after promotion, `value != 0`.
    #[inline]
    #[must_use]
    pub fn to_bool(self) -> bool {
        self.to_f32() != 0.0
    }

    /// Eager logical NOT through promotion-path truthiness.
    #[inline]
    #[must_use]
    pub fn not(self) -> bool {
        !self.to_bool()
    }

    /// Eager logical AND through promotion-path truthiness.
    ///
    /// Both operands are always evaluated before the call; unlike `&&` on
    /// `bool` this cannot short-circuit.
    #[inline]
    #[must_use]
    pub fn and(self, rhs: Self) -> bool {
        self.to_bool() && rhs.to_bool()
    }

    /// Eager logical OR through promotion-path truthiness.
    ///
    /// Both operands are always evaluated before the call; unlike `||` on
    /// `bool` this cannot short-circuit.
    #[inline]
    #[must_use]
    pub fn or(self, rhs: Self) -> bool {
        self.to_bool() || rhs.to_bool()
    }
}

impl<S: HalfStorage> From<BitPattern<S>> for FloatWrapper<S> {
    #[inline]
    fn from(pattern: BitPattern<S>) -> Self {
        Self::from_bits(pattern.bits())
    }
}

impl<S: HalfStorage> From<f32> for FloatWrapper<S> {
    #[inline]
    fn from(value: f32) -> Self {
        Self::from_f32(value)
    }
}

impl<S: HalfStorage> From<f64> for FloatWrapper<S> {
    #[inline]
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

// Integers promote through f64 (wide enough for every supported width) and
// narrow in one rounding step.
macro_rules! impl_from_int {
    ($($ty:ty),*) => {$(
        impl<S: HalfStorage> From<$ty> for FloatWrapper<S> {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::from_f64(value as f64)
            }
        }
    )*};
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl<S: HalfStorage> Neg for FloatWrapper<S> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(S::neg(self.0))
    }
}

macro_rules! impl_arith {
    ($(($op:ident, $method:ident)),*) => {$( paste! {
        impl<S: HalfStorage> $op for FloatWrapper<S> {
            type Output = Self;

            #[inline]
            fn $method(self, rhs: Self) -> Self {
                Self(S::$method(self.0, rhs.0))
            }
        }

        impl<S: HalfStorage> [<$op Assign>] for FloatWrapper<S> {
            #[inline]
            fn [<$method _assign>](&mut self, rhs: Self) {
                *self = (*self).$method(rhs);
            }
        }
    })*};
}

impl_arith!((Add, add), (Sub, sub), (Mul, mul), (Div, div), (Rem, rem));

// Mixed operands compute entirely in the wide type and return it; the wide
// operand's precision is never narrowed away. Only assigning back into the
// wrapper demotes the wide result.
macro_rules! impl_wide_arith {
    ($wide:ty, $to:ident) => {
        impl_wide_arith!($wide, $to, Add, add);
        impl_wide_arith!($wide, $to, Sub, sub);
        impl_wide_arith!($wide, $to, Mul, mul);
        impl_wide_arith!($wide, $to, Div, div);
    };
    ($wide:ty, $to:ident, $op:ident, $method:ident) => { paste! {
        impl<S: HalfStorage> $op<$wide> for FloatWrapper<S> {
            type Output = $wide;

            #[inline]
            fn $method(self, rhs: $wide) -> $wide {
                self.$to().$method(rhs)
            }
        }

        impl<S: HalfStorage> $op<FloatWrapper<S>> for $wide {
            type Output = $wide;

            #[inline]
            fn $method(self, rhs: FloatWrapper<S>) -> $wide {
                self.$method(rhs.$to())
            }
        }

        impl<S: HalfStorage> [<$op Assign>]<FloatWrapper<S>> for $wide {
            #[inline]
            fn [<$method _assign>](&mut self, rhs: FloatWrapper<S>) {
                self.[<$method _assign>](rhs.$to());
            }
        }

        impl<S: HalfStorage> [<$op Assign>]<$wide> for FloatWrapper<S> {
            #[inline]
            fn [<$method _assign>](&mut self, rhs: $wide) {
                *self = <Self as From<$wide>>::from(self.$to().$method(rhs));
            }
        }
    }};
}

impl_wide_arith!(f32, to_f32);
impl_wide_arith!(f64, to_f64);

impl<S: HalfStorage> PartialEq for FloatWrapper<S> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        S::equals(self.0, other.0)
    }
}

impl<S: HalfStorage> PartialOrd for FloatWrapper<S> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        S::compare(self.0, other.0)
    }
}

// Comparisons against a wide float promote the half operand to the same
// width, never narrow the wide one.
macro_rules! impl_wide_cmp {
    ($wide:ty, $to:ident) => {
        impl<S: HalfStorage> PartialEq<$wide> for FloatWrapper<S> {
            #[inline]
            fn eq(&self, other: &$wide) -> bool {
                (*self).$to() == *other
            }
        }

        impl<S: HalfStorage> PartialEq<FloatWrapper<S>> for $wide {
            #[inline]
            fn eq(&self, other: &FloatWrapper<S>) -> bool {
                *self == (*other).$to()
            }
        }

        impl<S: HalfStorage> PartialOrd<$wide> for FloatWrapper<S> {
            #[inline]
            fn partial_cmp(&self, other: &$wide) -> Option<Ordering> {
                (*self).$to().partial_cmp(other)
            }
        }

        impl<S: HalfStorage> PartialOrd<FloatWrapper<S>> for $wide {
            #[inline]
            fn partial_cmp(&self, other: &FloatWrapper<S>) -> Option<Ordering> {
                self.partial_cmp(&(*other).$to())
            }
        }
    };
}

impl_wide_cmp!(f32, to_f32);
impl_wide_cmp!(f64, to_f64);

impl<S: HalfStorage> fmt::Display for FloatWrapper<S> {
    /// Writes the decimal text of the value promoted to `f64`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&FloatWrapper::to_f64(*self), f)
    }
}

impl<S: HalfStorage> fmt::Debug for FloatWrapper<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&FloatWrapper::to_f64(*self), f)
    }
}

impl<S: HalfStorage> FromStr for FloatWrapper<S> {
    type Err = core::num::ParseFloatError;

    /// Parses decimal text as `f64` and narrows it into the format.
    ///
    /// This is a human-readable round trip only; the exact original bit
    /// pattern of a printed value is not guaranteed back.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<f64>().map(Self::from_f64)
    }
}

// Every width is spelled out: the num-traits defaults range-check through
// `to_u64` and return `None` out of range, but these conversions are total.
// Promoting and then narrowing with `as` saturates at the target's bounds and
// maps NaN to zero.
macro_rules! impl_to_primitive {
    ($($ty:ident),*) => {$( paste! {
        fn [<to_ $ty>](&self) -> Option<$ty> {
            Some((*self).to_f32() as $ty)
        }
    })*};
}

impl<S: HalfStorage> ToPrimitive for FloatWrapper<S> {
    impl_to_primitive!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

    fn to_f32(&self) -> Option<f32> {
        Some(FloatWrapper::to_f32(*self))
    }

    fn to_f64(&self) -> Option<f64> {
        Some(FloatWrapper::to_f64(*self))
    }
}

impl<S: HalfStorage> NumCast for FloatWrapper<S> {
    fn from<T: ToPrimitive>(n: T) -> Option<Self> {
        Some(Self::from_f32(n.to_f32()?))
    }
}

impl<S: HalfStorage> Zero for FloatWrapper<S> {
    fn zero() -> Self {
        Self::default()
    }

    fn is_zero(&self) -> bool {
        (*self).to_f32() == 0.0
    }
}

impl<S: HalfStorage> One for FloatWrapper<S> {
    fn one() -> Self {
        Self::from_f32(1.0)
    }
}

impl<S: HalfStorage> Num for FloatWrapper<S> {
    type FromStrRadixErr = <f32 as Num>::FromStrRadixErr;

    fn from_str_radix(str: &str, radix: u32) -> Result<Self, Self::FromStrRadixErr> {
        Ok(Self::from_f32(f32::from_str_radix(str, radix)?))
    }
}

#[cfg(feature = "serde")]
impl<S: HalfStorage> serde::Serialize for FloatWrapper<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        serializer.serialize_f32((*self).to_f32())
    }
}

#[cfg(feature = "serde")]
impl<'de, S: HalfStorage> serde::Deserialize<'de> for FloatWrapper<S> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        f32::deserialize(deserializer).map(Self::from_f32)
    }
}

#[cfg(test)]
mod tests {
    use half::{bf16, f16};
    use num_traits::{One, ToPrimitive, Zero};
    use pretty_assertions::assert_eq;

    use super::*;

    type Half = FloatWrapper<f16>;
    type BHalf = FloatWrapper<bf16>;

    fn half_grid() -> [Half; 6] {
        [
            Half::from_f32(0.0),
            Half::from_f32(1.0),
            Half::from_f32(-1.0),
            Half::from_f32(0.5),
            Half::from_storage(f16::MIN_POSITIVE),
            Half::from_storage(f16::MAX),
        ]
    }

    #[test]
    fn default_is_positive_zero() {
        let zero = Half::default();
        assert_eq!(zero.to_bits(), 0x0000);
        assert!(zero == 0.0f32);
    }

    #[test]
    fn bit_pattern_construction_does_not_convert() {
        let one = Half::from_bits(0x3C00);
        assert_eq!(one.to_f32(), 1.0);
        let from_pattern: Half = BitPattern::new(0x3C00).into();
        assert_eq!(from_pattern.to_bits(), 0x3C00);
    }

    #[test]
    fn integer_conversions_promote_then_narrow() {
        let two: Half = 2i32.into();
        assert_eq!(two.to_f32(), 2.0);
        let byte: Half = 255u8.into();
        assert_eq!(byte.to_f32(), 255.0);
        let negative: Half = (-7i64).into();
        assert_eq!(negative.to_f32(), -7.0);
        // 2049 is not representable with 10 fraction bits and rounds to even.
        let rounded: Half = 2049i32.into();
        assert_eq!(rounded.to_f32(), 2048.0);
    }

    #[test]
    fn bool_conversion_is_explicit_and_meaningful() {
        assert_eq!(Half::from_bool(true).to_f32(), 1.0);
        assert_eq!(Half::from_bool(false).to_bits(), 0x0000);
        assert!(Half::from_bool(true).to_bool());
    }

    #[test]
    fn storage_round_trip_is_bit_exact() {
        for value in half_grid() {
            assert_eq!(Half::from_storage(value.to_storage()).to_bits(), value.to_bits());
        }
    }

    #[test]
    fn arithmetic_rounds_to_format_precision() {
        let third = Half::from_f32(1.0) / Half::from_f32(3.0);
        assert_eq!(third.to_bits(), f16::from_f32(1.0 / 3.0).to_bits());

        let sum = Half::from_f32(1.5) + Half::from_f32(2.25);
        assert_eq!(sum.to_f32(), 3.75);
    }

    #[test]
    fn additive_inverse_cancels_for_finite_values() {
        for value in half_grid() {
            let cancelled = value + -value;
            assert_eq!(cancelled.to_f64(), 0.0);
        }
    }

    #[test]
    fn increment_then_decrement_restores_bits() {
        // Away from the rounding boundary (|a| < 2048 for binary16) adding
        // and removing one is exact.
        for start in [0.0f32, 1.0, -1.0, 0.5, 100.25, -1000.0] {
            let original = Half::from_f32(start);
            let mut value = original;
            value += Half::one();
            value -= Half::one();
            assert_eq!(value.to_bits(), original.to_bits());
        }
    }

    #[test]
    fn compound_assignment_matches_binary_operators() {
        let mut value = Half::from_f32(10.0);
        value *= Half::from_f32(0.5);
        assert_eq!(value.to_f32(), 5.0);
        value /= Half::from_f32(2.0);
        assert_eq!(value.to_f32(), 2.5);
        value %= Half::from_f32(2.0);
        assert_eq!(value.to_f32(), 0.5);
    }

    #[test]
    fn wide_operands_upcast_and_stay_wide() {
        for value in half_grid() {
            let widened: f64 = value + 1.0f64;
            assert_eq!(widened, value.to_f64() + 1.0);

            let widened: f32 = 2.0f32 * value;
            assert_eq!(widened, 2.0 * value.to_f32());
        }
    }

    #[test]
    fn wide_compound_assignment_upcasts_the_half_operand() {
        let mut acc = 1.0f64;
        acc += Half::from_f32(0.5);
        assert_eq!(acc, 1.5);

        let mut acc = 1.0f32;
        acc -= Half::from_f32(0.25);
        assert_eq!(acc, 0.75);
    }

    #[test]
    fn narrow_compound_assignment_computes_wide_then_demotes() {
        let mut value = Half::from_storage(f16::MAX);
        // The wide sum is finite; only the demotion back saturates.
        value += 1.0f64;
        assert_eq!(value.to_bits(), f16::MAX.to_bits());
    }

    #[test]
    fn comparisons_go_through_promotion() {
        assert!(Half::from_f32(1.0) < Half::from_f32(2.0));
        assert!(Half::from_f32(2.0) >= Half::from_f32(2.0));

        let nan = Half::from_bits(0x7FFF);
        assert!(nan != nan);
        assert_eq!(nan.partial_cmp(&nan), None);
    }

    #[test]
    fn wide_comparisons_promote_the_half_operand() {
        let value = Half::from_f32(1.5);
        assert!(value == 1.5f32);
        assert!(1.5f64 == value);
        assert!(value < 1.5000001f64);
        assert!(65504.0f64 <= Half::from_storage(f16::MAX));
    }

    #[test]
    fn logical_operators_are_eager_and_truthy() {
        let zero = Half::zero();
        let two = Half::from_f32(2.0);
        assert!(zero.not());
        assert!(!two.not());
        assert!(two.and(two));
        assert!(!two.and(zero));
        assert!(two.or(zero));
        assert!(!zero.or(zero));
        // NaN is truthy, as any non-zero value is.
        assert!(Half::from_bits(0x7FFF).to_bool());
    }

    #[cfg(feature = "std")]
    #[test]
    fn display_round_trips_the_test_grid() {
        for start in [0.0f32, 1.0, -1.0, 0.5, 65504.0] {
            let value = Half::from_f32(start);
            let text = value.to_string();
            let back: Half = text.parse().unwrap();
            assert_eq!(back.to_f64(), value.to_f64());
        }
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert!("not a number".parse::<Half>().is_err());
    }

    #[test]
    fn to_primitive_narrows_through_promotion() {
        let value = Half::from_f32(300.25);
        assert_eq!(value.to_i64(), Some(300));
        assert_eq!(value.to_u8(), Some(255));
        assert_eq!(ToPrimitive::to_f64(&value), Some(300.25));
    }

    #[test]
    fn to_primitive_is_total_and_saturates_every_width() {
        let value = Half::from_f32(300.25);
        assert_eq!((-value).to_i8(), Some(i8::MIN));
        assert_eq!((-value).to_u32(), Some(0));

        let max = Half::from_storage(f16::MAX);
        assert_eq!(max.to_i16(), Some(i16::MAX));
        assert_eq!(max.to_u16(), Some(65504));
        assert_eq!(max.to_usize(), Some(65504));

        // NaN maps to zero, never to None.
        let nan = Half::from_bits(0x7FFF);
        assert_eq!(nan.to_i32(), Some(0));
        assert_eq!(nan.to_u64(), Some(0));
    }

    #[test]
    fn bfloat_shares_the_machinery_with_its_own_masks() {
        let one = BHalf::from_f32(1.0);
        assert_eq!(one.to_bits(), bf16::from_f32(1.0).to_bits());
        assert_eq!((one + one).to_f32(), 2.0);
        assert_eq!(BHalf::FORMAT, HalfFormat::BFloat16);
        assert_eq!(BHalf::EXPONENT_MASK.bits(), 0x7F80);
        assert_eq!(BHalf::FRACTION_MASK.bits(), 0x007F);
    }

    #[cfg(all(feature = "serde", feature = "std"))]
    #[test]
    fn serde_round_trips_as_f32() {
        let value = Half::from_f32(1.5);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "1.5");
    }
}
