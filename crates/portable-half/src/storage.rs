use bytemuck::Pod;
use half::{bf16, f16};

/// The closed set of 16-bit layouts a wrapper can be instantiated over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HalfFormat {
    /// 1 sign bit, 5 exponent bits, 10 fraction bits (IEEE 754 binary16).
    Binary16,
    /// 1 sign bit, 8 exponent bits, 7 fraction bits (truncated `f32`).
    BFloat16,
}

impl HalfFormat {
    /// Bit pattern selecting the exponent field of this layout.
    #[must_use]
    pub const fn exponent_mask(self) -> u16 {
        match self {
            HalfFormat::Binary16 => 0b0_11111_0000000000,
            HalfFormat::BFloat16 => 0b0_11111111_0000000,
        }
    }

    /// Bit pattern selecting the fraction field of this layout.
    #[must_use]
    pub const fn fraction_mask(self) -> u16 {
        match self {
            HalfFormat::Binary16 => 0b0_00000_1111111111,
            HalfFormat::BFloat16 => 0b0_00000000_1111111,
        }
    }
}

/// A 16-bit storage representation together with its intrinsic promote and
/// demote conversions.
///
/// The provided method bodies are the promotion path: widen both operands to
/// `f32`, compute there, narrow the result back. That path defines correct
/// behavior for every operation. Implementations override them with the
/// storage type's own operators only when the build declares native
/// arithmetic, which may double-round relative to hardware that post-rounds
/// to 16 bits itself.
pub trait HalfStorage:
    Copy + Default + Pod + PartialEq + PartialOrd + Send + Sync + 'static
{
    /// The layout this representation stores.
    const FORMAT: HalfFormat;

    /// Whether arithmetic runs on the storage type itself in this build.
    const NATIVE_ARITHMETIC: bool;

    /// Reinterprets a raw pattern; no conversion happens.
    fn from_bits(bits: u16) -> Self;

    /// The raw pattern.
    fn to_bits(self) -> u16;

    /// Widens the stored pattern to `f32`.
    fn promote(self) -> f32;

    /// Narrows an `f32`, rounding as the underlying conversion dictates.
    fn demote(value: f32) -> Self;

    /// Narrows an `f64` in a single rounding step.
    fn demote_f64(value: f64) -> Self;

    #[inline]
    fn neg(value: Self) -> Self {
        Self::demote(-value.promote())
    }

    #[inline]
    fn add(lhs: Self, rhs: Self) -> Self {
        Self::demote(lhs.promote() + rhs.promote())
    }

    #[inline]
    fn sub(lhs: Self, rhs: Self) -> Self {
        Self::demote(lhs.promote() - rhs.promote())
    }

    #[inline]
    fn mul(lhs: Self, rhs: Self) -> Self {
        Self::demote(lhs.promote() * rhs.promote())
    }

    #[inline]
    fn div(lhs: Self, rhs: Self) -> Self {
        Self::demote(lhs.promote() / rhs.promote())
    }

    #[inline]
    fn rem(lhs: Self, rhs: Self) -> Self {
        Self::demote(lhs.promote() % rhs.promote())
    }

    #[inline]
    fn equals(lhs: Self, rhs: Self) -> bool {
        lhs.promote() == rhs.promote()
    }

    #[inline]
    fn compare(lhs: Self, rhs: Self) -> Option<core::cmp::Ordering> {
        lhs.promote().partial_cmp(&rhs.promote())
    }
}

macro_rules! impl_half_storage {
    ($ty:ident, $format:ident) => {
        impl HalfStorage for $ty {
            const FORMAT: HalfFormat = HalfFormat::$format;
            const NATIVE_ARITHMETIC: bool = cfg!(feature = "native-arith");

            #[inline]
            fn from_bits(bits: u16) -> Self {
                $ty::from_bits(bits)
            }

            #[inline]
            fn to_bits(self) -> u16 {
                $ty::to_bits(self)
            }

            #[inline]
            fn promote(self) -> f32 {
                self.to_f32()
            }

            #[inline]
            fn demote(value: f32) -> Self {
                $ty::from_f32(value)
            }

            #[inline]
            fn demote_f64(value: f64) -> Self {
                $ty::from_f64(value)
            }

            #[cfg(feature = "native-arith")]
            #[inline]
            fn neg(value: Self) -> Self {
                -value
            }

            #[cfg(feature = "native-arith")]
            #[inline]
            fn add(lhs: Self, rhs: Self) -> Self {
                lhs + rhs
            }

            #[cfg(feature = "native-arith")]
            #[inline]
            fn sub(lhs: Self, rhs: Self) -> Self {
                lhs - rhs
            }

            #[cfg(feature = "native-arith")]
            #[inline]
            fn mul(lhs: Self, rhs: Self) -> Self {
                lhs * rhs
            }

            #[cfg(feature = "native-arith")]
            #[inline]
            fn div(lhs: Self, rhs: Self) -> Self {
                lhs / rhs
            }

            #[cfg(feature = "native-arith")]
            #[inline]
            fn rem(lhs: Self, rhs: Self) -> Self {
                lhs % rhs
            }

            #[cfg(feature = "native-arith")]
            #[inline]
            fn equals(lhs: Self, rhs: Self) -> bool {
                lhs == rhs
            }

            #[cfg(feature = "native-arith")]
            #[inline]
            fn compare(lhs: Self, rhs: Self) -> Option<core::cmp::Ordering> {
                PartialOrd::partial_cmp(&lhs, &rhs)
            }
        }
    };
}

impl_half_storage!(f16, Binary16);
impl_half_storage!(bf16, BFloat16);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary16_masks_cover_all_non_sign_bits() {
        let format = HalfFormat::Binary16;
        assert_eq!(format.exponent_mask() & format.fraction_mask(), 0);
        assert_eq!(format.exponent_mask() | format.fraction_mask(), 0x7FFF);
    }

    #[test]
    fn bfloat16_masks_cover_all_non_sign_bits() {
        let format = HalfFormat::BFloat16;
        assert_eq!(format.exponent_mask() & format.fraction_mask(), 0);
        assert_eq!(format.exponent_mask() | format.fraction_mask(), 0x7FFF);
    }

    #[test]
    fn promote_demote_round_trips_exact_values() {
        for value in [0.0f32, 1.0, -1.0, 0.5, 2048.0] {
            assert_eq!(<f16 as HalfStorage>::demote(value).promote(), value);
            assert_eq!(<bf16 as HalfStorage>::demote(value).promote(), value);
        }
    }

    #[test]
    fn native_arithmetic_follows_build_configuration() {
        assert_eq!(
            <f16 as HalfStorage>::NATIVE_ARITHMETIC,
            cfg!(feature = "native-arith")
        );
        assert_eq!(
            <bf16 as HalfStorage>::NATIVE_ARITHMETIC,
            cfg!(feature = "native-arith")
        );
    }

    #[test]
    fn promotion_path_rounds_to_storage_precision() {
        let third = <f16 as HalfStorage>::div(
            <f16 as HalfStorage>::demote(1.0),
            <f16 as HalfStorage>::demote(3.0),
        );
        assert_eq!(third.to_bits(), f16::from_f32(1.0 / 3.0).to_bits());
    }
}
