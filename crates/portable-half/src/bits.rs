use core::cmp::Ordering;
use core::marker::PhantomData;

use crate::convert::Primitive;
use crate::storage::HalfStorage;
use crate::wrapper::FloatWrapper;

/// A raw 16-bit pattern of one format.
///
/// Exists so the exponent and fraction masks can be spelled as integer
/// literals: no floating-point literal can express those patterns in every
/// layout. The pattern is interpreted as a real value only at a comparison
/// site, never at construction.
#[derive(Clone, Copy, Debug)]
pub struct BitPattern<S: HalfStorage> {
    bits: u16,
    _storage: PhantomData<S>,
}

impl<S: HalfStorage> BitPattern<S> {
    /// Wraps a literal bit pattern. Cannot fail.
    #[must_use]
    pub const fn new(bits: u16) -> Self {
        Self {
            bits,
            _storage: PhantomData,
        }
    }

    /// The raw pattern.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.bits
    }

    /// Reinterprets the pattern as a value of the wrapper type.
    #[inline]
    #[must_use]
    pub fn reinterpret(self) -> FloatWrapper<S> {
        FloatWrapper::from_bits(self.bits)
    }
}

impl<S: HalfStorage, N: Primitive> PartialEq<N> for BitPattern<S> {
    #[inline]
    fn eq(&self, other: &N) -> bool {
        self.reinterpret().to_f64() == (*other).into_f64()
    }
}

impl<S: HalfStorage, N: Primitive> PartialOrd<N> for BitPattern<S> {
    #[inline]
    fn partial_cmp(&self, other: &N) -> Option<Ordering> {
        self.reinterpret()
            .to_f64()
            .partial_cmp(&(*other).into_f64())
    }
}
