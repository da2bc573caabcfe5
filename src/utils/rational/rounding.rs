use malachite::num::arithmetic::traits::RoundToMultipleOfPowerOf2;
use malachite::rounding_modes::RoundingMode;

/// Rounding to a multiple of a power of two.
pub trait RoundBinary: Sized {
    type Output;

    /// Rounds to a multiple of `2^position` in the given direction.
    fn round(self, position: i64, mode: RoundingMode) -> Self::Output;

    #[inline]
    fn round_nearest(self, position: i64) -> Self::Output {
        self.round(position, RoundingMode::Nearest)
    }
}

impl<T> RoundBinary for T
where
    T: RoundToMultipleOfPowerOf2<i64>,
{
    type Output = T::Output;

    fn round(self, position: i64, mode: RoundingMode) -> Self::Output {
        self.round_to_multiple_of_power_of_2(position, mode).0
    }
}
