use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Shl, Shr, Sub, SubAssign};

use crate::{FRACBITS, FRACUNIT};

/// A Doom `fixed_t`: 16.16 signed fixed point.
///
/// Addition and subtraction wrap. `Mul` is `FixedMul` and `Div` is
/// `FixedDiv`, which saturates to `i32::MAX`/`i32::MIN` when the quotient
/// would not fit.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedPoint(i32);

impl FixedPoint {
    #[inline]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Whole map units, `value << FRACBITS`
    #[inline]
    pub const fn from_int(value: i32) -> Self {
        Self(value.wrapping_shl(FRACBITS as u32))
    }

    #[inline]
    pub const fn unit() -> Self {
        Self(FRACUNIT)
    }

    #[inline]
    pub const fn zero() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn min() -> Self {
        Self(i32::MIN)
    }

    #[inline]
    pub const fn max() -> Self {
        Self(i32::MAX)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer part, rounded toward negative infinity
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRACBITS
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    /// FixedMul
    #[inline]
    pub const fn fixed_mul(self, rhs: Self) -> Self {
        Self(((self.0 as i64 * rhs.0 as i64) >> FRACBITS) as i32)
    }

    /// FixedDiv
    #[inline]
    pub const fn fixed_div(self, rhs: Self) -> Self {
        if (self.0.unsigned_abs() >> 14) >= rhs.0.unsigned_abs() {
            return if (self.0 ^ rhs.0) < 0 {
                Self(i32::MIN)
            } else {
                Self(i32::MAX)
            };
        }
        Self((((self.0 as i64) << FRACBITS) / rhs.0 as i64) as i32)
    }

    pub fn clamp(self, min: Self, max: Self) -> Self {
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }

    pub fn to_f32(self) -> f32 {
        crate::fixed_to_float(self.0)
    }
}

impl fmt::Debug for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedPoint({})", self.to_f32())
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

impl From<i16> for FixedPoint {
    fn from(value: i16) -> Self {
        Self::from_int(value as i32)
    }
}

impl Add for FixedPoint {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for FixedPoint {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for FixedPoint {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for FixedPoint {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

impl Neg for FixedPoint {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl Mul for FixedPoint {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.fixed_mul(rhs)
    }
}

impl Div for FixedPoint {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.fixed_div(rhs)
    }
}

/// Arithmetic shift, used for the 4.12 height steps
impl Shr<i32> for FixedPoint {
    type Output = Self;

    #[inline]
    fn shr(self, rhs: i32) -> Self {
        Self(self.0 >> rhs)
    }
}

impl Shl<i32> for FixedPoint {
    type Output = Self;

    #[inline]
    fn shl(self, rhs: i32) -> Self {
        Self(self.0.wrapping_shl(rhs as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::FixedPoint;
    use crate::FRACUNIT;

    #[test]
    fn fixed_mul_matches_doom() {
        let a = FixedPoint::from_int(3);
        let b = FixedPoint::new(FRACUNIT / 2);
        assert_eq!((a * b).raw(), 3 * FRACUNIT / 2);

        let neg = FixedPoint::from_int(-5);
        assert_eq!((neg * b).raw(), -5 * FRACUNIT / 2);
        // Truncates toward negative infinity like the >> in FixedMul
        assert_eq!((FixedPoint::new(-1) * FixedPoint::new(1)).raw(), -1);
    }

    #[test]
    fn fixed_div_saturates() {
        let big = FixedPoint::from_int(20000);
        let tiny = FixedPoint::new(1);
        assert_eq!(big / tiny, FixedPoint::max());
        assert_eq!(-big / tiny, FixedPoint::min());
        assert_eq!(big / FixedPoint::zero(), FixedPoint::max());
        assert_eq!(FixedPoint::min() / FixedPoint::zero(), FixedPoint::max());
        assert_eq!(
            (FixedPoint::from_int(10) / FixedPoint::from_int(4)).raw(),
            FRACUNIT * 5 / 2
        );
    }

    #[test]
    fn add_sub_wrap() {
        let max = FixedPoint::max();
        assert_eq!(max + FixedPoint::new(1), FixedPoint::min());
        assert_eq!(FixedPoint::min() - FixedPoint::new(1), max);
        assert_eq!(-FixedPoint::min(), FixedPoint::min());
    }

    #[test]
    fn shifts_are_arithmetic() {
        assert_eq!((FixedPoint::from_int(-1) >> 4).raw(), -FRACUNIT / 16);
        assert_eq!(FixedPoint::from_int(2).to_int(), 2);
        assert_eq!(FixedPoint::new(-1).to_int(), -1);
    }
}
