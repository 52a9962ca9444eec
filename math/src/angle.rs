use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::{FixedPoint, finecosine, finesine};

pub const ANG45: u32 = 0x2000_0000;
pub const ANG90: u32 = 0x4000_0000;
pub const ANG180: u32 = 0x8000_0000;
pub const ANG270: u32 = 0xc000_0000;

/// Shift from a BAM to an index into the fine tables
pub const ANGLETOFINESHIFT: u32 = 19;

/// A binary angle (BAM). A full turn is `2^32`, so every operation wraps.
#[derive(Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Angle(u32);

impl Angle {
    pub const ZERO: Angle = Angle(0);
    pub const DEG45: Angle = Angle(ANG45);
    pub const DEG90: Angle = Angle(ANG90);
    pub const DEG180: Angle = Angle(ANG180);
    pub const DEG270: Angle = Angle(ANG270);

    #[inline]
    pub const fn new(bam: u32) -> Self {
        Angle(bam)
    }

    #[inline]
    pub const fn bam(self) -> u32 {
        self.0
    }

    /// The same bits read as a signed angle in `(-180°, 180°]`
    #[inline]
    pub const fn signed(self) -> i32 {
        self.0 as i32
    }

    /// Index into `finesine`/`finecosine`/`finetangent`
    #[inline]
    pub const fn fine(self) -> usize {
        (self.0 >> ANGLETOFINESHIFT) as usize
    }

    #[inline]
    pub fn sin(self) -> FixedPoint {
        finesine(self.fine())
    }

    #[inline]
    pub fn cos(self) -> FixedPoint {
        finecosine(self.fine())
    }

    /// Absolute angular distance from zero, as an unsigned BAM
    #[inline]
    pub const fn abs(self) -> Angle {
        Angle((self.0 as i32).unsigned_abs())
    }

    pub fn from_degrees(degrees: f64) -> Self {
        let turns = (degrees / 360.0).rem_euclid(1.0);
        Angle((turns * 4_294_967_296.0) as u64 as u32)
    }

    pub fn to_degrees(self) -> f64 {
        self.0 as f64 * 360.0 / 4_294_967_296.0
    }
}

impl fmt::Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Angle({:#010x} ~{:.2}°)", self.0, self.to_degrees())
    }
}

impl Add for Angle {
    type Output = Angle;

    #[inline]
    fn add(self, other: Angle) -> Angle {
        Angle(self.0.wrapping_add(other.0))
    }
}

impl AddAssign for Angle {
    #[inline]
    fn add_assign(&mut self, other: Angle) {
        self.0 = self.0.wrapping_add(other.0);
    }
}

impl Sub for Angle {
    type Output = Angle;

    #[inline]
    fn sub(self, other: Angle) -> Angle {
        Angle(self.0.wrapping_sub(other.0))
    }
}

impl SubAssign for Angle {
    #[inline]
    fn sub_assign(&mut self, other: Angle) {
        self.0 = self.0.wrapping_sub(other.0);
    }
}

impl Neg for Angle {
    type Output = Angle;

    #[inline]
    fn neg(self) -> Angle {
        Angle(self.0.wrapping_neg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_around() {
        let a = Angle::DEG270 + Angle::DEG180;
        assert_eq!(a, Angle::DEG90);
        let b = Angle::ZERO - Angle::DEG90;
        assert_eq!(b, Angle::DEG270);
        assert_eq!(-Angle::DEG90, Angle::DEG270);
    }

    #[test]
    fn signed_and_abs() {
        assert_eq!(Angle::DEG270.signed(), -(ANG90 as i32));
        assert_eq!(Angle::DEG270.abs(), Angle::DEG90);
        assert_eq!(Angle::DEG180.abs(), Angle::DEG180);
    }

    #[test]
    fn degrees() {
        assert_eq!(Angle::from_degrees(90.0), Angle::DEG90);
        assert_eq!(Angle::from_degrees(-90.0), Angle::DEG270);
        assert!((Angle::DEG45.to_degrees() - 45.0).abs() < 1e-9);
        assert_eq!(Angle::DEG90.fine(), 2048);
    }
}
