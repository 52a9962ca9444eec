use std::f64::consts::TAU;

use lazy_static::lazy_static;

use crate::{ANG90, ANG180, ANG270, Angle, FRACUNIT, FixedPoint};

/// Size of the fine angle tables
pub const FINEANGLES: usize = 8192;
pub const FINEMASK: usize = FINEANGLES - 1;

pub const SLOPEBITS: u32 = 11;
pub const SLOPERANGE: usize = 1 << SLOPEBITS;
/// Shift applied to a `FixedDiv` slope before indexing `tantoangle`
pub const DBITS: i32 = 16 - SLOPEBITS as i32;

lazy_static! {
    /// `finesine` with the extra quarter turn so `finecosine` can alias it
    static ref FINESINE: Vec<i32> = (0..5 * FINEANGLES / 4)
        .map(|i| {
            let a = (i as f64 + 0.5) * TAU / FINEANGLES as f64;
            (FRACUNIT as f64 * a.sin()) as i32
        })
        .collect();

    static ref FINETANGENT: Vec<i32> = (0..FINEANGLES / 2)
        .map(|i| {
            let a = (i as f64 - (FINEANGLES / 4) as f64 + 0.5) * TAU / FINEANGLES as f64;
            (FRACUNIT as f64 * a.tan()) as i32
        })
        .collect();

    static ref TANTOANGLE: Vec<u32> = (0..=SLOPERANGE)
        .map(|i| {
            let a = (i as f64 / SLOPERANGE as f64).atan();
            (0xffff_ffffu32 as f64 * a / TAU) as u32
        })
        .collect();
}

#[inline]
pub fn finesine(fine: usize) -> FixedPoint {
    FixedPoint::new(FINESINE[fine & FINEMASK])
}

#[inline]
pub fn finecosine(fine: usize) -> FixedPoint {
    FixedPoint::new(FINESINE[(fine & FINEMASK) + FINEANGLES / 4])
}

/// Tangent of a fine angle in `[-90°, 90°)`, index `0..4096`
#[inline]
pub fn finetangent(fine: usize) -> FixedPoint {
    FixedPoint::new(FINETANGENT[fine & (FINEANGLES / 2 - 1)])
}

/// Binary angle of `atan(slope / SLOPERANGE)`
#[inline]
pub fn tantoangle(slope: usize) -> Angle {
    Angle::new(TANTOANGLE[slope.min(SLOPERANGE)])
}

/// SlopeDiv. Returns an index into `tantoangle`.
#[inline]
pub fn slope_div(num: u32, den: u32) -> usize {
    if den < 512 {
        return SLOPERANGE;
    }
    let ans = (num << 3) / (den >> 8);
    (ans as usize).min(SLOPERANGE)
}

/// R_PointToAngle on a delta: the binary angle of the vector `(x, y)`.
/// Works by octant so only a 45° arctangent table is needed.
pub fn point_to_angle(x: FixedPoint, y: FixedPoint) -> Angle {
    let (mut x, mut y) = (x.raw(), y.raw());
    if x == 0 && y == 0 {
        return Angle::ZERO;
    }

    let bam = if x >= 0 {
        if y >= 0 {
            if x > y {
                tantoangle(slope_div(y as u32, x as u32)).bam()
            } else {
                (ANG90 - 1).wrapping_sub(tantoangle(slope_div(x as u32, y as u32)).bam())
            }
        } else {
            y = y.wrapping_neg();
            if x > y {
                tantoangle(slope_div(y as u32, x as u32)).bam().wrapping_neg()
            } else {
                ANG270.wrapping_add(tantoangle(slope_div(x as u32, y as u32)).bam())
            }
        }
    } else {
        x = x.wrapping_neg();
        if y >= 0 {
            if x > y {
                (ANG180 - 1).wrapping_sub(tantoangle(slope_div(y as u32, x as u32)).bam())
            } else {
                ANG90.wrapping_add(tantoangle(slope_div(x as u32, y as u32)).bam())
            }
        } else {
            y = y.wrapping_neg();
            if x > y {
                ANG180.wrapping_add(tantoangle(slope_div(y as u32, x as u32)).bam())
            } else {
                (ANG270 - 1).wrapping_sub(tantoangle(slope_div(x as u32, y as u32)).bam())
            }
        }
    };
    Angle::new(bam)
}

/// R_PointToDist on a delta. Distance of `(x, y)` from the origin.
pub fn point_to_dist(x: FixedPoint, y: FixedPoint) -> FixedPoint {
    let mut dx = x.abs();
    let mut dy = y.abs();
    if dy > dx {
        std::mem::swap(&mut dx, &mut dy);
    }
    if dx.raw() == 0 {
        return FixedPoint::zero();
    }

    let slope = (dy / dx).raw() >> DBITS;
    let angle = tantoangle(slope.max(0) as usize) + Angle::DEG90;
    dx / angle.sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ANG45;

    #[test]
    fn table_sizes_and_shape() {
        assert_eq!(FINESINE.len(), 10240);
        assert_eq!(FINETANGENT.len(), 4096);
        assert_eq!(TANTOANGLE.len(), 2049);

        assert!(finesine(0).raw() > 0 && finesine(0).raw() < 64);
        assert!(finesine(2047).raw() > FRACUNIT - 2);
        assert_eq!(finecosine(0), finesine(2048));
        assert!(finetangent(0).raw() < -100 * FRACUNIT);
        assert!(finetangent(4095).raw() > 100 * FRACUNIT);
        assert_eq!(tantoangle(0).bam(), 0);
        assert!(ANG45 - tantoangle(SLOPERANGE).bam() < 4);
    }

    #[test]
    fn slope_div_clamps() {
        assert_eq!(slope_div(100, 10), SLOPERANGE);
        assert_eq!(slope_div(1 << 20, 1 << 20), SLOPERANGE);
        assert_eq!(slope_div(1 << 19, 1 << 20), SLOPERANGE / 2);
        assert_eq!(slope_div(5 << 20, 1 << 20), SLOPERANGE);
    }

    #[test]
    fn octants() {
        let one = FixedPoint::from_int(64);
        let zero = FixedPoint::zero();
        assert_eq!(point_to_angle(one, zero), Angle::ZERO);
        // The octant arithmetic lands within a few units of the exact angle
        let near = |a: Angle, b: u32| a.bam().abs_diff(b) < 0x10_0000;
        assert!(near(point_to_angle(zero, one), ANG90));
        assert!(near(point_to_angle(-one, zero), ANG180));
        assert!(near(point_to_angle(zero, -one), ANG270));
        assert!(near(point_to_angle(one, one), ANG45));
        assert!(near(point_to_angle(-one, one), ANG90 + ANG45));
        assert!(near(point_to_angle(-one, -one), ANG180 + ANG45));
        assert!(near(point_to_angle(one, -one), ANG270 + ANG45));
        assert_eq!(point_to_angle(zero, zero), Angle::ZERO);
    }

    #[test]
    fn distance() {
        let d = point_to_dist(FixedPoint::from_int(30), FixedPoint::from_int(40));
        assert!((d.to_f32() - 50.0).abs() < 0.1, "{d}");
        let d = point_to_dist(FixedPoint::from_int(-100), FixedPoint::zero());
        assert!((d.to_f32() - 100.0).abs() < 0.01, "{d}");
        assert_eq!(point_to_dist(FixedPoint::zero(), FixedPoint::zero()).raw(), 0);
    }
}
