use crate::FixedPoint;

/// A partition line: origin plus direction, both in map units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DivLine {
    pub x: FixedPoint,
    pub y: FixedPoint,
    pub dx: FixedPoint,
    pub dy: FixedPoint,
}

impl DivLine {
    #[inline]
    pub const fn new(x: FixedPoint, y: FixedPoint, dx: FixedPoint, dy: FixedPoint) -> Self {
        Self { x, y, dx, dy }
    }
}

/// R_PointOnSide. Returns 0 for the front (right) side and 1 for the back.
/// A point on the line counts as front.
///
/// Axis-aligned lines and sign-disagreeing quadrants are resolved without
/// a multiply.
#[inline]
pub fn point_on_side(x: FixedPoint, y: FixedPoint, line: &DivLine) -> usize {
    let zero = FixedPoint::zero();
    if line.dx == zero {
        if x == line.x {
            return 0;
        }
        if x < line.x {
            return (line.dy > zero) as usize;
        }
        return (line.dy < zero) as usize;
    }
    if line.dy == zero {
        if y == line.y {
            return 0;
        }
        if y < line.y {
            return (line.dx < zero) as usize;
        }
        return (line.dx > zero) as usize;
    }

    let dx = x - line.x;
    let dy = y - line.y;
    if dx == zero && dy == zero {
        return 0;
    }

    if (line.dy.raw() ^ line.dx.raw() ^ dx.raw() ^ dy.raw()) < 0 {
        if (line.dy.raw() ^ dx.raw()) < 0 {
            // Left is negative
            return 1;
        }
        return 0;
    }

    let left = FixedPoint::new(line.dy.raw() >> 16) * dx;
    let right = dy * FixedPoint::new(line.dx.raw() >> 16);

    if right <= left {
        // Front side, or on the line
        return 0;
    }
    // Backside
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(v: i32) -> FixedPoint {
        FixedPoint::from_int(v)
    }

    #[test]
    fn vertical_line() {
        // Pointing north: east is the front
        let line = DivLine::new(fx(0), fx(0), fx(0), fx(64));
        assert_eq!(point_on_side(fx(10), fx(5), &line), 0);
        assert_eq!(point_on_side(fx(-10), fx(5), &line), 1);
        // on the line is front
        assert_eq!(point_on_side(fx(0), fx(5), &line), 0);
        assert_eq!(point_on_side(fx(0), fx(-500), &line), 0);
    }

    #[test]
    fn horizontal_line() {
        // Pointing east: south is the front
        let line = DivLine::new(fx(0), fx(0), fx(64), fx(0));
        assert_eq!(point_on_side(fx(5), fx(-10), &line), 0);
        assert_eq!(point_on_side(fx(5), fx(10), &line), 1);
        assert_eq!(point_on_side(fx(-40), fx(0), &line), 0);
    }

    #[test]
    fn diagonal_line() {
        let line = DivLine::new(fx(0), fx(0), fx(64), fx(64));
        assert_eq!(point_on_side(fx(32), fx(0), &line), 0);
        assert_eq!(point_on_side(fx(0), fx(32), &line), 1);
        assert_eq!(point_on_side(fx(100), fx(90), &line), 0);
        assert_eq!(point_on_side(fx(-100), fx(-90), &line), 1);
        assert_eq!(point_on_side(fx(32), fx(32), &line), 0);
        assert_eq!(point_on_side(fx(0), fx(0), &line), 0);
    }

    #[test]
    fn points_on_a_falling_line_are_front() {
        // Heading south east
        let line = DivLine::new(fx(16), fx(16), fx(64), fx(-64));
        assert_eq!(point_on_side(fx(16), fx(16), &line), 0);
        assert_eq!(point_on_side(fx(48), fx(-16), &line), 0);
        assert_eq!(point_on_side(fx(-16), fx(48), &line), 0);
        // right of the direction of travel is south west
        assert_eq!(point_on_side(fx(0), fx(0), &line), 0);
        assert_eq!(point_on_side(fx(40), fx(40), &line), 1);
    }
}
