use math::{FixedPoint, point_on_side};

use crate::map_defs::Node;

impl Node {
    /// R_PointOnSide
    ///
    /// 0 when the point is on the front (right) of the partition, 1 when on
    /// the back
    #[inline]
    pub fn point_on_side(&self, x: FixedPoint, y: FixedPoint) -> usize {
        point_on_side(x, y, &self.div)
    }

    pub fn point_in_bounds(&self, x: FixedPoint, y: FixedPoint, side: usize) -> bool {
        let bbox = &self.bboxes[side];
        x >= bbox.left && x <= bbox.right && y >= bbox.bottom && y <= bbox.top
    }
}
