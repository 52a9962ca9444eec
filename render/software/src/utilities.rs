use log::debug;
use math::{
    Angle, FINEANGLES, FRACBITS, FRACUNIT, FixedPoint, finecosine, finetangent, point_to_angle,
    point_to_dist,
};
use render_trait::BufferSize;

use crate::ViewPoint;

/// Narrowest and widest half field of view accepted
const MIN_FOV_HALF: f64 = 10.0;
const MAX_FOV_HALF: f64 = 80.0;

/// Scales are clamped to `[MIN_SCALE, MAX_SCALE]`
pub const MIN_SCALE: i32 = 256;
pub const MAX_SCALE: i32 = 64 * FRACUNIT;

/// Per view size and field of view lookup tables. Cuts out a huge amount
/// of math per column.
///
/// R_InitTextureMapping and R_ExecuteSetViewSize
#[derive(Debug, Clone)]
pub struct Projection {
    pub size: BufferSize,
    pub fov_half: Angle,
    pub centerxfrac: FixedPoint,
    pub centeryfrac: FixedPoint,
    /// Screen distance at which one map unit is one pixel wide
    pub projection: FixedPoint,
    /// Fine angle (shifted by 90°) to screen column, `-1..=width+1` folded
    /// into `0..=width`
    pub viewangletox: Vec<i32>,
    /// Screen column to angle from the view direction, `width + 1` entries
    pub xtoviewangle: Vec<Angle>,
    /// Half the horizontal view, measured at the left screen edge
    pub clipangle: Angle,
    /// Per row, projection over the vertical distance from the centre
    pub yslope: Vec<FixedPoint>,
    /// Per column, `1 / cos` of the column angle
    pub distscale: Vec<FixedPoint>,
    /// Sky texture step per row, `pspriteiscale`
    pub sky_iscale: FixedPoint,
    pub sky_scale: FixedPoint,
}

impl Projection {
    pub fn new(size: BufferSize, fov_half: Angle) -> Self {
        let fov_half =
            Angle::from_degrees(fov_half.to_degrees().clamp(MIN_FOV_HALF, MAX_FOV_HALF));
        let width = size.width();
        let height = size.height();
        let centerxfrac = FixedPoint::new((width << FRACBITS) / 2);
        let centeryfrac = FixedPoint::from_int(size.half_height());

        // Use tangent table to generate viewangletox:
        //  viewangletox will give the next greatest x
        //  after the view angle.
        let edge = finetangent(FINEANGLES / 4 + fov_half.fine());
        let focallength = centerxfrac / edge;
        // Relative to 90°, so the classic view keeps projection == centerx
        let projection = centerxfrac / (edge / finetangent(FINEANGLES / 4 + FINEANGLES / 8));

        let mut viewangletox = vec![0i32; FINEANGLES / 2];
        for (i, slot) in viewangletox.iter_mut().enumerate() {
            let t = (finetangent(i).raw() as i64 * focallength.raw() as i64) >> FRACBITS;
            let t = (centerxfrac.raw() as i64 - t + FRACUNIT as i64 - 1) >> FRACBITS;
            *slot = t.clamp(-1, width as i64 + 1) as i32;
        }

        // Scan viewangletox[] to generate xtoviewangle[]:
        //  xtoviewangle will give the smallest view angle
        //  that maps to x.
        let mut xtoviewangle = vec![Angle::ZERO; size.width_usize() + 1];
        for (x, slot) in xtoviewangle.iter_mut().enumerate() {
            let mut i = 0;
            while i < viewangletox.len() - 1 && viewangletox[i] > x as i32 {
                i += 1;
            }
            *slot = Angle::new(((i as u32) << math::ANGLETOFINESHIFT).wrapping_sub(math::ANG90));
        }

        // Take out the fencepost cases from viewangletox.
        for slot in viewangletox.iter_mut() {
            if *slot == -1 {
                *slot = 0;
            } else if *slot == width + 1 {
                *slot = width;
            }
        }
        let clipangle = xtoviewangle[0];

        let yslope = (0..height)
            .map(|i| {
                let dy = ((i - height / 2) << FRACBITS) + FRACUNIT / 2;
                projection / FixedPoint::new(dy.abs())
            })
            .collect();

        let distscale = xtoviewangle[..size.width_usize()]
            .iter()
            .map(|a| FixedPoint::unit() / finecosine(a.fine()).abs())
            .collect();

        debug!(
            "Projection for {}x{}: fov/2 {:.1}, clipangle {:.2}, projection {}",
            width,
            height,
            fov_half.to_degrees(),
            clipangle.to_degrees(),
            projection
        );

        Self {
            size,
            fov_half,
            centerxfrac,
            centeryfrac,
            projection,
            viewangletox,
            xtoviewangle,
            clipangle,
            yslope,
            distscale,
            sky_iscale: FixedPoint::new(FRACUNIT * 320 / width.max(1)),
            sky_scale: FixedPoint::new(FRACUNIT * width / 320),
        }
    }

    /// Screen column of an angle already clipped to the view
    #[inline]
    pub fn angle_to_x(&self, angle: Angle) -> i32 {
        let fine = (angle + Angle::DEG90).fine();
        self.viewangletox[fine.min(self.viewangletox.len() - 1)]
    }

    /// R_ScaleFromGlobalAngle
    ///
    /// Returns the texture mapping scale for the current line (horizontal
    /// span) at the given angle. `rw_distance` must be calculated first.
    pub fn scale_from_global_angle(
        &self,
        visangle: Angle,
        rw_normalangle: Angle,
        rw_distance: FixedPoint,
        view_angle: Angle,
    ) -> FixedPoint {
        let anglea = Angle::DEG90 + (visangle - view_angle);
        let angleb = Angle::DEG90 + (visangle - rw_normalangle);
        // both sines are always positive
        let sinea = anglea.sin();
        let sineb = angleb.sin();
        let num = self.projection * sineb;
        let den = rw_distance * sinea;

        if den > num >> FRACBITS {
            (num / den).clamp(FixedPoint::new(MIN_SCALE), FixedPoint::new(MAX_SCALE))
        } else {
            FixedPoint::new(MAX_SCALE)
        }
    }
}

/// R_PointToAngle from the view position
#[inline]
pub fn vertex_angle_to_view(view: &ViewPoint, x: FixedPoint, y: FixedPoint) -> Angle {
    point_to_angle(x - view.x, y - view.y)
}

/// R_PointToDist from the view position
#[inline]
pub fn vertex_dist_to_view(view: &ViewPoint, x: FixedPoint, y: FixedPoint) -> FixedPoint {
    point_to_dist(x - view.x, y - view.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: FixedPoint, b: f32, tol: f32) -> bool {
        (a.to_f32() - b).abs() <= tol
    }

    #[test]
    fn classic_projection() {
        let p = Projection::new(BufferSize::new(320, 200), Angle::DEG45);
        assert_eq!(p.projection, FixedPoint::from_int(160));
        assert_eq!(p.xtoviewangle.len(), 321);
        assert_eq!(p.yslope.len(), 200);
        assert_eq!(p.distscale.len(), 320);
        // a shade over 45°
        assert!((p.clipangle.to_degrees() - 45.0).abs() < 0.2);
        // straight ahead lands in the middle
        assert!((p.angle_to_x(Angle::ZERO) - 160).abs() <= 1);
        assert!(p.xtoviewangle[160].signed().abs() < Angle::from_degrees(0.5).signed());
        for w in p.viewangletox.windows(2) {
            assert!(w[0] >= w[1]);
        }
        assert!(p.viewangletox.iter().all(|x| (0..=320).contains(x)));
        for w in p.xtoviewangle.windows(2) {
            assert!(w[0].signed() >= w[1].signed());
        }
    }

    #[test]
    fn view_edges_reach_both_screen_edges() {
        for (w, h) in [(320i32, 200i32), (97, 60), (641, 400)] {
            let p = Projection::new(BufferSize::new(w as usize, h as usize), Angle::DEG45);
            assert_eq!(p.centerxfrac.raw(), (w << FRACBITS) / 2);
            assert_eq!(p.angle_to_x(p.clipangle), 0, "{w}");
            // right edge is exclusive, so it has to land one past the last column
            assert_eq!(p.angle_to_x(-p.clipangle), w, "{w}");
            assert!(p.viewangletox.iter().all(|x| (0..=w).contains(x)));
        }
    }

    #[test]
    fn fov_is_clamped_and_changes_projection() {
        let size = BufferSize::new(320, 200);
        let narrow = Projection::new(size, Angle::from_degrees(30.0));
        let wide = Projection::new(size, Angle::from_degrees(60.0));
        assert!(narrow.projection > wide.projection);
        assert!(narrow.clipangle.signed() < wide.clipangle.signed());
        let silly = Projection::new(size, Angle::from_degrees(170.0));
        assert!((silly.fov_half.to_degrees() - 80.0).abs() < 0.01);
    }

    #[test]
    fn scale_of_wall_ahead() {
        let p = Projection::new(BufferSize::new(320, 200), Angle::DEG45);
        // wall facing the viewer 128 units away, normal along the view
        let scale = p.scale_from_global_angle(
            Angle::ZERO,
            Angle::ZERO,
            FixedPoint::from_int(128),
            Angle::ZERO,
        );
        assert!(near(scale, 1.25, 0.01), "{scale}");
        // closer walls are bigger until the clamp
        let close = p.scale_from_global_angle(
            Angle::ZERO,
            Angle::ZERO,
            FixedPoint::from_int(1),
            Angle::ZERO,
        );
        assert_eq!(close, FixedPoint::new(MAX_SCALE));
        let far = p.scale_from_global_angle(
            Angle::ZERO,
            Angle::ZERO,
            FixedPoint::from_int(30000),
            Angle::ZERO,
        );
        assert!(far >= FixedPoint::new(MIN_SCALE) && far < scale);
    }

    #[test]
    fn distance_from_view() {
        let view = ViewPoint::new(10, 10, 0, 0.0);
        let d = vertex_dist_to_view(&view, FixedPoint::from_int(13), FixedPoint::from_int(14));
        assert!(near(d, 5.0, 0.01), "{d}");
        let a = vertex_angle_to_view(&view, FixedPoint::from_int(10), FixedPoint::from_int(20));
        assert!((a.to_degrees() - 90.0).abs() < 0.1);
    }
}
