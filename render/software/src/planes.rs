//! Floors, ceilings and sky. Planes are collected per column while walls
//! are drawn and emitted once the BSP walk is done.

use log::error;
use math::{Angle, FixedPoint, finecosine, finesine};
use render_trait::{
    ColumnJob, DrawSink, LightTable, RenderError, SpanJob, SurfaceKind, TextureHandle,
    TextureProvider,
};

use crate::defs::Visplane;
use crate::lighting::light_level;
use crate::utilities::Projection;
use crate::{PlaneOutput, ViewPoint};

/// Sky texture column is the view angle shifted by this much
const ANGLETOSKYSHIFT: u32 = 22;

pub struct VisPlaneRender {
    // Here comes the obnoxious "visplane".
    visplanes: Vec<Visplane>,
    lastvisplane: usize,
    max_visplanes: usize,
    /// Index of current visplane in `self.visplanes` for floor
    pub floorplane: Option<usize>,
    /// Index of current visplane in `self.visplanes` for ceiling
    pub ceilingplane: Option<usize>,

    /// spanstart holds the start of a plane span
    spanstart: Vec<i32>,

    basexscale: FixedPoint,
    baseyscale: FixedPoint,

    screen_width: usize,
}

impl VisPlaneRender {
    pub fn new(screen_width: usize, screen_height: usize, max_visplanes: usize) -> Self {
        VisPlaneRender {
            visplanes: Vec::new(),
            lastvisplane: 0,
            max_visplanes,
            floorplane: None,
            ceilingplane: None,
            spanstart: vec![0; screen_height],
            basexscale: FixedPoint::zero(),
            baseyscale: FixedPoint::zero(),
            screen_width,
        }
    }

    /// The planes recorded this frame
    pub fn planes(&self) -> &[Visplane] {
        &self.visplanes[..self.lastvisplane]
    }

    #[inline]
    pub fn plane_mut(&mut self, index: usize) -> &mut Visplane {
        &mut self.visplanes[index]
    }

    /// R_ClearPlanes
    /// At begining of frame.
    pub fn clear_planes(&mut self, view_angle: Angle, projection: FixedPoint) {
        self.lastvisplane = 0;
        self.floorplane = None;
        self.ceilingplane = None;

        // left to right mapping
        let angle = view_angle - Angle::DEG90;
        // scale will be unit scale at SCREENWIDTH/2 distance
        self.basexscale = angle.cos() / projection;
        self.baseyscale = -(angle.sin() / projection);
    }

    fn new_plane(
        &mut self,
        height: FixedPoint,
        picnum: usize,
        lightlevel: i32,
        minx: i32,
        maxx: i32,
    ) -> Result<usize, RenderError> {
        if self.lastvisplane >= self.max_visplanes {
            error!("Out of visplanes: {}", self.lastvisplane);
            return Err(RenderError::VisplaneOverflow {
                capacity: self.max_visplanes,
            });
        }
        if self.lastvisplane == self.visplanes.len() {
            self.visplanes.push(Visplane::new(self.screen_width));
        }
        let index = self.lastvisplane;
        self.visplanes[index].reset(height, picnum, lightlevel, minx, maxx);
        self.lastvisplane += 1;
        Ok(index)
    }

    /// R_FindPlane
    ///
    /// Find a plane matching height, picnum, light level. Otherwise return
    /// a new plane with no columns. All sky is one plane.
    pub fn find_plane(
        &mut self,
        mut height: FixedPoint,
        picnum: usize,
        mut lightlevel: i32,
        sky_flat: usize,
    ) -> Result<usize, RenderError> {
        if picnum == sky_flat {
            // all skys map together
            height = FixedPoint::zero();
            lightlevel = 0;
        }

        if let Some(index) = self.planes().iter().position(|p| {
            p.height == height && p.picnum == picnum && p.lightlevel == lightlevel
        }) {
            return Ok(index);
        }

        self.new_plane(height, picnum, lightlevel, self.screen_width as i32, -1)
    }

    /// R_CheckPlane
    ///
    /// Widen the plane to cover `start..=stop` if none of the overlapping
    /// columns are marked yet. Otherwise start a new plane with the same
    /// height, flat and light.
    pub fn check_plane(&mut self, index: usize, start: i32, stop: i32) -> Result<usize, RenderError> {
        let plane = &mut self.visplanes[index];

        let (intrl, unionl) = if start < plane.minx {
            (plane.minx, start)
        } else {
            (start, plane.minx)
        };

        let (intrh, unionh) = if stop > plane.maxx {
            (plane.maxx, stop)
        } else {
            (stop, plane.maxx)
        };

        if plane.is_unset(intrl, intrh) {
            plane.minx = unionl;
            plane.maxx = unionh;
            // use the same one
            return Ok(index);
        }

        // make a new visplane
        let (height, picnum, lightlevel) = (plane.height, plane.picnum, plane.lightlevel);
        self.new_plane(height, picnum, lightlevel, start, stop)
    }

    /// R_DrawPlanes
    ///
    /// At the end of each frame. Sky is always columns, other flats are
    /// columns or spans as configured.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_planes<T, S>(
        &mut self,
        view: &ViewPoint,
        proj: &Projection,
        lights: &dyn LightTable,
        textures: &T,
        output: PlaneOutput,
        sink: &mut S,
    ) -> Result<(), RenderError>
    where
        T: TextureProvider + ?Sized,
        S: DrawSink + ?Sized,
    {
        let sky_flat = textures.sky_flat();
        for plane in self.visplanes[..self.lastvisplane].iter_mut() {
            if plane.minx > plane.maxx {
                continue;
            }

            // sky flat
            if plane.picnum == sky_flat {
                for x in plane.minx..=plane.maxx {
                    let Some((yl, yh)) = plane.column(x) else {
                        continue;
                    };
                    let angle = (view.angle + proj.xtoviewangle[x as usize]).bam() >> ANGLETOSKYSHIFT;
                    // Sky is allways drawn full bright
                    sink.draw_column(ColumnJob {
                        x,
                        yl,
                        yh,
                        kind: SurfaceKind::Sky,
                        source: textures.sky_column(angle as i32),
                        texture_mid: textures.sky_texture_mid(),
                        iscale: proj.sky_iscale,
                        scale: proj.sky_scale,
                        light: 0,
                    })?;
                }
                continue;
            }

            // regular flat
            let mapper = PlaneMapper {
                view,
                proj,
                lights,
                kind: if plane.height < view.z {
                    SurfaceKind::FloorPlane
                } else {
                    SurfaceKind::CeilingPlane
                },
                source: textures.flat(textures.translate_flat(plane.picnum)),
                planeheight: (plane.height - view.z).abs(),
                level: light_level(plane.lightlevel, view.extralight),
                basexscale: self.basexscale,
                baseyscale: self.baseyscale,
            };

            match output {
                PlaneOutput::Columns => {
                    for x in plane.minx..=plane.maxx {
                        if let Some((yl, yh)) = plane.column(x) {
                            mapper.map_column(x, yl, yh, plane.height, sink)?;
                        }
                    }
                }
                PlaneOutput::Spans => {
                    plane.unset_column(plane.minx - 1);
                    plane.unset_column(plane.maxx + 1);
                    for x in plane.minx..=plane.maxx + 1 {
                        make_spans(
                            x,
                            plane.top(x - 1) as i32,
                            plane.bottom(x - 1) as i32,
                            plane.top(x) as i32,
                            plane.bottom(x) as i32,
                            &mut self.spanstart,
                            &mapper,
                            sink,
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// What a single flat needs to turn rows into texture coordinates
struct PlaneMapper<'a> {
    view: &'a ViewPoint,
    proj: &'a Projection,
    lights: &'a dyn LightTable,
    kind: SurfaceKind,
    source: TextureHandle,
    planeheight: FixedPoint,
    level: usize,
    basexscale: FixedPoint,
    baseyscale: FixedPoint,
}

impl PlaneMapper<'_> {
    fn light(&self, distance: FixedPoint) -> usize {
        self.view
            .fixed_colormap
            .unwrap_or_else(|| self.lights.z_light(self.level, distance))
    }

    /// R_MapPlane
    fn map_plane<S: DrawSink + ?Sized>(
        &self,
        y: i32,
        x1: i32,
        x2: i32,
        sink: &mut S,
    ) -> Result<(), RenderError> {
        let distance = self.planeheight * self.proj.yslope[y as usize];
        let xstep = distance * self.basexscale;
        let ystep = distance * self.baseyscale;

        let length = distance * self.proj.distscale[x1 as usize];
        let angle = (self.view.angle + self.proj.xtoviewangle[x1 as usize]).fine();
        let xfrac = self.view.x + finecosine(angle) * length;
        let yfrac = -self.view.y - finesine(angle) * length;

        sink.draw_span(SpanJob {
            y,
            x1,
            x2,
            kind: self.kind,
            source: self.source,
            xfrac,
            yfrac,
            xstep,
            ystep,
            light: self.light(distance),
        })
    }

    /// One plane column. Lit by the row nearest the viewer.
    fn map_column<S: DrawSink + ?Sized>(
        &self,
        x: i32,
        yl: i32,
        yh: i32,
        height: FixedPoint,
        sink: &mut S,
    ) -> Result<(), RenderError> {
        let near_row = if self.kind == SurfaceKind::FloorPlane { yh } else { yl };
        let distance = self.planeheight * self.proj.yslope[near_row as usize];
        sink.draw_column(ColumnJob {
            x,
            yl,
            yh,
            kind: self.kind,
            source: self.source,
            texture_mid: height - self.view.z,
            iscale: FixedPoint::zero(),
            scale: FixedPoint::zero(),
            light: self.light(distance),
        })
    }
}

/// R_MakeSpans
///
/// Compares the plane extent of column `x - 1` (`t1..=b1`) with column `x`
/// (`t2..=b2`). Rows that end are emitted as spans, rows that begin are
/// remembered in `spanstart`.
#[allow(clippy::too_many_arguments)]
fn make_spans<S: DrawSink + ?Sized>(
    x: i32,
    mut t1: i32,
    mut b1: i32,
    mut t2: i32,
    mut b2: i32,
    spanstart: &mut [i32],
    mapper: &PlaneMapper,
    sink: &mut S,
) -> Result<(), RenderError> {
    while t1 < t2 && t1 <= b1 {
        mapper.map_plane(t1, spanstart[t1 as usize], x - 1, sink)?;
        t1 += 1;
    }
    while b1 > b2 && b1 >= t1 {
        mapper.map_plane(b1, spanstart[b1 as usize], x - 1, sink)?;
        b1 -= 1;
    }

    while t2 < t1 && t2 <= b2 {
        spanstart[t2 as usize] = x;
        t2 += 1;
    }
    while b2 > b1 && b2 >= t2 {
        spanstart[b2 as usize] = x;
        b2 -= 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::VisPlaneRender;
    use crate::defs::UNSET;
    use math::{Angle, FixedPoint};
    use render_trait::RenderError;

    const SKY: usize = 9;

    fn planes() -> VisPlaneRender {
        let mut p = VisPlaneRender::new(320, 200, 4);
        p.clear_planes(Angle::ZERO, FixedPoint::from_int(160));
        p
    }

    #[test]
    fn find_reuses_matching_plane() {
        let mut p = planes();
        let floor = p.find_plane(FixedPoint::zero(), 1, 160, SKY).unwrap();
        let again = p.find_plane(FixedPoint::zero(), 1, 160, SKY).unwrap();
        let other = p.find_plane(FixedPoint::zero(), 1, 144, SKY).unwrap();
        assert_eq!(floor, again);
        assert_ne!(floor, other);
        assert_eq!(p.planes().len(), 2);
        let new = &p.planes()[floor];
        assert_eq!(new.minx, 320);
        assert_eq!(new.maxx, -1);
        assert_eq!(new.top(0), UNSET);
    }

    #[test]
    fn sky_planes_share_a_key() {
        let mut p = planes();
        let a = p.find_plane(FixedPoint::from_int(128), SKY, 200, SKY).unwrap();
        let b = p.find_plane(FixedPoint::from_int(256), SKY, 96, SKY).unwrap();
        assert_eq!(a, b);
        assert_eq!(p.planes()[a].height, FixedPoint::zero());
        assert_eq!(p.planes()[a].lightlevel, 0);
    }

    #[test]
    fn check_plane_extends_or_splits() {
        let mut p = planes();
        let floor = p.find_plane(FixedPoint::zero(), 1, 160, SKY).unwrap();
        let floor = p.check_plane(floor, 10, 20).unwrap();
        for x in 10..=20 {
            p.plane_mut(floor).set_column(x, 150, 199);
        }
        // disjoint range widens the same plane
        let same = p.check_plane(floor, 30, 40).unwrap();
        assert_eq!(same, floor);
        assert_eq!((p.planes()[floor].minx, p.planes()[floor].maxx), (10, 40));
        // nothing marked in 25..=40 yet, still the same plane
        assert_eq!(p.check_plane(floor, 25, 40).unwrap(), floor);
        // overlapping a marked column splits
        let split = p.check_plane(floor, 18, 22).unwrap();
        assert_ne!(split, floor);
        let new = &p.planes()[split];
        assert_eq!((new.minx, new.maxx), (18, 22));
        assert_eq!((new.height, new.picnum, new.lightlevel), (FixedPoint::zero(), 1, 160));
        assert_eq!(new.column(18), None);
        assert_eq!(p.planes()[floor].column(18), Some((150, 199)));
    }

    #[test]
    fn running_out_of_planes() {
        let mut p = planes();
        for light in 0..4 {
            p.find_plane(FixedPoint::zero(), 1, light, SKY).unwrap();
        }
        assert_eq!(
            p.find_plane(FixedPoint::zero(), 1, 99, SKY),
            Err(RenderError::VisplaneOverflow { capacity: 4 })
        );
        // clearing makes room again
        p.clear_planes(Angle::ZERO, FixedPoint::from_int(160));
        assert!(p.find_plane(FixedPoint::zero(), 1, 99, SKY).is_ok());
        assert_eq!(p.planes().len(), 1);
    }
}
