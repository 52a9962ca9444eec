use level::{LineDef, LineDefFlags, Sector, Segment, SideDef};
use log::trace;
use math::{Angle, FINEANGLES, FixedPoint, finetangent};
use render_trait::{
    ColumnJob, DrawSink, LightTable, RenderError, SurfaceKind, TextureProvider,
};

use crate::defs::{DrawSeg, SIL_BOTH, SIL_BOTTOM, SIL_TOP, SpriteClip};
use crate::lighting::wall_light_level;
use crate::utilities::{Projection, vertex_dist_to_view};
use crate::{RenderData, ViewPoint};

/// Wall edges are stepped with 12 fractional bits so tall walls close up
/// do not overflow
const HEIGHTBITS: i32 = 12;
const HEIGHTUNIT: i32 = 1 << HEIGHTBITS;

/// A seg that survived the backface and angle clip, with its records
/// resolved
pub(crate) struct WallSeg<'m> {
    /// Index of the seg in the map
    pub index: usize,
    pub seg: &'m Segment,
    pub line: &'m LineDef,
    pub side: &'m SideDef,
    pub front: &'m Sector,
    pub back: Option<&'m Sector>,
    /// Angle from the view to `v1`
    pub rw_angle1: Angle,
}

/// Everything a wall range needs from the frame
pub(crate) struct SegContext<'a, T: ?Sized, S: ?Sized> {
    pub view: &'a ViewPoint,
    pub proj: &'a Projection,
    pub lights: &'a dyn LightTable,
    pub textures: &'a T,
    pub r_data: &'a mut RenderData,
    pub sink: &'a mut S,
}

/// All of the state in this struct is unique to it as it is used once per
/// wall range to be rendered.
struct SegRender {
    rw_x: i32,
    rw_stopx: i32,
    /// True if any of the segs textures might be visible.
    segtextured: bool,
    /// False if the back side is the same plane.
    markfloor: bool,
    markceiling: bool,
    two_sided: bool,
    midtexture: Option<usize>,
    toptexture: Option<usize>,
    bottomtexture: Option<usize>,
    /// Index in to `openings` for the `rw_x` masked column
    maskedtexturecol: Option<usize>,

    rw_centerangle: Angle,
    rw_offset: FixedPoint,
    rw_distance: FixedPoint,
    rw_scale: FixedPoint,
    rw_scalestep: FixedPoint,
    rw_midtexturemid: FixedPoint,
    rw_toptexturemid: FixedPoint,
    rw_bottomtexturemid: FixedPoint,

    pixhigh: FixedPoint,
    pixlow: FixedPoint,
    pixhighstep: FixedPoint,
    pixlowstep: FixedPoint,

    topfrac: FixedPoint,
    topstep: FixedPoint,
    bottomfrac: FixedPoint,
    bottomstep: FixedPoint,

    /// Light level for the wall
    wall_level: usize,
}

impl<T, S> SegContext<'_, T, S>
where
    T: TextureProvider + ?Sized,
    S: DrawSink + ?Sized,
{
    /// R_StoreWallRange - r_segs
    ///
    /// Columns `start..=stop` of `wall` are visible. Emits the wall
    /// columns, marks floor and ceiling planes, narrows the vertical clip
    /// and records a drawseg.
    pub fn store_wall_range(
        &mut self,
        start: i32,
        stop: i32,
        wall: &WallSeg,
    ) -> Result<(), RenderError> {
        let view = self.view;
        let proj = self.proj;
        let textures = self.textures;
        let width = proj.size.width();

        let in_range = start >= 0 && start <= stop && stop < width;
        debug_assert!(in_range, "Bad R_RenderWallRange: {start} to {stop}");
        if !in_range {
            trace!("Skipped wall range {start} to {stop}");
            return Ok(());
        }
        self.r_data.check_drawseg_room()?;

        let seg = wall.seg;
        let side = wall.side;
        let front = wall.front;
        let sky = textures.sky_flat();
        let count = (stop - start + 1) as usize;

        // mark the segment as visible for auto map
        self.r_data.mark_mapped(seg.linedef);

        // calculate rw_distance for scale calculation
        let rw_normalangle = seg.angle + Angle::DEG90;
        let offsetangle = (rw_normalangle - wall.rw_angle1).abs().min(Angle::DEG90);
        let distangle = Angle::DEG90 - offsetangle;
        let hyp = vertex_dist_to_view(view, seg.v1.x, seg.v1.y);
        let rw_distance = hyp * distangle.sin();

        let mut ds = DrawSeg::new(wall.index, start, stop);

        // calculate scale at both ends and step
        let rw_scale = proj.scale_from_global_angle(
            view.angle + proj.xtoviewangle[start as usize],
            rw_normalangle,
            rw_distance,
            view.angle,
        );
        ds.scale1 = rw_scale;
        let mut rw_scalestep = FixedPoint::zero();
        if stop > start {
            ds.scale2 = proj.scale_from_global_angle(
                view.angle + proj.xtoviewangle[stop as usize],
                rw_normalangle,
                rw_distance,
                view.angle,
            );
            rw_scalestep = FixedPoint::new((ds.scale2 - rw_scale).raw() / (stop - start));
            ds.scalestep = rw_scalestep;
        } else {
            ds.scale2 = ds.scale1;
        }

        // calculate texture boundaries
        //  and decide if floor / ceiling marks are needed
        let mut worldtop = front.ceilingheight - view.z;
        let mut worldbottom = front.floorheight - view.z;
        let mut worldhigh = FixedPoint::zero();
        let mut worldlow = FixedPoint::zero();

        let mut midtexture = None;
        let mut toptexture = None;
        let mut bottomtexture = None;
        let mut maskedtexturecol = None;
        let mut rw_midtexturemid = FixedPoint::zero();
        let mut rw_toptexturemid = FixedPoint::zero();
        let mut rw_bottomtexturemid = FixedPoint::zero();
        let mut markfloor;
        let mut markceiling;

        let unpeg_bottom = LineDefFlags::UnpegBottom.is_set(wall.line.flags);
        let unpeg_top = LineDefFlags::UnpegTop.is_set(wall.line.flags);

        match wall.back {
            None => {
                // single sided line
                midtexture = side.midtexture.map(|t| textures.translate_texture(t));
                // a single sided line is terminal, so it must mark ends
                markfloor = true;
                markceiling = true;
                rw_midtexturemid = match midtexture {
                    // bottom of texture at bottom
                    Some(mid) if unpeg_bottom => {
                        front.floorheight + textures.texture_height(mid) - view.z
                    }
                    // top of texture at top
                    _ => worldtop,
                };
                rw_midtexturemid += side.rowoffset;

                ds.silhouette = SIL_BOTH;
                ds.sprtopclip = SpriteClip::Full;
                ds.sprbottomclip = SpriteClip::Full;
                ds.bsilheight = FixedPoint::max();
                ds.tsilheight = FixedPoint::min();
            }
            Some(back) => {
                // two sided line
                if front.floorheight > back.floorheight {
                    ds.silhouette = SIL_BOTTOM;
                    ds.bsilheight = front.floorheight;
                } else if back.floorheight > view.z {
                    ds.silhouette = SIL_BOTTOM;
                    ds.bsilheight = FixedPoint::max();
                }

                if front.ceilingheight < back.ceilingheight {
                    ds.silhouette |= SIL_TOP;
                    ds.tsilheight = front.ceilingheight;
                } else if back.ceilingheight < view.z {
                    ds.silhouette |= SIL_TOP;
                    ds.tsilheight = FixedPoint::min();
                }

                if back.ceilingheight <= front.floorheight {
                    ds.sprbottomclip = SpriteClip::Full;
                    ds.bsilheight = FixedPoint::max();
                    ds.silhouette |= SIL_BOTTOM;
                }

                if back.floorheight >= front.ceilingheight {
                    ds.sprtopclip = SpriteClip::Full;
                    ds.tsilheight = FixedPoint::min();
                    ds.silhouette |= SIL_TOP;
                }

                worldhigh = back.ceilingheight - view.z;
                worldlow = back.floorheight - view.z;

                // hack to allow height changes in outdoor areas
                if front.ceilingpic == sky && back.ceilingpic == sky {
                    worldtop = worldhigh;
                }

                markfloor = worldlow != worldbottom
                    || back.floorpic != front.floorpic
                    || back.lightlevel != front.lightlevel;

                markceiling = worldhigh != worldtop
                    || back.ceilingpic != front.ceilingpic
                    || back.lightlevel != front.lightlevel;

                if back.ceilingheight <= front.floorheight
                    || back.floorheight >= front.ceilingheight
                {
                    // closed door
                    markceiling = true;
                    markfloor = true;
                }

                if worldhigh < worldtop {
                    // top texture
                    toptexture = side.toptexture.map(|t| textures.translate_texture(t));
                    rw_toptexturemid = if unpeg_top {
                        // top of texture at top
                        worldtop
                    } else {
                        // bottom of texture
                        let vtop = back.ceilingheight
                            + toptexture.map_or(FixedPoint::zero(), |t| textures.texture_height(t));
                        vtop - view.z
                    };
                }

                if worldlow > worldbottom {
                    // bottom texture
                    bottomtexture = side.bottomtexture.map(|t| textures.translate_texture(t));
                    rw_bottomtexturemid = if unpeg_bottom {
                        // bottom of texture at bottom, top of texture at top
                        worldtop
                    } else {
                        worldlow
                    };
                }
                rw_toptexturemid += side.rowoffset;
                rw_bottomtexturemid += side.rowoffset;

                // allocate space for masked texture tables
                if side.midtexture.is_some() {
                    // masked midtexture
                    let base = self.r_data.alloc_openings(count)?;
                    maskedtexturecol = Some(base);
                    ds.maskedtexturecol = Some(base);
                }
            }
        }

        // calculate rw_offset (only needed for textured lines)
        let segtextured = midtexture.is_some()
            || toptexture.is_some()
            || bottomtexture.is_some()
            || maskedtexturecol.is_some();

        let mut rw_offset = FixedPoint::zero();
        let mut rw_centerangle = Angle::ZERO;
        let mut wall_level = 0;
        if segtextured {
            let mut offsetangle = rw_normalangle - wall.rw_angle1;
            if offsetangle > Angle::DEG180 {
                offsetangle = -offsetangle;
            }
            if offsetangle > Angle::DEG90 {
                offsetangle = Angle::DEG90;
            }
            rw_offset = hyp * offsetangle.sin();
            if rw_normalangle - wall.rw_angle1 < Angle::DEG180 {
                rw_offset = -rw_offset;
            }
            rw_offset += side.textureoffset + seg.offset;
            rw_centerangle = Angle::DEG90 + view.angle - rw_normalangle;

            // calculate light table
            //  use different light tables
            //  for horizontal / vertical / diagonal
            wall_level = wall_light_level(front.lightlevel, view.extralight, &seg.v1, &seg.v2);
        }

        // if a floor / ceiling plane is on the wrong side
        //  of the view plane, it is definitely invisible
        //  and doesn't need to be marked.
        if front.floorheight >= view.z {
            // above view plane
            markfloor = false;
        }
        if front.ceilingheight <= view.z && front.ceilingpic != sky {
            // below view plane
            markceiling = false;
        }

        // calculate incremental stepping values for texture edges
        worldtop = worldtop >> 4;
        worldbottom = worldbottom >> 4;
        let centeryfrac = proj.centeryfrac >> 4;

        let topstep = -(rw_scalestep * worldtop);
        let topfrac = centeryfrac - worldtop * rw_scale;
        let bottomstep = -(rw_scalestep * worldbottom);
        let bottomfrac = centeryfrac - worldbottom * rw_scale;

        let mut pixhigh = FixedPoint::zero();
        let mut pixhighstep = FixedPoint::zero();
        let mut pixlow = FixedPoint::zero();
        let mut pixlowstep = FixedPoint::zero();
        if wall.back.is_some() {
            worldhigh = worldhigh >> 4;
            worldlow = worldlow >> 4;

            if worldhigh < worldtop {
                pixhigh = centeryfrac - worldhigh * rw_scale;
                pixhighstep = -(rw_scalestep * worldhigh);
            }
            if worldlow > worldbottom {
                pixlow = centeryfrac - worldlow * rw_scale;
                pixlowstep = -(rw_scalestep * worldlow);
            }
        }

        // render it
        let planes = &mut self.r_data.visplanes;
        if markceiling {
            match planes.ceilingplane {
                Some(plane) => planes.ceilingplane = Some(planes.check_plane(plane, start, stop)?),
                None => markceiling = false,
            }
        }
        if markfloor {
            match planes.floorplane {
                Some(plane) => planes.floorplane = Some(planes.check_plane(plane, start, stop)?),
                None => markfloor = false,
            }
        }

        let mut rw = SegRender {
            rw_x: start,
            rw_stopx: stop,
            segtextured,
            markfloor,
            markceiling,
            two_sided: wall.back.is_some(),
            midtexture,
            toptexture,
            bottomtexture,
            maskedtexturecol,
            rw_centerangle,
            rw_offset,
            rw_distance,
            rw_scale,
            rw_scalestep,
            rw_midtexturemid,
            rw_toptexturemid,
            rw_bottomtexturemid,
            pixhigh,
            pixlow,
            pixhighstep,
            pixlowstep,
            topfrac,
            topstep,
            bottomfrac,
            bottomstep,
            wall_level,
        };
        self.render_seg_loop(&mut rw)?;

        // save sprite clipping info
        let r_data = &mut *self.r_data;
        let columns = start as usize..=stop as usize;
        if (ds.silhouette & SIL_TOP != 0 || maskedtexturecol.is_some())
            && ds.sprtopclip == SpriteClip::None
        {
            let base = r_data.alloc_openings(count)?;
            r_data.openings[base..base + count]
                .copy_from_slice(&r_data.portal_clip.ceilingclip[columns.clone()]);
            ds.sprtopclip = SpriteClip::Openings(base);
        }
        if (ds.silhouette & SIL_BOTTOM != 0 || maskedtexturecol.is_some())
            && ds.sprbottomclip == SpriteClip::None
        {
            let base = r_data.alloc_openings(count)?;
            r_data.openings[base..base + count]
                .copy_from_slice(&r_data.portal_clip.floorclip[columns]);
            ds.sprbottomclip = SpriteClip::Openings(base);
        }

        if maskedtexturecol.is_some() && ds.silhouette & SIL_TOP == 0 {
            ds.silhouette |= SIL_TOP;
            ds.tsilheight = FixedPoint::min();
        }
        if maskedtexturecol.is_some() && ds.silhouette & SIL_BOTTOM == 0 {
            ds.silhouette |= SIL_BOTTOM;
            ds.bsilheight = FixedPoint::max();
        }

        r_data.push_drawseg(ds)
    }

    /// R_RenderSegLoop - r_segs
    fn render_seg_loop(&mut self, rw: &mut SegRender) -> Result<(), RenderError> {
        let view = self.view;
        let proj = self.proj;
        let lights = self.lights;
        let textures = self.textures;
        let r_data = &mut *self.r_data;
        let sink = &mut *self.sink;
        let height = proj.size.height();

        for x in rw.rw_x..=rw.rw_stopx {
            let xu = x as usize;
            let clip = &mut r_data.portal_clip;

            // mark floor / ceiling areas
            let yl = (rw.topfrac.raw().wrapping_add(HEIGHTUNIT - 1) >> HEIGHTBITS)
                .max(clip.ceilingclip[xu] + 1);

            if rw.markceiling {
                let top = clip.ceilingclip[xu] + 1;
                let bottom = (yl - 1).min(clip.floorclip[xu] - 1);
                if top <= bottom {
                    if let Some(plane) = r_data.visplanes.ceilingplane {
                        r_data.visplanes.plane_mut(plane).set_column(x, top, bottom);
                    }
                }
            }

            let yh = (rw.bottomfrac.raw() >> HEIGHTBITS).min(clip.floorclip[xu] - 1);

            if rw.markfloor {
                let top = (yh + 1).max(clip.ceilingclip[xu] + 1);
                let bottom = clip.floorclip[xu] - 1;
                if top <= bottom {
                    if let Some(plane) = r_data.visplanes.floorplane {
                        r_data.visplanes.plane_mut(plane).set_column(x, top, bottom);
                    }
                }
            }

            // texturecolumn and lighting are independent of wall tiers
            let mut texturecolumn = 0;
            let mut light = 0;
            let mut iscale = FixedPoint::zero();
            if rw.segtextured {
                // calculate texture offset
                let angle = offset_angle(rw.rw_centerangle + proj.xtoviewangle[xu]);
                texturecolumn = (rw.rw_offset - finetangent(angle) * rw.rw_distance).to_int();
                light = view
                    .fixed_colormap
                    .unwrap_or_else(|| lights.scale_light(rw.wall_level, rw.rw_scale));
                iscale = FixedPoint::new((0xffff_ffff_u32 / rw.rw_scale.raw().max(1) as u32) as i32);
            }
            let scale = rw.rw_scale;
            let column = |kind, texture, yl, yh, texture_mid| ColumnJob {
                x,
                yl,
                yh,
                kind,
                source: textures.wall_column(texture, texturecolumn),
                texture_mid,
                iscale,
                scale,
                light,
            };

            // draw the wall tiers
            if !rw.two_sided {
                // single sided line
                if let Some(mid) = rw.midtexture {
                    if yl <= yh {
                        sink.draw_column(column(SurfaceKind::Mid, mid, yl, yh, rw.rw_midtexturemid))?;
                    }
                }
                let clip = &mut r_data.portal_clip;
                clip.ceilingclip[xu] = height;
                clip.floorclip[xu] = -1;
            } else {
                // two sided line
                if let Some(top) = rw.toptexture {
                    // top wall
                    let mid = (rw.pixhigh.raw() >> HEIGHTBITS)
                        .min(r_data.portal_clip.floorclip[xu] - 1);
                    rw.pixhigh += rw.pixhighstep;

                    if mid >= yl {
                        sink.draw_column(column(SurfaceKind::Top, top, yl, mid, rw.rw_toptexturemid))?;
                        r_data.portal_clip.ceilingclip[xu] = r_data.portal_clip.bound(mid);
                    } else {
                        r_data.portal_clip.ceilingclip[xu] = r_data.portal_clip.bound(yl - 1);
                    }
                } else if rw.markceiling {
                    // no top wall
                    r_data.portal_clip.ceilingclip[xu] = r_data.portal_clip.bound(yl - 1);
                }

                if let Some(bottom) = rw.bottomtexture {
                    // bottom wall
                    let mid = (rw.pixlow.raw().wrapping_add(HEIGHTUNIT - 1) >> HEIGHTBITS)
                        .max(r_data.portal_clip.ceilingclip[xu] + 1);
                    rw.pixlow += rw.pixlowstep;

                    if mid <= yh {
                        sink.draw_column(column(
                            SurfaceKind::Bottom,
                            bottom,
                            mid,
                            yh,
                            rw.rw_bottomtexturemid,
                        ))?;
                        r_data.portal_clip.floorclip[xu] = r_data.portal_clip.bound(mid);
                    } else {
                        r_data.portal_clip.floorclip[xu] = r_data.portal_clip.bound(yh + 1);
                    }
                } else if rw.markfloor {
                    // no bottom wall
                    r_data.portal_clip.floorclip[xu] = r_data.portal_clip.bound(yh + 1);
                }

                if let Some(base) = rw.maskedtexturecol {
                    // save texturecol
                    //  for backdrawing of masked mid texture
                    r_data.openings[base + (x - rw.rw_x) as usize] = texturecolumn;
                }
            }

            rw.rw_scale += rw.rw_scalestep;
            rw.topfrac += rw.topstep;
            rw.bottomfrac += rw.bottomstep;
        }
        Ok(())
    }
}

/// Fine angle for the texture offset of a column. Angles that round past
/// the end of the wall are held on the last entry, keeping the tangent's sign.
#[inline]
fn offset_angle(angle: Angle) -> usize {
    angle.fine().min(FINEANGLES / 2 - 1)
}

#[cfg(test)]
mod tests {
    use math::{ANGLETOFINESHIFT, Angle, FINEANGLES, finetangent};

    use super::offset_angle;

    #[test]
    fn offset_angle_holds_at_the_wall_end() {
        assert_eq!(offset_angle(Angle::DEG90), FINEANGLES / 4);
        let last = Angle::new(((FINEANGLES / 2 - 1) << ANGLETOFINESHIFT) as u32);
        assert_eq!(offset_angle(last), FINEANGLES / 2 - 1);
        // just past 180° keeps the steep positive tangent of its neighbour
        let past = Angle::new(((FINEANGLES / 2 + 3) << ANGLETOFINESHIFT) as u32);
        assert_eq!(offset_angle(past), FINEANGLES / 2 - 1);
        assert!(finetangent(offset_angle(past)) > finetangent(offset_angle(last) - 1));
        assert!(finetangent(offset_angle(past)).raw() > 0);
    }
}
