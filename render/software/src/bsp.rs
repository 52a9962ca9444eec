#[cfg(feature = "hprof")]
use coarse_prof::profile;
use level::{BBox, IS_SSECTOR_MASK, MapData, Sector, SideDef};
use log::{debug, trace};
use math::Angle;
use render_trait::{
    BufferSize, DrawSink, LightTable, RenderError, SpriteGather, TextureProvider,
};

use crate::defs::{DrawSeg, Visplane};
use crate::lighting::Lighting;
use crate::segs::{SegContext, WallSeg};
use crate::solid_segs::SolidSegs;
use crate::utilities::{Projection, vertex_angle_to_view};
use crate::{FrameStats, RenderConfig, RenderData, ViewPoint};

/// Which pair of bounding box corners spans the box as seen from each of
/// the nine regions around it. Indexes are `[x1, y1, x2, y2]` into
/// `[top, bottom, left, right]`.
const CHECKCOORD: [[usize; 4]; 12] = [
    [3, 0, 2, 1],
    [3, 0, 2, 0],
    [3, 1, 2, 0],
    [0; 4],
    [2, 0, 2, 1],
    [0; 4],
    [3, 1, 3, 0],
    [0; 4],
    [2, 0, 3, 1],
    [2, 1, 3, 1],
    [2, 1, 3, 0],
    [0; 4],
];

/// How a seg affects the clip list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallClass {
    /// Hides everything behind it: one-sided lines and closed doors
    Solid,
    /// Draws upper or lower walls or a masked texture but can be seen
    /// through
    Window,
    /// Same sector on both sides for drawing purposes, skipped
    Invisible,
}

/// The R_AddLine decision for a seg that faces the view
pub fn classify(front: &Sector, back: Option<&Sector>, side: &SideDef) -> WallClass {
    // Single sided line?
    let Some(back) = back else {
        return WallClass::Solid;
    };

    // Closed door.
    if back.ceilingheight <= front.floorheight || back.floorheight >= front.ceilingheight {
        return WallClass::Solid;
    }

    // Window.
    if back.ceilingheight != front.ceilingheight || back.floorheight != front.floorheight {
        return WallClass::Window;
    }

    // Reject empty lines used for triggers
    //  and special events.
    // Identical floor and ceiling on both sides,
    // identical light levels on both sides,
    // and no middle texture.
    if back.ceilingpic == front.ceilingpic
        && back.floorpic == front.floorpic
        && back.lightlevel == front.lightlevel
        && side.midtexture.is_none()
    {
        return WallClass::Invisible;
    }

    WallClass::Window
}

/// We store most of what is needed for rendering here to avoid having to
/// pass too many things in args through multiple function calls.
///
/// A frame is `begin_frame`, `render_bsp` then `end_frame`. After the
/// frame `drawsegs` and `openings` stay available to a sprite clipper
/// until the next `begin_frame`.
pub struct SoftwareRenderer {
    config: RenderConfig,
    /// Field of view the projection was built for, as requested
    fov_half: Angle,
    projection: Projection,
    lights: Box<dyn LightTable>,
    view: ViewPoint,
    solid_segs: SolidSegs,
    pub(super) r_data: RenderData,
    stats: FrameStats,
}

impl SoftwareRenderer {
    pub fn new(config: RenderConfig) -> SoftwareRenderer {
        let size = BufferSize::new(config.width, config.height);
        debug!("Software renderer {}x{}: {:?}", config.width, config.height, config);
        SoftwareRenderer {
            fov_half: Angle::DEG45,
            projection: Projection::new(size, Angle::DEG45),
            lights: Box::new(Lighting::new(config.width)),
            view: ViewPoint::default(),
            solid_segs: SolidSegs::new(config.width, config.max_clip_spans),
            r_data: RenderData::new(&config),
            stats: FrameStats::default(),
            config,
        }
    }

    /// Replace the default diminishing light tables
    pub fn set_light_table(&mut self, lights: Box<dyn LightTable>) {
        self.lights = lights;
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Reset all per frame state for a new view. `fov_half` is half the
    /// horizontal field of view, 45° being the classic look.
    pub fn begin_frame(&mut self, view: &ViewPoint, fov_half: Angle) {
        if fov_half != self.fov_half {
            let size = BufferSize::new(self.config.width, self.config.height);
            self.projection = Projection::new(size, fov_half);
            self.fov_half = fov_half;
        }
        self.view = *view;
        self.stats = FrameStats::default();
        self.solid_segs.reset(self.config.width);
        self.r_data
            .clear_data(view.angle, self.projection.projection);
    }

    /// R_RenderBSPNode from the root. Walls are emitted front to back as
    /// they are found. `sprites` hears about each subsector visited.
    pub fn render_bsp<T, G, S>(
        &mut self,
        map: &MapData,
        textures: &T,
        sprites: &mut G,
        sink: &mut S,
    ) -> Result<(), RenderError>
    where
        T: TextureProvider + ?Sized,
        G: SpriteGather + ?Sized,
        S: DrawSink + ?Sized,
    {
        #[cfg(feature = "hprof")]
        profile!("render_bsp_node begin!");
        self.render_bsp_node(map, map.start_node(), textures, sprites, sink)?;
        trace!("BSP traversals for render: {}", self.stats.nodes_visited);
        Ok(())
    }

    /// Emit floors, ceilings and sky, then the masked middle textures
    /// back to front.
    pub fn end_frame<T, S>(
        &mut self,
        map: &MapData,
        textures: &T,
        sink: &mut S,
    ) -> Result<FrameStats, RenderError>
    where
        T: TextureProvider + ?Sized,
        S: DrawSink + ?Sized,
    {
        #[cfg(feature = "hprof")]
        profile!("draw_planes");
        self.r_data.visplanes.draw_planes(
            &self.view,
            &self.projection,
            &*self.lights,
            textures,
            self.config.plane_output,
            sink,
        )?;

        #[cfg(feature = "hprof")]
        profile!("draw_masked");
        let mut ctx = SegContext {
            view: &self.view,
            proj: &self.projection,
            lights: &*self.lights,
            textures,
            r_data: &mut self.r_data,
            sink,
        };
        ctx.draw_masked(map)?;

        self.stats.visplanes = self.r_data.visplanes.planes().len();
        self.stats.drawsegs = self.r_data.drawsegs.len();
        self.stats.openings = self.r_data.lastopening;
        self.stats.lines_mapped = self.r_data.mapped_lines.len();
        debug!("Frame done: {:?}", self.stats);
        Ok(self.stats)
    }

    /// A whole frame in one call
    #[allow(clippy::too_many_arguments)]
    pub fn render_player_view<T, G, S>(
        &mut self,
        view: &ViewPoint,
        fov_half: Angle,
        map: &MapData,
        textures: &T,
        sprites: &mut G,
        sink: &mut S,
    ) -> Result<FrameStats, RenderError>
    where
        T: TextureProvider + ?Sized,
        G: SpriteGather + ?Sized,
        S: DrawSink + ?Sized,
    {
        self.begin_frame(view, fov_half);
        self.render_bsp(map, textures, sprites, sink)?;
        self.end_frame(map, textures, sink)
    }

    pub fn solid_segs(&self) -> &SolidSegs {
        &self.solid_segs
    }

    pub fn visplanes(&self) -> &[Visplane] {
        self.r_data.visplanes.planes()
    }

    pub fn drawsegs(&self) -> &[DrawSeg] {
        &self.r_data.drawsegs
    }

    /// Pool that `DrawSeg` sprite clips and masked columns index into
    pub fn openings(&self) -> &[i32] {
        &self.r_data.openings[..self.r_data.lastopening]
    }

    /// Lines with a visible wall range this frame, for the automap
    pub fn mapped_lines(&self) -> &[usize] {
        &self.r_data.mapped_lines
    }

    /// Half the horizontal view angle in use
    pub fn clip_angle(&self) -> Angle {
        self.projection.clipangle
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// R_RenderBSPNode - r_bsp
    fn render_bsp_node<T, G, S>(
        &mut self,
        map: &MapData,
        node_id: u32,
        textures: &T,
        sprites: &mut G,
        sink: &mut S,
    ) -> Result<(), RenderError>
    where
        T: TextureProvider + ?Sized,
        G: SpriteGather + ?Sized,
        S: DrawSink + ?Sized,
    {
        self.stats.nodes_visited += 1;

        if node_id & IS_SSECTOR_MASK != 0 {
            let subsector = if node_id == u32::MAX {
                0
            } else {
                // It's a leaf node and is the index to a subsector
                (node_id & !IS_SSECTOR_MASK) as usize
            };
            return self.draw_subsector(map, subsector, textures, sprites, sink);
        }

        // otherwise get node
        let node = map
            .get_nodes()
            .get(node_id as usize)
            .ok_or(RenderError::BadNode {
                node: node_id as usize,
            })?;
        // find which side the point is on
        let side = node.point_on_side(self.view.x, self.view.y);
        // Recursively divide front space.
        self.render_bsp_node(map, node.children[side], textures, sprites, sink)?;

        // Possibly divide back space.
        if self.check_bbox(&node.bboxes[side ^ 1]) {
            self.render_bsp_node(map, node.children[side ^ 1], textures, sprites, sink)?;
        }
        Ok(())
    }

    /// R_Subsector - r_bsp
    fn draw_subsector<T, G, S>(
        &mut self,
        map: &MapData,
        index: usize,
        textures: &T,
        sprites: &mut G,
        sink: &mut S,
    ) -> Result<(), RenderError>
    where
        T: TextureProvider + ?Sized,
        G: SpriteGather + ?Sized,
        S: DrawSink + ?Sized,
    {
        #[cfg(feature = "hprof")]
        profile!("draw_subsector");
        let subsector = map
            .subsectors()
            .get(index)
            .ok_or(RenderError::BadSubsector { subsector: index })?;
        self.stats.subsectors_visited += 1;

        let sector = &map.sectors()[subsector.sector];
        let sky = textures.sky_flat();
        let planes = &mut self.r_data.visplanes;

        planes.floorplane = if sector.floorheight < self.view.z {
            Some(planes.find_plane(
                sector.floorheight,
                sector.floorpic,
                sector.lightlevel,
                sky,
            )?)
        } else {
            None
        };

        planes.ceilingplane = if sector.ceilingheight > self.view.z || sector.ceilingpic == sky {
            Some(planes.find_plane(
                sector.ceilingheight,
                sector.ceilingpic,
                sector.lightlevel,
                sky,
            )?)
        } else {
            None
        };

        sprites.add_sprites(index, subsector.sector);

        let start = subsector.start_seg as usize;
        for offset in 0..map.subsector_segs(subsector).len() {
            self.add_line(map, start + offset, textures, sink)?;
        }
        Ok(())
    }

    /// R_AddLine - r_bsp
    ///
    /// Clips the given segment and adds any visible pieces to the line
    /// list.
    fn add_line<T, S>(
        &mut self,
        map: &MapData,
        index: usize,
        textures: &T,
        sink: &mut S,
    ) -> Result<(), RenderError>
    where
        T: TextureProvider + ?Sized,
        S: DrawSink + ?Sized,
    {
        let seg = &map.segments()[index];
        let view = self.view;

        // OPTIMIZE: quickly reject orthogonal back sides.
        let angle1 = vertex_angle_to_view(&view, seg.v1.x, seg.v1.y);
        let angle2 = vertex_angle_to_view(&view, seg.v2.x, seg.v2.y);

        // Clip to view edges.
        let span = angle1 - angle2;

        // Back side? I.e. backface culling
        if span >= Angle::DEG180 {
            return Ok(());
        }

        // Global angle needed by segcalc.
        let rw_angle1 = angle1;
        let Some((x1, x2)) = self.clip_angles(angle1 - view.angle, angle2 - view.angle, span)
        else {
            return Ok(());
        };

        let front = &map.sectors()[seg.frontsector];
        let back = seg.backsector.map(|b| &map.sectors()[b]);
        let side = &map.sidedefs()[seg.sidedef];
        let class = classify(front, back, side);
        self.stats.segs_classified += 1;

        let wall = WallSeg {
            index,
            seg,
            line: &map.linedefs()[seg.linedef],
            side,
            front,
            back,
            rw_angle1,
        };
        let mut ctx = SegContext {
            view: &self.view,
            proj: &self.projection,
            lights: &*self.lights,
            textures,
            r_data: &mut self.r_data,
            sink,
        };

        match class {
            WallClass::Solid => self
                .solid_segs
                .insert_solid(x1, x2 - 1, |first, last| {
                    ctx.store_wall_range(first, last, &wall)
                }),
            WallClass::Window => self
                .solid_segs
                .insert_transparent(x1, x2 - 1, |first, last| {
                    ctx.store_wall_range(first, last, &wall)
                }),
            WallClass::Invisible => Ok(()),
        }
    }

    /// Clip view relative angles to the field of view and convert them to
    /// screen columns. `None` when nothing is left or the result does not
    /// cross a pixel.
    fn clip_angles(&self, mut angle1: Angle, mut angle2: Angle, span: Angle) -> Option<(i32, i32)> {
        let clipangle = self.projection.clipangle;
        let fov = clipangle + clipangle;

        let mut tspan = angle1 + clipangle;
        if tspan > fov {
            tspan -= fov;
            // Totally off the left edge?
            if tspan >= span {
                return None;
            }
            angle1 = clipangle;
        }
        tspan = clipangle - angle2;
        if tspan > fov {
            tspan -= fov;
            // Totally off the right edge?
            if tspan >= span {
                return None;
            }
            angle2 = -clipangle;
        }

        // The seg is in the view range, but not necessarily visible.
        let x1 = self.projection.angle_to_x(angle1);
        let x2 = self.projection.angle_to_x(angle2);

        // Does not cross a pixel?
        if x1 == x2 {
            return None;
        }
        Some((x1, x2))
    }

    /// R_CheckBBox - r_bsp
    ///
    /// Checks BSP node/subtree bounding box. Returns true if some part of
    /// the bbox might be visible.
    fn check_bbox(&self, bbox: &BBox) -> bool {
        #[cfg(feature = "hprof")]
        profile!("check_bbox");
        let view = &self.view;

        // Find the corners of the box
        // that define the edges from current viewpoint.
        let boxx = if view.x <= bbox.left {
            0
        } else if view.x < bbox.right {
            1
        } else {
            2
        };
        let boxy = if view.y >= bbox.top {
            0
        } else if view.y > bbox.bottom {
            1
        } else {
            2
        };

        let boxpos = (boxy << 2) + boxx;
        if boxpos == 5 {
            return true;
        }

        let coords = [bbox.top, bbox.bottom, bbox.left, bbox.right];
        let [a, b, c, d] = CHECKCOORD[boxpos];

        // check clip list for an open space
        let angle1 = vertex_angle_to_view(view, coords[a], coords[b]) - view.angle;
        let angle2 = vertex_angle_to_view(view, coords[c], coords[d]) - view.angle;

        let span = angle1 - angle2;

        // Sitting on a line?
        if span >= Angle::DEG180 {
            return true;
        }

        let Some((sx1, sx2)) = self.clip_angles(angle1, angle2, span) else {
            return false;
        };

        !self.solid_segs.is_fully_covered(sx1, sx2 - 1)
    }
}
