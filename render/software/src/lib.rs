//! Visible-surface determination for a Doom-style BSP level.
//!
//! One frame is `begin_frame`, `render_bsp`, `end_frame`. Walls are emitted
//! front to back while the BSP is walked, floors, ceilings and sky when the
//! frame ends, and see-through middle textures last, back to front.

use log::error;
use math::{Angle, FixedPoint};
use render_trait::RenderError;

use self::{planes::VisPlaneRender, portals::PortalClip};

mod bsp;
mod defs;
mod lighting;
mod masked;
mod planes;
mod portals;
mod segs;
mod solid_segs;
mod utilities;

#[cfg(test)]
mod tests;

pub use bsp::{SoftwareRenderer, WallClass, classify};
pub use defs::{
    ClipRange, DrawSeg, SIL_BOTH, SIL_BOTTOM, SIL_NONE, SIL_TOP, SpriteClip, Visplane,
};
pub use lighting::Lighting;
pub use solid_segs::SolidSegs;

/// How flats leave `end_frame`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PlaneOutput {
    /// One `ColumnJob` per plane column
    #[default]
    Columns,
    /// Horizontal `SpanJob`s built from the plane columns. Sky stays columns.
    Spans,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Clip list capacity, including the two sentinels
    pub max_clip_spans: usize,
    pub max_visplanes: usize,
    pub max_drawsegs: usize,
    /// Entries in the shared pool for masked columns and sprite clips
    pub max_openings: usize,
    pub plane_output: PlaneOutput,
}

impl RenderConfig {
    /// Limits scaled to the view size the way the classic tables were
    pub fn with_size(width: usize, height: usize) -> Self {
        let width = width.max(1);
        Self {
            width,
            height: height.max(1),
            max_clip_spans: width / 2 + 4,
            max_visplanes: defs::MAXVISPLANES,
            max_drawsegs: defs::MAXDRAWSEGS,
            max_openings: width * defs::OPENINGS_PER_COLUMN,
            plane_output: PlaneOutput::Columns,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::with_size(320, 200)
    }
}

/// Where the frame is seen from. Coordinates are map units in fixed point,
/// `z` is the absolute eye height.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ViewPoint {
    pub x: FixedPoint,
    pub y: FixedPoint,
    pub z: FixedPoint,
    pub angle: Angle,
    /// Added to every light level, e.g. from gun flashes
    pub extralight: i32,
    /// Forces every wall and flat to one colormap (invulnerability,
    /// light amp)
    pub fixed_colormap: Option<usize>,
}

impl ViewPoint {
    /// A view from whole map units and degrees
    pub fn new(x: i32, y: i32, z: i32, degrees: f64) -> Self {
        Self {
            x: FixedPoint::from_int(x),
            y: FixedPoint::from_int(y),
            z: FixedPoint::from_int(z),
            angle: Angle::from_degrees(degrees),
            ..Default::default()
        }
    }
}

/// Counters for one frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub nodes_visited: usize,
    pub subsectors_visited: usize,
    pub segs_classified: usize,
    pub visplanes: usize,
    pub drawsegs: usize,
    pub openings: usize,
    pub lines_mapped: usize,
}

/// Frame scratch shared between the BSP walk, the wall renderer and the
/// plane and masked passes at the end of the frame.
///
/// `drawsegs` and `openings` stay readable after the frame for a sprite
/// clipper.
pub(crate) struct RenderData {
    pub drawsegs: Vec<DrawSeg>,
    max_drawsegs: usize,
    pub portal_clip: PortalClip,
    pub visplanes: VisPlaneRender,
    /// Masked texture columns and saved sprite clip columns
    pub openings: Vec<i32>,
    pub lastopening: usize,
    /// Lines that had a wall range stored this frame
    pub mapped_lines: Vec<usize>,
    mapped_seen: Vec<bool>,
}

impl RenderData {
    pub(crate) fn new(config: &RenderConfig) -> Self {
        Self {
            drawsegs: Vec::with_capacity(config.max_drawsegs),
            max_drawsegs: config.max_drawsegs,
            portal_clip: PortalClip::new(config.width, config.height),
            visplanes: VisPlaneRender::new(config.width, config.height, config.max_visplanes),
            openings: vec![0; config.max_openings],
            lastopening: 0,
            mapped_lines: Vec::new(),
            mapped_seen: Vec::new(),
        }
    }

    pub(crate) fn clear_data(&mut self, view_angle: Angle, projection: FixedPoint) {
        self.portal_clip.clear();
        self.drawsegs.clear();
        self.lastopening = 0;
        self.visplanes.clear_planes(view_angle, projection);
        for line in self.mapped_lines.drain(..) {
            self.mapped_seen[line] = false;
        }
    }

    /// Reserve `count` consecutive entries in `openings`
    pub(crate) fn alloc_openings(&mut self, count: usize) -> Result<usize, RenderError> {
        let base = self.lastopening;
        if base + count > self.openings.len() {
            error!("Out of openings: {} + {count}", self.lastopening);
            return Err(RenderError::OpeningsOverflow {
                capacity: self.openings.len(),
            });
        }
        self.lastopening += count;
        Ok(base)
    }

    pub(crate) fn check_drawseg_room(&self) -> Result<(), RenderError> {
        if self.drawsegs.len() >= self.max_drawsegs {
            error!("Out of drawsegs: {}", self.drawsegs.len());
            return Err(RenderError::DrawSegOverflow {
                capacity: self.max_drawsegs,
            });
        }
        Ok(())
    }

    pub(crate) fn push_drawseg(&mut self, ds: DrawSeg) -> Result<(), RenderError> {
        self.check_drawseg_room()?;
        self.drawsegs.push(ds);
        Ok(())
    }

    pub(crate) fn mark_mapped(&mut self, line: usize) {
        if line >= self.mapped_seen.len() {
            self.mapped_seen.resize(line + 1, false);
        }
        if !self.mapped_seen[line] {
            self.mapped_seen[line] = true;
            self.mapped_lines.push(line);
        }
    }
}
