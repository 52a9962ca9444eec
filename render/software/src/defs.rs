use std::fmt::Debug;

use math::FixedPoint;

pub const SIL_NONE: i32 = 0;
pub const SIL_BOTTOM: i32 = 1;
pub const SIL_TOP: i32 = 2;
pub const SIL_BOTH: i32 = 3;

pub const MAXDRAWSEGS: usize = 256;
pub const MAXVISPLANES: usize = 128;
/// Default openings pool is this many entries per screen column
pub const OPENINGS_PER_COLUMN: usize = 64;

/// Stored in a masked column slot once the column has been emitted
pub const MASKED_DONE: i32 = i32::MAX;

/// Marks a visplane column with nothing in it
pub const UNSET: u16 = u16::MAX;

/// A sprite clip array saved with a drawseg
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SpriteClip {
    /// Nothing saved, sprites are not clipped on this side
    #[default]
    None,
    /// The wall covers the whole column height, a sprite behind it is
    /// hidden entirely
    Full,
    /// Per-column clip values at `openings[index + (x - x1)]`
    Openings(usize),
}

/// A stored wall range, kept for clipping sprites and drawing masked
/// middle textures after the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawSeg {
    /// Index of the seg in the map
    pub seg: usize,
    pub x1: i32,
    pub x2: i32,

    pub scale1: FixedPoint,
    pub scale2: FixedPoint,
    pub scalestep: FixedPoint,

    /// 0=none, 1=bottom, 2=top, 3=both
    pub silhouette: i32,

    /// do not clip sprites above this
    pub bsilheight: FixedPoint,

    /// do not clip sprites below this
    pub tsilheight: FixedPoint,

    /// Copy of `ceilingclip` over `x1..=x2`
    pub sprtopclip: SpriteClip,
    /// Copy of `floorclip` over `x1..=x2`
    pub sprbottomclip: SpriteClip,

    /// Index of the `x1` texture column in `openings`
    pub maskedtexturecol: Option<usize>,
}

impl DrawSeg {
    pub fn new(seg: usize, x1: i32, x2: i32) -> Self {
        DrawSeg {
            seg,
            x1,
            x2,
            scale1: FixedPoint::zero(),
            scale2: FixedPoint::zero(),
            scalestep: FixedPoint::zero(),
            silhouette: SIL_NONE,
            bsilheight: FixedPoint::zero(),
            tsilheight: FixedPoint::zero(),
            sprtopclip: SpriteClip::None,
            sprbottomclip: SpriteClip::None,
            maskedtexturecol: None,
        }
    }

    /// Scale at screen column `x`
    pub fn scale_at(&self, x: i32) -> FixedPoint {
        self.scale1 + FixedPoint::new(self.scalestep.raw().wrapping_mul(x - self.x1))
    }
}

/// The range of columns on the screen clipped against
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClipRange {
    /// Leftmost starting pixel/column
    pub first: i32,
    /// Rightmost ending pixel/column
    pub last: i32,
}

/// Now what is a visplane, anyway?
///
/// A flat region with one height, flat and light level, and a vertical
/// extent per screen column in `minx..=maxx`. `top` and `bottom` carry a
/// padding entry at each end so `minx - 1` and `maxx + 1` can be marked
/// unset when building spans.
#[derive(Clone)]
pub struct Visplane {
    pub height: FixedPoint,
    pub picnum: usize,
    pub lightlevel: i32,
    pub minx: i32,
    pub maxx: i32,
    top: Vec<u16>,
    bottom: Vec<u16>,
}

impl Visplane {
    pub(crate) fn new(width: usize) -> Self {
        Visplane {
            height: FixedPoint::zero(),
            picnum: 0,
            lightlevel: 0,
            minx: width as i32,
            maxx: -1,
            top: vec![UNSET; width + 2],
            bottom: vec![0; width + 2],
        }
    }

    /// Reuse this record for a new key with no columns set
    pub(crate) fn reset(
        &mut self,
        height: FixedPoint,
        picnum: usize,
        lightlevel: i32,
        minx: i32,
        maxx: i32,
    ) {
        self.height = height;
        self.picnum = picnum;
        self.lightlevel = lightlevel;
        self.minx = minx;
        self.maxx = maxx;
        self.top.fill(UNSET);
        self.bottom.fill(0);
    }

    #[inline]
    fn slot(x: i32) -> usize {
        (x + 1) as usize
    }

    /// Raw top entry, `UNSET` when the column is empty. `x` may be one past
    /// either edge of the screen.
    #[inline]
    pub fn top(&self, x: i32) -> u16 {
        self.top[Self::slot(x)]
    }

    #[inline]
    pub fn bottom(&self, x: i32) -> u16 {
        self.bottom[Self::slot(x)]
    }

    /// The rows covered at column `x`
    pub fn column(&self, x: i32) -> Option<(i32, i32)> {
        if x < -1 || Self::slot(x) >= self.top.len() {
            return None;
        }
        let top = self.top(x);
        if top == UNSET || top > self.bottom(x) {
            return None;
        }
        Some((top as i32, self.bottom(x) as i32))
    }

    #[inline]
    pub(crate) fn set_column(&mut self, x: i32, top: i32, bottom: i32) {
        let slot = Self::slot(x);
        self.top[slot] = top as u16;
        self.bottom[slot] = bottom as u16;
    }

    #[inline]
    pub(crate) fn unset_column(&mut self, x: i32) {
        self.top[Self::slot(x)] = UNSET;
    }

    /// True if no column in `start..=stop` has been marked
    pub(crate) fn is_unset(&self, start: i32, stop: i32) -> bool {
        if start > stop {
            return true;
        }
        self.top[Self::slot(start)..=Self::slot(stop)]
            .iter()
            .all(|t| *t == UNSET)
    }
}

impl Debug for Visplane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visplane")
            .field("height", &self.height)
            .field("picnum", &self.picnum)
            .field("lightlevel", &self.lightlevel)
            .field("minx", &self.minx)
            .field("maxx", &self.maxx)
            .finish_non_exhaustive()
    }
}
