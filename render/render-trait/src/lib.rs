//! The seams between the visible-surface core and the rest of a renderer.
//!
//! The core never touches pixels. It emits `DrawJob`s into a `DrawSink`,
//! asks a `TextureProvider` for opaque texture handles, a `LightTable` for
//! colormap indexes, and tells a `SpriteGather` which subsectors it walked.

mod jobs;

pub use jobs::*;
use math::FixedPoint;
use thiserror::Error;

/// Number of distinct light levels in a sector light (`lightlevel >> 4`)
pub const LIGHTLEVELS: usize = 16;
/// Number of colormaps a `LightTable` may return
pub const NUMCOLORMAPS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSize {
    width: i32,
    height: i32,
}

impl BufferSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
        }
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    pub const fn half_width(&self) -> i32 {
        self.width / 2
    }

    pub const fn half_height(&self) -> i32 {
        self.height / 2
    }

    pub const fn width_usize(&self) -> usize {
        self.width as usize
    }

    pub const fn height_usize(&self) -> usize {
        self.height as usize
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("clip list is full ({capacity} spans)")]
    ClipSpanOverflow { capacity: usize },
    #[error("out of visplanes ({capacity})")]
    VisplaneOverflow { capacity: usize },
    #[error("out of draw segs ({capacity})")]
    DrawSegOverflow { capacity: usize },
    #[error("openings pool exhausted ({capacity} entries)")]
    OpeningsOverflow { capacity: usize },
    #[error("draw job queue is full ({capacity} jobs)")]
    JobQueueFull { capacity: usize },
    #[error("BSP node {node} does not exist")]
    BadNode { node: usize },
    #[error("subsector {subsector} does not exist")]
    BadSubsector { subsector: usize },
}

/// An opaque reference to texture data, chosen by the `TextureProvider`
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Where textures and flats come from. Column indexes passed in may be
/// negative or past the texture width, the provider wraps them.
pub trait TextureProvider {
    /// Texture number after animation, `texturetranslation`
    fn translate_texture(&self, texture: usize) -> usize {
        texture
    }

    /// Flat number after animation, `flattranslation`
    fn translate_flat(&self, flat: usize) -> usize {
        flat
    }

    /// Height of a wall texture, in map units as fixed point
    fn texture_height(&self, texture: usize) -> FixedPoint;

    /// R_GetColumn
    fn wall_column(&self, texture: usize, column: i32) -> TextureHandle;

    fn flat(&self, flat: usize) -> TextureHandle;

    /// The flat number that marks a ceiling as open sky
    fn sky_flat(&self) -> usize;

    fn sky_column(&self, column: i32) -> TextureHandle;

    /// Row of the sky texture at the horizon
    fn sky_texture_mid(&self) -> FixedPoint {
        FixedPoint::from_int(100)
    }
}

/// Light level to colormap index
pub trait LightTable {
    /// Colormap for a wall or masked column. `level` is in
    /// `0..LIGHTLEVELS`, `scale` is the column's projection scale.
    fn scale_light(&self, level: usize, scale: FixedPoint) -> usize;

    /// Colormap for a plane row `distance` away from the view
    fn z_light(&self, level: usize, distance: FixedPoint) -> usize;
}

/// Called once for every subsector the BSP walk visits, before any of its
/// walls, in front-to-back order. Sprite collection hangs off this.
pub trait SpriteGather {
    fn add_sprites(&mut self, subsector: usize, sector: usize);
}

impl SpriteGather for () {
    fn add_sprites(&mut self, _subsector: usize, _sector: usize) {}
}

/// A `TextureProvider` that only knows texture sizes. Handles pack the
/// texture number in the high 32 bits and the wrapped column in the low.
#[derive(Debug, Clone)]
pub struct TextureSizes {
    /// (width, height) in texels per texture
    pub textures: Vec<(i32, i32)>,
    pub sky_flat: usize,
    pub sky_width: i32,
}

impl TextureSizes {
    pub fn new(textures: Vec<(i32, i32)>, sky_flat: usize) -> Self {
        Self {
            textures,
            sky_flat,
            sky_width: 256,
        }
    }

    /// Split a handle made by this provider back into (texture, column)
    pub fn decode(handle: TextureHandle) -> (usize, i32) {
        ((handle.0 >> 32) as usize, (handle.0 & 0xffff_ffff) as i32)
    }

    fn encode(texture: usize, column: i32, width: i32) -> TextureHandle {
        // texturewidthmask: widths round up to a power of two
        let mask = (width.max(1) as u32).next_power_of_two() as i32 - 1;
        TextureHandle(((texture as u64) << 32) | (column & mask) as u32 as u64)
    }
}

impl TextureProvider for TextureSizes {
    fn texture_height(&self, texture: usize) -> FixedPoint {
        let height = self.textures.get(texture).map_or(0, |t| t.1);
        FixedPoint::from_int(height)
    }

    fn wall_column(&self, texture: usize, column: i32) -> TextureHandle {
        let width = self.textures.get(texture).map_or(1, |t| t.0);
        Self::encode(texture, column, width)
    }

    fn flat(&self, flat: usize) -> TextureHandle {
        TextureHandle((flat as u64) << 32)
    }

    fn sky_flat(&self) -> usize {
        self.sky_flat
    }

    fn sky_column(&self, column: i32) -> TextureHandle {
        Self::encode(u32::MAX as usize, column, self.sky_width)
    }
}
