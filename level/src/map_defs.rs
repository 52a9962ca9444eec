use glam::Vec2;
use math::{Angle, DivLine, FixedPoint};

/// A map vertex in 16.16 fixed point
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    pub x: FixedPoint,
    pub y: FixedPoint,
}

impl Vertex {
    pub const fn new(x: FixedPoint, y: FixedPoint) -> Self {
        Self { x, y }
    }

    /// Convert from map units as floats, as an editor or loader would give
    /// them
    pub fn from_vec2(v: Vec2) -> Self {
        Self {
            x: FixedPoint::new((v.x * 65536.0) as i32),
            y: FixedPoint::new((v.y * 65536.0) as i32),
        }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x.to_f32(), self.y.to_f32())
    }
}

/// The SECTORS record, reduced to what drawing needs
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sector {
    pub floorheight: FixedPoint,
    pub ceilingheight: FixedPoint,
    /// Flat number
    pub floorpic: usize,
    /// Flat number. Equal to the sky flat for outdoor ceilings.
    pub ceilingpic: usize,
    /// 0..=255
    pub lightlevel: i32,
}

impl Sector {
    /// Heights are in whole map units
    pub fn new(
        floorheight: i32,
        ceilingheight: i32,
        floorpic: usize,
        ceilingpic: usize,
        lightlevel: i32,
    ) -> Self {
        Self {
            floorheight: FixedPoint::from_int(floorheight),
            ceilingheight: FixedPoint::from_int(ceilingheight),
            floorpic,
            ceilingpic,
            lightlevel,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SideDef {
    // add this to the calculated texture column
    pub textureoffset: FixedPoint,
    // add this to the calculated texture top
    pub rowoffset: FixedPoint,

    pub toptexture: Option<usize>,
    pub bottomtexture: Option<usize>,
    pub midtexture: Option<usize>,

    /// Sector the SideDef is facing.
    pub sector: usize,
}

impl SideDef {
    pub fn new(sector: usize) -> Self {
        Self {
            sector,
            ..Default::default()
        }
    }

    pub fn with_mid(mut self, texture: usize) -> Self {
        self.midtexture = Some(texture);
        self
    }

    pub fn with_top(mut self, texture: usize) -> Self {
        self.toptexture = Some(texture);
        self
    }

    pub fn with_bottom(mut self, texture: usize) -> Self {
        self.bottomtexture = Some(texture);
        self
    }

    pub fn with_offsets(mut self, textureoffset: i32, rowoffset: i32) -> Self {
        self.textureoffset = FixedPoint::from_int(textureoffset);
        self.rowoffset = FixedPoint::from_int(rowoffset);
        self
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BBox {
    pub top: FixedPoint,
    pub bottom: FixedPoint,
    pub left: FixedPoint,
    pub right: FixedPoint,
}

impl BBox {
    pub fn new(v1: Vertex, v2: Vertex) -> Self {
        let mut bbox = BBox::default();

        if v1.x < v2.x {
            bbox.left = v1.x;
            bbox.right = v2.x;
        } else {
            bbox.left = v2.x;
            bbox.right = v1.x;
        }

        if v1.y < v2.y {
            bbox.bottom = v1.y;
            bbox.top = v2.y;
        } else {
            bbox.bottom = v2.y;
            bbox.top = v1.y;
        }

        bbox
    }

    /// Grow to include the point
    pub fn add_point(&mut self, v: Vertex) {
        if v.x < self.left {
            self.left = v.x;
        }
        if v.x > self.right {
            self.right = v.x;
        }
        if v.y < self.bottom {
            self.bottom = v.y;
        }
        if v.y > self.top {
            self.top = v.y;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineDef {
    // Vertices, from v1 to v2.
    pub v1: Vertex,
    pub v2: Vertex,
    /// `LineDefFlags` bits
    pub flags: u32,
    pub front_sidedef: usize,
    /// Only present on two-sided lines
    pub back_sidedef: Option<usize>,

    // Front and back sector, resolved through the sides.
    pub frontsector: usize,
    pub backsector: Option<usize>,
}

/// A piece of a linedef lying entirely inside one subsector, seen from one
/// side
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub v1: Vertex,
    pub v2: Vertex,
    /// Distance along the linedef to the start of this seg
    pub offset: FixedPoint,
    /// Direction of `v1 -> v2`
    pub angle: Angle,
    pub sidedef: usize,
    pub linedef: usize,
    pub frontsector: usize,
    /// `None` for one-sided lines
    pub backsector: Option<usize>,
}

/// A convex leaf of the BSP, a run of contiguous segs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubSector {
    pub sector: usize,
    /// How many `Segment`s line this `SubSector`
    pub seg_count: u32,
    /// The `Segment` to start with
    pub start_seg: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Partition line
    pub div: DivLine,
    /// Bounding box of each child: [0] front, [1] back
    pub bboxes: [BBox; 2],
    /// The node children. The final 'leaf' has `IS_SSECTOR_MASK` set and
    /// the remaining bits index the subsector array
    pub children: [u32; 2],
}
