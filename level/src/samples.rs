//! Small hand-built maps for the demo binary and for renderer tests

use glam::Vec2;

use crate::{Child, LineDefFlags, MapBuilder, MapData, MapError, Sector, SideDef};

pub const FLAT_FLOOR: usize = 0;
pub const FLAT_CEILING: usize = 1;
pub const FLAT_STEP: usize = 2;
pub const FLAT_SKY: usize = 3;

pub const TEX_WALL: usize = 0;
pub const TEX_STEP: usize = 1;
pub const TEX_LINTEL: usize = 2;
pub const TEX_GRATE: usize = 3;

/// A 256x256 room centred on the origin, floor 0, ceiling 128. A single
/// subsector and no nodes.
pub fn box_room() -> Result<MapData, MapError> {
    let mut b = MapBuilder::new();
    let room = b.sector(Sector::new(0, 128, FLAT_FLOOR, FLAT_CEILING, 160));

    let corners = [
        b.vertex(Vec2::new(-128.0, 128.0)),
        b.vertex(Vec2::new(128.0, 128.0)),
        b.vertex(Vec2::new(128.0, -128.0)),
        b.vertex(Vec2::new(-128.0, -128.0)),
    ];

    let mut lines = Vec::with_capacity(4);
    for i in 0..4 {
        let side = b.sidedef(SideDef::new(room).with_mid(TEX_WALL))?;
        let line = b.linedef(
            corners[i],
            corners[(i + 1) % 4],
            LineDefFlags::Blocking as u32,
            side,
            None,
        )?;
        lines.push(line);
    }
    for line in lines {
        b.seg(line, 0)?;
    }
    b.subsector(0..4)?;
    b.build()
}

/// Layout options for `doorway`
#[derive(Debug, Clone)]
pub struct Doorway {
    pub room_ceiling_pic: usize,
    pub step_floor: i32,
    pub step_ceiling: i32,
    pub step_ceiling_pic: usize,
    pub step_light: i32,
    /// Masked texture hung in the opening
    pub door_mid: Option<usize>,
}

impl Default for Doorway {
    fn default() -> Self {
        Self {
            room_ceiling_pic: FLAT_CEILING,
            step_floor: 24,
            step_ceiling: 104,
            step_ceiling_pic: FLAT_CEILING,
            step_light: 192,
            door_mid: None,
        }
    }
}

/// A room (x -256..0, y -128..128) with a 64 unit wide opening in its east
/// wall leading into a corridor (x 0..256, y -32..32).
///
/// Subsector 0 is the room, subsector 1 the corridor, and the single node
/// partitions along x = 0 with the corridor in front.
pub fn doorway(opts: &Doorway) -> Result<MapData, MapError> {
    let mut b = MapBuilder::new();
    let room = b.sector(Sector::new(0, 128, FLAT_FLOOR, opts.room_ceiling_pic, 160));
    let step = b.sector(Sector::new(
        opts.step_floor,
        opts.step_ceiling,
        FLAT_STEP,
        opts.step_ceiling_pic,
        opts.step_light,
    ));

    let v = [
        b.vertex(Vec2::new(-256.0, 128.0)),
        b.vertex(Vec2::new(0.0, 128.0)),
        b.vertex(Vec2::new(0.0, 32.0)),
        b.vertex(Vec2::new(0.0, -32.0)),
        b.vertex(Vec2::new(0.0, -128.0)),
        b.vertex(Vec2::new(-256.0, -128.0)),
        b.vertex(Vec2::new(256.0, 32.0)),
        b.vertex(Vec2::new(256.0, -32.0)),
    ];

    let blocking = LineDefFlags::Blocking as u32;
    let wall = |b: &mut MapBuilder, sector: usize, v1: usize, v2: usize| -> Result<usize, MapError> {
        let side = b.sidedef(SideDef::new(sector).with_mid(TEX_WALL))?;
        b.linedef(v[v1], v[v2], blocking, side, None)
    };

    let north = wall(&mut b, room, 0, 1)?;
    let east_upper = wall(&mut b, room, 1, 2)?;
    let mut front = SideDef::new(room).with_top(TEX_LINTEL).with_bottom(TEX_STEP);
    front.midtexture = opts.door_mid;
    let front = b.sidedef(front)?;
    let back = b.sidedef(SideDef::new(step))?;
    let door = b.linedef(v[2], v[3], LineDefFlags::TwoSided as u32, front, Some(back))?;
    let east_lower = wall(&mut b, room, 3, 4)?;
    let south = wall(&mut b, room, 4, 5)?;
    let west = wall(&mut b, room, 5, 0)?;

    let corridor_north = wall(&mut b, step, 2, 6)?;
    let corridor_end = wall(&mut b, step, 6, 7)?;
    let corridor_south = wall(&mut b, step, 7, 3)?;

    for line in [north, east_upper, door, east_lower, south, west] {
        b.seg(line, 0)?;
    }
    for line in [corridor_north, corridor_end, corridor_south] {
        b.seg(line, 0)?;
    }
    b.seg(door, 1)?;

    let room_ss = b.subsector(0..6)?;
    let corridor_ss = b.subsector(6..10)?;
    b.node(
        Vec2::new(0.0, -128.0),
        Vec2::new(0.0, 128.0),
        Child::Subsector(corridor_ss),
        Child::Subsector(room_ss),
    )?;
    b.build()
}
