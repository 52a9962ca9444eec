use std::ops::Range;

use glam::Vec2;
use log::debug;
use math::{point_to_angle, point_to_dist};
use thiserror::Error;

use crate::map_data::{IS_SSECTOR_MASK, MapData};
use crate::map_defs::{BBox, LineDef, Node, Sector, Segment, SideDef, SubSector, Vertex};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("vertex {0} does not exist")]
    BadVertex(usize),
    #[error("sector {0} does not exist")]
    BadSector(usize),
    #[error("sidedef {0} does not exist")]
    BadSideDef(usize),
    #[error("linedef {0} does not exist")]
    BadLineDef(usize),
    #[error("linedef {0} has no back side")]
    MissingBackSide(usize),
    #[error("subsector segs {start}..{end} are empty or out of range")]
    BadSubsectorSegs { start: usize, end: usize },
    #[error("node child {0:?} does not exist yet")]
    BadChild(Child),
    #[error("a map needs at least one subsector")]
    NoSubsectors,
}

/// A child of a BSP node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    Node(usize),
    Subsector(usize),
}

impl Child {
    pub fn encode(self) -> u32 {
        match self {
            Child::Node(n) => n as u32,
            Child::Subsector(s) => s as u32 | IS_SSECTOR_MASK,
        }
    }
}

/// Assembles a `MapData` from raw records, resolving the derived fields
/// (seg angles and offsets, front/back sectors, node bounding boxes).
///
/// Nodes must be added bottom-up: a child node has to exist before its
/// parent, and the last node added becomes the root.
#[derive(Debug, Default)]
pub struct MapBuilder {
    map: MapData,
    subsector_boxes: Vec<BBox>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex(&mut self, v: Vec2) -> usize {
        self.map.vertexes.push(Vertex::from_vec2(v));
        self.map.vertexes.len() - 1
    }

    pub fn sector(&mut self, sector: Sector) -> usize {
        self.map.sectors.push(sector);
        self.map.sectors.len() - 1
    }

    pub fn sidedef(&mut self, side: SideDef) -> Result<usize, MapError> {
        if side.sector >= self.map.sectors.len() {
            return Err(MapError::BadSector(side.sector));
        }
        self.map.sidedefs.push(side);
        Ok(self.map.sidedefs.len() - 1)
    }

    pub fn linedef(
        &mut self,
        v1: usize,
        v2: usize,
        flags: u32,
        front: usize,
        back: Option<usize>,
    ) -> Result<usize, MapError> {
        let v1 = self.get_vertex(v1)?;
        let v2 = self.get_vertex(v2)?;
        let frontsector = self.side_sector(front)?;
        let backsector = back.map(|b| self.side_sector(b)).transpose()?;

        self.map.linedefs.push(LineDef {
            v1,
            v2,
            flags,
            front_sidedef: front,
            back_sidedef: back,
            frontsector,
            backsector,
        });
        Ok(self.map.linedefs.len() - 1)
    }

    /// A seg covering a whole linedef. `side` 1 walks the line backwards.
    pub fn seg(&mut self, line: usize, side: usize) -> Result<usize, MapError> {
        let ld = self.map.linedefs.get(line).ok_or(MapError::BadLineDef(line))?;
        let (v1, v2) = if side == 0 { (ld.v1, ld.v2) } else { (ld.v2, ld.v1) };
        self.push_seg(line, side, v1, v2)
    }

    /// A seg covering part of a linedef, as produced by a partition split
    pub fn partial_seg(
        &mut self,
        line: usize,
        side: usize,
        v1: usize,
        v2: usize,
    ) -> Result<usize, MapError> {
        let v1 = self.get_vertex(v1)?;
        let v2 = self.get_vertex(v2)?;
        self.push_seg(line, side, v1, v2)
    }

    /// A subsector over a contiguous run of already added segs. Its sector
    /// is the front sector of the first seg.
    pub fn subsector(&mut self, segs: Range<usize>) -> Result<usize, MapError> {
        if segs.is_empty() || segs.end > self.map.segments.len() {
            return Err(MapError::BadSubsectorSegs {
                start: segs.start,
                end: segs.end,
            });
        }

        let first = &self.map.segments[segs.start];
        let mut bbox = BBox::new(first.v1, first.v2);
        for seg in &self.map.segments[segs.clone()] {
            bbox.add_point(seg.v1);
            bbox.add_point(seg.v2);
        }

        self.map.subsectors.push(SubSector {
            sector: first.frontsector,
            seg_count: segs.len() as u32,
            start_seg: segs.start as u32,
        });
        self.subsector_boxes.push(bbox);
        Ok(self.map.subsectors.len() - 1)
    }

    /// A partition node. The line runs `from -> to`; `front` is the child on
    /// its right.
    pub fn node(&mut self, from: Vec2, to: Vec2, front: Child, back: Child) -> Result<usize, MapError> {
        let a = Vertex::from_vec2(from);
        let b = Vertex::from_vec2(to);
        let bboxes = [self.child_bbox(front)?, self.child_bbox(back)?];

        self.map.nodes.push(Node {
            div: math::DivLine::new(a.x, a.y, b.x - a.x, b.y - a.y),
            bboxes,
            children: [front.encode(), back.encode()],
        });
        Ok(self.map.nodes.len() - 1)
    }

    pub fn build(mut self) -> Result<MapData, MapError> {
        if self.map.subsectors.is_empty() {
            return Err(MapError::NoSubsectors);
        }
        self.map.start_node = if self.map.nodes.is_empty() {
            IS_SSECTOR_MASK
        } else {
            (self.map.nodes.len() - 1) as u32
        };
        debug!(
            "Built map: {} sectors, {} lines, {} segs, {} subsectors, {} nodes",
            self.map.sectors.len(),
            self.map.linedefs.len(),
            self.map.segments.len(),
            self.map.subsectors.len(),
            self.map.nodes.len()
        );
        Ok(self.map)
    }

    fn get_vertex(&self, v: usize) -> Result<Vertex, MapError> {
        self.map.vertexes.get(v).copied().ok_or(MapError::BadVertex(v))
    }

    fn side_sector(&self, side: usize) -> Result<usize, MapError> {
        self.map
            .sidedefs
            .get(side)
            .map(|s| s.sector)
            .ok_or(MapError::BadSideDef(side))
    }

    fn push_seg(&mut self, line: usize, side: usize, v1: Vertex, v2: Vertex) -> Result<usize, MapError> {
        let ld = self.map.linedefs.get(line).ok_or(MapError::BadLineDef(line))?;
        let (sidedef, frontsector, backsector, origin) = if side == 0 {
            (ld.front_sidedef, ld.frontsector, ld.backsector, ld.v1)
        } else {
            let back = ld.back_sidedef.ok_or(MapError::MissingBackSide(line))?;
            let backsector = ld.backsector.ok_or(MapError::MissingBackSide(line))?;
            (back, backsector, Some(ld.frontsector), ld.v2)
        };

        self.map.segments.push(Segment {
            v1,
            v2,
            offset: point_to_dist(v1.x - origin.x, v1.y - origin.y),
            angle: point_to_angle(v2.x - v1.x, v2.y - v1.y),
            sidedef,
            linedef: line,
            frontsector,
            backsector,
        });
        Ok(self.map.segments.len() - 1)
    }

    fn child_bbox(&self, child: Child) -> Result<BBox, MapError> {
        match child {
            Child::Subsector(s) => self.subsector_boxes.get(s).copied(),
            Child::Node(n) => self.map.nodes.get(n).map(|node| {
                let mut bbox = node.bboxes[0];
                let other = node.bboxes[1];
                bbox.add_point(crate::Vertex::new(other.left, other.bottom));
                bbox.add_point(crate::Vertex::new(other.right, other.top));
                bbox
            }),
        }
        .ok_or(MapError::BadChild(child))
    }
}
