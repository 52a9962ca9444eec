use math::FixedPoint;

use crate::map_defs::{LineDef, Node, Sector, Segment, SideDef, SubSector, Vertex};

/// Set on a node child to mark it as a subsector index
pub const IS_SSECTOR_MASK: u32 = 0x8000_0000;

/// The geometry of one level. Immutable once built, so a frame can borrow
/// it for as long as it needs.
#[derive(Debug, Default, Clone)]
pub struct MapData {
    pub(crate) vertexes: Vec<Vertex>,
    pub(crate) sectors: Vec<Sector>,
    pub(crate) sidedefs: Vec<SideDef>,
    pub(crate) linedefs: Vec<LineDef>,
    pub(crate) segments: Vec<Segment>,
    pub(crate) subsectors: Vec<SubSector>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) start_node: u32,
}

impl MapData {
    pub fn vertexes(&self) -> &[Vertex] {
        &self.vertexes
    }

    pub fn linedefs(&self) -> &[LineDef] {
        &self.linedefs
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn sidedefs(&self) -> &[SideDef] {
        &self.sidedefs
    }

    pub fn subsectors(&self) -> &[SubSector] {
        &self.subsectors
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Root of the BSP. A map without nodes is a single subsector and the
    /// root is that leaf.
    #[inline]
    pub fn start_node(&self) -> u32 {
        self.start_node
    }

    /// Segs of a subsector, in stored order
    pub fn subsector_segs(&self, subsector: &SubSector) -> &[Segment] {
        let start = subsector.start_seg as usize;
        let end = (start + subsector.seg_count as usize).min(self.segments.len());
        &self.segments[start.min(end)..end]
    }

    /// R_PointInSubsector
    pub fn point_in_subsector(&self, x: FixedPoint, y: FixedPoint) -> usize {
        let mut node_id = self.start_node();

        // Children always index lower nodes, so this terminates
        while node_id & IS_SSECTOR_MASK == 0 {
            let Some(node) = self.nodes.get(node_id as usize) else {
                return 0;
            };
            let side = node.point_on_side(x, y);
            node_id = node.children[side];
        }

        (node_id & !IS_SSECTOR_MASK) as usize
    }
}
