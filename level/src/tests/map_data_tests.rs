#[cfg(test)]
mod map_data_tests {
    use crate::samples::{self, Doorway};
    use crate::{Child, IS_SSECTOR_MASK, LineDefFlags, MapBuilder, MapError, Sector, SideDef};
    use glam::Vec2;
    use math::{Angle, FixedPoint};

    fn fx(v: i32) -> FixedPoint {
        FixedPoint::from_int(v)
    }

    #[test]
    fn box_room_is_a_single_leaf() {
        let map = samples::box_room().unwrap();
        assert!(map.get_nodes().is_empty());
        assert_eq!(map.start_node(), IS_SSECTOR_MASK);
        assert_eq!(map.subsectors().len(), 1);
        assert_eq!(map.subsector_segs(&map.subsectors()[0]).len(), 4);
        assert_eq!(map.point_in_subsector(fx(10), fx(-20)), 0);
    }

    #[test]
    fn seg_angles_follow_direction() {
        let map = samples::box_room().unwrap();
        let segs = map.segments();
        // North wall runs east, east wall runs south
        assert_eq!(segs[0].angle, Angle::ZERO);
        assert!(segs[1].angle.bam().abs_diff(Angle::DEG270.bam()) < 0x10_0000);
        assert!(segs[2].angle.bam().abs_diff(Angle::DEG180.bam()) < 0x10_0000);
        assert!(segs.iter().all(|s| s.backsector.is_none()));
        assert!(segs.iter().all(|s| s.offset == FixedPoint::zero()));
    }

    #[test]
    fn doorway_sides_resolve() {
        let map = samples::doorway(&Doorway::default()).unwrap();
        assert_eq!(map.get_nodes().len(), 1);
        assert_eq!(map.start_node(), 0);

        let door = &map.linedefs()[2];
        assert!(LineDefFlags::TwoSided.is_set(door.flags));
        assert_eq!(door.frontsector, 0);
        assert_eq!(door.backsector, Some(1));

        // The corridor's view of the door looks back into the room
        let back_seg = &map.segments()[9];
        assert_eq!(back_seg.linedef, 2);
        assert_eq!(back_seg.frontsector, 1);
        assert_eq!(back_seg.backsector, Some(0));
        assert_eq!(back_seg.v1, door.v2);
        assert_eq!(map.sidedefs()[back_seg.sidedef].sector, 1);
    }

    #[test]
    fn doorway_node_partitions() {
        let map = samples::doorway(&Doorway::default()).unwrap();
        let node = &map.get_nodes()[0];
        assert_eq!(node.children, [1 | IS_SSECTOR_MASK, IS_SSECTOR_MASK]);
        assert_eq!(node.point_on_side(fx(64), fx(0)), 0);
        assert_eq!(node.point_on_side(fx(-64), fx(0)), 1);

        assert_eq!(node.bboxes[0].left, fx(0));
        assert_eq!(node.bboxes[0].right, fx(256));
        assert_eq!(node.bboxes[0].top, fx(32));
        assert_eq!(node.bboxes[1].left, fx(-256));
        assert_eq!(node.bboxes[1].bottom, fx(-128));
        assert!(node.point_in_bounds(fx(100), fx(0), 0));
        assert!(!node.point_in_bounds(fx(100), fx(100), 0));

        assert_eq!(map.point_in_subsector(fx(100), fx(0)), 1);
        assert_eq!(map.point_in_subsector(fx(-100), fx(50)), 0);
    }

    #[test]
    fn bad_references_are_rejected() {
        let mut b = MapBuilder::new();
        assert_eq!(b.sidedef(SideDef::new(3)), Err(MapError::BadSector(3)));

        let s = b.sector(Sector::new(0, 64, 0, 0, 128));
        let side = b.sidedef(SideDef::new(s)).unwrap();
        let v1 = b.vertex(Vec2::new(0.0, 0.0));
        let v2 = b.vertex(Vec2::new(64.0, 0.0));
        assert_eq!(b.linedef(v1, 9, 0, side, None), Err(MapError::BadVertex(9)));

        let line = b.linedef(v1, v2, 0, side, None).unwrap();
        assert_eq!(b.seg(line, 1), Err(MapError::MissingBackSide(line)));
        assert!(matches!(b.subsector(0..0), Err(MapError::BadSubsectorSegs { .. })));
        assert_eq!(
            b.node(Vec2::ZERO, Vec2::X, Child::Node(0), Child::Subsector(0)),
            Err(MapError::BadChild(Child::Node(0)))
        );
        assert_eq!(MapBuilder::new().build().unwrap_err(), MapError::NoSubsectors);
    }

    #[test]
    fn partial_seg_offset() {
        let mut b = MapBuilder::new();
        let s = b.sector(Sector::new(0, 64, 0, 0, 128));
        let side = b.sidedef(SideDef::new(s)).unwrap();
        let v1 = b.vertex(Vec2::new(0.0, 0.0));
        let mid = b.vertex(Vec2::new(40.0, 0.0));
        let v2 = b.vertex(Vec2::new(100.0, 0.0));
        let line = b.linedef(v1, v2, 0, side, None).unwrap();
        let seg = b.partial_seg(line, 0, mid, v2).unwrap();
        b.subsector(seg..seg + 1).unwrap();
        let map = b.build().unwrap();
        let offset = map.segments()[0].offset.to_f32();
        assert!((offset - 40.0).abs() < 0.01, "{offset}");
    }
}
