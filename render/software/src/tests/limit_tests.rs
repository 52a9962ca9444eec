#[cfg(test)]
mod limit_tests {
    use level::MapData;
    use level::samples::{self, Doorway, TEX_GRATE};
    use math::Angle;
    use render_trait::{DrawJobs, RenderError};

    use crate::tests::{sink, textures};
    use crate::{RenderConfig, SoftwareRenderer, ViewPoint};

    fn render(config: RenderConfig, map: &MapData, view: ViewPoint) -> Result<(), RenderError> {
        let mut r = SoftwareRenderer::new(config);
        let mut jobs = sink();
        r.render_player_view(&view, Angle::DEG45, map, &textures(), &mut (), &mut jobs)
            .map(|_| ())
    }

    fn inside() -> ViewPoint {
        ViewPoint::new(0, 0, 41, 0.0)
    }

    #[test]
    fn visplane_overflow() {
        let map = samples::box_room().unwrap();
        let config = RenderConfig {
            max_visplanes: 1,
            ..RenderConfig::default()
        };
        assert_eq!(
            render(config, &map, inside()),
            Err(RenderError::VisplaneOverflow { capacity: 1 })
        );
    }

    #[test]
    fn drawseg_overflow() {
        let map = samples::box_room().unwrap();
        let config = RenderConfig {
            max_drawsegs: 0,
            ..RenderConfig::default()
        };
        assert_eq!(
            render(config, &map, inside()),
            Err(RenderError::DrawSegOverflow { capacity: 0 })
        );
    }

    #[test]
    fn clip_list_overflow() {
        // From outside the west wall three walls face the view, each needing
        // its own post
        let map = samples::box_room().unwrap();
        let config = RenderConfig {
            max_clip_spans: 2,
            ..RenderConfig::default()
        };
        assert_eq!(
            render(config, &map, ViewPoint::new(-300, 0, 41, 0.0)),
            Err(RenderError::ClipSpanOverflow { capacity: 2 })
        );
    }

    #[test]
    fn openings_overflow() {
        let opts = Doorway {
            door_mid: Some(TEX_GRATE),
            ..Doorway::default()
        };
        let map = samples::doorway(&opts).unwrap();
        let config = RenderConfig {
            max_openings: 10,
            ..RenderConfig::default()
        };
        assert_eq!(
            render(config, &map, ViewPoint::new(-128, 0, 41, 0.0)),
            Err(RenderError::OpeningsOverflow { capacity: 10 })
        );
    }

    #[test]
    fn full_job_queue_stops_the_frame() {
        let map = samples::box_room().unwrap();
        let mut r = SoftwareRenderer::new(RenderConfig::default());
        let mut jobs = DrawJobs::new(5);
        let result =
            r.render_player_view(&inside(), Angle::DEG45, &map, &textures(), &mut (), &mut jobs);
        assert_eq!(result, Err(RenderError::JobQueueFull { capacity: 5 }));
        assert_eq!(jobs.len(), 5);
    }

    #[test]
    fn missing_nodes_are_reported() {
        let map = MapData::default();
        assert_eq!(
            render(RenderConfig::default(), &map, inside()),
            Err(RenderError::BadNode { node: 0 })
        );
    }

    #[test]
    fn renderer_recovers_after_an_error() {
        let map = samples::box_room().unwrap();
        let mut r = SoftwareRenderer::new(RenderConfig::default());
        let mut small = DrawJobs::new(5);
        assert!(r
            .render_player_view(&inside(), Angle::DEG45, &map, &textures(), &mut (), &mut small)
            .is_err());

        let mut jobs = sink();
        let stats = r
            .render_player_view(&inside(), Angle::DEG45, &map, &textures(), &mut (), &mut jobs)
            .unwrap();
        assert_eq!(stats.visplanes, 2);
        assert!(r.solid_segs().is_fully_covered(0, 319));
    }
}
