mod limit_tests;

use level::samples::FLAT_SKY;
use render_trait::{DrawJob, DrawJobs, SpriteGather, SurfaceKind, TextureSizes};

/// Wall, step, lintel and grate textures as sized in the sample maps
pub(crate) fn textures() -> TextureSizes {
    TextureSizes::new(vec![(64, 128), (64, 64), (64, 64), (64, 128)], FLAT_SKY)
}

pub(crate) fn sink() -> DrawJobs {
    DrawJobs::new(1 << 20)
}

/// Subsectors and sectors in the order the walk reported them
#[derive(Default)]
pub(crate) struct Recorder(pub Vec<(usize, usize)>);

impl SpriteGather for Recorder {
    fn add_sprites(&mut self, subsector: usize, sector: usize) {
        self.0.push((subsector, sector));
    }
}

/// How many opaque jobs touched each pixel, row major
pub(crate) fn coverage(jobs: &DrawJobs, width: usize, height: usize) -> Vec<u8> {
    let mut hits = vec![0u8; width * height];
    for job in jobs.jobs() {
        match job {
            DrawJob::Column(c) if c.kind != SurfaceKind::Masked => {
                assert!(c.x >= 0 && (c.x as usize) < width, "column off screen: {c:?}");
                assert!(c.yl >= 0 && (c.yh as usize) < height, "column off screen: {c:?}");
                for y in c.yl..=c.yh {
                    hits[y as usize * width + c.x as usize] += 1;
                }
            }
            DrawJob::Span(s) => {
                assert!(s.y >= 0 && (s.y as usize) < height, "span off screen: {s:?}");
                assert!(s.x1 >= 0 && (s.x2 as usize) < width, "span off screen: {s:?}");
                for x in s.x1..=s.x2 {
                    hits[s.y as usize * width + x as usize] += 1;
                }
            }
            DrawJob::Column(_) => {}
        }
    }
    hits
}
