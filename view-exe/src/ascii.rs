//! Rasterises a frame's draw jobs into one character per pixel, by
//! surface kind. Later jobs overwrite earlier ones, as on a framebuffer.

use std::fmt;

use render_trait::{DrawJob, DrawJobs, SurfaceKind};

const EMPTY: char = '?';

fn glyph(kind: SurfaceKind) -> char {
    match kind {
        SurfaceKind::Mid => '#',
        SurfaceKind::Top => 'T',
        SurfaceKind::Bottom => 'B',
        SurfaceKind::Sky => '~',
        SurfaceKind::Masked => '%',
        SurfaceKind::FloorPlane => '.',
        SurfaceKind::CeilingPlane => '\'',
    }
}

pub struct AsciiFrame {
    width: usize,
    height: usize,
    cells: Vec<char>,
}

impl AsciiFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width * height],
        }
    }

    /// Paints and empties the queue, leaving it ready for the next frame
    pub fn from_jobs(width: usize, height: usize, jobs: &mut DrawJobs) -> Self {
        let mut frame = Self::new(width, height);
        for job in jobs.drain() {
            frame.draw(&job);
        }
        frame
    }

    /// Off-screen parts of a job are dropped
    pub fn draw(&mut self, job: &DrawJob) {
        let c = glyph(job.kind());
        match job {
            DrawJob::Column(col) => {
                for y in col.yl..=col.yh {
                    self.put(col.x, y, c);
                }
            }
            DrawJob::Span(span) => {
                for x in span.x1..=span.x2 {
                    self.put(x, span.y, c);
                }
            }
        }
    }

    fn put(&mut self, x: i32, y: i32, c: char) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.cells[y as usize * self.width + x as usize] = c;
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Pixels no job touched
    pub fn holes(&self) -> usize {
        self.cells.iter().filter(|c| **c == EMPTY).count()
    }
}

impl fmt::Display for AsciiFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            let line: String = row.iter().collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::FixedPoint;
    use render_trait::{ColumnJob, DrawSink, SpanJob, TextureHandle};

    #[test]
    fn jobs_paint_in_order() {
        let mut jobs = DrawJobs::new(8);
        jobs.draw_column(ColumnJob {
            x: 1,
            yl: 0,
            yh: 2,
            kind: SurfaceKind::Mid,
            source: TextureHandle(0),
            texture_mid: FixedPoint::zero(),
            iscale: FixedPoint::unit(),
            scale: FixedPoint::unit(),
            light: 0,
        })
        .unwrap();
        jobs.draw_span(SpanJob {
            y: 2,
            x1: 0,
            x2: 5,
            kind: SurfaceKind::FloorPlane,
            source: TextureHandle(0),
            xfrac: FixedPoint::zero(),
            yfrac: FixedPoint::zero(),
            xstep: FixedPoint::zero(),
            ystep: FixedPoint::zero(),
            light: 0,
        })
        .unwrap();

        let frame = AsciiFrame::from_jobs(3, 3, &mut jobs);
        assert!(jobs.is_empty());
        assert_eq!(frame.to_string(), "?#?\n?#?\n...\n");
        assert_eq!(frame.holes(), 4);
        assert_eq!(frame.get(1, 0), Some('#'));
        assert_eq!(frame.get(3, 0), None);
    }
}
