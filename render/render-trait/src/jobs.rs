use math::FixedPoint;

use crate::{RenderError, TextureHandle};

/// What a draw job paints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// Upper texture of a two-sided wall
    Top,
    /// Solid wall texture
    Mid,
    /// Lower texture of a two-sided wall
    Bottom,
    Sky,
    /// See-through middle texture, drawn last
    Masked,
    FloorPlane,
    CeilingPlane,
}

/// One vertical run of screen pixels `yl..=yh` in column `x`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnJob {
    pub x: i32,
    pub yl: i32,
    pub yh: i32,
    pub kind: SurfaceKind,
    pub source: TextureHandle,
    /// Texture row at the view centre line
    pub texture_mid: FixedPoint,
    /// Texture rows per screen pixel
    pub iscale: FixedPoint,
    /// Projection scale of the column, zero for plane columns
    pub scale: FixedPoint,
    /// Colormap index
    pub light: usize,
}

/// One horizontal run of a flat, `x1..=x2` on row `y`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanJob {
    pub y: i32,
    pub x1: i32,
    pub x2: i32,
    pub kind: SurfaceKind,
    pub source: TextureHandle,
    pub xfrac: FixedPoint,
    pub yfrac: FixedPoint,
    pub xstep: FixedPoint,
    pub ystep: FixedPoint,
    pub light: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawJob {
    Column(ColumnJob),
    Span(SpanJob),
}

impl DrawJob {
    pub fn kind(&self) -> SurfaceKind {
        match self {
            DrawJob::Column(c) => c.kind,
            DrawJob::Span(s) => s.kind,
        }
    }
}

/// Receives draw jobs in emission order. A sink that runs out of room
/// returns an error and the frame stops.
pub trait DrawSink {
    fn draw_column(&mut self, job: ColumnJob) -> Result<(), RenderError>;

    fn draw_span(&mut self, job: SpanJob) -> Result<(), RenderError>;
}

/// A bounded queue of jobs, handed to a rasterizer once the frame is done
#[derive(Debug, Clone)]
pub struct DrawJobs {
    jobs: Vec<DrawJob>,
    capacity: usize,
}

impl DrawJobs {
    pub fn new(capacity: usize) -> Self {
        Self {
            jobs: Vec::with_capacity(capacity.min(1 << 16)),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    pub fn jobs(&self) -> &[DrawJob] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColumnJob> {
        self.jobs.iter().filter_map(|j| match j {
            DrawJob::Column(c) => Some(c),
            DrawJob::Span(_) => None,
        })
    }

    pub fn spans(&self) -> impl Iterator<Item = &SpanJob> {
        self.jobs.iter().filter_map(|j| match j {
            DrawJob::Span(s) => Some(s),
            DrawJob::Column(_) => None,
        })
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, DrawJob> {
        self.jobs.drain(..)
    }

    fn push(&mut self, job: DrawJob) -> Result<(), RenderError> {
        if self.jobs.len() >= self.capacity {
            return Err(RenderError::JobQueueFull {
                capacity: self.capacity,
            });
        }
        self.jobs.push(job);
        Ok(())
    }
}

impl DrawSink for DrawJobs {
    fn draw_column(&mut self, job: ColumnJob) -> Result<(), RenderError> {
        self.push(DrawJob::Column(job))
    }

    fn draw_span(&mut self, job: SpanJob) -> Result<(), RenderError> {
        self.push(DrawJob::Span(job))
    }
}
