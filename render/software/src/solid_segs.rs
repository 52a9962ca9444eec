//! The clip list: the screen columns already hidden behind solid walls,
//! kept as sorted, disjoint, non-touching ranges between two sentinels.

use log::error;
use render_trait::RenderError;

use crate::defs::ClipRange;

pub struct SolidSegs {
    spans: Vec<ClipRange>,
    capacity: usize,
}

impl SolidSegs {
    /// `capacity` counts the two sentinels, so at least 3 is useful
    pub fn new(width: usize, capacity: usize) -> Self {
        let mut segs = Self {
            spans: Vec::with_capacity(capacity.max(2)),
            capacity: capacity.max(2),
        };
        segs.reset(width);
        segs
    }

    /// R_ClearClipSegs - r_bsp
    pub fn reset(&mut self, width: usize) {
        self.spans.clear();
        self.spans.push(ClipRange {
            first: -0x7fff_ffff,
            last: -1,
        });
        self.spans.push(ClipRange {
            first: width as i32,
            last: i32::MAX,
        });
    }

    /// The current ranges, sentinels included
    pub fn spans(&self) -> &[ClipRange] {
        &self.spans
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// R_ClipSolidWallSegment - r_bsp
    ///
    /// Calls `emit` for every part of `first..=last` that was still open,
    /// left to right, then closes the whole range.
    pub fn insert_solid<F>(&mut self, first: i32, last: i32, mut emit: F) -> Result<(), RenderError>
    where
        F: FnMut(i32, i32) -> Result<(), RenderError>,
    {
        // Find the first range that touches the range
        //  (adjacent pixels are touching).
        let mut start = 0;
        while self.spans[start].last < first - 1 {
            start += 1;
        }

        if first < self.spans[start].first {
            if last < self.spans[start].first - 1 {
                // Post is entirely visible (above start),
                // so insert a new clippost.
                if self.spans.len() >= self.capacity {
                    error!("Clip list full at {} spans", self.spans.len());
                    return Err(RenderError::ClipSpanOverflow {
                        capacity: self.capacity,
                    });
                }
                emit(first, last)?;
                self.spans.insert(start, ClipRange { first, last });
                return Ok(());
            }

            // There is a fragment above *start.
            emit(first, self.spans[start].first - 1)?;
            // Now adjust the clip size.
            self.spans[start].first = first;
        }

        // Bottom contained in start?
        if last <= self.spans[start].last {
            return Ok(());
        }

        let mut next = start;
        while last >= self.spans[next + 1].first - 1 {
            // There is a fragment between two posts.
            emit(self.spans[next].last + 1, self.spans[next + 1].first - 1)?;
            next += 1;

            if last <= self.spans[next].last {
                // Bottom is contained in next.
                // Adjust the clip size.
                self.spans[start].last = self.spans[next].last;
                self.crunch(start, next);
                return Ok(());
            }
        }

        // There is a fragment after *next.
        emit(self.spans[next].last + 1, last)?;
        // Adjust the clip size.
        self.spans[start].last = last;
        self.crunch(start, next);
        Ok(())
    }

    /// Remove the posts between start and next now covered by start
    fn crunch(&mut self, start: usize, next: usize) {
        if next > start {
            self.spans.drain(start + 1..=next);
        }
    }

    /// R_ClipPassWallSegment - r_bsp
    ///
    /// Like `insert_solid` but the list is left unchanged. Windows and
    /// portals do not hide what is behind them.
    pub fn insert_transparent<F>(
        &mut self,
        first: i32,
        last: i32,
        mut emit: F,
    ) -> Result<(), RenderError>
    where
        F: FnMut(i32, i32) -> Result<(), RenderError>,
    {
        let mut start = 0;
        while self.spans[start].last < first - 1 {
            start += 1;
        }

        if first < self.spans[start].first {
            if last < self.spans[start].first - 1 {
                // Post is entirely visible (above start).
                return emit(first, last);
            }
            // There is a fragment above *start.
            emit(first, self.spans[start].first - 1)?;
        }

        // Bottom contained in start?
        if last <= self.spans[start].last {
            return Ok(());
        }

        while last >= self.spans[start + 1].first - 1 {
            // There is a fragment between two posts.
            emit(self.spans[start].last + 1, self.spans[start + 1].first - 1)?;
            start += 1;

            if last <= self.spans[start].last {
                return Ok(());
            }
        }

        // There is a fragment after *next.
        emit(self.spans[start].last + 1, last)
    }

    /// True when a single closed range holds all of `first..=last`
    pub fn is_fully_covered(&self, first: i32, last: i32) -> bool {
        let mut start = 0;
        while self.spans[start].last < last {
            start += 1;
        }
        first >= self.spans[start].first && last <= self.spans[start].last
    }
}

#[cfg(test)]
mod tests {
    use super::SolidSegs;
    use crate::defs::ClipRange;
    use render_trait::RenderError;

    const WIDTH: usize = 64;

    fn collect(
        segs: &mut SolidSegs,
        first: i32,
        last: i32,
        solid: bool,
    ) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        let emit = |a: i32, b: i32| -> Result<(), RenderError> {
            out.push((a, b));
            Ok(())
        };
        if solid {
            segs.insert_solid(first, last, emit).unwrap();
        } else {
            segs.insert_transparent(first, last, emit).unwrap();
        }
        out
    }

    fn check_sorted(segs: &SolidSegs) {
        let spans = segs.spans();
        assert_eq!(spans[0].first, -0x7fff_ffff);
        assert_eq!(spans.last().unwrap().last, i32::MAX);
        for pair in spans.windows(2) {
            assert!(pair[0].first <= pair[0].last);
            // strictly apart, touching ranges are merged
            assert!(pair[0].last + 1 < pair[1].first, "{:?}", spans);
        }
    }

    #[test]
    fn empty_list_emits_whole_range() {
        let mut segs = SolidSegs::new(WIDTH, 40);
        assert_eq!(collect(&mut segs, 10, 20, true), vec![(10, 20)]);
        assert!(segs.is_fully_covered(10, 20));
        assert!(segs.is_fully_covered(12, 15));
        assert!(!segs.is_fully_covered(9, 20));
        assert_eq!(segs.spans().len(), 3);
        // fully hidden now
        assert!(collect(&mut segs, 12, 18, true).is_empty());
        assert!(collect(&mut segs, 10, 20, false).is_empty());
    }

    #[test]
    fn fragments_between_posts() {
        let mut segs = SolidSegs::new(WIDTH, 40);
        collect(&mut segs, 10, 20, true);
        collect(&mut segs, 30, 40, true);
        assert_eq!(
            collect(&mut segs, 5, 50, false),
            vec![(5, 9), (21, 29), (41, 50)]
        );
        // transparent insert leaves the list alone
        assert_eq!(segs.spans().len(), 4);
        assert_eq!(
            collect(&mut segs, 5, 35, true),
            vec![(5, 9), (21, 29)]
        );
        assert_eq!(
            segs.spans()[1],
            ClipRange {
                first: 5,
                last: 40
            }
        );
        check_sorted(&segs);
    }

    #[test]
    fn adjacent_ranges_merge() {
        let mut segs = SolidSegs::new(WIDTH, 40);
        collect(&mut segs, 5, 9, true);
        collect(&mut segs, 10, 12, true);
        assert_eq!(segs.spans().len(), 3);
        assert_eq!(
            segs.spans()[1],
            ClipRange {
                first: 5,
                last: 12
            }
        );
        collect(&mut segs, 0, 4, true);
        // merged into the left sentinel
        assert_eq!(segs.spans().len(), 2);
        collect(&mut segs, 13, WIDTH as i32 - 1, true);
        assert_eq!(segs.spans().len(), 1);
        assert!(segs.is_fully_covered(0, WIDTH as i32 - 1));
    }

    #[test]
    fn overflow_is_reported() {
        // the sentinels alone need two slots
        assert_eq!(SolidSegs::new(WIDTH, 0).capacity(), 2);
        let mut segs = SolidSegs::new(WIDTH, 3);
        assert_eq!(segs.capacity(), 3);
        collect(&mut segs, 10, 12, true);
        let mut called = false;
        let res = segs.insert_solid(20, 22, |_, _| {
            called = true;
            Ok(())
        });
        assert_eq!(res, Err(RenderError::ClipSpanOverflow { capacity: 3 }));
        assert!(!called);
        // extending an existing post still works
        assert_eq!(collect(&mut segs, 8, 14, true), vec![(8, 9), (13, 14)]);
    }

    #[test]
    fn emit_errors_stop_the_insert() {
        let mut segs = SolidSegs::new(WIDTH, 40);
        let res = segs.insert_solid(0, 10, |_, _| {
            Err(RenderError::JobQueueFull { capacity: 0 })
        });
        assert!(res.is_err());
        assert!(!segs.is_fully_covered(0, 10));
    }

    #[test]
    fn random_inserts_match_coverage() {
        let mut segs = SolidSegs::new(WIDTH, WIDTH / 2 + 4);
        let mut covered = [false; WIDTH];
        let mut seed: u32 = 0x1234_5678;
        let mut rand = move || {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            seed >> 8
        };

        for _ in 0..400 {
            let a = (rand() % WIDTH as u32) as i32;
            let len = (rand() % 6) as i32;
            let b = (a + len).min(WIDTH as i32 - 1);
            let solid = rand() % 3 != 0;

            let emitted = collect(&mut segs, a, b, solid);
            let mut seen = vec![false; WIDTH];
            let mut prev = -1;
            for (first, last) in emitted {
                assert!(first <= last);
                assert!(first > prev, "emitted out of order");
                prev = last;
                for x in first..=last {
                    assert!(!covered[x as usize], "column {x} already closed");
                    seen[x as usize] = true;
                }
            }
            for x in a..=b {
                assert_eq!(seen[x as usize], !covered[x as usize]);
                if solid {
                    covered[x as usize] = true;
                }
            }
            check_sorted(&segs);
            for x in 0..WIDTH as i32 {
                assert_eq!(segs.is_fully_covered(x, x), covered[x as usize]);
            }
            if covered.iter().all(|c| *c) {
                segs.reset(WIDTH);
                covered = [false; WIDTH];
            }
        }
    }
}
