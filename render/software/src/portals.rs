//! Vertical clipping for windows/portals, used by the wall renderer and
//! saved per drawseg for sprites.

pub struct PortalClip {
    /// Clip values are the solid pixel bounding the range.
    ///  floorclip starts out SCREENHEIGHT
    ///  ceilingclip starts out -1
    pub floorclip: Vec<i32>,
    pub ceilingclip: Vec<i32>,
    screen_height: i32,
}

impl PortalClip {
    pub fn new(screen_width: usize, screen_height: usize) -> Self {
        let mut clip = PortalClip {
            floorclip: vec![0; screen_width],
            ceilingclip: vec![0; screen_width],
            screen_height: screen_height as i32,
        };
        clip.clear();
        clip
    }

    pub(super) fn clear(&mut self) {
        self.floorclip.fill(self.screen_height);
        self.ceilingclip.fill(-1);
    }

    /// Keep a recomputed bound inside `-1..=height`
    #[inline]
    pub(super) fn bound(&self, value: i32) -> i32 {
        value.clamp(-1, self.screen_height)
    }
}
