//! Colormap selection by light level and distance. R_InitLightTables and
//! the scalelight part of R_ExecuteSetViewSize.

use level::Vertex;
use math::FixedPoint;
use render_trait::{LIGHTLEVELS, LightTable, NUMCOLORMAPS};

/// Sector light levels are shifted down by this much
pub const LIGHTSEGSHIFT: i32 = 4;
pub const MAXLIGHTSCALE: usize = 48;
pub const LIGHTSCALESHIFT: i32 = 12;
pub const MAXLIGHTZ: usize = 128;
pub const LIGHTZSHIFT: i32 = 20;
/// Colormap steps per light step at distance
const DISTMAP: i32 = 2;
/// Width the light falloff was tuned for
const SCREENWIDTH: i32 = 320;

/// The classic diminishing light tables
#[derive(Debug, Clone)]
pub struct Lighting {
    scalelight: Vec<[usize; MAXLIGHTSCALE]>,
    zlight: Vec<[usize; MAXLIGHTZ]>,
}

impl Lighting {
    pub fn new(view_width: usize) -> Self {
        let view_width = view_width.max(1) as i32;
        let mut scalelight = vec![[0; MAXLIGHTSCALE]; LIGHTLEVELS];
        let mut zlight = vec![[0; MAXLIGHTZ]; LIGHTLEVELS];

        for i in 0..LIGHTLEVELS {
            let startmap =
                ((LIGHTLEVELS - 1 - i) * 2 * NUMCOLORMAPS / LIGHTLEVELS) as i32;
            for (j, slot) in zlight[i].iter_mut().enumerate() {
                let scale = FixedPoint::from_int(SCREENWIDTH / 2)
                    / FixedPoint::new(((j + 1) as i32) << LIGHTZSHIFT);
                let scale = scale.raw() >> LIGHTSCALESHIFT;
                let level = startmap - scale / DISTMAP;
                *slot = level.clamp(0, NUMCOLORMAPS as i32 - 1) as usize;
            }
            for (j, slot) in scalelight[i].iter_mut().enumerate() {
                let level = startmap - j as i32 * SCREENWIDTH / view_width / DISTMAP;
                *slot = level.clamp(0, NUMCOLORMAPS as i32 - 1) as usize;
            }
        }

        Self { scalelight, zlight }
    }
}

impl LightTable for Lighting {
    fn scale_light(&self, level: usize, scale: FixedPoint) -> usize {
        let index = (scale.raw() >> LIGHTSCALESHIFT).clamp(0, MAXLIGHTSCALE as i32 - 1);
        self.scalelight[level.min(LIGHTLEVELS - 1)][index as usize]
    }

    fn z_light(&self, level: usize, distance: FixedPoint) -> usize {
        // negative distances read as huge, like the unsigned shift
        let index = ((distance.raw() as u32) >> LIGHTZSHIFT).min(MAXLIGHTZ as u32 - 1);
        self.zlight[level.min(LIGHTLEVELS - 1)][index as usize]
    }
}

/// Sector light plus extra light, as a `0..LIGHTLEVELS` index
#[inline]
pub fn light_level(lightlevel: i32, extralight: i32) -> usize {
    ((lightlevel >> LIGHTSEGSHIFT) + extralight).clamp(0, LIGHTLEVELS as i32 - 1) as usize
}

/// Light level for a wall. Axis aligned walls get fake contrast, darker
/// along x and lighter along y.
#[inline]
pub fn wall_light_level(lightlevel: i32, extralight: i32, v1: &Vertex, v2: &Vertex) -> usize {
    let mut lightnum = (lightlevel >> LIGHTSEGSHIFT) + extralight;
    if v1.y == v2.y {
        lightnum -= 1;
    } else if v1.x == v2.x {
        lightnum += 1;
    }
    lightnum.clamp(0, LIGHTLEVELS as i32 - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brighter_is_lower_colormap() {
        let light = Lighting::new(320);
        let scale = FixedPoint::unit();
        assert!(light.scale_light(15, scale) <= light.scale_light(4, scale));
        // full bright sector close up is colormap 0
        assert_eq!(light.scale_light(15, FixedPoint::from_int(20)), 0);
        // dark and far is the last colormap
        assert_eq!(light.scale_light(0, FixedPoint::new(256)), NUMCOLORMAPS - 1);
    }

    #[test]
    fn flats_darken_with_distance() {
        let light = Lighting::new(320);
        let near = light.z_light(10, FixedPoint::from_int(16));
        let far = light.z_light(10, FixedPoint::from_int(2000));
        assert!(near <= far);
        assert_eq!(light.z_light(0, FixedPoint::from_int(-5)), NUMCOLORMAPS - 1);
        assert!(light.z_light(40, FixedPoint::zero()) < NUMCOLORMAPS);
    }

    #[test]
    fn fake_contrast() {
        let a = Vertex::new(FixedPoint::zero(), FixedPoint::zero());
        let along_x = Vertex::new(FixedPoint::from_int(64), FixedPoint::zero());
        let along_y = Vertex::new(FixedPoint::zero(), FixedPoint::from_int(64));
        let diagonal = Vertex::new(FixedPoint::from_int(64), FixedPoint::from_int(64));
        assert_eq!(wall_light_level(160, 0, &a, &along_x), 9);
        assert_eq!(wall_light_level(160, 0, &a, &along_y), 11);
        assert_eq!(wall_light_level(160, 0, &a, &diagonal), 10);
        assert_eq!(wall_light_level(255, 3, &a, &along_y), 15);
        assert_eq!(light_level(0, -2), 0);
        assert_eq!(light_level(160, 1), 11);
    }
}
