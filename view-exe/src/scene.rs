//! The sample maps the viewer can show.

use std::str::FromStr;

use level::samples::{self, Doorway, FLAT_SKY, TEX_GRATE};
use level::{MapData, MapError};
use render_trait::TextureSizes;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scene {
    /// One closed room
    Box,
    /// A room with an opening onto a raised corridor
    #[default]
    Doorway,
    /// The doorway with the corridor shut
    Closed,
    /// The doorway under an open sky
    Sky,
    /// The doorway with a see-through grate in the opening
    Grate,
}

impl FromStr for Scene {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "box" => Ok(Self::Box),
            "doorway" => Ok(Self::Doorway),
            "closed" => Ok(Self::Closed),
            "sky" => Ok(Self::Sky),
            "grate" => Ok(Self::Grate),
            _ => Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "Invalid scene",
            )),
        }
    }
}

impl Scene {
    pub fn build(&self) -> Result<MapData, MapError> {
        let opts = match self {
            Scene::Box => return samples::box_room(),
            Scene::Doorway => Doorway::default(),
            Scene::Closed => Doorway {
                step_floor: 0,
                step_ceiling: 0,
                ..Doorway::default()
            },
            Scene::Sky => Doorway {
                room_ceiling_pic: FLAT_SKY,
                step_ceiling_pic: FLAT_SKY,
                ..Doorway::default()
            },
            Scene::Grate => Doorway {
                door_mid: Some(TEX_GRATE),
                ..Doorway::default()
            },
        };
        samples::doorway(&opts)
    }

    /// Where the view starts: x, y and angle in degrees
    pub fn start(&self) -> (i32, i32, f64) {
        match self {
            Scene::Box => (-64, 0, 0.0),
            _ => (-160, -40, 10.0),
        }
    }
}

/// Texture sizes matching the sample maps' texture numbers
pub fn textures() -> TextureSizes {
    TextureSizes::new(vec![(64, 128), (64, 64), (64, 64), (64, 128)], FLAT_SKY)
}
