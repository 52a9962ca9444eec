use argh::FromArgs;
use log::LevelFilter;

use crate::scene::Scene;

/// Render one frame of a sample map and print it as text
#[derive(Debug, Clone, FromArgs)]
pub struct CLIOptions {
    /// verbose level: off, error, warn, info, debug, trace
    #[argh(option)]
    pub verbose: Option<LevelFilter>,
    /// path to a config file, defaults to one in the user config dir
    #[argh(option)]
    pub config: Option<String>,
    /// resolution width in columns
    #[argh(option, default = "0")]
    pub width: usize,
    /// resolution height in rows
    #[argh(option, default = "0")]
    pub height: usize,
    /// horizontal field of view in degrees, 20 to 160
    #[argh(option)]
    pub fov: Option<f64>,
    /// sample map <box, doorway, closed, sky, grate>
    #[argh(option)]
    pub scene: Option<Scene>,
    /// view x in map units, defaults to the scene start
    #[argh(option)]
    pub x: Option<i32>,
    /// view y in map units, defaults to the scene start
    #[argh(option)]
    pub y: Option<i32>,
    /// view angle in degrees, 0 is east
    #[argh(option)]
    pub angle: Option<f64>,
    /// emit floors and ceilings as horizontal spans?
    #[argh(option)]
    pub spans: Option<bool>,
    /// do not write the merged options back to the config file
    #[argh(switch)]
    pub no_save: bool,
}
