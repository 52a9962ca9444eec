//! Renders a single frame of a sample map through the software
//! visible-surface core and prints it as text, one character per pixel.

mod ascii;
mod cli;
mod config;
mod scene;

use std::error::Error;
use std::path::PathBuf;

use log::{LevelFilter, debug, info};
use math::{Angle, FixedPoint};
use mimalloc::MiMalloc;
use render_soft::{PlaneOutput, RenderConfig, SoftwareRenderer, ViewPoint};
use render_trait::{DrawJobs, SpriteGather};
use simplelog::TermLogger;

use crate::ascii::AsciiFrame;
use crate::cli::CLIOptions;
use crate::config::UserConfig;

const BASE_DIR: &str = "bsp-view/";
/// Eye height above the floor
const VIEWHEIGHT: i32 = 41;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Logs the subsectors the walk passes through, nearest first
#[derive(Default)]
struct WalkLog {
    visited: Vec<(usize, usize)>,
}

impl SpriteGather for WalkLog {
    fn add_sprites(&mut self, subsector: usize, sector: usize) {
        self.visited.push((subsector, sector));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(LevelFilter::Warn),
        simplelog::ConfigBuilder::default()
            .set_time_level(LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let config_path = options
        .config
        .clone()
        .map(PathBuf::from)
        .or_else(config::default_path);
    let mut user_config = UserConfig::load(config_path.as_deref());
    user_config.sync_cli(&mut options);
    if let (Some(path), false) = (&config_path, options.no_save) {
        user_config.write(path);
    }

    let scene = user_config.scene;
    let map = scene.build()?;
    let textures = scene::textures();

    let (start_x, start_y, start_angle) = scene.start();
    let x = options.x.unwrap_or(start_x);
    let y = options.y.unwrap_or(start_y);
    let subsector = map.point_in_subsector(FixedPoint::from_int(x), FixedPoint::from_int(y));
    let floor = map
        .subsectors()
        .get(subsector)
        .and_then(|ss| map.sectors().get(ss.sector))
        .map_or(0, |s| s.floorheight.to_int());
    let view = ViewPoint::new(
        x,
        y,
        floor + VIEWHEIGHT,
        options.angle.unwrap_or(start_angle),
    );
    info!("Scene {scene:?}, view {view:?}");

    let mut render_config = RenderConfig::with_size(user_config.width, user_config.height);
    if user_config.spans {
        render_config.plane_output = PlaneOutput::Spans;
    }
    let mut renderer = SoftwareRenderer::new(render_config);
    let (width, height) = (renderer.config().width, renderer.config().height);
    let mut jobs = DrawJobs::new(width * height * 4);
    let mut walk = WalkLog::default();

    let fov_half = Angle::from_degrees(user_config.fov / 2.0);
    renderer.render_player_view(&view, fov_half, &map, &textures, &mut walk, &mut jobs)?;
    debug!("Subsectors walked: {:?}", walk.visited);

    let job_count = jobs.len();
    let frame = AsciiFrame::from_jobs(width, height, &mut jobs);
    print!("{frame}");
    let stats = renderer.stats();
    println!(
        "{} jobs, {} visplanes, {} drawsegs, {} openings, {} lines mapped, {} holes",
        job_count,
        stats.visplanes,
        stats.drawsegs,
        stats.openings,
        stats.lines_mapped,
        frame.holes()
    );

    #[cfg(feature = "hprof")]
    coarse_prof::write(&mut std::io::stdout())?;
    Ok(())
}
