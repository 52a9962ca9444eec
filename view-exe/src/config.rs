//! User configuration options.

use std::fs::{File, create_dir_all};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use dirs::config_dir;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::cli::CLIOptions;
use crate::scene::Scene;
use crate::BASE_DIR;

const LOG_TAG: &str = "UserConfig";

/// `<config dir>/bsp-view/user.toml`, if the platform has a config dir
pub fn default_path() -> Option<PathBuf> {
    let mut dir = config_dir()?;
    dir.push(BASE_DIR);
    dir.push("user.toml");
    Some(dir)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub width: usize,
    pub height: usize,
    /// Full horizontal field of view in degrees
    pub fov: f64,
    pub spans: bool,
    pub scene: Scene,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            width: 120,
            height: 40,
            fov: 90.0,
            spans: false,
            scene: Scene::Doorway,
        }
    }
}

impl UserConfig {
    /// Read the config at `path`. A missing or unreadable file gives the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(0) => Self::default(),
            Ok(_) => match toml::from_str(&buf) {
                Ok(data) => {
                    info!(target: LOG_TAG, "Loaded user config file {path:?}");
                    data
                }
                Err(e) => {
                    warn!(target: LOG_TAG, "Could not deserialise {path:?}: {e}");
                    Self::default()
                }
            },
            Err(e) => {
                info!(target: LOG_TAG, "No config at {path:?} ({e}), using defaults");
                Self::default()
            }
        }
    }

    pub fn write(&self, path: &Path) {
        let data = match toml::to_string_pretty(self) {
            Ok(data) => data,
            Err(e) => {
                error!(target: LOG_TAG, "Could not serialise config: {e}");
                return;
            }
        };
        if let Some(dir) = path.parent() {
            if let Err(e) = create_dir_all(dir) {
                error!(target: LOG_TAG, "Couldn't create {dir:?}: {e}");
                return;
            }
        }
        match File::create(path).and_then(|mut f| f.write_all(data.as_bytes())) {
            Ok(()) => info!(target: LOG_TAG, "Saved user config to {path:?}"),
            Err(e) => error!(target: LOG_TAG, "Could not write config: {e}"),
        }
    }

    /// Sync the CLI options and UserOptions with each other
    pub fn sync_cli(&mut self, cli: &mut CLIOptions) {
        info!(target: LOG_TAG, "Checking CLI options");

        if cli.width != 0 && cli.width != self.width {
            self.width = cli.width;
        } else {
            cli.width = self.width;
        }

        if cli.height != 0 && cli.height != self.height {
            self.height = cli.height;
        } else {
            cli.height = self.height;
        }

        if let Some(fov) = cli.fov {
            self.fov = fov;
        } else {
            cli.fov = Some(self.fov);
        }

        if let Some(spans) = cli.spans {
            self.spans = spans;
        } else {
            cli.spans = Some(self.spans);
        }

        if let Some(scene) = cli.scene {
            self.scene = scene;
        } else {
            cli.scene = Some(self.scene);
        }
    }
}
