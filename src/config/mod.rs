use serde::Deserialize;
use serde::Deserializer;
use serde::de::Error;

use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::{Component, Path, PathBuf};

pub mod database;
pub mod error;
pub use database::DatabaseConfig;
pub use error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "./data/config/loader.json";
pub const CONFIG_PATH_ENV: &str = "BARATA_CONFIG";

/// File name patterns used inside an acquisition directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatterns {
    pub scene: String,
    pub frame: String,
    pub oil: String,
    pub ship: String,
}

impl Default for FilePatterns {
    fn default() -> Self {
        Self {
            scene: "*geo5.tif".to_string(),
            frame: "*frame.shp".to_string(),
            oil: "*OIL.shp".to_string(),
            ship: "*SHIP.shp".to_string(),
        }
    }
}

/// Footprint files live in a parallel tree where one path component differs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FrameTree {
    pub data_segment: String,
    pub frame_segment: String,
}

impl Default for FrameTree {
    fn default() -> Self {
        Self {
            data_segment: "seonse_outputs".to_string(),
            frame_segment: "frames".to_string(),
        }
    }
}

impl FrameTree {
    /// Maps a data directory onto its footprint directory. Paths without the
    /// data segment map onto themselves.
    pub fn frame_dir(&self, data_dir: &Path) -> PathBuf {
        let mut replaced = false;
        let mapped: PathBuf = data_dir
            .components()
            .map(|component| match component {
                Component::Normal(name) if !replaced && name == OsStr::new(&self.data_segment) => {
                    replaced = true;
                    Component::Normal(OsStr::new(&self.frame_segment))
                }
                other => other,
            })
            .collect();

        if replaced {
            mapped
        } else {
            data_dir.to_path_buf()
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SceneLoading {
    pub enabled: bool,
    pub raster2pgsql: String,
    pub psql: String,
    pub table: String,
    pub tile_size: String,
    pub overview_factor: u8,
}

impl Default for SceneLoading {
    fn default() -> Self {
        Self {
            enabled: true,
            raster2pgsql: "raster2pgsql".to_string(),
            psql: "psql".to_string(),
            table: "public.scenes".to_string(),
            tile_size: "auto".to_string(),
            overview_factor: 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    data_roots: Vec<String>,
    frame_tree: FrameTree,
    patterns: FilePatterns,
    scenes: SceneLoading,
}

// Rejects an empty root list and glob patterns that do not compile, so a bad
// config fails before anything touches the database.
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ConfigHelper {
            data_roots: Vec<String>,
            #[serde(default)]
            frame_tree: FrameTree,
            #[serde(default)]
            patterns: PatternsHelper,
            #[serde(default)]
            scenes: SceneLoading,
        }

        #[derive(Deserialize, Default)]
        struct PatternsHelper {
            scene: Option<String>,
            frame: Option<String>,
            oil: Option<String>,
            ship: Option<String>,
        }

        let helper = ConfigHelper::deserialize(deserializer)?;

        if helper.data_roots.is_empty() {
            return Err(D::Error::custom(ConfigError::NoDataRoots));
        }

        let defaults = FilePatterns::default();
        let patterns = FilePatterns {
            scene: helper.patterns.scene.unwrap_or(defaults.scene),
            frame: helper.patterns.frame.unwrap_or(defaults.frame),
            oil: helper.patterns.oil.unwrap_or(defaults.oil),
            ship: helper.patterns.ship.unwrap_or(defaults.ship),
        };

        for pattern in helper.data_roots.iter().chain([
            &patterns.scene,
            &patterns.frame,
            &patterns.oil,
            &patterns.ship,
        ]) {
            validate_pattern(pattern).map_err(D::Error::custom)?;
        }

        Ok(Config {
            data_roots: helper.data_roots,
            frame_tree: helper.frame_tree,
            patterns,
            scenes: helper.scenes,
        })
    }
}

fn validate_pattern(pattern: &str) -> Result<(), ConfigError> {
    glob::Pattern::new(pattern)
        .map(|_| ())
        .map_err(|source| ConfigError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

impl Config {
    pub fn new(data_roots: Vec<String>) -> Self {
        Self {
            data_roots,
            frame_tree: FrameTree::default(),
            patterns: FilePatterns::default(),
            scenes: SceneLoading::default(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Config = serde_json::from_reader(reader).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Path from `BARATA_CONFIG`, falling back to the default location.
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn with_patterns(mut self, patterns: FilePatterns) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn data_roots(&self) -> &[String] {
        &self.data_roots
    }

    pub fn frame_tree(&self) -> &FrameTree {
        &self.frame_tree
    }

    pub fn patterns(&self) -> &FilePatterns {
        &self.patterns
    }

    pub fn scenes(&self) -> &SceneLoading {
        &self.scenes
    }
}
