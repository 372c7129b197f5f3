//! Per-directory loading: scenes, then frames, then the detections of each frame.

pub mod frame;
pub mod oil;
pub mod scene;
pub mod ship;

use sea_orm::ConnectionTrait;
use std::fmt;
use std::path::Path;

use crate::config::Config;
use crate::discovery::{AcquisitionDir, find_file};
use crate::error::LoadError;

pub use scene::RasterLoader;

/// Row counts for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub directories: usize,
    pub scenes: usize,
    pub frames: usize,
    pub oils: usize,
    pub ships: usize,
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} directories, {} scenes, {} frames, {} oils, {} ships",
            self.directories, self.scenes, self.frames, self.oils, self.ships
        )
    }
}

pub struct Loader<'a, C> {
    db: &'a C,
    config: &'a Config,
    rasters: Option<RasterLoader>,
}

impl<'a, C: ConnectionTrait> Loader<'a, C> {
    pub fn new(db: &'a C, config: &'a Config) -> Self {
        Self {
            db,
            config,
            rasters: None,
        }
    }

    /// Enables scene loading through the external raster loader.
    pub fn with_raster_loader(mut self, rasters: RasterLoader) -> Self {
        self.rasters = Some(rasters);
        self
    }

    /// Loads the directories in the given order. The first error stops the
    /// run; rows committed before it stay in the database.
    pub async fn run(&self, dirs: &[AcquisitionDir]) -> Result<LoadSummary, LoadError> {
        let mut summary = LoadSummary::default();

        for (i, dir) in dirs.iter().enumerate() {
            tracing::info!("{}/{}: {}", i + 1, dirs.len(), dir.name());
            self.load_dir(&dir.path, &mut summary).await?;
            summary.directories += 1;
        }

        Ok(summary)
    }

    pub async fn load_dir(
        &self,
        data_dir: &Path,
        summary: &mut LoadSummary,
    ) -> Result<(), LoadError> {
        let patterns = self.config.patterns();

        let scene_files = match &self.rasters {
            Some(rasters) => scene::ingest_scenes(rasters, data_dir, &patterns.scene).await?,
            None => Vec::new(),
        };
        summary.scenes += scene_files.len();

        let frame_dir = self.config.frame_tree().frame_dir(data_dir);
        let Some(footprint) = find_file(&frame_dir, &patterns.frame)? else {
            tracing::warn!("No footprint file in {}", frame_dir.display());
            return Ok(());
        };

        let frames = frame::ingest_frames(self.db, &footprint).await?;
        summary.frames += frames.len();

        let oil_file = find_file(data_dir, &patterns.oil)?;
        let ship_file = find_file(data_dir, &patterns.ship)?;

        for frame in &frames {
            frame::link_scenes(self.db, frame.id, &scene_files).await?;

            if let Some(path) = &oil_file {
                summary.oils += oil::ingest_oils(self.db, path, frame).await?;
            }
            if let Some(path) = &ship_file {
                summary.ships += ship::ingest_ships(self.db, path, frame).await?;
            }
        }

        Ok(())
    }
}
