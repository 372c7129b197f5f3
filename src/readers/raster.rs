use gdal::Dataset;
use std::path::Path;

use super::ReadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterInfo {
    pub width: usize,
    pub height: usize,
    pub bands: usize,
}

/// Opens a raster to make sure GDAL can read it before it is handed to the
/// external loader.
pub fn inspect_raster(path: &Path) -> Result<RasterInfo, ReadError> {
    let dataset = Dataset::open(path).map_err(|source| ReadError::Gdal {
        path: path.to_path_buf(),
        source,
    })?;

    let (width, height) = dataset.raster_size();

    Ok(RasterInfo {
        width,
        height,
        bands: dataset.raster_count(),
    })
}
