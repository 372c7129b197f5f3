pub mod raster;
pub mod types;
pub mod vector;

pub use raster::{RasterInfo, inspect_raster};
pub use types::{FieldValue, ReadError, VectorRecord};
pub use vector::read_records;
