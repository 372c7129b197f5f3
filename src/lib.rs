//! Loads satellite acquisition products (scene rasters, frame footprints, oil
//! slick and ship detections) into a PostGIS database.

pub mod config;
pub mod discovery;
pub mod entities;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod readers;
pub mod schema;
