//! PostGIS tables for one satellite acquisition and what was detected in it.
//!
//! A [`frame`] owns any number of [`scene`], [`oil`] and [`ship`] rows through
//! their `frame_id` column. Geometry columns are written as EWKT and cast to
//! `geometry` on insert; they come back as hex EWKB text.

pub mod frame;
pub mod oil;
pub mod scene;
pub mod ship;

/// Spatial reference of every stored geometry (longitude/latitude).
pub const SRID: i32 = 4326;

/// Prefixes a WKT geometry with the storage SRID.
pub fn ewkt(wkt: &str) -> String {
    format!("SRID={};{}", SRID, wkt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ewkt() {
        assert_eq!(ewkt("POINT (1 2)"), "SRID=4326;POINT (1 2)");
    }
}
