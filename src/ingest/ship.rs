use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use std::path::Path;

use crate::entities::{ewkt, frame, ship};
use crate::error::LoadError;
use crate::readers::{ReadError, VectorRecord, read_records};

pub const LONGITUDE: &str = "LON_CENTRE";
pub const LATITUDE: &str = "LAT_CENTRE";
pub const LENGTH: &str = "LENGTH";
pub const WIDTH: &str = "WIDTH";
pub const VELOCITY: &str = "TARGET_VEL";
pub const HEADING: &str = "TARGET_DIR";
pub const MMSI: &str = "AIS_MMSI";
pub const DATETIME: &str = "TARGET_UTC";

pub fn ship_model(record: &VectorRecord, frame_id: i32) -> Result<ship::ActiveModel, ReadError> {
    Ok(ship::ActiveModel {
        frame_id: Set(Some(frame_id)),
        longitude: Set(record.real(LONGITUDE)?),
        latitude: Set(record.real(LATITUDE)?),
        length: Set(record.real(LENGTH)?),
        width: Set(record.real(WIDTH)?),
        velocity: Set(record.real(VELOCITY)?),
        heading: Set(record.real(HEADING)?),
        mmsi: Set(record.text(MMSI)?),
        datetime: Set(record.timestamp(DATETIME)?),
        geom: Set(record.geometry.as_deref().map(ewkt)),
        ..Default::default()
    })
}

/// Inserts every vessel of the detection file under `frame`, one commit per row.
pub async fn ingest_ships<C: ConnectionTrait>(
    db: &C,
    path: &Path,
    frame: &frame::Model,
) -> Result<usize, LoadError> {
    tracing::info!("Insert ship...");
    let records = read_records(path)?;

    for (i, record) in records.iter().enumerate() {
        let ship = ship_model(record, frame.id)?.insert(db).await?;

        tracing::info!(
            "{}/{}: {} | {} | {}",
            i + 1,
            records.len(),
            ship.length.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()),
            ship.mmsi.as_deref().unwrap_or("-"),
            ship.datetime
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::FieldValue;

    fn vessel() -> VectorRecord {
        VectorRecord::new(Some("POINT (106.8271 -5.9312)"))
            .with(LONGITUDE, Some(FieldValue::Real(106.8271)))
            .with(LATITUDE, Some(FieldValue::Real(-5.9312)))
            .with(LENGTH, Some(FieldValue::Real(87.5)))
            .with(WIDTH, Some(FieldValue::Real(14.0)))
            .with(VELOCITY, Some(FieldValue::Real(11.3)))
            .with(HEADING, Some(FieldValue::Integer(271)))
            .with(MMSI, Some(FieldValue::String("525005123".to_string())))
            .with(
                DATETIME,
                Some(FieldValue::String("2021-01-01T00:00:05Z".to_string())),
            )
    }

    #[test]
    fn test_ship_model_copies_fields() {
        let model = ship_model(&vessel(), 9).unwrap();

        assert_eq!(model.frame_id, Set(Some(9)));
        assert_eq!(model.longitude, Set(Some(106.8271)));
        assert_eq!(model.latitude, Set(Some(-5.9312)));
        assert_eq!(model.length, Set(Some(87.5)));
        assert_eq!(model.width, Set(Some(14.0)));
        assert_eq!(model.velocity, Set(Some(11.3)));
        assert_eq!(model.heading, Set(Some(271.0)));
        assert_eq!(model.mmsi, Set(Some("525005123".to_string())));
        assert_eq!(
            model.geom,
            Set(Some("SRID=4326;POINT (106.8271 -5.9312)".to_string()))
        );
    }

    #[test]
    fn test_mmsi_is_not_validated() {
        let record = vessel().with(MMSI, Some(FieldValue::String("unknown".to_string())));

        let model = ship_model(&record, 9).unwrap();
        assert_eq!(model.mmsi, Set(Some("unknown".to_string())));
    }

    #[test]
    fn test_numeric_mmsi() {
        let record = vessel().with(MMSI, Some(FieldValue::Real(525005123.0)));

        let model = ship_model(&record, 9).unwrap();
        assert_eq!(model.mmsi, Set(Some("525005123".to_string())));
    }
}
