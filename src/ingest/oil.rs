use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use std::path::Path;

use crate::entities::{ewkt, frame, oil};
use crate::error::LoadError;
use crate::readers::{ReadError, VectorRecord, read_records};

pub const LENGTH: &str = "LENGTH_KM";
pub const WIDTH: &str = "WIDTH_KM";
pub const AREA: &str = "AREA_KM";
pub const CONFIDENCE: &str = "ALARM_LEV";
pub const DATETIME: &str = "DATE-TIME";

pub fn oil_model(record: &VectorRecord, frame_id: i32) -> Result<oil::ActiveModel, ReadError> {
    Ok(oil::ActiveModel {
        frame_id: Set(Some(frame_id)),
        length: Set(record.real(LENGTH)?),
        width: Set(record.real(WIDTH)?),
        area: Set(record.real(AREA)?),
        confidence: Set(record.text(CONFIDENCE)?),
        datetime: Set(record.timestamp(DATETIME)?),
        geom: Set(record.geometry.as_deref().map(ewkt)),
        ..Default::default()
    })
}

/// Inserts every slick of the detection file under `frame`. Each row is
/// committed on its own.
pub async fn ingest_oils<C: ConnectionTrait>(
    db: &C,
    path: &Path,
    frame: &frame::Model,
) -> Result<usize, LoadError> {
    tracing::info!("Insert oil...");
    let records = read_records(path)?;

    for (i, record) in records.iter().enumerate() {
        let oil = oil_model(record, frame.id)?.insert(db).await?;

        tracing::info!(
            "{}/{}: {} | {} | {}",
            i + 1,
            records.len(),
            oil.area.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()),
            oil.confidence.as_deref().unwrap_or("-"),
            oil.datetime
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    Ok(records.len())
}
