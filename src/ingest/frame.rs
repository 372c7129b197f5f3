use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};
use std::path::Path;

use crate::entities::{ewkt, frame, scene};
use crate::error::LoadError;
use crate::readers::{ReadError, VectorRecord, read_records};

pub const SATELLITE: &str = "SATELLITE";
pub const SENSOR: &str = "SENSOR";
pub const POLARISATION: &str = "POLARISASI";
pub const DATETIME: &str = "DATETIME";

pub fn frame_model(record: &VectorRecord) -> Result<frame::ActiveModel, ReadError> {
    Ok(frame::ActiveModel {
        satellite: Set(record.text(SATELLITE)?),
        sensor: Set(record.text(SENSOR)?),
        polarisation: Set(record.text(POLARISATION)?),
        datetime: Set(record.timestamp(DATETIME)?),
        geom: Set(record.geometry.as_deref().map(ewkt)),
        ..Default::default()
    })
}

/// Inserts one frame per footprint feature, in file order.
pub async fn ingest_frames<C: ConnectionTrait>(
    db: &C,
    path: &Path,
) -> Result<Vec<frame::Model>, LoadError> {
    tracing::info!("Insert frame...");
    let records = read_records(path)?;

    let mut frames = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let model = frame_model(record)?;
        let frame = model.insert(db).await?;

        tracing::info!(
            "{}/{}: {} | {} | {} | {}",
            i + 1,
            records.len(),
            frame.satellite.as_deref().unwrap_or("-"),
            frame.sensor.as_deref().unwrap_or("-"),
            frame.polarisation.as_deref().unwrap_or("-"),
            frame
                .datetime
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_else(|| "-".to_string()),
        );
        frames.push(frame);
    }

    Ok(frames)
}

/// Points every scene row loaded from `filenames` at `frame_id`.
pub async fn link_scenes<C: ConnectionTrait>(
    db: &C,
    frame_id: i32,
    filenames: &[String],
) -> Result<u64, DbErr> {
    if filenames.is_empty() {
        return Ok(0);
    }

    let result = scene::Entity::update_many()
        .col_expr(scene::Column::FrameId, Expr::value(frame_id))
        .filter(scene::Column::Filename.is_in(filenames.iter().cloned()))
        .exec(db)
        .await?;

    tracing::debug!("Linked {} scene rows to frame {}", result.rows_affected, frame_id);
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::FieldValue;
    use chrono::{TimeZone, Utc};
    use sea_orm::{ActiveValue, DbBackend, MockDatabase, MockExecResult};

    fn footprint() -> VectorRecord {
        VectorRecord::new(Some("POLYGON ((106 -6,106.5 -6,106.5 -6.5,106 -6))"))
            .with(SATELLITE, Some(FieldValue::String("CSK".to_string())))
            .with(SENSOR, Some(FieldValue::String("X".to_string())))
            .with(POLARISATION, Some(FieldValue::String("HH".to_string())))
            .with(
                DATETIME,
                Some(FieldValue::String("2021-01-01T00:00:00Z".to_string())),
            )
    }

    #[test]
    fn test_frame_model() {
        let model = frame_model(&footprint()).unwrap();

        assert_eq!(model.id, ActiveValue::NotSet);
        assert_eq!(model.satellite, Set(Some("CSK".to_string())));
        assert_eq!(model.sensor, Set(Some("X".to_string())));
        assert_eq!(model.polarisation, Set(Some("HH".to_string())));
        assert_eq!(
            model.datetime,
            Set(Some(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()))
        );
        assert_eq!(
            model.geom,
            Set(Some(
                "SRID=4326;POLYGON ((106 -6,106.5 -6,106.5 -6.5,106 -6))".to_string()
            ))
        );
    }

    #[test]
    fn test_frame_model_requires_fields() {
        let mut record = footprint();
        record.attributes.remove(POLARISATION);

        assert!(matches!(
            frame_model(&record),
            Err(ReadError::MissingField(field)) if field == POLARISATION
        ));
    }

    #[tokio::test]
    async fn test_link_scenes() {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .into_connection();

        let linked = link_scenes(&db, 5, &["a_geo5.tif".to_string()]).await.unwrap();
        assert_eq!(linked, 3);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"UPDATE \"scenes\" SET \"frame_id\" = $1"#));
        assert!(log.contains(r#"\"filename\" IN ($2)"#));
    }

    #[tokio::test]
    async fn test_link_without_scenes_is_a_no_op() {
        let db = MockDatabase::new(DbBackend::Postgres).into_connection();

        assert_eq!(link_scenes(&db, 5, &[]).await.unwrap(), 0);
        assert!(db.into_transaction_log().is_empty());
    }
}
