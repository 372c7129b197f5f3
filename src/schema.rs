use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

use crate::entities::{frame, oil, scene, ship};

const EXTENSIONS: [&str; 2] = ["postgis", "postgis_raster"];

const SPATIAL_INDEXES: [&str; 3] = [
    r#"CREATE INDEX IF NOT EXISTS "idx_frames_geom" ON "frames" USING gist ("geom")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_oils_geom" ON "oils" USING gist ("geom")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_ships_geom" ON "ships" USING gist ("geom")"#,
];

/// Creates the PostGIS extensions, the four tables and their spatial indexes
/// when they do not exist yet. Safe to call on every run.
pub async fn create_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    for extension in EXTENSIONS {
        db.execute_unprepared(&format!("CREATE EXTENSION IF NOT EXISTS {}", extension))
            .await?;
    }

    let schema = Schema::new(backend);
    for stmt in table_statements(&schema) {
        db.execute(backend.build(&stmt)).await?;
    }

    for index in SPATIAL_INDEXES {
        db.execute_unprepared(index).await?;
    }

    tracing::debug!("Schema is in place");
    Ok(())
}

// frames first: the other three reference it.
fn table_statements(schema: &Schema) -> Vec<TableCreateStatement> {
    vec![
        create_if_not_exists(schema, frame::Entity),
        create_if_not_exists(schema, scene::Entity),
        create_if_not_exists(schema, oil::Entity),
        create_if_not_exists(schema, ship::Entity),
    ]
}

fn create_if_not_exists<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    stmt
}
