use sea_orm::entity::prelude::*;

/// Vessel detection point.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "ships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub frame_id: Option<i32>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub velocity: Option<f64>,
    pub heading: Option<f64>,
    pub mmsi: Option<String>,
    pub datetime: Option<DateTimeUtc>,
    #[sea_orm(
        column_type = r#"custom("geometry(Point, 4326)")"#,
        select_as = "text",
        save_as = "geometry"
    )]
    pub geom: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::frame::Entity",
        from = "Column::FrameId",
        to = "super::frame::Column::Id"
    )]
    Frame,
}

impl Related<super::frame::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Frame.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
