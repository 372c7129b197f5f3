use sea_orm::entity::prelude::*;

/// Oil slick polygon. Sizes are in km and km².
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "oils")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub frame_id: Option<i32>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub area: Option<f64>,
    pub confidence: Option<String>,
    pub datetime: Option<DateTimeUtc>,
    #[sea_orm(
        column_type = r#"custom("geometry(Geometry, 4326)")"#,
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
