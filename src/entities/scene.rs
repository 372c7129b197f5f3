use sea_orm::entity::prelude::*;

/// Raster tiles written by `raster2pgsql`; the loader only sets `frame_id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "scenes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub rid: i32,
    pub frame_id: Option<i32>,
    pub filename: Option<String>,
    #[sea_orm(column_type = r#"custom("raster")"#, select_as = "text")]
    pub rast: Option<String>,
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
