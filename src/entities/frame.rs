use sea_orm::QueryOrder;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "frames")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub satellite: Option<String>,
    pub sensor: Option<String>,
    pub polarisation: Option<String>,
    pub datetime: Option<DateTimeUtc>,
    #[sea_orm(
        column_type = r#"custom("geometry(Polygon, 4326)")"#,
        select_as = "text",
        save_as = "geometry"
    )]
    pub geom: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::scene::Entity")]
    Scene,
    #[sea_orm(has_many = "super::oil::Entity")]
    Oil,
    #[sea_orm(has_many = "super::ship::Entity")]
    Ship,
}

impl Related<super::scene::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scene.def()
    }
}

impl Related<super::oil::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Oil.def()
    }
}

impl Related<super::ship::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ship.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// Owned collections, in insertion (primary key) order.
impl Model {
    pub fn scenes(&self) -> Select<super::scene::Entity> {
        self.find_related(super::scene::Entity)
            .order_by_asc(super::scene::Column::Rid)
    }

    pub fn oils(&self) -> Select<super::oil::Entity> {
        self.find_related(super::oil::Entity)
            .order_by_asc(super::oil::Column::Id)
    }

    pub fn ships(&self) -> Select<super::ship::Entity> {
        self.find_related(super::ship::Entity)
            .order_by_asc(super::ship::Column::Id)
    }
}
