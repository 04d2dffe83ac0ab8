use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "location")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub manager_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ManagerId",
        to = "super::user::Column::Id"
    )]
    Manager,
    #[sea_orm(has_many = "super::location_user::Entity")]
    LocationUsers,
    #[sea_orm(has_many = "super::customer::Entity")]
    Customers,
}

impl Related<super::location_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocationUsers.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

// Members through the pivot; the manager is reached with `Relation::Manager`.
impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::location_user::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::location_user::Relation::Location.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
