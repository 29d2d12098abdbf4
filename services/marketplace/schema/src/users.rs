use sea_orm::entity::prelude::*;

/// Marketplace account; `id` is the identity provider's user id.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: Option<String>,
    /// `CLIENT` or `PRO`.
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::pro_profiles::Entity")]
    ProProfile,
}

impl Related<super::pro_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
