use sea_orm::entity::prelude::*;

/// Professional profile, one per user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pro_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: String,
    pub business_name: Option<String>,
    pub bio: Option<String>,
    pub profession: Option<String>,
    pub experience: Option<i32>,
    /// JSON array of strings.
    pub certifications: Json,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<i32>,
    pub siret: Option<String>,
    pub corporate_name: Option<String>,
    pub legal_form: Option<String>,
    pub legal_status: Option<String>,
    pub onboarding_step: String,
    pub onboarding_progress: i16,
    pub onboarding_complete: bool,
    pub validation_status: String,
    pub rejection_reason: Option<String>,
    pub is_active: bool,
    /// JSON array of absolute URLs.
    pub photos: Json,
    pub is_premium: bool,
    pub subscription_end: Option<chrono::DateTime<chrono::Utc>>,
    pub rating: Option<f64>,
    pub review_count: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
