use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProProfiles::UserId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ProProfiles::BusinessName).string())
                    .col(ColumnDef::new(ProProfiles::Bio).text())
                    .col(ColumnDef::new(ProProfiles::Profession).string())
                    .col(ColumnDef::new(ProProfiles::Experience).integer())
                    .col(
                        ColumnDef::new(ProProfiles::Certifications)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(ProProfiles::Address).string())
                    .col(ColumnDef::new(ProProfiles::PostalCode).string())
                    .col(ColumnDef::new(ProProfiles::City).string())
                    .col(ColumnDef::new(ProProfiles::Latitude).double())
                    .col(ColumnDef::new(ProProfiles::Longitude).double())
                    .col(ColumnDef::new(ProProfiles::Radius).integer())
                    .col(ColumnDef::new(ProProfiles::Siret).string_len(14))
                    .col(ColumnDef::new(ProProfiles::CorporateName).string())
                    .col(ColumnDef::new(ProProfiles::LegalForm).string())
                    .col(ColumnDef::new(ProProfiles::LegalStatus).string())
                    .col(
                        ColumnDef::new(ProProfiles::OnboardingStep)
                            .string()
                            .not_null()
                            .default("ENTERPRISE_INFO"),
                    )
                    .col(
                        ColumnDef::new(ProProfiles::OnboardingProgress)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProProfiles::OnboardingComplete)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ProProfiles::ValidationStatus)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(ProProfiles::RejectionReason).text())
                    .col(
                        ColumnDef::new(ProProfiles::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ProProfiles::Photos)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(ProProfiles::IsPremium)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(ProProfiles::SubscriptionEnd).timestamp_with_time_zone())
                    .col(ColumnDef::new(ProProfiles::Rating).double())
                    .col(
                        ColumnDef::new(ProProfiles::ReviewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ProProfiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ProProfiles::Table, ProProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing filters.
        for (name, column) in [
            ("idx_pro_profiles_profession", ProProfiles::Profession),
            ("idx_pro_profiles_city", ProProfiles::City),
            ("idx_pro_profiles_validation_status", ProProfiles::ValidationStatus),
        ] {
            manager
                .create_index(
                    Index::create()
                        .table(ProProfiles::Table)
                        .col(column)
                        .name(name)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProProfiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ProProfiles {
    Table,
    Id,
    UserId,
    BusinessName,
    Bio,
    Profession,
    Experience,
    Certifications,
    Address,
    PostalCode,
    City,
    Latitude,
    Longitude,
    Radius,
    Siret,
    CorporateName,
    LegalForm,
    LegalStatus,
    OnboardingStep,
    OnboardingProgress,
    OnboardingComplete,
    ValidationStatus,
    RejectionReason,
    IsActive,
    Photos,
    IsPremium,
    SubscriptionEnd,
    Rating,
    ReviewCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
