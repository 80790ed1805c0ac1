use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 短链接表
        manager
            .create_table(
                Table::create()
                    .table(Shrt::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shrt::Code)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Shrt::DestinationUrl).text().not_null())
                    .col(ColumnDef::new(Shrt::OwnerId).string_len(64).null())
                    .col(
                        ColumnDef::new(Shrt::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Shrt::Archived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Shrt::Clicks)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Uid)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(User::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(User::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(User::Username)
                            .string_len(64)
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(User::DisplayName).string().null())
                    .col(ColumnDef::new(User::Title).string().null())
                    .col(ColumnDef::new(User::Company).string().null())
                    .col(ColumnDef::new(User::Bio).text().null())
                    .col(ColumnDef::new(User::Phone).string().null())
                    .col(ColumnDef::new(User::DateOfBirth).string().null())
                    .col(ColumnDef::new(User::Street).string().null())
                    .col(ColumnDef::new(User::City).string().null())
                    .col(ColumnDef::new(User::State).string().null())
                    .col(ColumnDef::new(User::Zip).string().null())
                    .col(ColumnDef::new(User::Social).text().not_null())
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(User::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // PLP 链接表
        manager
            .create_table(
                Table::create()
                    .table(PlpLink::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlpLink::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlpLink::OwnerId).string_len(64).not_null())
                    .col(ColumnDef::new(PlpLink::Title).string().not_null())
                    .col(ColumnDef::new(PlpLink::Url).text().not_null())
                    .col(ColumnDef::new(PlpLink::Description).text().null())
                    .col(
                        ColumnDef::new(PlpLink::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlpLink::Archived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PlpLink::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PlpLink::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Shrt::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Shrt {
    #[sea_orm(iden = "shrts")]
    Table,
    Code,
    DestinationUrl,
    OwnerId,
    CreatedAt,
    Archived,
    Clicks,
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Uid,
    Email,
    PasswordHash,
    Username,
    DisplayName,
    Title,
    Company,
    Bio,
    Phone,
    DateOfBirth,
    Street,
    City,
    State,
    Zip,
    Social,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PlpLink {
    #[sea_orm(iden = "plp_links")]
    Table,
    Id,
    OwnerId,
    Title,
    Url,
    Description,
    SortOrder,
    Archived,
    CreatedAt,
}
