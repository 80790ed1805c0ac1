use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按 owner 列出未归档短链接
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_shrts_owner_archived")
                    .table(Shrt::Table)
                    .col(Shrt::OwnerId)
                    .col(Shrt::Archived)
                    .to_owned(),
            )
            .await?;

        // 列表按创建时间排序
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_shrts_created_at")
                    .table(Shrt::Table)
                    .col(Shrt::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_plp_links_owner_archived")
                    .table(PlpLink::Table)
                    .col(PlpLink::OwnerId)
                    .col(PlpLink::Archived)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_plp_links_owner_archived")
                    .table(PlpLink::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_shrts_created_at")
                    .table(Shrt::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_shrts_owner_archived")
                    .table(Shrt::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Shrt {
    #[sea_orm(iden = "shrts")]
    Table,
    OwnerId,
    Archived,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PlpLink {
    #[sea_orm(iden = "plp_links")]
    Table,
    OwnerId,
    Archived,
}
