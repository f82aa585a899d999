use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 通用记录表：每个集合（categories、groups、grades ...）共用一张表，数据以 JSON 文本保存
        manager
            .create_table(
                Table::create()
                    .table(Records::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Records::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Records::RecordId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Records::Collection).string().not_null())
                    .col(ColumnDef::new(Records::Data).text().not_null())
                    .col(ColumnDef::new(Records::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Records::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 按集合读取是唯一的查询路径
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_records_collection")
                    .table(Records::Table)
                    .col(Records::Collection)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Records::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Records {
    #[sea_orm(iden = "records")]
    Table,
    Id,
    RecordId,
    Collection,
    Data,
    CreatedAt,
    UpdatedAt,
}
