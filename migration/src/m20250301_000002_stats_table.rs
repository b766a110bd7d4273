//! 统计事件表迁移
//!
//! stats 表按事件 id 存储，并通过 link_code 索引提供按短码的二级访问路径。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stats::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stats::LinkCode).string_len(64).not_null())
                    .col(ColumnDef::new(Stats::Platform).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Stats::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 按短码查询 / 批量删除
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stats_link_code")
                    .table(Stats::Table)
                    .col(Stats::LinkCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stats_created_at")
                    .table(Stats::Table)
                    .col(Stats::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_stats_created_at").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_stats_link_code").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Stats::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Stats {
    Table,
    Id,
    LinkCode,
    Platform,
    CreatedAt,
}
