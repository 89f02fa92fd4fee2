use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 操作日志表 ====================
        // user_id 不设外键：清空日志或删除用户时都要保留原始记录
        manager
            .create_table(
                Table::create()
                    .table(OperationLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OperationLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OperationLogs::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OperationLogs::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(OperationLogs::OperationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OperationLogs::Details).text().not_null())
                    .to_owned(),
            )
            .await?;

        // 日志索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_logs_timestamp")
                    .table(OperationLogs::Table)
                    .col(OperationLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_logs_user_id")
                    .table(OperationLogs::Table)
                    .col(OperationLogs::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OperationLogs::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum OperationLogs {
    #[sea_orm(iden = "operation_logs")]
    Table,
    Id,
    CreatedAt,
    UserId,
    OperationType,
    Details,
}
