use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

async fn create<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        create(manager, &schema, Users).await?;
        create(manager, &schema, DailyLogs).await?;
        create(manager, &schema, WorkoutEntries).await?;
        create(manager, &schema, MealEntries).await?;
        create(manager, &schema, WeightEntries).await?;
        create(manager, &schema, ManualPrs).await?;
        create(manager, &schema, OneTimeCodes).await?;
        create(manager, &schema, RoomMessages).await?;
        create(manager, &schema, Feedback).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedback).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoomMessages).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OneTimeCodes).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ManualPrs).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WeightEntries).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MealEntries).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkoutEntries).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DailyLogs).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).to_owned())
            .await?;

        Ok(())
    }
}
