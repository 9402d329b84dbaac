use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workout_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub daily_log_id: i32,
    /// Index within the submitted list
    pub position: i32,
    pub client_id: Option<String>,
    pub exercise_name: String,
    /// JSON array of `{weight, reps}`
    pub sets: String,
    pub legacy_sets: Option<i32>,
    pub legacy_reps: Option<i32>,
    pub legacy_weight: Option<f64>,
    pub category: Option<String>,
    pub completed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::daily_logs::Entity",
        from = "Column::DailyLogId",
        to = "super::daily_logs::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    DailyLogs,
}

impl Related<super::daily_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
