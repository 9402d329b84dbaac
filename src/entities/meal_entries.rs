use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "meal_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub daily_log_id: i32,
    pub position: i32,
    pub client_id: Option<String>,
    pub meal_type: Option<String>,
    pub food_name: String,
    pub quantity: f64,
    /// `100g`, `100ml` or `1 unit`
    pub unit: String,
    pub calories: Option<i32>,
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
