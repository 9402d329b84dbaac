use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "daily_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    /// `YYYY-MM-DD`
    pub date: String,
    pub gym_visited: Option<bool>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::workout_entries::Entity")]
    WorkoutEntries,
    #[sea_orm(has_many = "super::meal_entries::Entity")]
    MealEntries,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::workout_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkoutEntries.def()
    }
}

impl Related<super::meal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
