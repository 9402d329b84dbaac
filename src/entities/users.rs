use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Random API key (64-char hex string)
    #[sea_orm(unique)]
    pub api_key: String,

    /// Data URI or external URL
    pub avatar: Option<String>,

    /// `user` or `admin`
    pub role: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::daily_logs::Entity")]
    DailyLogs,
    #[sea_orm(has_many = "super::weight_entries::Entity")]
    WeightEntries,
    #[sea_orm(has_many = "super::manual_prs::Entity")]
    ManualPrs,
}

impl Related<super::daily_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyLogs.def()
    }
}

impl Related<super::weight_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WeightEntries.def()
    }
}

impl Related<super::manual_prs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManualPrs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
