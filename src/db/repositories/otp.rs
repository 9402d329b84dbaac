use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::entities::{one_time_codes, prelude::*};

pub use crate::entities::one_time_codes::Model as OneTimeCode;

pub struct OtpRepository {
    conn: DatabaseConnection,
}

impl OtpRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Stores `code` as the only live code for `identifier`.
    pub async fn replace(&self, identifier: &str, code: &str, expires_at: &str) -> Result<()> {
        let txn = self.conn.begin().await?;

        OneTimeCodes::delete_many()
            .filter(one_time_codes::Column::Identifier.eq(identifier))
            .exec(&txn)
            .await?;

        one_time_codes::ActiveModel {
            identifier: Set(identifier.to_string()),
            code: Set(code.to_string()),
            expires_at: Set(expires_at.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert one-time code")?;

        txn.commit().await?;
        Ok(())
    }

    pub async fn get(&self, identifier: &str) -> Result<Option<OneTimeCode>> {
        OneTimeCodes::find()
            .filter(one_time_codes::Column::Identifier.eq(identifier))
            .one(&self.conn)
            .await
            .context("Failed to query one-time code")
    }

    pub async fn delete(&self, identifier: &str) -> Result<()> {
        OneTimeCodes::delete_many()
            .filter(one_time_codes::Column::Identifier.eq(identifier))
            .exec(&self.conn)
            .await?;
        Ok(())
    }
}
