use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::utils::errors::AppResult;

/// Almacén de grupos de control de acceso
#[async_trait]
pub trait OwnerGroupRepository: Send + Sync {
    async fn group_members(&self, group: &str) -> AppResult<Vec<Uuid>>;

    /// Sustituye por completo los miembros del grupo
    async fn replace_group_members(&self, group: &str, members: &[Uuid]) -> AppResult<()>;
}

pub struct PgOwnerGroupRepository {
    pool: PgPool,
}

impl PgOwnerGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerGroupRepository for PgOwnerGroupRepository {
    async fn group_members(&self, group: &str) -> AppResult<Vec<Uuid>> {
        let row: Option<(Vec<Uuid>,)> =
            sqlx::query_as("SELECT member_ids FROM access_groups WHERE name = $1")
                .bind(group)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(members,)| members).unwrap_or_default())
    }

    async fn replace_group_members(&self, group: &str, members: &[Uuid]) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO access_groups (name, member_ids, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (name) DO UPDATE SET member_ids = EXCLUDED.member_ids, updated_at = NOW()
            "#,
        )
        .bind(group)
        .bind(members)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
