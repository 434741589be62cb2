//! Permission repository implementation.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_entity::PermissionCode;

/// Repository for the `permissions` table.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts every built-in permission code that has no live row yet,
    /// active. Existing rows keep their flags. Returns how many were added.
    pub async fn ensure_built_in(&self) -> AppResult<u64> {
        let (ids, codes) = built_in_seed();

        let result = sqlx::query(
            "INSERT INTO permissions (id, code, active) \
             SELECT seed.id, seed.code, TRUE \
             FROM UNNEST($1::uuid[], $2::text[]) AS seed(id, code) \
             ON CONFLICT (code) WHERE deleted_at IS NULL DO NOTHING",
        )
        .bind(&ids)
        .bind(&codes)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to seed built-in permissions", e)
        })?;

        let inserted = result.rows_affected();
        info!(
            inserted,
            total = PermissionCode::BUILT_IN.len(),
            "Built-in permissions in place"
        );
        Ok(inserted)
    }
}

/// Column arrays for the built-in rows, one fresh ID per code.
fn built_in_seed() -> (Vec<Uuid>, Vec<String>) {
    PermissionCode::BUILT_IN
        .iter()
        .map(|code| (Uuid::now_v7(), code.to_string()))
        .unzip()
}
