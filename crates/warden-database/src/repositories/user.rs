//! User repository: the PostgreSQL [`UserStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use warden_auth::UserStore;
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;
use warden_entity::{NewUser, Permission, Role, Tenant, User};

const USER_COLUMNS: &str = "id, first_name, last_name, username, email, password_hash, \
     is_superuser, phone1, phone2, avatar, active, created_at, updated_at";

/// A permission row tagged with the role it was reached through.
#[derive(Debug, FromRow)]
struct RolePermissionRow {
    role_id: Uuid,
    #[sqlx(flatten)]
    permission: Permission,
}

/// Loads users with roles, permissions and tenants in one read-only
/// snapshot. Soft-deleted rows are invisible.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn snapshot_tx(&self) -> AppResult<Transaction<'static, Postgres>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin read", e))?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to set isolation level", e)
            })?;

        Ok(tx)
    }

    /// Fetches one user by `column = $1` and its relations.
    async fn find_one(&self, filter: &str, bind: FilterValue<'_>) -> AppResult<Option<User>> {
        let mut tx = self.snapshot_tx().await?;

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {filter} AND deleted_at IS NULL");
        let query = sqlx::query_as::<_, User>(&sql);
        let query = match bind {
            FilterValue::Id(id) => query.bind(id),
            FilterValue::Text(text) => query.bind(text),
        };
        let user = query
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))?;

        let Some(mut user) = user else {
            return Ok(None);
        };

        user.roles = load_roles(&mut tx, user.id).await?;
        user.tenants = load_tenants(&mut tx, user.id).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to end read", e))?;

        Ok(Some(user))
    }
}

enum FilterValue<'a> {
    Id(Uuid),
    Text(&'a str),
}

async fn load_roles(tx: &mut Transaction<'static, Postgres>, user_id: Uuid) -> AppResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>(
        "SELECT r.id, r.name, r.description, r.active, r.updated_at \
         FROM roles r \
         JOIN users_roles ur ON ur.role_id = r.id \
         WHERE ur.user_id = $1 AND r.deleted_at IS NULL \
         ORDER BY r.name",
    )
    .bind(user_id)
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load user roles", e))?;

    if roles.is_empty() {
        return Ok(roles);
    }

    let role_ids: Vec<Uuid> = roles.iter().map(|r| r.id).collect();
    let rows = sqlx::query_as::<_, RolePermissionRow>(
        "SELECT rp.role_id, p.id, p.code, p.description, p.active, p.updated_at \
         FROM permissions p \
         JOIN roles_permissions rp ON rp.permission_id = p.id \
         WHERE rp.role_id = ANY($1) AND p.deleted_at IS NULL \
         ORDER BY p.code",
    )
    .bind(&role_ids)
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load role permissions", e))?;

    Ok(attach_permissions(roles, rows))
}

async fn load_tenants(
    tx: &mut Transaction<'static, Postgres>,
    user_id: Uuid,
) -> AppResult<Vec<Tenant>> {
    sqlx::query_as::<_, Tenant>(
        "SELECT t.id, t.name, t.description, t.url, t.logo, t.active, t.updated_at \
         FROM tenants t \
         JOIN users_tenants ut ON ut.tenant_id = t.id \
         WHERE ut.user_id = $1 AND t.deleted_at IS NULL \
         ORDER BY t.name",
    )
    .bind(user_id)
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load user tenants", e))
}

/// Distributes permission rows onto the roles they belong to.
fn attach_permissions(mut roles: Vec<Role>, rows: Vec<RolePermissionRow>) -> Vec<Role> {
    let mut by_role: HashMap<Uuid, Vec<Permission>> = HashMap::new();
    for row in rows {
        by_role.entry(row.role_id).or_default().push(row.permission);
    }
    for role in &mut roles {
        role.permissions = by_role.remove(&role.id).unwrap_or_default();
    }
    roles
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.find_one("LOWER(email) = LOWER($1)", FilterValue::Text(email))
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.find_one("id = $1", FilterValue::Id(id)).await
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = $3 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(password_hash)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update password", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_user(&self, data: NewUser, at: DateTime<Utc>) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO users (id, first_name, last_name, username, email, password_hash, \
             is_superuser, phone1, phone2, active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11) \
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::now_v7())
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.username)
            .bind(&data.email)
            .bind(&data.password_hash)
            .bind(data.is_superuser)
            .bind(&data.phone1)
            .bind(&data.phone2)
            .bind(data.active)
            .bind(at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some("users_username_key") =>
                {
                    AppError::conflict(format!("Username '{}' is already taken", data.username))
                }
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some("users_email_key") =>
                {
                    AppError::conflict(format!("Email '{}' is already registered", data.email))
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
            })
    }
}
