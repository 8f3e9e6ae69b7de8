//! User repository
//!
//! Identity itself lives with the external provider; this table carries the
//! minimum the settlement core needs: ownership, roles, and the platform
//! administrator that collects commission.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use targetuz_types::Role;

use crate::{DbError, DbResult, DbUser};

pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, name: &str, email: &str, role: Role) -> DbResult<DbUser> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (name, email, role)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, role, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("users_email_key") {
                    return DbError::Duplicate(format!("Email {} already exists", email));
                }
            }
            DbError::Query(e)
        })?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT id, name, email, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT id, name, email, role, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Id of the platform administrator, provisioning one if absent
    pub async fn platform_account_id(&self) -> DbResult<Uuid> {
        let mut tx = self.pool.begin().await?;
        let id = resolve_platform_account_tx(&mut *tx).await?;
        tx.commit().await?;
        Ok(id)
    }
}

/// Resolve (or lazily provision) the commission-receiving administrator
/// inside an open transaction
///
/// Select-before-create keeps the call idempotent; the synthetic identity is
/// keyed by a fresh uuid so provisioning cannot collide on email.
pub(crate) async fn resolve_platform_account_tx(conn: &mut PgConnection) -> DbResult<Uuid> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE role = 'admin' ORDER BY created_at LIMIT 1")
            .fetch_optional(&mut *conn)
            .await?;

    if let Some((id,)) = existing {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, role)
        VALUES ($1, 'TargetUZ Platforma', $2, 'admin')
        "#,
    )
    .bind(id)
    .bind(format!("platform-{id}@targetuz.uz"))
    .execute(&mut *conn)
    .await?;

    tracing::info!(platform_account = %id, "Provisioned platform commission account");
    Ok(id)
}
