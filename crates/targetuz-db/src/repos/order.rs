//! Order repository

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use targetuz_types::{NewOrder, COMMISSION_RATE_DEFAULT};

use crate::{DbResult, DbOrder};

pub struct OrderRepo {
    pool: PgPool,
}

impl OrderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending, unpaid order with the default commission rate
    pub async fn create(&self, new_order: &NewOrder) -> DbResult<DbOrder> {
        let order = sqlx::query_as::<_, DbOrder>(
            r#"
            INSERT INTO orders (client_id, specialist_id, title, description, budget, commission_rate)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, client_id, specialist_id, title, description, budget, commission_rate,
                      status, payment_status, escrow_amount, payment_provider, completed_at, created_at
            "#,
        )
        .bind(new_order.client_id)
        .bind(new_order.specialist_id)
        .bind(&new_order.title)
        .bind(&new_order.description)
        .bind(new_order.budget)
        .bind(COMMISSION_RATE_DEFAULT)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    /// Find an order by ID
    pub async fn find_by_id(&self, id: Uuid) -> DbResult<Option<DbOrder>> {
        let order = sqlx::query_as::<_, DbOrder>(
            r#"
            SELECT id, client_id, specialist_id, title, description, budget, commission_rate,
                   status, payment_status, escrow_amount, payment_provider, completed_at, created_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Orders where the user is client or specialist, newest first
    pub async fn list_for_user(&self, user_id: Uuid, limit: i64, offset: i64) -> DbResult<Vec<DbOrder>> {
        let orders = sqlx::query_as::<_, DbOrder>(
            r#"
            SELECT id, client_id, specialist_id, title, description, budget, commission_rate,
                   status, payment_status, escrow_amount, payment_provider, completed_at, created_at
            FROM orders
            WHERE client_id = $1 OR specialist_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}

/// Load an order row with a row-level lock inside an open transaction
///
/// The order row lock is what linearizes concurrent settlement operations
/// touching the same order.
pub(crate) async fn lock_order_tx(conn: &mut PgConnection, id: Uuid) -> DbResult<Option<DbOrder>> {
    let order = sqlx::query_as::<_, DbOrder>(
        r#"
        SELECT id, client_id, specialist_id, title, description, budget, commission_rate,
               status, payment_status, escrow_amount, payment_provider, completed_at, created_at
        FROM orders
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(order)
}
