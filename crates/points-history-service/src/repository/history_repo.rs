//! 历史记录仓储
//!
//! 时间统一以 UTC 存储，区间边界由调用方换算

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::{HistoryRepositoryTrait, HistoryTotals, PurgeReport};
use crate::error::{HistoryError, Result};
use crate::models::{HistoryPoint, HistoryTransaction, NewHistoryPoint, NewHistoryTransaction};
use crate::range::TimeRange;

/// 历史记录仓储
pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepositoryTrait for HistoryRepository {
    async fn insert_point(&self, point: &NewHistoryPoint) -> Result<HistoryPoint> {
        sqlx::query_as::<_, HistoryPoint>(
            r#"
            INSERT INTO hist_points (id, id_user, points)
            VALUES ($1, $2, $3)
            RETURNING id, id_user, points, recorded_at
            "#,
        )
        .bind(&point.id)
        .bind(&point.id_user)
        .bind(point.points)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                HistoryError::DuplicatePoint(point.id.clone())
            }
            _ => HistoryError::Database(e),
        })
    }

    async fn insert_transaction(&self, tx: &NewHistoryTransaction) -> Result<HistoryTransaction> {
        let created = sqlx::query_as::<_, HistoryTransaction>(
            r#"
            INSERT INTO hist_transactions (id_user, description, points)
            VALUES ($1, $2, $3)
            RETURNING id, id_user, description, points, recorded_at
            "#,
        )
        .bind(&tx.id_user)
        .bind(&tx.description)
        .bind(tx.points)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_points(&self, id_user: &str, range: TimeRange) -> Result<Vec<HistoryPoint>> {
        let points = sqlx::query_as::<_, HistoryPoint>(
            r#"
            SELECT id, id_user, points, recorded_at
            FROM hist_points
            WHERE id_user = $1
              AND ($2::TIMESTAMPTZ IS NULL OR recorded_at >= $2)
              AND ($3::TIMESTAMPTZ IS NULL OR recorded_at < $3)
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(id_user)
        .bind(range.from)
        .bind(range.until)
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    async fn list_transactions(
        &self,
        id_user: &str,
        range: TimeRange,
    ) -> Result<Vec<HistoryTransaction>> {
        let transactions = sqlx::query_as::<_, HistoryTransaction>(
            r#"
            SELECT id, id_user, description, points, recorded_at
            FROM hist_transactions
            WHERE id_user = $1
              AND ($2::TIMESTAMPTZ IS NULL OR recorded_at >= $2)
              AND ($3::TIMESTAMPTZ IS NULL OR recorded_at < $3)
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(id_user)
        .bind(range.from)
        .bind(range.until)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    async fn point_exists(&self, id: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM hist_points WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn totals(&self, id_user: &str) -> Result<HistoryTotals> {
        let (points, transactions): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE((SELECT SUM(points) FROM hist_points WHERE id_user = $1), 0)::BIGINT,
                COALESCE((SELECT SUM(points) FROM hist_transactions WHERE id_user = $1), 0)::BIGINT
            "#,
        )
        .bind(id_user)
        .fetch_one(&self.pool)
        .await?;

        Ok(HistoryTotals {
            points,
            transactions,
        })
    }

    async fn purge(&self) -> Result<PurgeReport> {
        let mut tx = self.pool.begin().await?;

        let points = sqlx::query("DELETE FROM hist_points")
            .execute(&mut *tx)
            .await?;
        let transactions = sqlx::query("DELETE FROM hist_transactions")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(PurgeReport {
            points_deleted: points.rows_affected(),
            transactions_deleted: transactions.rows_affected(),
        })
    }
}
