//! 权益仓储
//!
//! 提供权益目录与可用数量的数据访问

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::traits::BenefitRepositoryTrait;
use crate::error::Result;
use crate::models::{Benefit, NewBenefit};

const BENEFIT_COLUMNS: &str =
    "id, name, address, points_cost, expires_on, quantity, created_at, updated_at";

/// 权益仓储
pub struct BenefitRepository {
    pool: PgPool,
}

impl BenefitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 转义 LIKE 模式中的通配符
fn escape_like(filter: &str) -> String {
    filter
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl BenefitRepositoryTrait for BenefitRepository {
    async fn create(&self, benefit: &NewBenefit) -> Result<Benefit> {
        let sql = format!(
            r#"
            INSERT INTO benefits (id, name, address, points_cost, expires_on, quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {BENEFIT_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Benefit>(&sql)
            .bind(Uuid::now_v7())
            .bind(&benefit.name)
            .bind(&benefit.address)
            .bind(benefit.points_cost)
            .bind(benefit.expires_on)
            .bind(benefit.quantity)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Benefit>> {
        let sql = format!("SELECT {BENEFIT_COLUMNS} FROM benefits WHERE id = $1");
        let benefit = sqlx::query_as::<_, Benefit>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(benefit)
    }

    async fn list(&self, limit: i64, skip: i64) -> Result<Vec<Benefit>> {
        let sql = format!(
            "SELECT {BENEFIT_COLUMNS} FROM benefits ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
        );
        let benefits = sqlx::query_as::<_, Benefit>(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;

        Ok(benefits)
    }

    async fn list_by_cost_range(
        &self,
        min: Option<i64>,
        max: Option<i64>,
        limit: i64,
        skip: i64,
    ) -> Result<Vec<Benefit>> {
        // 缺省的边界不参与过滤
        let sql = format!(
            r#"
            SELECT {BENEFIT_COLUMNS}
            FROM benefits
            WHERE ($1::BIGINT IS NULL OR points_cost >= $1)
              AND ($2::BIGINT IS NULL OR points_cost <= $2)
            ORDER BY points_cost ASC, id
            LIMIT $3 OFFSET $4
            "#
        );
        let benefits = sqlx::query_as::<_, Benefit>(&sql)
            .bind(min)
            .bind(max)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;

        Ok(benefits)
    }

    async fn search_by_name(&self, filter: &str) -> Result<Vec<Benefit>> {
        let sql = format!(
            "SELECT {BENEFIT_COLUMNS} FROM benefits WHERE name ILIKE $1 ORDER BY name ASC"
        );
        let pattern = format!("%{}%", escape_like(filter));
        let benefits = sqlx::query_as::<_, Benefit>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(benefits)
    }

    async fn update(&self, id: Uuid, benefit: &NewBenefit) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE benefits
            SET name = $2, address = $3, points_cost = $4, expires_on = $5,
                quantity = $6, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&benefit.name)
        .bind(&benefit.address)
        .bind(benefit.points_cost)
        .bind(benefit.expires_on)
        .bind(benefit.quantity)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_quantity(&self, id: Uuid, quantity: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE benefits
            SET quantity = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM benefits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("Café"), "Café");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
