use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;

use super::dto::TimeRange;
use super::repo_types::Meal;
use crate::photos::repo as photo_repo;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("duplicate key")]
    Duplicate,
    #[error("foreign key violation")]
    ForeignKey,
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return RepoError::Duplicate;
            }
            if db.is_foreign_key_violation() {
                return RepoError::ForeignKey;
            }
        }
        RepoError::Database(e)
    }
}

/// Relational store adapter for meals and their photo associations.
#[async_trait]
pub trait MealRepository: Send + Sync {
    /// Meals with `at` inside `range`, newest first.
    async fn list_meals(&self, range: TimeRange) -> Result<Vec<Meal>, RepoError>;
    /// Inserts the meal and returns the row as stored.
    async fn create_meal(&self, meal: &Meal) -> Result<Meal, RepoError>;
    /// Returns the number of rows deleted.
    async fn delete_meal(&self, id: &str) -> Result<u64, RepoError>;
    async fn create_association(&self, photo_id: &str, meal_id: &str) -> Result<(), RepoError>;
    /// Returns the number of rows deleted.
    async fn delete_association(&self, photo_id: &str) -> Result<u64, RepoError>;
}

#[derive(Clone)]
pub struct PgMealRepository {
    db: PgPool,
}

impl PgMealRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn list_meals_query(range: TimeRange) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT id, at, comment FROM meal");
    let mut clause = " WHERE ";
    if let Some(from) = range.from {
        qb.push(clause).push("at >= ").push_bind(from);
        clause = " AND ";
    }
    if let Some(to) = range.to {
        qb.push(clause).push("at <= ").push_bind(to);
    }
    qb.push(" ORDER BY at DESC");
    qb
}

#[async_trait]
impl MealRepository for PgMealRepository {
    async fn list_meals(&self, range: TimeRange) -> Result<Vec<Meal>, RepoError> {
        let mut qb = list_meals_query(range);
        let rows = qb
            .build_query_as::<Meal>()
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn create_meal(&self, meal: &Meal) -> Result<Meal, RepoError> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meal (id, at, comment)
            VALUES ($1, $2, $3)
            RETURNING id, at, comment
            "#,
        )
        .bind(&meal.id)
        .bind(meal.at)
        .bind(&meal.comment)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete_meal(&self, id: &str) -> Result<u64, RepoError> {
        let res = sqlx::query("DELETE FROM meal WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }

    async fn create_association(&self, photo_id: &str, meal_id: &str) -> Result<(), RepoError> {
        photo_repo::insert_meal_photo(&self.db, photo_id, meal_id).await?;
        Ok(())
    }

    async fn delete_association(&self, photo_id: &str) -> Result<u64, RepoError> {
        Ok(photo_repo::delete_meal_photo(&self.db, photo_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn unbounded_query_has_no_where_clause() {
        let qb = list_meals_query(TimeRange::default());
        assert_eq!(qb.sql(), "SELECT id, at, comment FROM meal ORDER BY at DESC");
    }

    #[test]
    fn from_only_query() {
        let qb = list_meals_query(TimeRange {
            from: Some(datetime!(2024-01-01 00:00 UTC)),
            to: None,
        });
        assert_eq!(
            qb.sql(),
            "SELECT id, at, comment FROM meal WHERE at >= $1 ORDER BY at DESC"
        );
    }

    #[test]
    fn to_only_query() {
        let qb = list_meals_query(TimeRange {
            from: None,
            to: Some(datetime!(2024-01-01 00:00 UTC)),
        });
        assert_eq!(
            qb.sql(),
            "SELECT id, at, comment FROM meal WHERE at <= $1 ORDER BY at DESC"
        );
    }

    #[test]
    fn bounded_query_is_inclusive_on_both_sides() {
        let qb = list_meals_query(TimeRange {
            from: Some(datetime!(2024-01-01 00:00 UTC)),
            to: Some(datetime!(2024-01-31 00:00 UTC)),
        });
        assert_eq!(
            qb.sql(),
            "SELECT id, at, comment FROM meal WHERE at >= $1 AND at <= $2 ORDER BY at DESC"
        );
    }

    #[test]
    fn plain_sqlx_errors_stay_database_errors() {
        let err = RepoError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepoError::Database(_)));
    }
}
