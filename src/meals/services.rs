use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::dto::{CreateMealRequest, TimeRange};
use super::repo::{MealRepository, RepoError};
use super::repo_types::Meal;

#[derive(Debug, Error)]
pub enum MealError {
    #[error("{0}")]
    Validation(String),
    #[error("meal {0} already exists")]
    Duplicate(String),
    #[error("meal {0} not found")]
    NotFound(String),
    #[error("meal {0} still has photos")]
    HasPhotos(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[instrument(skip(repo))]
pub async fn list_meals(repo: &dyn MealRepository, range: TimeRange) -> Result<Vec<Meal>, MealError> {
    Ok(repo.list_meals(range).await?)
}

/// Stores a new meal stamped with the current UTC time.
#[instrument(skip(repo, req), fields(meal_id = %req.id))]
pub async fn create_meal(repo: &dyn MealRepository, req: CreateMealRequest) -> Result<Meal, MealError> {
    let id = req.id.trim();
    if id.is_empty() {
        return Err(MealError::Validation("Meal ID is required".into()));
    }

    let meal = Meal {
        id: id.to_string(),
        at: OffsetDateTime::now_utc(),
        comment: req.comment,
    };

    let stored = repo.create_meal(&meal).await.map_err(|e| match e {
        RepoError::Duplicate => MealError::Duplicate(meal.id.clone()),
        other => MealError::Repo(other),
    })?;

    info!(meal_id = %stored.id, at = %stored.at, "meal created");
    Ok(stored)
}

#[instrument(skip(repo))]
pub async fn delete_meal(repo: &dyn MealRepository, id: &str) -> Result<(), MealError> {
    let affected = repo.delete_meal(id).await.map_err(|e| match e {
        RepoError::ForeignKey => MealError::HasPhotos(id.to_string()),
        other => MealError::Repo(other),
    })?;

    if affected == 0 {
        return Err(MealError::NotFound(id.to_string()));
    }
    info!(meal_id = %id, "meal deleted");
    Ok(())
}
