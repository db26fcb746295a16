use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Meal record in the `meal` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: String, // caller-supplied
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime, // server-assigned on creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Row in `meal_photo`: links an object-store key to a meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MealPhoto {
    pub id: String,
    pub meal_id: String,
}
