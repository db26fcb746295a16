use sqlx::PgPool;

/// Insert the `meal_photo` row linking `photo_id` to `meal_id`.
pub async fn insert_meal_photo(
    db: &PgPool,
    photo_id: &str,
    meal_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO meal_photo (id, meal_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(photo_id)
    .bind(meal_id)
    .execute(db)
    .await?;

    Ok(())
}

/// Delete the association by photo id, returning the affected row count.
pub async fn delete_meal_photo(db: &PgPool, photo_id: &str) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM meal_photo WHERE id = $1")
        .bind(photo_id)
        .execute(db)
        .await?;

    Ok(res.rows_affected())
}
