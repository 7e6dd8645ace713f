use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// One preferences row per user; created on first read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPrefs {
    pub user_id: i64,
    pub sleep_minutes: i32,
}

impl UserPrefs {
    pub async fn get_or_create(db: &PgPool, user_id: i64) -> sqlx::Result<UserPrefs> {
        sqlx::query(
            r#"
            INSERT INTO user_prefs (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(db)
        .await?;

        sqlx::query_as::<_, UserPrefs>(
            r#"
            SELECT user_id, sleep_minutes
            FROM user_prefs
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    pub async fn upsert(db: &PgPool, user_id: i64, sleep_minutes: i32) -> sqlx::Result<UserPrefs> {
        sqlx::query_as::<_, UserPrefs>(
            r#"
            INSERT INTO user_prefs (user_id, sleep_minutes)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET sleep_minutes = EXCLUDED.sleep_minutes
            RETURNING user_id, sleep_minutes
            "#,
        )
        .bind(user_id)
        .bind(sleep_minutes)
        .fetch_one(db)
        .await
    }
}
