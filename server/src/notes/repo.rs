use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
    pub done: bool,
}

impl Note {
    pub async fn list_by_user(
        db: &PgPool,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Note>> {
        sqlx::query_as::<_, Note>(
            r#"
            SELECT id, user_id, title, body, done
            FROM notes
            WHERE user_id = $1
            ORDER BY id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn find(db: &PgPool, user_id: i64, id: i64) -> sqlx::Result<Option<Note>> {
        sqlx::query_as::<_, Note>(
            r#"
            SELECT id, user_id, title, body, done
            FROM notes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        user_id: i64,
        title: &str,
        body: &str,
        done: bool,
    ) -> sqlx::Result<Note> {
        sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (user_id, title, body, done)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, body, done
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(body)
        .bind(done)
        .fetch_one(db)
        .await
    }

    /// Partial update; absent fields keep their current value.
    pub async fn update(
        db: &PgPool,
        user_id: i64,
        id: i64,
        title: Option<&str>,
        body: Option<&str>,
        done: Option<bool>,
    ) -> sqlx::Result<Option<Note>> {
        sqlx::query_as::<_, Note>(
            r#"
            UPDATE notes
            SET title = COALESCE($3, title),
                body  = COALESCE($4, body),
                done  = COALESCE($5, done)
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, body, done
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(body)
        .bind(done)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, user_id: i64, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM notes
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
