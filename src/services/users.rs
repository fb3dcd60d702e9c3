// src/services/users.rs
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct UserService;

impl UserService {
    /// Issue a random anonymous id and store it with `contact_saved = false`.
    /// Collisions are not checked against existing rows.
    pub async fn create_user(pool: &SqlitePool) -> Result<String, sqlx::Error> {
        let user_id = Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO users (id, contact_saved, created_at) VALUES (?, ?, ?)")
            .bind(&user_id)
            .bind(false)
            .bind(Utc::now())
            .execute(pool)
            .await?;

        tracing::debug!(user_id = %user_id, "Created anonymous user");
        Ok(user_id)
    }
}
