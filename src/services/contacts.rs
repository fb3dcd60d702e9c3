// src/services/contacts.rs
use crate::models::contact::{Contact, ContactRequest};
use chrono::Utc;
use sqlx::SqlitePool;

pub struct ContactService;

impl ContactService {
    /// Persist a lead and return its assigned id. No format checks, no dedup.
    pub async fn save_contact(pool: &SqlitePool, payload: &ContactRequest) -> Result<i64, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO contacts (name, phone, email, course, triggered_question, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.course)
        .bind(&payload.triggered_question)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        tracing::info!(contact_id = id, course = %payload.course, "Saved contact");
        Ok(id)
    }

    /// All contacts in storage order.
    pub async fn list_contacts(pool: &SqlitePool) -> Result<Vec<Contact>, sqlx::Error> {
        sqlx::query_as::<_, Contact>(
            "SELECT id, name, phone, email, course, triggered_question, created_at FROM contacts ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;

    fn request(name: &str, question: Option<&str>) -> ContactRequest {
        ContactRequest {
            user_id: None,
            name: name.to_string(),
            phone: "9876543210".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            course: "Python".to_string(),
            triggered_question: question.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn ids_are_positive_and_increasing() {
        let pool = test_pool().await;

        let first = ContactService::save_contact(&pool, &request("Asha", None)).await.unwrap();
        let second = ContactService::save_contact(&pool, &request("Ravi", Some("fees?"))).await.unwrap();

        assert!(first > 0);
        assert!(second > first);
    }

    #[tokio::test]
    async fn list_returns_saved_fields_in_storage_order() {
        let pool = test_pool().await;
        ContactService::save_contact(&pool, &request("Asha", Some("What is the fee?"))).await.unwrap();
        ContactService::save_contact(&pool, &request("Ravi", None)).await.unwrap();

        let contacts = ContactService::list_contacts(&pool).await.unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].name, "Asha");
        assert_eq!(contacts[0].email, "asha@example.com");
        assert_eq!(contacts[0].triggered_question.as_deref(), Some("What is the fee?"));
        assert_eq!(contacts[1].name, "Ravi");
        assert!(contacts[1].triggered_question.is_none());
        assert!(contacts[0].id < contacts[1].id);
    }

    #[tokio::test]
    async fn duplicates_and_free_form_values_are_accepted() {
        let pool = test_pool().await;
        let mut odd = request("Same", None);
        odd.phone = "call me maybe".to_string();
        odd.email = "not-an-email".to_string();

        ContactService::save_contact(&pool, &odd).await.unwrap();
        ContactService::save_contact(&pool, &odd).await.unwrap();

        let contacts = ContactService::list_contacts(&pool).await.unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[1].phone, "call me maybe");
    }

    #[tokio::test]
    async fn listing_twice_is_stable() {
        let pool = test_pool().await;
        ContactService::save_contact(&pool, &request("Asha", None)).await.unwrap();

        let first = ContactService::list_contacts(&pool).await.unwrap();
        let second = ContactService::list_contacts(&pool).await.unwrap();
        assert_eq!(first, second);
    }
}
