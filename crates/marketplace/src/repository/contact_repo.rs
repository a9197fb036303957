//! 联系留言仓储

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{ContactMessage, ContactStatus, NewContactMessage};

const CONTACT_COLUMNS: &str = "id, name, email, subject, message, status, created_at, updated_at";

/// 联系留言仓储
pub struct ContactMessageRepository {
    pool: PgPool,
}

impl ContactMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, message: &NewContactMessage) -> Result<ContactMessage> {
        let sql = format!(
            r#"
            INSERT INTO contact_messages (name, email, subject, message, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CONTACT_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, ContactMessage>(&sql)
            .bind(&message.name)
            .bind(&message.email)
            .bind(&message.subject)
            .bind(&message.message)
            .bind(ContactStatus::New)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    pub async fn list(
        &self,
        status: Option<ContactStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactMessage>> {
        let sql = format!(
            r#"
            SELECT {CONTACT_COLUMNS} FROM contact_messages
            WHERE ($1::varchar IS NULL OR status = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, ContactMessage>(&sql)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn count(&self, status: Option<ContactStatus>) -> Result<i64> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM contact_messages WHERE ($1::varchar IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: ContactStatus,
    ) -> Result<Option<ContactMessage>> {
        let sql = format!(
            r#"
            UPDATE contact_messages SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {CONTACT_COLUMNS}
            "#
        );
        let updated = sqlx::query_as::<_, ContactMessage>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }
}
