//! 站内信仓储

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{ConversationSummary, Message, NewMessage};

const MESSAGE_COLUMNS: &str = "id, sender_id, recipient_id, toy_id, content, is_read, created_at";

/// 站内信仓储
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_message(&self, id: i64) -> Result<Option<Message>> {
        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1");
        let message = sqlx::query_as::<_, Message>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(message)
    }

    pub async fn send(&self, message: &NewMessage) -> Result<Message> {
        let sql = format!(
            r#"
            INSERT INTO messages (sender_id, recipient_id, toy_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING {MESSAGE_COLUMNS}
            "#
        );
        let created = sqlx::query_as::<_, Message>(&sql)
            .bind(message.sender_id)
            .bind(message.recipient_id)
            .bind(message.toy_id)
            .bind(&message.content)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// 两个用户之间的对话，按时间正序
    pub async fn conversation(
        &self,
        user_id: i64,
        partner_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>> {
        let sql = format!(
            r#"
            SELECT {MESSAGE_COLUMNS} FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            ORDER BY created_at ASC, id ASC
            LIMIT $3 OFFSET $4
            "#
        );
        let messages = sqlx::query_as::<_, Message>(&sql)
            .bind(user_id)
            .bind(partner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(messages)
    }

    pub async fn count_conversation(&self, user_id: i64, partner_id: i64) -> Result<i64> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM messages
            WHERE (sender_id = $1 AND recipient_id = $2)
               OR (sender_id = $2 AND recipient_id = $1)
            "#,
        )
        .bind(user_id)
        .bind(partner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// 收件箱：每个对话对象一行，最近联系的在前
    pub async fn inbox(&self, user_id: i64) -> Result<Vec<ConversationSummary>> {
        let rows = sqlx::query_as::<_, ConversationSummary>(
            r#"
            WITH threads AS (
                SELECT CASE WHEN sender_id = $1 THEN recipient_id ELSE sender_id END AS partner_id,
                       content, created_at, id,
                       (recipient_id = $1 AND NOT is_read) AS unread
                FROM messages
                WHERE sender_id = $1 OR recipient_id = $1
            ),
            latest AS (
                SELECT DISTINCT ON (partner_id) partner_id, content, created_at
                FROM threads
                ORDER BY partner_id, created_at DESC, id DESC
            )
            SELECT l.partner_id,
                   COALESCE(u.display_name, u.username) AS partner_name,
                   l.content AS last_message,
                   l.created_at AS last_message_at,
                   (SELECT COUNT(*) FROM threads t WHERE t.partner_id = l.partner_id AND t.unread)
                       AS unread_count
            FROM latest l
            JOIN users u ON u.id = l.partner_id
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn unread_count(&self, user_id: i64) -> Result<i64> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM messages WHERE recipient_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn mark_read(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE messages SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// 把来自某个用户的消息全部标为已读，返回更新数量
    pub async fn mark_conversation_read(&self, user_id: i64, partner_id: i64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE messages SET is_read = TRUE
            WHERE recipient_id = $1 AND sender_id = $2 AND NOT is_read
            "#,
        )
        .bind(user_id)
        .bind(partner_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
