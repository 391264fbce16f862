//! PostgreSQL storage for session documents.

use async_trait::async_trait;
use magnolia_session::{ActorKey, SessionDocument, SessionError, SessionStorage};
use sqlx::{FromRow, PgPool};

/// Row type for session queries.
#[derive(FromRow)]
struct SessionRow {
    document: serde_json::Value,
}

/// Session storage backed by the `session_state` table.
///
/// Documents are stored as JSONB, one row per actor key.
#[derive(Debug, Clone)]
pub struct PgSessionStorage {
    pool: PgPool,
}

impl PgSessionStorage {
    /// Creates a new repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn storage_failed(e: sqlx::Error) -> SessionError {
    SessionError::StorageFailed {
        reason: e.to_string(),
    }
}

#[async_trait]
impl SessionStorage for PgSessionStorage {
    async fn load(&self, key: &ActorKey) -> Result<Option<SessionDocument>, SessionError> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT document
            FROM session_state
            WHERE actor_key = $1
            "#,
        )
        .bind(key.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_failed)?;

        match row {
            Some(r) => serde_json::from_value(r.document)
                .map(Some)
                .map_err(|e| SessionError::CorruptDocument {
                    key: key.clone(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &ActorKey, document: &SessionDocument) -> Result<(), SessionError> {
        let value = serde_json::to_value(document).map_err(|e| SessionError::StorageFailed {
            reason: e.to_string(),
        })?;

        sqlx::query(
            r#"
            INSERT INTO session_state (actor_key, document, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (actor_key)
            DO UPDATE SET document = EXCLUDED.document, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage_failed)?;

        Ok(())
    }
}
