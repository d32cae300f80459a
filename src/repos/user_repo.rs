/*
 * Responsibility
 * - google_users テーブル向け SQLx 操作 (subject をキーにした upsert)
 * - PgPool は外から受け取る (グローバルに持たない)
 * - DB エラーは RepoError に変換して返す
 */
use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::error::{RepoError, RepoResult};

/// Profile fields stored per subject. `None` is stored as NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub name: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Create-or-replace of a user record keyed by the provider subject.
///
/// Every field of `profile` overwrites the stored one, including `None`.
/// A call either fully applies or leaves the record untouched.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn upsert(&self, subject: &str, profile: &UserProfile) -> RepoResult<UpsertOutcome>;
}

pub(crate) fn ensure_subject(subject: &str) -> RepoResult<()> {
    if subject.trim().is_empty() {
        return Err(RepoError::EmptySubject);
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn upsert(&self, subject: &str, profile: &UserProfile) -> RepoResult<UpsertOutcome> {
        ensure_subject(subject)?;

        // Single statement: the row is replaced atomically, concurrent logins for
        // the same subject resolve to whichever write lands last.
        // `xmax = 0` only holds for a freshly inserted tuple.
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO google_users (subject, name, picture, email)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (subject) DO UPDATE
            SET
                name = EXCLUDED.name,
                picture = EXCLUDED.picture,
                email = EXCLUDED.email
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(subject)
        .bind(profile.name.as_deref())
        .bind(profile.picture.as_deref())
        .bind(profile.email.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(if inserted {
            UpsertOutcome::Inserted
        } else {
            UpsertOutcome::Updated
        })
    }
}
