/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    // Display stays generic: it ends up in client-facing error details.
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("empty subject")]
    EmptySubject,
}

pub type RepoResult<T> = Result<T, RepoError>;
