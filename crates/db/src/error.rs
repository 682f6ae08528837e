use sangam_core::error::CoreError;

/// Failure of a repository operation that enforces domain rules inside a
/// transaction (library issue/return, event registration, donation status).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Rule(#[from] CoreError),
}
