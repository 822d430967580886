use crate::application::repos::RepoError;

/// Translate SQLite driver errors into repository errors.
///
/// SQLite reports constraint violations through the error message rather
/// than SQLSTATE codes, so we match on the message prefix. A UNIQUE
/// violation carries the offending column as `table.column`.
pub(crate) fn map_sqlx_error(error: sqlx::Error) -> RepoError {
    match &error {
        sqlx::Error::Database(db) => {
            let message = db.message();
            if let Some(constraint) = message.strip_prefix("UNIQUE constraint failed: ") {
                RepoError::Duplicate {
                    constraint: constraint.to_string(),
                }
            } else if message.starts_with("FOREIGN KEY constraint failed") {
                RepoError::ForeignKey
            } else if message.starts_with("CHECK constraint failed") {
                RepoError::Integrity {
                    message: message.to_string(),
                }
            } else {
                RepoError::from_persistence(message)
            }
        }
        _ => RepoError::from_persistence(error.to_string()),
    }
}
