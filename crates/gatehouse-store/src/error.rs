//! Error types for the store crate.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A column that carries a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    ProfileId,
    Email,
    PhoneNumber,
}

impl UniqueField {
    /// Map a SQLite `UNIQUE constraint failed: <table>.<column>` message.
    pub(crate) fn from_constraint_message(message: &str) -> Option<Self> {
        let column = message.rsplit(':').next()?.trim();
        match column {
            "credentials.username" => Some(UniqueField::Username),
            "profiles.id" => Some(UniqueField::ProfileId),
            "profiles.email" => Some(UniqueField::Email),
            "profiles.phone_number" => Some(UniqueField::PhoneNumber),
            _ => None,
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UniqueField::Username => "username",
            UniqueField::ProfileId => "id",
            UniqueField::Email => "email",
            UniqueField::PhoneNumber => "phone_number",
        };
        f.write_str(name)
    }
}

/// Errors that can occur in a credential or profile store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate value for unique field `{0}`")]
    Duplicate(UniqueField),

    /// A stored row could not be turned back into a domain value.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("failed to prepare database directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err
            && db.is_unique_violation()
            && let Some(field) = UniqueField::from_constraint_message(db.message())
        {
            return StoreError::Duplicate(field);
        }
        StoreError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_message_mapping() {
        assert_eq!(
            UniqueField::from_constraint_message("UNIQUE constraint failed: profiles.email"),
            Some(UniqueField::Email)
        );
        assert_eq!(
            UniqueField::from_constraint_message("UNIQUE constraint failed: credentials.username"),
            Some(UniqueField::Username)
        );
        assert_eq!(
            UniqueField::from_constraint_message("UNIQUE constraint failed: profiles.id"),
            Some(UniqueField::ProfileId)
        );
        assert_eq!(
            UniqueField::from_constraint_message("UNIQUE constraint failed: other.thing"),
            None
        );
    }
}
