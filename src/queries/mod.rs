//! Data access layer. Every function runs on a borrowed connection and is
//! called from inside `FundraiserDbConn::run` or directly from the CLI and tests.

pub mod fundraisers;
pub mod notifications;
pub mod sales;
pub mod schools;
pub mod sessions;
pub mod students;
pub mod users;

use diesel::result::{DatabaseErrorKind, Error};

/// Whether `error` is a unique constraint violation, e.g. a repeated ticket or a taken username.
pub fn is_unique_violation(error: &Error) -> bool {
    matches!(
        error,
        Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

pub fn is_foreign_key_violation(error: &Error) -> bool {
    matches!(
        error,
        Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}
