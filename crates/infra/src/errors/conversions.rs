//! Conversions from external infrastructure errors into domain errors.

use huddle_domain::HuddleError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub HuddleError);

impl From<InfraError> for HuddleError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<HuddleError> for InfraError {
    fn from(value: HuddleError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoHuddleError {
    fn into_huddle(self) -> HuddleError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → HuddleError */
/* -------------------------------------------------------------------------- */

impl IntoHuddleError for SqlError {
    fn into_huddle(self) -> HuddleError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => HuddleError::Storage("database is busy".into()),
                    ErrorCode::DatabaseLocked => HuddleError::Storage("database is locked".into()),
                    ErrorCode::DiskFull => HuddleError::Storage("disk is full".into()),
                    ErrorCode::ReadOnly => HuddleError::Storage("database is read-only".into()),
                    ErrorCode::NotADatabase | ErrorCode::DatabaseCorrupt => {
                        HuddleError::Storage(format!("database file is unusable: {message}"))
                    }
                    _ => HuddleError::Storage(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => HuddleError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                HuddleError::Storage(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                HuddleError::Storage(format!("invalid column type: {ty}"))
            }
            RE::InvalidPath(path) => HuddleError::Config(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            other => HuddleError::Storage(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_huddle())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → HuddleError */
/* -------------------------------------------------------------------------- */

impl IntoHuddleError for r2d2::Error {
    fn into_huddle(self) -> HuddleError {
        HuddleError::Storage(format!("connection pool unavailable: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_huddle())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → HuddleError */
/* -------------------------------------------------------------------------- */

impl IntoHuddleError for serde_json::Error {
    fn into_huddle(self) -> HuddleError {
        HuddleError::Serialization(format!("malformed document: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_huddle())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → HuddleError */
/* -------------------------------------------------------------------------- */

impl IntoHuddleError for HttpError {
    fn into_huddle(self) -> HuddleError {
        if self.is_timeout() {
            return HuddleError::Timeout("HTTP request timed out".into());
        }

        if self.is_connect() {
            return HuddleError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return HuddleError::Serialization(format!("invalid response body: {self}"));
        }

        if let Some(status) = self.status() {
            return status_error(status);
        }

        HuddleError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_huddle())
    }
}

/// Map a non-success HTTP status onto the domain taxonomy.
pub(crate) fn status_error(status: reqwest::StatusCode) -> HuddleError {
    let code = status.as_u16();
    let message =
        format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

    match code {
        401 | 403 => HuddleError::Auth(message),
        404 => HuddleError::NotFound(message),
        408 => HuddleError::Timeout(message),
        429 => HuddleError::Network(message),
        400..=499 => HuddleError::InvalidInput(message),
        _ => HuddleError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
