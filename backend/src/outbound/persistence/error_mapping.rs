//! Shared Diesel error mapping.
//!
//! Every repository port exposes `connection` and `query` constructors, so a
//! single pair of helpers covers them all.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool checkout failure onto the port's connection variant.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map a Diesel failure onto the port's query or connection variant.
///
/// Messages are generic; the driver detail is only logged at debug level.
pub(crate) fn map_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Generate `map_pool_error`/`map_diesel_error` wrappers for one port error.
macro_rules! port_error_mappers {
    ($error:ty) => {
        fn map_pool_error(error: $crate::outbound::persistence::pool::PoolError) -> $error {
            $crate::outbound::persistence::error_mapping::map_pool_error(error, <$error>::connection)
        }

        fn map_diesel_error(error: diesel::result::Error) -> $error {
            $crate::outbound::persistence::error_mapping::map_diesel_error(
                error,
                <$error>::query,
                <$error>::connection,
            )
        }
    };
}

pub(crate) use port_error_mappers;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::NoticeRepositoryError;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    port_error_mappers!(NoticeRepositoryError);

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let error = map_pool_error(PoolError::checkout("connection refused"));

        assert_eq!(error, NoticeRepositoryError::connection("connection refused"));
    }

    #[rstest]
    #[case(DieselError::NotFound, NoticeRepositoryError::query("record not found"))]
    #[case(
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("closed".to_owned()),
        ),
        NoticeRepositoryError::connection("database connection error")
    )]
    #[case(
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_owned()),
        ),
        NoticeRepositoryError::query("database error")
    )]
    fn diesel_errors_are_redacted(
        #[case] error: DieselError,
        #[case] expected: NoticeRepositoryError,
    ) {
        assert_eq!(map_diesel_error(error), expected);
    }
}
