use analytics::AnalyticsError;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfig(String),

    #[error("Failed to connect to the database: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Query failed during '{operation}': {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Could not map a row during '{operation}': {source}")]
    Mapping {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("The requested {entity} was not found ({key}).")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl DbError {
    /// Sorts a driver error into the taxonomy, tagging it with the operation
    /// that raised it.
    pub fn from_sqlx(operation: &'static str, err: sqlx::Error) -> Self {
        use sqlx::Error as E;

        match err {
            E::Configuration(_)
            | E::Io(_)
            | E::Tls(_)
            | E::PoolTimedOut
            | E::PoolClosed
            | E::WorkerCrashed => DbError::Connection(err),
            E::ColumnNotFound(_)
            | E::ColumnIndexOutOfBounds { .. }
            | E::ColumnDecode { .. }
            | E::Decode(_)
            | E::TypeNotFound { .. } => DbError::Mapping {
                operation,
                source: err,
            },
            _ => DbError::Query {
                operation,
                source: err,
            },
        }
    }

    /// `NotFound` for a single customer id.
    pub fn customer_not_found(customer_id: i32) -> Self {
        DbError::NotFound {
            entity: "customer",
            key: format!("customer_id = {customer_id}"),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

impl From<CoreError> for DbError {
    fn from(err: CoreError) -> Self {
        DbError::InvalidArgument(err.to_string())
    }
}

impl From<AnalyticsError> for DbError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::NoData(entity) => DbError::NotFound {
                entity,
                key: "no qualifying rows".to_string(),
            },
        }
    }
}
