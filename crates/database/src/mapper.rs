//! Row-to-domain conversion.
//!
//! Every function here is pure: it reads columns from one row and fails with
//! `DbError::Mapping` when a column is missing, `NULL` where the domain needs a
//! value, or of an unexpected type.

use crate::error::DbError;
use analytics::{CountryCount, GenreCount, SpendTotal};
use core_types::Customer;
use sqlx::postgres::PgRow;
use sqlx::Row;

/// The column list every customer-returning query selects, in mapper order.
macro_rules! customer_columns {
    () => {
        "customer_id, phone, postal_code, address, country, first_name, last_name, email"
    };
}
pub(crate) use customer_columns;

const MAP_CUSTOMER: &str = "map customer row";

fn column<'r, T>(row: &'r PgRow, name: &str, operation: &'static str) -> Result<T, DbError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|source| DbError::Mapping { operation, source })
}

/// Converts one `customer` row into a `Customer`.
pub fn customer_from_row(row: &PgRow) -> Result<Customer, DbError> {
    Ok(Customer {
        customer_id: column(row, "customer_id", MAP_CUSTOMER)?,
        phone: column(row, "phone", MAP_CUSTOMER)?,
        postal_code: column(row, "postal_code", MAP_CUSTOMER)?,
        address: column(row, "address", MAP_CUSTOMER)?,
        country: column(row, "country", MAP_CUSTOMER)?,
        first_name: column(row, "first_name", MAP_CUSTOMER)?,
        last_name: column(row, "last_name", MAP_CUSTOMER)?,
        email: column(row, "email", MAP_CUSTOMER)?,
    })
}

pub fn customers_from_rows(rows: &[PgRow]) -> Result<Vec<Customer>, DbError> {
    rows.iter().map(customer_from_row).collect()
}

/// A customer row extended with its summed `total_spend`.
pub fn spend_total_from_row(row: &PgRow) -> Result<SpendTotal, DbError> {
    Ok(SpendTotal {
        customer: customer_from_row(row)?,
        total: column(row, "total_spend", "map spend total")?,
    })
}

pub fn genre_count_from_row(row: &PgRow) -> Result<GenreCount, DbError> {
    Ok(GenreCount {
        genre: column(row, "genre", "map genre count")?,
        purchases: column(row, "purchases", "map genre count")?,
    })
}

pub fn country_count_from_row(row: &PgRow) -> Result<CountryCount, DbError> {
    Ok(CountryCount {
        country: column(row, "country", "map country count")?,
        customers: column(row, "customers", "map country count")?,
    })
}
