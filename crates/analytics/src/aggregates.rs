use core_types::Customer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Summed invoice totals for one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendTotal {
    pub customer: Customer,
    pub total: Decimal,
}

/// Number of invoice lines bought in one genre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub purchases: i64,
}

/// Number of customers living in one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub customers: i64,
}
