use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single row of the `customer` table.
///
/// `first_name`, `last_name` and `email` are `NOT NULL` in the schema. The
/// remaining contact fields are nullable in storage, but a new customer must
/// carry all of them (see [`Customer::validate_for_create`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Assigned by storage on insert. Ignored by `create_new`.
    pub customer_id: i32,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Customer {
    /// Builds a customer that has not been stored yet. The id is a
    /// placeholder until the database assigns one.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        postal_code: impl Into<String>,
        address: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: 0,
            phone: Some(phone.into()),
            postal_code: Some(postal_code.into()),
            address: Some(address.into()),
            country: Some(country.into()),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// "First Last", as shown in listings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Checks that every field required for an insert is present and not blank.
    pub fn validate_for_create(&self) -> Result<(), CoreError> {
        let required = [
            ("first_name", Some(self.first_name.as_str())),
            ("last_name", Some(self.last_name.as_str())),
            ("email", Some(self.email.as_str())),
            ("phone", self.phone.as_deref()),
            ("postal_code", self.postal_code.as_deref()),
            ("address", self.address.as_deref()),
            ("country", self.country.as_deref()),
        ];

        for (field, value) in required {
            match value {
                Some(v) if !v.trim().is_empty() => {}
                Some(_) => {
                    return Err(CoreError::InvalidInput(
                        field.to_string(),
                        "must not be blank".to_string(),
                    ));
                }
                None => {
                    return Err(CoreError::InvalidInput(
                        field.to_string(),
                        "is required for a new customer".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// The customer with the highest summed invoice total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSpender {
    pub customer: Customer,
    pub total_spend: Decimal,
}

/// The genre(s) a customer bought most often.
///
/// Every name in `genres` has exactly `purchase_count` purchases. An empty set
/// with a zero count means the customer has no purchase history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopGenre {
    pub customer_id: i32,
    pub genres: BTreeSet<String>,
    pub purchase_count: i64,
}

impl TopGenre {
    /// The result for a customer who has never bought anything.
    pub fn no_history(customer_id: i32) -> Self {
        Self {
            customer_id,
            genres: BTreeSet::new(),
            purchase_count: 0,
        }
    }

    /// True when more than one genre shares the top count.
    pub fn is_tie(&self) -> bool {
        self.genres.len() > 1
    }

    pub fn has_history(&self) -> bool {
        !self.genres.is_empty()
    }
}

/// The country with the most customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopCountry {
    pub country: String,
    pub customer_count: i64,
}
