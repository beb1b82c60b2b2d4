//! Offset/limit pagination over the customer table.

use crate::error::CoreError;
use crate::structs::Customer;
use serde::Serialize;

/// A validated offset/limit pair.
///
/// The fields are private so a `PageRequest` can only exist with
/// `offset >= 0` and `limit > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    offset: i64,
    limit: i64,
}

impl PageRequest {
    pub fn new(offset: i64, limit: i64) -> Result<Self, CoreError> {
        if offset < 0 {
            return Err(CoreError::InvalidInput(
                "offset".to_string(),
                format!("must be zero or positive, got {offset}"),
            ));
        }
        if limit <= 0 {
            return Err(CoreError::InvalidInput(
                "limit".to_string(),
                format!("must be positive, got {limit}"),
            ));
        }
        Ok(Self { offset, limit })
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// The request for the page directly after this one.
    pub fn next(&self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            limit: self.limit,
        }
    }
}

/// One page of customers ordered by last name, together with the request
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub request: PageRequest,
}

impl CustomerPage {
    pub fn new(customers: Vec<Customer>, request: PageRequest) -> Self {
        debug_assert!(customers.len() as i64 <= request.limit());
        Self { customers, request }
    }

    pub fn offset(&self) -> i64 {
        self.request.offset()
    }

    pub fn limit(&self) -> i64 {
        self.request.limit()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// A short page means the table ran out of rows.
    pub fn is_last(&self) -> bool {
        (self.customers.len() as i64) < self.request.limit()
    }

    pub fn next_request(&self) -> PageRequest {
        self.request.next()
    }
}
