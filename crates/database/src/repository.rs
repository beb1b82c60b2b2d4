use crate::connection::ConnectionProvider;
use crate::error::DbError;
use crate::mapper::{customer_columns, customer_from_row, customers_from_rows};
use analytics::AnalyticsEngine;
use core_types::{Customer, CustomerPage, PageRequest};

/// The `CustomerRepository` provides a high-level interface to the customer
/// table and the analytic queries built on top of it. It encapsulates all SQL
/// and data access logic.
///
/// The repository holds no state besides the connection provider. Each method
/// checks out its own connection, so a single clone can be shared between
/// tasks.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pub(crate) provider: ConnectionProvider,
    pub(crate) engine: AnalyticsEngine,
}

impl CustomerRepository {
    /// Creates a new `CustomerRepository` over a shared connection provider.
    pub fn new(provider: ConnectionProvider) -> Self {
        Self {
            provider,
            engine: AnalyticsEngine::new(),
        }
    }

    /// Fetches one customer by id. `Ok(None)` means no such customer exists.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, customer_id: i32) -> Result<Option<Customer>, DbError> {
        let mut conn = self.provider.acquire().await?;

        let row = sqlx::query(concat!(
            "SELECT ",
            customer_columns!(),
            " FROM customer WHERE customer_id = $1"
        ))
        .bind(customer_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| DbError::from_sqlx("get_by_id", e))?;

        row.as_ref().map(customer_from_row).transpose()
    }

    /// Re-reads the stored version of `customer`, looked up by its id.
    pub async fn get(&self, customer: &Customer) -> Result<Option<Customer>, DbError> {
        self.get_by_id(customer.customer_id).await
    }

    /// Fetches every customer whose id is in `ids`, ordered by id.
    ///
    /// Ids without a matching row are skipped. An empty `ids` returns an empty
    /// list without touching the database.
    #[tracing::instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<Customer>, DbError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.provider.acquire().await?;

        let rows = sqlx::query(concat!(
            "SELECT ",
            customer_columns!(),
            " FROM customer WHERE customer_id = ANY($1) ORDER BY customer_id"
        ))
        .bind(ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DbError::from_sqlx("get_by_ids", e))?;

        tracing::debug!(found = rows.len(), "Fetched customers by id.");
        customers_from_rows(&rows)
    }

    /// Exact, case-sensitive match on both names.
    #[tracing::instrument(skip(self, last_name, first_name))]
    pub async fn get_by_name(
        &self,
        last_name: &str,
        first_name: &str,
    ) -> Result<Vec<Customer>, DbError> {
        let mut conn = self.provider.acquire().await?;

        let rows = sqlx::query(concat!(
            "SELECT ",
            customer_columns!(),
            " FROM customer WHERE last_name = $1 AND first_name = $2 ORDER BY customer_id"
        ))
        .bind(last_name)
        .bind(first_name)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DbError::from_sqlx("get_by_name", e))?;

        customers_from_rows(&rows)
    }

    /// Fetches every customer, ordered by id.
    #[tracing::instrument(skip(self))]
    pub async fn get_all(&self) -> Result<Vec<Customer>, DbError> {
        let mut conn = self.provider.acquire().await?;

        let rows = sqlx::query(concat!(
            "SELECT ",
            customer_columns!(),
            " FROM customer ORDER BY customer_id"
        ))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DbError::from_sqlx("get_all", e))?;

        customers_from_rows(&rows)
    }

    /// Fetches up to `limit` customers ordered by last name, skipping the
    /// first `offset`.
    ///
    /// Customers sharing a last name are ordered by id so page boundaries stay
    /// stable between calls.
    ///
    /// # Errors
    ///
    /// `DbError::InvalidArgument` for `offset < 0` or `limit <= 0`, checked
    /// before any connection is acquired.
    pub async fn get_page(&self, offset: i64, limit: i64) -> Result<CustomerPage, DbError> {
        let request = PageRequest::new(offset, limit)?;
        self.get_page_for(request).await
    }

    /// Same as [`CustomerRepository::get_page`] for an already validated request,
    /// e.g. the one returned by [`CustomerPage::next_request`].
    #[tracing::instrument(skip(self))]
    pub async fn get_page_for(&self, request: PageRequest) -> Result<CustomerPage, DbError> {
        let mut conn = self.provider.acquire().await?;

        let rows = sqlx::query(concat!(
            "SELECT ",
            customer_columns!(),
            " FROM customer ORDER BY last_name ASC, customer_id ASC OFFSET $1 LIMIT $2"
        ))
        .bind(request.offset())
        .bind(request.limit())
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DbError::from_sqlx("get_page", e))?;

        Ok(CustomerPage::new(customers_from_rows(&rows)?, request))
    }

    /// Inserts a new customer and returns it with the id the database assigned.
    ///
    /// `customer.customer_id` is ignored.
    ///
    /// # Errors
    ///
    /// - `DbError::InvalidArgument` if any field is missing or blank.
    /// - `DbError::Query` if the insert violates a constraint.
    #[tracing::instrument(skip(self, customer))]
    pub async fn create_new(&self, customer: &Customer) -> Result<Customer, DbError> {
        customer.validate_for_create()?;

        let mut conn = self.provider.acquire().await?;

        let row = sqlx::query(concat!(
            r#"
            INSERT INTO customer (first_name, last_name, email, phone, postal_code, address, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING "#,
            customer_columns!()
        ))
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.postal_code)
        .bind(&customer.address)
        .bind(&customer.country)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| DbError::from_sqlx("create_new", e))?;

        let created = customer_from_row(&row)?;
        tracing::info!(customer_id = created.customer_id, "Created customer.");
        Ok(created)
    }

    /// Overwrites every mutable field of the customer with `customer.customer_id`.
    ///
    /// # Errors
    ///
    /// `DbError::NotFound` when no customer has that id.
    #[tracing::instrument(skip(self, customer), fields(customer_id = customer.customer_id))]
    pub async fn update(&self, customer: &Customer) -> Result<(), DbError> {
        let mut conn = self.provider.acquire().await?;

        let result = sqlx::query(
            r#"
            UPDATE customer
            SET first_name = $1, last_name = $2, email = $3, phone = $4,
                postal_code = $5, address = $6, country = $7
            WHERE customer_id = $8
            "#,
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.postal_code)
        .bind(&customer.address)
        .bind(&customer.country)
        .bind(customer.customer_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| DbError::from_sqlx("update", e))?;

        if result.rows_affected() == 0 {
            tracing::warn!("Update matched no customer.");
            return Err(DbError::customer_not_found(customer.customer_id));
        }

        tracing::info!("Updated customer.");
        Ok(())
    }

    /// Deletes the stored row for `customer`. See [`CustomerRepository::delete_by_id`].
    pub async fn delete(&self, customer: &Customer) -> Result<u64, DbError> {
        self.delete_by_id(customer.customer_id).await
    }

    /// Deletes a customer by id and returns the number of rows removed.
    ///
    /// Deleting an id that does not exist is not an error; it removes zero rows.
    #[tracing::instrument(skip(self))]
    pub async fn delete_by_id(&self, customer_id: i32) -> Result<u64, DbError> {
        let mut conn = self.provider.acquire().await?;

        let removed = sqlx::query("DELETE FROM customer WHERE customer_id = $1")
            .bind(customer_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| DbError::from_sqlx("delete_by_id", e))?
            .rows_affected();

        tracing::info!(removed, "Deleted customer.");
        Ok(removed)
    }
}
