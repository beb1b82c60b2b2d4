//! Analytic queries over customers, invoices and purchased tracks.
//!
//! The SQL here only aggregates. Choosing the winner, and resolving ties,
//! is left to `AnalyticsEngine` so the rules are explicit and do not depend
//! on the row order the database happens to return.

use crate::error::DbError;
use crate::mapper::{country_count_from_row, genre_count_from_row, spend_total_from_row};
use crate::repository::CustomerRepository;
use core_types::{TopCountry, TopGenre, TopSpender};

impl CustomerRepository {
    /// The customer with the highest summed invoice total.
    ///
    /// Equal totals go to the lowest customer id.
    ///
    /// # Errors
    ///
    /// `DbError::NotFound` when no invoices exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_top_spender(&self) -> Result<TopSpender, DbError> {
        let mut conn = self.provider.acquire().await?;

        // Grouping by the primary key lets the other customer columns through.
        let rows = sqlx::query(
            r#"
            SELECT
                c.customer_id, c.phone, c.postal_code, c.address, c.country,
                c.first_name, c.last_name, c.email,
                SUM(i.total) AS total_spend
            FROM customer AS c
            JOIN invoice AS i ON i.customer_id = c.customer_id
            GROUP BY c.customer_id
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DbError::from_sqlx("get_top_spender", e))?;

        let totals = rows
            .iter()
            .map(spend_total_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.engine.top_spender(totals)?)
    }

    /// Every genre tied for the customer's highest purchase count.
    ///
    /// A customer without purchases yields an empty genre set with a count of
    /// zero.
    ///
    /// # Errors
    ///
    /// `DbError::NotFound` when the customer id does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_top_genre(&self, customer_id: i32) -> Result<TopGenre, DbError> {
        // Both statements run on the same connection.
        let mut conn = self.provider.acquire().await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM customer WHERE customer_id = $1)")
                .bind(customer_id)
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| DbError::from_sqlx("get_top_genre", e))?;

        if !exists {
            return Err(DbError::customer_not_found(customer_id));
        }

        let rows = sqlx::query(
            r#"
            SELECT g.name AS genre, COUNT(*) AS purchases
            FROM invoice AS i
            JOIN invoice_line AS il ON il.invoice_id = i.invoice_id
            JOIN track AS t ON t.track_id = il.track_id
            JOIN genre AS g ON g.genre_id = t.genre_id
            WHERE i.customer_id = $1
            GROUP BY g.name
            "#,
        )
        .bind(customer_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DbError::from_sqlx("get_top_genre", e))?;

        let counts = rows
            .iter()
            .map(genre_count_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.engine.top_genre(customer_id, counts))
    }

    /// The country with the most customers.
    ///
    /// Equal counts go to the lexicographically smallest country name.
    /// Customers without a country are not counted.
    ///
    /// # Errors
    ///
    /// `DbError::NotFound` when there are no customers with a country.
    #[tracing::instrument(skip(self))]
    pub async fn get_top_country(&self) -> Result<TopCountry, DbError> {
        let mut conn = self.provider.acquire().await?;

        let rows = sqlx::query(
            r#"
            SELECT country, COUNT(*) AS customers
            FROM customer
            WHERE country IS NOT NULL
            GROUP BY country
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DbError::from_sqlx("get_top_country", e))?;

        let counts = rows
            .iter()
            .map(country_count_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.engine.top_country(counts)?)
    }
}
