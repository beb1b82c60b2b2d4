use crate::aggregates::{CountryCount, GenreCount, SpendTotal};
use crate::error::AnalyticsError;
use core_types::{TopCountry, TopGenre, TopSpender};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A stateless calculator that ranks aggregate rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks the customer with the highest total spend.
    ///
    /// Equal totals are resolved in favour of the lowest customer id, so the
    /// answer does not depend on the order the rows arrived in.
    ///
    /// # Errors
    ///
    /// `AnalyticsError::NoData` when `totals` is empty (a store without
    /// invoices has no top spender).
    pub fn top_spender(&self, totals: Vec<SpendTotal>) -> Result<TopSpender, AnalyticsError> {
        let candidates = totals.len();

        let winner = totals
            .into_iter()
            .max_by(|a, b| {
                a.total
                    .cmp(&b.total)
                    // Reversed: the smaller id must rank higher.
                    .then_with(|| b.customer.customer_id.cmp(&a.customer.customer_id))
            })
            .ok_or(AnalyticsError::NoData("top spender"))?;

        tracing::debug!(
            candidates,
            customer_id = winner.customer.customer_id,
            total = %winner.total,
            "Ranked top spender."
        );

        Ok(TopSpender {
            customer: winner.customer,
            total_spend: winner.total,
        })
    }

    /// Collects every genre that shares the highest purchase count.
    ///
    /// `counts` holds one row per genre for a single customer. An empty input
    /// is a customer without purchase history, which is a valid result: an
    /// empty genre set with a count of zero.
    pub fn top_genre(&self, customer_id: i32, counts: Vec<GenreCount>) -> TopGenre {
        let Some(max) = counts.iter().map(|c| c.purchases).max() else {
            tracing::debug!(customer_id, "Customer has no purchase history.");
            return TopGenre::no_history(customer_id);
        };

        let genres: BTreeSet<String> = counts
            .into_iter()
            .filter(|c| c.purchases == max)
            .map(|c| c.genre)
            .collect();

        tracing::debug!(
            customer_id,
            purchase_count = max,
            tied = genres.len(),
            "Ranked top genre."
        );

        TopGenre {
            customer_id,
            genres,
            purchase_count: max,
        }
    }

    /// Picks the country with the most customers.
    ///
    /// Equal counts are resolved in favour of the lexicographically smallest
    /// country name.
    ///
    /// # Errors
    ///
    /// `AnalyticsError::NoData` when `counts` is empty.
    pub fn top_country(&self, counts: Vec<CountryCount>) -> Result<TopCountry, AnalyticsError> {
        let winner = counts
            .into_iter()
            .max_by(|a, b| match a.customers.cmp(&b.customers) {
                Ordering::Equal => b.country.cmp(&a.country),
                other => other,
            })
            .ok_or(AnalyticsError::NoData("top country"))?;

        tracing::debug!(
            country = %winner.country,
            customers = winner.customers,
            "Ranked top country."
        );

        Ok(TopCountry {
            country: winner.country,
            customer_count: winner.customers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Customer;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn customer(id: i32, last_name: &str) -> Customer {
        let mut customer = Customer::new(
            "Test",
            last_name,
            format!("{}@example.com", last_name.to_lowercase()),
            "555-0100",
            "00000",
            "1 Main St",
            "USA",
        );
        customer.customer_id = id;
        customer
    }

    fn spend(id: i32, total: Decimal) -> SpendTotal {
        SpendTotal {
            customer: customer(id, &format!("Customer{id}")),
            total,
        }
    }

    fn genre(name: &str, purchases: i64) -> GenreCount {
        GenreCount {
            genre: name.to_string(),
            purchases,
        }
    }

    fn country(name: &str, customers: i64) -> CountryCount {
        CountryCount {
            country: name.to_string(),
            customers,
        }
    }

    #[test]
    fn top_spender_picks_highest_total() {
        let engine = AnalyticsEngine::new();
        let top = engine
            .top_spender(vec![
                spend(1, dec!(39.62)),
                spend(6, dec!(49.62)),
                spend(26, dec!(47.62)),
            ])
            .unwrap();

        assert_eq!(top.customer.customer_id, 6);
        assert_eq!(top.total_spend, dec!(49.62));
    }

    #[test]
    fn top_spender_tie_goes_to_lowest_customer_id() {
        let engine = AnalyticsEngine::new();

        let forward = engine
            .top_spender(vec![spend(3, dec!(10.00)), spend(9, dec!(45.00)), spend(4, dec!(45.00))])
            .unwrap();
        let reversed = engine
            .top_spender(vec![spend(4, dec!(45.00)), spend(9, dec!(45.00)), spend(3, dec!(10.00))])
            .unwrap();

        assert_eq!(forward.customer.customer_id, 4);
        assert_eq!(reversed.customer.customer_id, 4);
    }

    #[test]
    fn top_spender_compares_decimals_by_value_not_scale() {
        let engine = AnalyticsEngine::new();
        let top = engine
            .top_spender(vec![spend(2, dec!(45.0)), spend(8, dec!(45.00))])
            .unwrap();
        assert_eq!(top.customer.customer_id, 2);
    }

    #[test]
    fn top_spender_without_invoices_is_no_data() {
        let engine = AnalyticsEngine::new();
        assert_eq!(
            engine.top_spender(Vec::new()),
            Err(AnalyticsError::NoData("top spender"))
        );
    }

    #[test]
    fn top_genre_returns_every_tied_genre() {
        let engine = AnalyticsEngine::new();
        let top = engine.top_genre(12, vec![genre("Rock", 5), genre("Jazz", 5), genre("Pop", 3)]);

        let expected: BTreeSet<String> = ["Jazz", "Rock"].into_iter().map(String::from).collect();
        assert_eq!(top.customer_id, 12);
        assert_eq!(top.genres, expected);
        assert_eq!(top.purchase_count, 5);
    }

    #[test]
    fn top_genre_single_winner() {
        let engine = AnalyticsEngine::new();
        let top = engine.top_genre(1, vec![genre("Pop", 2), genre("Metal", 9), genre("Blues", 1)]);

        assert_eq!(top.genres.len(), 1);
        assert!(top.genres.contains("Metal"));
        assert_eq!(top.purchase_count, 9);
    }

    #[test]
    fn top_genre_tie_does_not_depend_on_row_order() {
        let engine = AnalyticsEngine::new();
        // A naive "first row after ORDER BY count DESC" would report only Pop here.
        let top = engine.top_genre(3, vec![genre("Pop", 4), genre("Latin", 4)]);
        assert_eq!(top.genres.len(), 2);
        assert!(top.is_tie());
    }

    #[test]
    fn top_genre_without_history_is_empty_with_zero_count() {
        let engine = AnalyticsEngine::new();
        let top = engine.top_genre(42, Vec::new());
        assert_eq!(top, TopGenre::no_history(42));
    }

    #[test]
    fn top_country_picks_most_customers() {
        let engine = AnalyticsEngine::new();
        let top = engine
            .top_country(vec![country("Brazil", 5), country("USA", 13), country("Canada", 8)])
            .unwrap();

        assert_eq!(top.country, "USA");
        assert_eq!(top.customer_count, 13);
    }

    #[test]
    fn top_country_tie_goes_to_smallest_name() {
        let engine = AnalyticsEngine::new();
        let top = engine
            .top_country(vec![country("Germany", 4), country("France", 4), country("Chile", 1)])
            .unwrap();
        assert_eq!(top.country, "France");
    }

    #[test]
    fn top_country_without_customers_is_no_data() {
        let engine = AnalyticsEngine::new();
        assert_eq!(
            engine.top_country(Vec::new()),
            Err(AnalyticsError::NoData("top country"))
        );
    }
}
