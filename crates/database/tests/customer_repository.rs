//! Integration tests against a live Chinook database.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p database -- --ignored
//!
//! Every test that inserts rows removes them again before asserting, so the
//! shared dataset is left as it was found.

use configuration::DatabaseSettings;
use core_types::Customer;
use database::mapper::customer_from_row;
use database::{ConnectionProvider, CustomerRepository, DbError};
use std::collections::HashSet;

async fn provider() -> ConnectionProvider {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let settings = DatabaseSettings {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL required"),
        max_connections: 2,
        acquire_timeout_secs: 5,
    };
    ConnectionProvider::connect(&settings)
        .await
        .expect("pool creation failed")
}

async fn repository() -> CustomerRepository {
    CustomerRepository::new(provider().await)
}

fn new_customer(tag: &str) -> Customer {
    Customer::new(
        "Integration",
        format!("Tester-{tag}"),
        format!("integration.{tag}@example.com"),
        "+47 22 44 22 22",
        "0171",
        "Ullevålsveien 14",
        "Norway",
    )
}

#[tokio::test]
#[ignore = "requires database"]
async fn created_customer_reads_back_with_assigned_id() {
    let repo = repository().await;
    let draft = new_customer("roundtrip");

    let created = repo.create_new(&draft).await.expect("insert failed");
    let fetched = repo.get_by_id(created.customer_id).await.expect("lookup failed");
    repo.delete(&created).await.expect("cleanup failed");

    let fetched = fetched.expect("created customer should exist");
    assert_ne!(fetched.customer_id, draft.customer_id);
    assert_eq!(
        Customer {
            customer_id: draft.customer_id,
            ..fetched.clone()
        },
        draft
    );
    assert_eq!(fetched, created);
}

#[tokio::test]
#[ignore = "requires database"]
async fn missing_id_is_none_not_error() {
    let repo = repository().await;
    assert_eq!(repo.get_by_id(i32::MAX).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires database"]
async fn get_by_ids_skips_unknown_ids() {
    let repo = repository().await;

    let customers = repo.get_by_ids(&[3, 1, i32::MAX, 2]).await.unwrap();
    let ids: Vec<i32> = customers.iter().map(|c| c.customer_id).collect();

    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
#[ignore = "requires database"]
async fn get_by_ids_treats_hostile_input_as_values() {
    let repo = repository().await;
    // Ids are bound as an array parameter, so nothing here can alter the query.
    let customers = repo.get_by_ids(&[-1, 0]).await.unwrap();
    assert!(customers.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn get_by_name_is_exact() {
    let repo = repository().await;
    let created = repo.create_new(&new_customer("byname")).await.unwrap();

    let exact = repo.get_by_name("Tester-byname", "Integration").await;
    let partial = repo.get_by_name("Tester-by", "Integration").await;
    let swapped = repo.get_by_name("Integration", "Tester-byname").await;
    repo.delete_by_id(created.customer_id).await.unwrap();

    assert_eq!(exact.unwrap(), vec![created]);
    assert!(partial.unwrap().is_empty());
    assert!(swapped.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn pages_cover_the_table_without_gaps_or_duplicates() {
    let repo = repository().await;
    let all = repo.get_all().await.unwrap();

    let mut seen = Vec::new();
    let mut page = repo.get_page(0, 7).await.unwrap();
    loop {
        assert!(page.len() as i64 <= page.limit());
        seen.extend(page.customers.iter().cloned());
        if page.is_last() {
            break;
        }
        page = repo.get_page_for(page.next_request()).await.unwrap();
    }

    let unique: HashSet<i32> = seen.iter().map(|c| c.customer_id).collect();
    let expected: HashSet<i32> = all.iter().map(|c| c.customer_id).collect();
    assert_eq!(seen.len(), all.len());
    assert_eq!(unique, expected);

    // The same ordering in one page as across many.
    let single = repo.get_page(0, all.len().max(1) as i64).await.unwrap();
    assert_eq!(single.customers, seen);
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_overwrites_fields() {
    let repo = repository().await;
    let mut created = repo.create_new(&new_customer("update")).await.unwrap();

    created.email = "integration.updated@example.com".to_string();
    created.phone = None;
    let updated = repo.update(&created).await;
    let fetched = repo.get_by_id(created.customer_id).await;
    repo.delete(&created).await.unwrap();

    updated.unwrap();
    assert_eq!(fetched.unwrap(), Some(created));
}

#[tokio::test]
#[ignore = "requires database"]
async fn update_of_missing_customer_is_not_found() {
    let repo = repository().await;
    let mut ghost = new_customer("ghost");
    ghost.customer_id = i32::MAX;

    let err = repo.update(&ghost).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "requires database"]
async fn delete_is_idempotent() {
    let repo = repository().await;
    let created = repo.create_new(&new_customer("delete")).await.unwrap();

    assert_eq!(repo.delete_by_id(created.customer_id).await.unwrap(), 1);
    assert_eq!(repo.delete_by_id(created.customer_id).await.unwrap(), 0);
    assert_eq!(repo.delete_by_id(i32::MAX).await.unwrap(), 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn top_spender_has_the_largest_total() {
    let repo = repository().await;
    let top = repo.get_top_spender().await.unwrap();

    // Helena Holý, the largest total in the stock Chinook data.
    assert_eq!(top.customer.customer_id, 6);
    assert_eq!(top.customer.last_name, "Holý");
    assert_eq!(top.total_spend, rust_decimal::Decimal::new(4962, 2));
}

#[tokio::test]
#[ignore = "requires database"]
async fn top_genre_reports_shared_maximum() {
    let repo = repository().await;
    let top = repo.get_top_genre(1).await.unwrap();

    assert_eq!(top.customer_id, 1);
    assert!(!top.genres.is_empty());
    assert!(top.purchase_count > 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn top_genre_without_purchases_is_empty() {
    let repo = repository().await;
    let created = repo.create_new(&new_customer("nohistory")).await.unwrap();

    let top = repo.get_top_genre(created.customer_id).await;
    repo.delete(&created).await.unwrap();

    let top = top.unwrap();
    assert!(top.genres.is_empty());
    assert_eq!(top.purchase_count, 0);
}

#[tokio::test]
#[ignore = "requires database"]
async fn top_genre_for_unknown_customer_is_not_found() {
    let repo = repository().await;
    let err = repo.get_top_genre(i32::MAX).await.unwrap_err();
    assert!(matches!(err, DbError::NotFound { entity: "customer", .. }));
}

#[tokio::test]
#[ignore = "requires database"]
async fn top_country_in_chinook_is_usa() {
    let repo = repository().await;
    let top = repo.get_top_country().await.unwrap();

    assert_eq!(top.country, "USA");
    assert_eq!(top.customer_count, 13);
}

#[tokio::test]
#[ignore = "requires database"]
async fn row_missing_customer_columns_is_a_mapping_error() {
    let provider = provider().await;
    let row = sqlx::query("SELECT 1 AS customer_id")
        .fetch_one(provider.pool())
        .await
        .unwrap();

    let err = customer_from_row(&row).unwrap_err();
    assert!(matches!(err, DbError::Mapping { .. }));
}

#[tokio::test]
#[ignore = "requires database"]
async fn null_first_name_is_a_mapping_error() {
    let provider = provider().await;
    let row = sqlx::query(
        r#"
        SELECT 1 AS customer_id, NULL::text AS phone, NULL::text AS postal_code,
               NULL::text AS address, NULL::text AS country, NULL::text AS first_name,
               'Holý'::text AS last_name, 'hholy@gmail.com'::text AS email
        "#,
    )
    .fetch_one(provider.pool())
    .await
    .unwrap();

    let err = customer_from_row(&row).unwrap_err();
    assert!(matches!(err, DbError::Mapping { .. }));
}
