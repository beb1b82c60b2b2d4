//! Terminal rendering of query results.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use core_types::{Customer, CustomerPage, TopCountry, TopGenre, TopSpender};

const CUSTOMER_HEADER: [&str; 8] = [
    "ID", "First name", "Last name", "Email", "Phone", "Address", "Postal code", "Country",
];

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn or_dash(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn customer_row(customer: &Customer) -> Vec<String> {
    vec![
        customer.customer_id.to_string(),
        customer.first_name.clone(),
        customer.last_name.clone(),
        customer.email.clone(),
        or_dash(&customer.phone),
        or_dash(&customer.address),
        or_dash(&customer.postal_code),
        or_dash(&customer.country),
    ]
}

pub fn customers(customers: &[Customer]) -> String {
    let mut table = table();
    table.set_header(CUSTOMER_HEADER);
    for customer in customers {
        table.add_row(customer_row(customer));
    }
    format!("{table}\n{} customer(s)", customers.len())
}

pub fn page(page: &CustomerPage) -> String {
    let footer = if page.is_last() {
        "last page".to_string()
    } else {
        format!(
            "next: --offset {} --limit {}",
            page.next_request().offset(),
            page.next_request().limit()
        )
    };
    format!(
        "{}\noffset {} limit {} ({footer})",
        customers(&page.customers),
        page.offset(),
        page.limit()
    )
}

pub fn top_spender(top: &TopSpender) -> String {
    let mut table = table();
    table.set_header(["ID", "Customer", "Country", "Total spend"]);
    table.add_row(vec![
        top.customer.customer_id.to_string(),
        top.customer.full_name(),
        or_dash(&top.customer.country),
        top.total_spend.to_string(),
    ]);
    table.to_string()
}

pub fn top_genre(top: &TopGenre) -> String {
    if !top.has_history() {
        return format!("Customer {} has no purchase history.", top.customer_id);
    }

    let mut table = table();
    table.set_header(["Genre", "Purchases"]);
    for genre in &top.genres {
        table.add_row(vec![genre.clone(), top.purchase_count.to_string()]);
    }

    let note = if top.is_tie() {
        format!("{} genres tied", top.genres.len())
    } else {
        "single favourite".to_string()
    };
    format!("Customer {}: {note}\n{table}", top.customer_id)
}

pub fn top_country(top: &TopCountry) -> String {
    let mut table = table();
    table.set_header(["Country", "Customers"]);
    table.add_row(vec![top.country.clone(), top.customer_count.to_string()]);
    table.to_string()
}
