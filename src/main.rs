use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use configuration::{init_tracing, load_config};
use core_types::Customer;
use database::{ConnectionProvider, CustomerRepository};
use serde::Serialize;
use std::path::PathBuf;

mod render;

/// The main entry point for the HiTunes customer tool.
#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let _log_guard = init_tracing(&config.logging)?;

    let provider = ConnectionProvider::connect(&config.database)
        .await
        .context("Failed to connect to the database")?;
    let repo = CustomerRepository::new(provider.clone());

    let result = run(&repo, cli.command, cli.json).await;
    provider.close().await;
    result
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Customer records and purchase analytics for the HiTunes music store.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults to ./config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show one customer.
    Get { id: i32 },
    /// List every customer.
    List,
    /// Show the customers with the given ids.
    ByIds {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i32>,
    },
    /// Find customers by exact last and first name.
    ByName { last_name: String, first_name: String },
    /// Show one page of customers ordered by last name.
    Page {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
        #[arg(long, default_value_t = 10, allow_negative_numbers = true)]
        limit: i64,
    },
    /// Show the customer with the highest total spend.
    TopSpender,
    /// Show a customer's most purchased genre(s), including ties.
    TopGenre { customer_id: i32 },
    /// Show the country with the most customers.
    TopCountry,
    /// Add a new customer. Every field is required.
    Create(CreateArgs),
    /// Change fields of an existing customer.
    Update(UpdateArgs),
    /// Remove a customer. Removing an unknown id is not an error.
    Delete { id: i32 },
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    postal_code: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    country: String,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    id: i32,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    postal_code: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    country: Option<String>,
}

impl From<CreateArgs> for Customer {
    fn from(args: CreateArgs) -> Self {
        Customer::new(
            args.first_name,
            args.last_name,
            args.email,
            args.phone,
            args.postal_code,
            args.address,
            args.country,
        )
    }
}

impl UpdateArgs {
    /// Overrides the given fields of `current`, leaving the rest untouched.
    fn apply(self, mut current: Customer) -> Customer {
        if let Some(v) = self.first_name {
            current.first_name = v;
        }
        if let Some(v) = self.last_name {
            current.last_name = v;
        }
        if let Some(v) = self.email {
            current.email = v;
        }
        if self.phone.is_some() {
            current.phone = self.phone;
        }
        if self.postal_code.is_some() {
            current.postal_code = self.postal_code;
        }
        if self.address.is_some() {
            current.address = self.address;
        }
        if self.country.is_some() {
            current.country = self.country;
        }
        current
    }
}

// ==============================================================================
// Command Dispatch
// ==============================================================================

fn emit<T: Serialize>(json: bool, value: &T, table: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", table(value));
    }
    Ok(())
}

async fn run(repo: &CustomerRepository, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Get { id } => match repo.get_by_id(id).await? {
            Some(customer) => emit(json, &vec![customer], |c| render::customers(c)),
            None => anyhow::bail!("No customer with id {id}"),
        },
        Commands::List => emit(json, &repo.get_all().await?, |c| render::customers(c)),
        Commands::ByIds { ids } => {
            emit(json, &repo.get_by_ids(&ids).await?, |c| render::customers(c))
        }
        Commands::ByName {
            last_name,
            first_name,
        } => emit(
            json,
            &repo.get_by_name(&last_name, &first_name).await?,
            |c| render::customers(c),
        ),
        Commands::Page { offset, limit } => {
            emit(json, &repo.get_page(offset, limit).await?, render::page)
        }
        Commands::TopSpender => emit(json, &repo.get_top_spender().await?, render::top_spender),
        Commands::TopGenre { customer_id } => {
            emit(json, &repo.get_top_genre(customer_id).await?, render::top_genre)
        }
        Commands::TopCountry => emit(json, &repo.get_top_country().await?, render::top_country),
        Commands::Create(args) => {
            let created = repo.create_new(&Customer::from(args)).await?;
            emit(json, &vec![created], |c| render::customers(c))
        }
        Commands::Update(args) => {
            let current = repo
                .get_by_id(args.id)
                .await?
                .with_context(|| format!("No customer with id {}", args.id))?;
            let updated = args.apply(current);
            repo.update(&updated).await?;
            emit(json, &vec![updated], |c| render::customers(c))
        }
        Commands::Delete { id } => {
            let removed = repo.delete_by_id(id).await?;
            tracing::info!(customer_id = id, removed, "Delete finished.");
            if !json {
                println!("Removed {removed} customer(s).");
            } else {
                println!("{}", serde_json::json!({ "customer_id": id, "removed": removed }));
            }
            Ok(())
        }
    }
}
