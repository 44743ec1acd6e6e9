//! The command line interface for the local budget tracker.

use std::{fs, path::PathBuf, process::exit, time::Duration};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use time::Date;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use localbudget::{
    Error,
    aggregate::{RawRecord, parse_date, summary_report},
    assistant::{DEFAULT_OLLAMA_URL, ModelConfig, OllamaClient, ask},
    db::initialize,
    import::read_csv,
    transaction::{
        Transaction, TransactionFilter, bulk_import, create_transaction, delete_all_transactions,
        delete_transaction, distinct_categories, fetch_transactions, transaction_stats,
        update_transaction,
    },
};

/// Track expenses in a local SQLite file and ask questions about them.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// File path to the SQLite database. Created on first use.
    #[arg(long, default_value = "budget.db")]
    db_path: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a transaction. Negative amounts are expenses.
    Add {
        /// The transaction date, e.g. 2024-01-15 or 01/15/2024.
        date: String,
        /// The signed amount.
        amount: f64,
        /// The category label.
        category: String,
        /// An optional note.
        #[arg(default_value = "")]
        description: String,
    },
    /// List transactions, newest first.
    List {
        /// Keep only this category.
        #[arg(long)]
        category: Option<String>,
        /// Keep only transactions on or after this date.
        #[arg(long)]
        from: Option<String>,
        /// Keep only transactions before this date.
        #[arg(long)]
        to: Option<String>,
        /// Keep only amounts of at least this value.
        #[arg(long)]
        min_amount: Option<f64>,
        /// Keep only amounts below this value.
        #[arg(long)]
        max_amount: Option<f64>,
    },
    /// Replace every field of an existing transaction.
    Update {
        /// The ID of the transaction to update.
        id: i64,
        /// The new date.
        date: String,
        /// The new signed amount.
        amount: f64,
        /// The new category label.
        category: String,
        /// The new note.
        #[arg(default_value = "")]
        description: String,
    },
    /// Delete one transaction by ID.
    Delete {
        /// The ID of the transaction to delete.
        id: i64,
    },
    /// Delete every transaction.
    Clear,
    /// Import transactions from a CSV file.
    Import {
        /// Path to the CSV file.
        file: PathBuf,
    },
    /// List every category in use.
    Categories,
    /// Show store-wide statistics.
    Stats,
    /// Print the full summary report as JSON.
    Report,
    /// Ask the assistant a question about your transactions.
    Ask {
        /// The question to ask.
        question: String,
        /// The model asked first.
        #[arg(long, default_value = "mistral")]
        model: String,
        /// The model asked when the first one fails.
        #[arg(long, default_value = "llama3")]
        fallback_model: String,
        /// Base URL of the Ollama server.
        #[arg(long, env = "OLLAMA_URL", default_value = DEFAULT_OLLAMA_URL)]
        ollama_url: String,
        /// Per-request timeout in seconds.
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
    },
}

fn main() {
    setup_logging();

    if let Err(error) = run(Cli::parse()) {
        eprintln!("Error: {error}");
        exit(1);
    }
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<(), Error> {
    let conn = open_database(&cli.db_path)?;

    match cli.command {
        Command::Add {
            date,
            amount,
            category,
            description,
        } => {
            let date = parse_cli_date(&date)?;
            let transaction = create_transaction(
                Transaction::build(date, amount, &category).description(&description),
                &conn,
            )?;
            println!("Added transaction {}.", transaction.id);
        }
        Command::List {
            category,
            from,
            to,
            min_amount,
            max_amount,
        } => {
            let filter = TransactionFilter {
                category,
                date_from: from.as_deref().map(parse_cli_date).transpose()?,
                date_to: to.as_deref().map(parse_cli_date).transpose()?,
                amount_min: min_amount,
                amount_max: max_amount,
            };

            for transaction in fetch_transactions(&filter, &conn)? {
                println!(
                    "{:>6}  {}  {:>12.2}  {}  {}",
                    transaction.id,
                    transaction.date,
                    transaction.amount,
                    transaction.category,
                    transaction.description
                );
            }
        }
        Command::Update {
            id,
            date,
            amount,
            category,
            description,
        } => {
            let date = parse_cli_date(&date)?;
            let updated = update_transaction(
                id,
                Transaction::build(date, amount, &category).description(&description),
                &conn,
            )?;

            if updated {
                println!("Updated transaction {id}.");
            } else {
                println!("No transaction with ID {id}.");
            }
        }
        Command::Delete { id } => {
            if delete_transaction(id, &conn)? {
                println!("Deleted transaction {id}.");
            } else {
                println!("No transaction with ID {id}.");
            }
        }
        Command::Clear => {
            let deleted = delete_all_transactions(&conn)?;
            println!("Deleted {deleted} transactions.");
        }
        Command::Import { file } => {
            let text = fs::read_to_string(&file)
                .map_err(|error| Error::FileRead(file.display().to_string(), error.to_string()))?;
            let records = read_csv(&text)?;
            let imported = bulk_import(&records, &conn)?;
            println!("Imported {imported} of {} rows.", records.len());
        }
        Command::Categories => {
            for category in distinct_categories(&conn)? {
                println!("{category}");
            }
        }
        Command::Stats => {
            let stats = transaction_stats(&conn)?;

            println!("Transactions:   {}", stats.count);
            println!("Total expenses: {:.2}", stats.total_expense);
            println!("Total income:   {:.2}", stats.total_income);
            println!("Net:            {:.2}", stats.net);
            if let (Some(min), Some(max)) = (stats.date_min, stats.date_max) {
                println!("Date range:     {min} to {max}");
            }
            println!("Categories:     {}", stats.category_count);
        }
        Command::Report => {
            let records = fetch_all_records(&conn)?;
            let report = summary_report(&records);
            let json = serde_json::to_string_pretty(&report)
                .map_err(|error| Error::JsonSerialization(error.to_string()))?;
            println!("{json}");
        }
        Command::Ask {
            question,
            model,
            fallback_model,
            ollama_url,
            timeout_secs,
        } => {
            let client = OllamaClient::new(&ollama_url, Duration::from_secs(timeout_secs))?;
            let models = ModelConfig {
                primary: model,
                fallback: fallback_model,
            };
            let records = fetch_all_records(&conn)?;

            let reply = ask(&client, &models, &question, &records);

            if let Some(model) = &reply.model {
                tracing::info!("answered by model \"{model}\"");
            }
            println!("{}", reply.text);
        }
    }

    Ok(())
}

/// Open the database file and make sure the schema exists.
fn open_database(path: &PathBuf) -> Result<Connection, Error> {
    let conn = Connection::open(path)?;
    initialize(&conn)?;

    Ok(conn)
}

fn fetch_all_records(conn: &Connection) -> Result<Vec<RawRecord>, Error> {
    let transactions = fetch_transactions(&TransactionFilter::default(), conn)?;

    Ok(transactions.iter().map(RawRecord::from).collect())
}

fn parse_cli_date(text: &str) -> Result<Date, Error> {
    parse_date(text, None).map_err(|_| Error::InvalidDate(text.to_owned()))
}
