use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use ledger_rs::{
    initialize_db,
    transaction::{TransactionFields, TransactionType, create_transaction},
};

/// A utility for creating a test database for the ledger REST API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The user to create the demo transactions for.
    #[arg(long, short, default_value = "demo")]
    user_id: String,
}

const DEMO_TRANSACTIONS: [(&str, f64, TransactionType, Option<&str>); 6] = [
    ("Salary", 4200.0, TransactionType::Income, Some("Monthly pay")),
    ("Rent", 1650.0, TransactionType::Expense, None),
    ("Groceries", 212.35, TransactionType::Expense, Some("Weekly shop")),
    ("Electricity", 98.4, TransactionType::Expense, None),
    ("Freelance", 650.0, TransactionType::Income, Some("Website fix")),
    ("Coffee", 4.5, TransactionType::Expense, None),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating transactions for user {:?}...", args.user_id);

    let now = OffsetDateTime::now_utc();

    for (index, (name, amount, kind, description)) in DEMO_TRANSACTIONS.into_iter().enumerate() {
        let days_ago = (DEMO_TRANSACTIONS.len() - index) as i64;
        let mut fields = TransactionFields::new(&args.user_id, name, amount, kind);
        if let Some(description) = description {
            fields = fields.description(description);
        }

        let new_transaction = fields
            .validate()?
            .created_at(now - Duration::days(days_ago));
        create_transaction(new_transaction, &conn)?;
    }

    println!("Success!");

    Ok(())
}
