//! # Seed Data Loader
//!
//! Populates a SQLite database with the demo catalog for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./kasir_dev.db (default)
//! cargo run -p kasir-db --bin seed
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```
//!
//! ## Seeded Data
//! - Categories: Makanan, Minuman
//! - Indomie Bangladesh, Rp 7.500, stock 20 (Makanan)
//! - Teh Tarik, Rp 3.000, stock 30 (Minuman)

use std::env;

use kasir_core::{CategoryInput, Money, ProductInput};
use kasir_db::{Database, DbConfig};

/// (category name, description, [(product name, price, stock)])
const CATALOG: &[(&str, &str, &[(&str, i64, i64)])] = &[
    (
        "Makanan",
        "Makanan berat dan ringan",
        &[("Indomie Bangladesh", 7500, 20)],
    ),
    (
        "Minuman",
        "Minuman panas dan dingin",
        &[("Teh Tarik", 3000, 30)],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kasir_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kasir POS Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kasir_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Kasir POS Seed Data Loader");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await? + db.categories().count().await?;
    if existing > 0 {
        println!("⚠ Database already has catalog data");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to reseed.");
        return Ok(());
    }

    println!();
    let mut products = 0;
    for (category_name, description, items) in CATALOG {
        let category = db
            .categories()
            .insert(&CategoryInput {
                name: category_name.to_string(),
                description: description.to_string(),
            })
            .await?;
        println!("  + category {} (id {})", category.name, category.id);

        for (name, price, stock) in items.iter() {
            let product = db
                .products()
                .insert(&ProductInput {
                    name: name.to_string(),
                    price: Money::from_units(*price),
                    stock: *stock,
                    category_id: Some(category.id),
                })
                .await?;
            println!("    + {} {} stock {}", product.name, product.price, product.stock);
            products += 1;
        }
    }

    println!();
    println!("✓ Seeded {} categories and {} products", CATALOG.len(), products);

    db.close().await;
    Ok(())
}
