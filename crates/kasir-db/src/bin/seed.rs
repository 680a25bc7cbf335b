//! # Seed Data Generator
//!
//! Populates the database with categories and products for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./kasir.db (default)
//! cargo run -p kasir-db --bin seed
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```
//!
//! ## Generated Data
//! - Categories: Makanan, Minuman, Dessert, Snack, Lain-lain
//! - A handful of products per category with prices in Rupiah
//!
//! Seeding is skipped when the database already holds products.

use std::env;

use kasir_core::{CategoryInput, ProductInput};
use kasir_db::{Database, DbConfig};

/// Categories with their products: (name, price, stock).
const CATALOG: &[(&str, &str, &[(&str, i64, i64)])] = &[
    (
        "Makanan",
        "Makanan berat",
        &[
            ("Nasi Goreng", 15_000, 40),
            ("Mie Goreng", 14_000, 40),
            ("Nasi Ayam Geprek", 18_000, 30),
            ("Bakso", 12_000, 25),
            ("Soto Ayam", 13_000, 25),
        ],
    ),
    (
        "Minuman",
        "Minuman dingin dan panas",
        &[
            ("Es Teh Manis", 5_000, 100),
            ("Es Jeruk", 6_000, 80),
            ("Kopi Susu", 12_000, 60),
            ("Teh Tarik", 8_000, 60),
            ("Air Mineral", 4_000, 120),
        ],
    ),
    (
        "Dessert",
        "Hidangan penutup",
        &[
            ("Es Campur", 10_000, 30),
            ("Pisang Goreng", 8_000, 30),
            ("Klepon", 7_000, 20),
        ],
    ),
    (
        "Snack",
        "Camilan",
        &[
            ("Keripik Singkong", 6_000, 50),
            ("Tahu Crispy", 7_000, 40),
            ("Cireng", 5_000, 40),
        ],
    ),
    ("Lain-lain", "Lainnya", &[("Kantong Plastik", 1_000, 200)]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kasir.db");

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
                println!("Kasir Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kasir.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kasir Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    for (category_name, description, products) in CATALOG {
        let category = db
            .categories()
            .insert(&CategoryInput {
                name: category_name.to_string(),
                description: Some(description.to_string()),
            })
            .await?;
        println!("  Category #{} {}", category.id, category.name);

        for (name, price, stock) in products.iter() {
            let input = ProductInput {
                category_id: category.id,
                name: name.to_string(),
                price: *price,
                stock: *stock,
            };

            if let Err(e) = db.products().insert(&input).await {
                eprintln!("Failed to insert {}: {}", name, e);
                continue;
            }
            generated += 1;
        }
    }

    println!();
    println!("✓ Generated {} products in {:?}", generated, start.elapsed());

    let drinks = db.products().list(Some("es")).await?;
    println!("  Filter 'es': {} results", drinks.len());

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
