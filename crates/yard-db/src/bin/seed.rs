//! # Seed Data Generator
//!
//! Populates the database with sample products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p yard-db --bin seed
//!
//! # Specify database path
//! cargo run -p yard-db --bin seed -- --db ./data/yard.db
//! ```
//!
//! Each product gets a category-appropriate name, dimensions where they make
//! sense, a deterministic pseudo-random price, and a starting stock level.

use std::env;

use tracing_subscriber::EnvFilter;
use yard_db::{Database, DbConfig, NewProduct};

/// Sample catalog: (category, names, dimensioned)
const CATEGORIES: &[(&str, &[&str], bool)] = &[
    (
        "Lumber",
        &[
            "Pine board 1x4",
            "Pine board 2x4",
            "Pine board 2x6",
            "Oak plank 1x6",
            "Oak plank 2x8",
            "Eucalyptus beam 4x4",
            "Eucalyptus beam 6x6",
            "Plywood sheet 9mm",
            "Plywood sheet 15mm",
            "OSB panel 11mm",
            "Tongue and groove board",
            "Fence picket",
            "Decking board",
            "Roof batten",
            "Stud 2x3",
        ],
        true,
    ),
    (
        "Hardware",
        &[
            "Galvanized nails 2in (kg)",
            "Galvanized nails 4in (kg)",
            "Wood screws 40mm (box)",
            "Wood screws 60mm (box)",
            "Angle bracket",
            "Joist hanger",
            "Hinge set",
            "Wood glue 1L",
        ],
        false,
    ),
    (
        "Finishes",
        &[
            "Wood stain 1L walnut",
            "Wood stain 1L teak",
            "Exterior varnish 1L",
            "Wood preservative 5L",
            "Sandpaper 120 (pack)",
        ],
        false,
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./yard_dev.db");

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
                println!("Lumberyard Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./yard_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Lumberyard Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    for (category_idx, (category, names, dimensioned)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            let seed = category_idx * 100 + name_idx;
            let new = generate_product(category, name, *dimensioned, seed);

            if let Err(e) = db.products().register(&new).await {
                eprintln!("Failed to insert {}: {}", new.name, e);
                continue;
            }

            generated += 1;
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    let low = db.reports().low_stock_report().await?;
    println!("  {} products start below their winter threshold", low.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic sample data.
fn generate_product(category: &str, name: &str, dimensioned: bool, seed: usize) -> NewProduct {
    // Price: $4.99 - $84.99 in rough steps
    let price_cents = 499 + ((seed * 731) % 8_000) as i64;

    // Stock: 0 - 40, so some products start inside the alert bands
    let stock = ((seed * 7) % 41) as i64;

    let (length_cm, width_cm, height_cm) = if dimensioned {
        (
            Some(240.0 + (seed % 3) as f64 * 60.0),
            Some(2.0 + (seed % 4) as f64 * 2.0),
            Some(4.0 + (seed % 5) as f64 * 2.0),
        )
    } else {
        (None, None, None)
    };

    NewProduct {
        name: name.to_string(),
        category: category.to_string(),
        price_cents,
        stock,
        special: false,
        length_cm,
        width_cm,
        height_cm,
    }
}
