//! # Seed Data Generator
//!
//! Populates a development database with warehouse products.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p warehouse-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p warehouse-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p warehouse-db --bin seed -- --db ./data/warehouse.db
//! ```
//!
//! Products are created through [`WarehouseService`], so names go through
//! the same collision resolver as the API. Roughly a third of the products
//! get an open reservation and a few are left out of stock, so the
//! `InStock` listing has something to filter.

use std::env;

use warehouse_core::{NewProduct, QuantityUpdateRequest};
use warehouse_db::{Database, DbConfig, ProductStore, WarehouseService};

/// Product families and their variants.
const FAMILIES: &[(&str, &[&str])] = &[
    (
        "Pallet",
        &["Euro", "Block", "Half", "Plastic", "Display"],
    ),
    (
        "Carton",
        &["Small", "Medium", "Large", "Double Wall", "Wardrobe"],
    ),
    (
        "Shelf Bracket",
        &["200mm", "300mm", "400mm", "Heavy Duty", "Galvanized"],
    ),
    (
        "Stretch Wrap",
        &["Clear 17um", "Clear 23um", "Black", "Hand Roll", "Machine Roll"],
    ),
    (
        "Hand Truck",
        &["Folding", "Convertible", "Stair Climber", "Appliance", "Drum"],
    ),
    (
        "Storage Bin",
        &["Stackable", "Nestable", "Euro", "Lidded", "Picking"],
    ),
    (
        "Label Roll",
        &["Thermal 100x150", "Thermal 50x25", "Barcode", "Fragile", "Freezer"],
    ),
    (
        "Safety Glove",
        &["Nitrile S", "Nitrile M", "Nitrile L", "Cut Resistant", "Thermal"],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./warehouse_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Warehouse Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./warehouse_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Warehouse Catalog Seed Data Generator");
    println!("========================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
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

    let service = WarehouseService::new(db.products());

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;
    let mut reserved = 0;

    // Cycle through the families; repeats come back as "Name(1)", "Name(2)", ...
    let variants = FAMILIES
        .iter()
        .flat_map(|(family, kinds)| kinds.iter().map(move |kind| format!("{family} {kind}")))
        .cycle();

    for (seed, name) in variants.take(count).enumerate() {
        let in_stock = stock_for(seed);

        let created = service.add_product(NewProduct::new(name.as_str(), in_stock)).await?;
        let Some(product) = created.model else {
            eprintln!("Failed to create {}: {:?}", name, created.reason);
            continue;
        };
        generated += 1;

        if seed % 3 == 0 && in_stock > 0 {
            let amount = (in_stock / 2).max(1);
            let result = service
                .order_item(QuantityUpdateRequest::new(product.id, amount))
                .await?;
            if result.success {
                reserved += 1;
            }
        }

        if generated % 50 == 0 {
            println!("  Generated {} products...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);
    println!("  With open reservations: {}", reserved);

    println!();
    println!("Verifying catalog...");
    let in_stock = service.in_stock_products().await?;
    println!("  In stock: {} of {}", in_stock.len(), db.products().count().await?);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Deterministic stock level (0-100), every seventh product empty.
fn stock_for(seed: usize) -> i64 {
    if seed % 7 == 6 {
        return 0;
    }
    ((seed * 37) % 100 + 1) as i64
}
