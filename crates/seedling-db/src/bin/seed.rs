//! # Seed Data Generator
//!
//! Populates the database with nursery catalog data and demo accounts for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed into the default dev database
//! cargo run -p seedling-db --bin seed
//!
//! # Specify database path
//! cargo run -p seedling-db --bin seed -- --db ./data/seedling.db
//!
//! # Also record a few demo sales
//! cargo run -p seedling-db --bin seed -- --with-sales
//! ```
//!
//! ## Generated Data
//! - The nursery catalog (fruit seedlings and vines with realistic prices)
//! - One demo account per role (admin, cashier, customer), password `password`
//! - Optionally a handful of completed sales so dashboards have content

use std::env;

use chrono::Utc;
use uuid::Uuid;

use seedling_core::{password, NewSale, NewSaleItem, Product, Role, User};
use seedling_db::{Database, DbConfig};

/// The nursery catalog: (name, description, price in cents, stock).
const CATALOG: &[(&str, &str, i64, i64)] = &[
    (
        "Premium Apple Seedling",
        "Cold-hardy apple variety grafted on dwarfing rootstock.",
        2500,
        50,
    ),
    (
        "Tropical Mango Seedling",
        "Grafted mango for warm climates; fruits in 3-4 years.",
        3500,
        30,
    ),
    (
        "Hass Avocado Seedling",
        "The classic creamy avocado; needs a frost-free spot.",
        4000,
        25,
    ),
    (
        "Valencia Orange Seedling",
        "Sweet juicing orange, heavy late-season bearer.",
        3000,
        40,
    ),
    (
        "Meyer Lemon Seedling",
        "Compact lemon tree, happy in a large container.",
        2800,
        35,
    ),
    (
        "Red Grape Vine",
        "Seedless table grape, vigorous on a trellis.",
        2200,
        60,
    ),
];

/// Demo accounts: (name, email, role).
const ACCOUNTS: &[(&str, &str, Role)] = &[
    ("Admin User", "admin@fruitseedlings.com", Role::Admin),
    ("Counter Cashier", "cashier@fruitseedlings.com", Role::Cashier),
    ("Demo Customer", "customer@fruitseedlings.com", Role::Customer),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seedling_db=info".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./seedling_dev.db");
    let mut with_sales = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--with-sales" | "-s" => {
                with_sales = true;
            }
            "--help" | "-h" => {
                println!("Seedling POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./seedling_dev.db)");
                println!("  -s, --with-sales   Record a few demo sales too");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Seedling POS Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Refuse to double-seed
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let mut product_ids = Vec::new();
    for (name, description, price_cents, stock) in CATALOG {
        let product = make_product(name, description, *price_cents, *stock);
        db.products().insert(&product).await?;
        println!("  {} - {} (stock {})", product.name, product.price(), stock);
        product_ids.push(product.id);
    }

    println!();
    println!("Seeding accounts (password: \"password\")...");

    let mut user_ids = Vec::new();
    for (name, email, role) in ACCOUNTS {
        let user = make_account(name, email, *role)?;
        db.users().insert(&user).await?;
        println!("  {} <{}> [{}]", user.name, user.email, user.role);
        user_ids.push((user.id, *role));
    }

    if with_sales {
        println!();
        println!("Recording demo sales...");

        let customer_id = &user_ids.iter().find(|(_, r)| *r == Role::Customer).unwrap().0;
        let cashier_id = &user_ids.iter().find(|(_, r)| *r == Role::Cashier).unwrap().0;

        // A few carts of varying shapes
        let carts: &[&[(usize, i64)]] = &[&[(0, 2)], &[(1, 1), (4, 3)], &[(5, 4)]];

        for cart in carts {
            let sale = NewSale {
                customer_id: customer_id.clone(),
                cashier_id: cashier_id.clone(),
                items: cart
                    .iter()
                    .map(|(idx, quantity)| NewSaleItem {
                        product_id: product_ids[*idx].clone(),
                        quantity: *quantity,
                    })
                    .collect(),
                notes: Some("demo sale".to_string()),
            };

            let detail = db.sale_service().create_sale(sale).await?;
            println!(
                "  Sale {} - {} ({} lines)",
                detail.sale.id,
                detail.sale.total_amount(),
                detail.items.len()
            );
        }
    }

    println!();
    println!("Admin dashboard snapshot:");
    let dashboard = db.dashboards().admin_dashboard().await?;
    println!("{}", serde_json::to_string_pretty(&dashboard)?);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a catalog product.
fn make_product(name: &str, description: &str, price_cents: i64, stock_quantity: i64) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        price_cents,
        stock_quantity,
        is_active: true,
        category: "fruit_seedling".to_string(),
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}

/// Builds a demo account with the shared demo password.
fn make_account(name: &str, email: &str, role: Role) -> Result<User, Box<dyn std::error::Error>> {
    let now = Utc::now();
    Ok(User {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        password_hash: password::hash_password("password")?,
        created_at: now,
        updated_at: now,
    })
}
