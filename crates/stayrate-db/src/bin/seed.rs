//! # Seed Data Generator
//!
//! Populates the database with the default policies.
//!
//! ## Usage
//! ```bash
//! # Seed ./stayrate.db
//! cargo run -p stayrate-db --bin seed
//!
//! # Specify database path
//! cargo run -p stayrate-db --bin seed -- --db ./data/stayrate.db
//! ```
//!
//! ## Seeded Records
//! - Conventions: Ministère de la Santé (20%), Entreprise partenaire A (15%),
//!   Organisme public B (25%)
//! - One code per convention: SANTE2024, PARTNER15, PUBLIC25
//! - A 10% global margin
//!
//! Each table is only seeded while empty, so the binary can run repeatedly.

use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use stayrate_core::{Convention, DiscountCode, Margin, MarginType, MarginUnit};
use stayrate_db::{Database, DbConfig, DbResult};

/// Default conventions with the code issued to each.
const CONVENTIONS: &[(&str, f64, &str)] = &[
    ("Ministère de la Santé", 20.0, "SANTE2024"),
    ("Entreprise partenaire A", 15.0, "PARTNER15"),
    ("Organisme public B", 25.0, "PUBLIC25"),
];

const GLOBAL_MARGIN_PERCENT: f64 = 10.0;

#[derive(Debug, Parser)]
#[command(name = "seed", about = "stayrate seed data generator")]
struct Args {
    /// Database file path
    #[arg(short, long, env = "STAYRATE_DB_PATH", default_value = "./stayrate.db")]
    db: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args = Args::parse();

    println!("🌱 stayrate Seed Data Generator");
    println!("===============================");
    println!("Database: {}", args.db);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    seed_conventions(&db).await?;
    seed_codes(&db).await?;
    seed_global_margin(&db).await?;

    println!();
    println!("🎉 Seed complete");

    db.close().await;
    Ok(())
}

async fn seed_conventions(db: &Database) -> DbResult<()> {
    let existing = db.conventions().count().await?;
    if existing > 0 {
        println!("ℹ Conventions already present ({existing}), skipping");
        return Ok(());
    }

    for (name, pct, _) in CONVENTIONS {
        db.conventions()
            .insert(&Convention {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                discount_percentage: *pct,
                is_active: true,
                valid_from: None,
                valid_until: None,
                created_at: Utc::now(),
            })
            .await?;
    }

    info!(count = CONVENTIONS.len(), "Seeded conventions");
    println!("✓ Conventions created");
    Ok(())
}

async fn seed_codes(db: &Database) -> DbResult<()> {
    let existing = db.discount_codes().count().await?;
    if existing > 0 {
        println!("ℹ Discount codes already present ({existing}), skipping");
        return Ok(());
    }

    let conventions = db.conventions().list().await?;
    let mut created = 0;

    for (name, _, code) in CONVENTIONS {
        // Conventions renamed by an admin simply get no seeded code.
        let Some(convention) = conventions.iter().find(|c| c.name == *name) else {
            continue;
        };

        db.discount_codes()
            .insert(&DiscountCode {
                id: Uuid::new_v4().to_string(),
                code: code.to_string(),
                convention_id: convention.id.clone(),
                is_active: true,
                valid_from: None,
                valid_until: None,
                created_at: Utc::now(),
            })
            .await?;
        created += 1;
    }

    info!(count = created, "Seeded discount codes");
    println!("✓ {created} discount codes created");
    Ok(())
}

async fn seed_global_margin(db: &Database) -> DbResult<()> {
    if db.margins().find_by_scope(MarginType::Global, None).await?.is_some() {
        println!("ℹ Global margin already present, skipping");
        return Ok(());
    }

    db.margins()
        .save(&Margin {
            id: Uuid::new_v4().to_string(),
            margin_type: MarginType::Global,
            entity_id: None,
            margin_value: GLOBAL_MARGIN_PERCENT,
            margin_unit: MarginUnit::Percentage,
            is_active: true,
            valid_from: None,
            valid_until: None,
            created_at: Utc::now(),
        })
        .await?;

    println!("✓ Global margin {GLOBAL_MARGIN_PERCENT}% created");
    Ok(())
}
