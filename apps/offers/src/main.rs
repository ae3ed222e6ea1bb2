//! # offers CLI
//!
//! Command-line front end over the offer and admin services. Every command
//! prints JSON on stdout; logs go to stderr.
//!
//! ## Usage
//! ```bash
//! # Priced offers for a code, filtered
//! offers quote --code SANTE2024 --destination sousse --stars 4,5 --price-max 300
//!
//! # One hotel
//! offers hotel --code SANTE2024 2
//!
//! # Administration
//! offers admin stats
//! offers admin conventions add --name "Organisme public B" --discount 25
//! offers admin codes add --code PUBLIC25 --convention-id <uuid>
//! offers admin margins save --type global --value 10
//! ```

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use stayrate_core::{MarginType, MarginUnit, OfferFilter};
use stayrate_offers::service::{CodeInput, ConventionInput, MarginInput};
use stayrate_offers::{init_tracing, AppConfig, AppContext, StaticCatalog, VisitorSession};

#[derive(Debug, Parser)]
#[command(name = "offers", about = "Convention-discounted hotel offers")]
struct Cli {
    /// Database file path (overrides STAYRATE_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// JSON hotel catalog to price instead of the built-in inventory
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Redeem a code and list priced offers
    Quote {
        #[arg(long)]
        code: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Redeem a code and price one hotel
    Hotel {
        #[arg(long)]
        code: String,

        /// Hotel id
        id: String,
    },

    /// Manage conventions, codes and margins
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// Substring of the hotel name or address
    #[arg(long)]
    destination: Option<String>,

    /// Comma-separated star ratings, e.g. 4,5
    #[arg(long)]
    stars: Option<String>,

    #[arg(long)]
    price_min: Option<f64>,

    #[arg(long)]
    price_max: Option<f64>,
}

impl From<FilterArgs> for OfferFilter {
    fn from(args: FilterArgs) -> Self {
        OfferFilter {
            destination: args.destination,
            stars: args
                .stars
                .as_deref()
                .map(OfferFilter::parse_stars)
                .unwrap_or_default(),
            price_min: args.price_min,
            price_max: args.price_max,
        }
    }
}

#[derive(Debug, Subcommand)]
enum AdminCommand {
    /// Convention, code and active code counts
    Stats,

    #[command(subcommand)]
    Conventions(ConventionCommand),

    #[command(subcommand)]
    Codes(CodeCommand),

    #[command(subcommand)]
    Margins(MarginCommand),
}

#[derive(Debug, Args)]
struct WindowArgs {
    /// First valid day, YYYY-MM-DD
    #[arg(long)]
    valid_from: Option<String>,

    /// Last valid day, YYYY-MM-DD
    #[arg(long)]
    valid_until: Option<String>,
}

#[derive(Debug, Subcommand)]
enum ConventionCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        discount: f64,
        #[command(flatten)]
        window: WindowArgs,
    },
    Edit {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        discount: f64,
        /// Switch the convention off
        #[arg(long)]
        inactive: bool,
        #[command(flatten)]
        window: WindowArgs,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum CodeCommand {
    List,
    Add {
        #[arg(long)]
        code: String,
        #[arg(long)]
        convention_id: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    Edit {
        #[arg(long)]
        id: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        convention_id: String,
        /// Switch the code off
        #[arg(long)]
        inactive: bool,
        #[command(flatten)]
        window: WindowArgs,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
enum MarginCommand {
    List,
    Save {
        #[arg(long = "type", value_parser = parse_margin_type)]
        margin_type: MarginType,
        /// Hotel id or room type (not allowed for global margins)
        #[arg(long)]
        entity_id: Option<String>,
        #[arg(long)]
        value: f64,
        #[arg(long, value_parser = parse_margin_unit, default_value = "percentage")]
        unit: MarginUnit,
        /// Switch the margin off
        #[arg(long)]
        inactive: bool,
        #[command(flatten)]
        window: WindowArgs,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}

fn parse_margin_type(raw: &str) -> Result<MarginType, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_lowercase()))
        .map_err(|_| format!("unknown margin type '{raw}' (global, hotel, room_type)"))
}

fn parse_margin_unit(raw: &str) -> Result<MarginUnit, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_lowercase()))
        .map_err(|_| format!("unknown margin unit '{raw}' (percentage, fixed)"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    let ctx = AppContext::init(&config)
        .await
        .context("failed to open the policy database")?;

    let result = run(&ctx, cli.catalog, cli.command).await;
    ctx.shutdown().await;
    result
}

async fn run(ctx: &AppContext, catalog: Option<PathBuf>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Quote { code, filter } => {
            let offers = ctx.offer_service(load_catalog(catalog)?);
            let mut session = VisitorSession::new();
            offers.redeem(&mut session, &code).await?;
            print_json(&offers.offers(&session, &filter.into()).await?)
        }
        Command::Hotel { code, id } => {
            let offers = ctx.offer_service(load_catalog(catalog)?);
            let mut session = VisitorSession::new();
            offers.redeem(&mut session, &code).await?;
            print_json(&offers.hotel(&session, &id).await?)
        }
        Command::Admin(command) => run_admin(ctx, command).await,
    }
}

fn load_catalog(path: Option<PathBuf>) -> anyhow::Result<StaticCatalog> {
    match path {
        Some(path) => {
            let catalog = StaticCatalog::from_file(&path)
                .with_context(|| format!("failed to load catalog {}", path.display()))?;
            info!(hotels = catalog.len(), path = %path.display(), "Using hotel catalog file");
            if catalog.is_empty() {
                warn!(path = %path.display(), "Hotel catalog file lists no hotels");
            }
            Ok(catalog)
        }
        None => Ok(StaticCatalog::tunisia()),
    }
}

async fn run_admin(ctx: &AppContext, command: AdminCommand) -> anyhow::Result<()> {
    let admin = ctx.admin_service();

    match command {
        AdminCommand::Stats => print_json(&admin.dashboard().await?),

        AdminCommand::Conventions(command) => match command {
            ConventionCommand::List => print_json(&admin.conventions().await?),
            ConventionCommand::Add {
                name,
                discount,
                window,
            } => print_json(
                &admin
                    .add_convention(ConventionInput {
                        name,
                        discount_percentage: discount,
                        is_active: true,
                        valid_from: window.valid_from,
                        valid_until: window.valid_until,
                    })
                    .await?,
            ),
            ConventionCommand::Edit {
                id,
                name,
                discount,
                inactive,
                window,
            } => print_json(
                &admin
                    .edit_convention(
                        &id,
                        ConventionInput {
                            name,
                            discount_percentage: discount,
                            is_active: !inactive,
                            valid_from: window.valid_from,
                            valid_until: window.valid_until,
                        },
                    )
                    .await?,
            ),
            ConventionCommand::Delete { id } => {
                admin.delete_convention(&id).await?;
                print_json(&serde_json::json!({ "deleted": id }))
            }
        },

        AdminCommand::Codes(command) => match command {
            CodeCommand::List => print_json(&admin.codes().await?),
            CodeCommand::Add {
                code,
                convention_id,
                window,
            } => print_json(
                &admin
                    .add_code(CodeInput {
                        code,
                        convention_id,
                        is_active: true,
                        valid_from: window.valid_from,
                        valid_until: window.valid_until,
                    })
                    .await?,
            ),
            CodeCommand::Edit {
                id,
                code,
                convention_id,
                inactive,
                window,
            } => print_json(
                &admin
                    .edit_code(
                        &id,
                        CodeInput {
                            code,
                            convention_id,
                            is_active: !inactive,
                            valid_from: window.valid_from,
                            valid_until: window.valid_until,
                        },
                    )
                    .await?,
            ),
            CodeCommand::Delete { id } => {
                admin.delete_code(&id).await?;
                print_json(&serde_json::json!({ "deleted": id }))
            }
        },

        AdminCommand::Margins(command) => match command {
            MarginCommand::List => print_json(&admin.margins().await?),
            MarginCommand::Save {
                margin_type,
                entity_id,
                value,
                unit,
                inactive,
                window,
            } => print_json(
                &admin
                    .save_margin(MarginInput {
                        margin_type,
                        entity_id,
                        margin_value: value,
                        margin_unit: unit,
                        is_active: !inactive,
                        valid_from: window.valid_from,
                        valid_until: window.valid_until,
                    })
                    .await?,
            ),
            MarginCommand::Delete { id } => {
                admin.delete_margin(&id).await?;
                print_json(&serde_json::json!({ "deleted": id }))
            }
        },
    }
}
