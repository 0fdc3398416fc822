//! Mesa Application CLI

use std::process;

use clap::{Args, Parser, Subcommand};
use mesa_app::{
    database,
    domain::restaurants::{PgRestaurantsService, RestaurantsService, data::NewRestaurant},
    ids::RestaurantId,
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "mesa-app", about = "Mesa CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Restaurant(RestaurantCommand),
    Db(DbCommand),
}

#[derive(Debug, Args)]
struct RestaurantCommand {
    #[command(subcommand)]
    command: RestaurantSubcommand,
}

#[derive(Debug, Subcommand)]
enum RestaurantSubcommand {
    Create(CreateRestaurantArgs),
}

#[derive(Debug, Args)]
struct CreateRestaurantArgs {
    /// Restaurant display name
    #[arg(long)]
    name: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Optional restaurant UUID; generated when omitted
    #[arg(long)]
    restaurant_uuid: Option<Uuid>,
}

#[derive(Debug, Args)]
struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    Migrate(MigrateArgs),
}

#[derive(Debug, Args)]
struct MigrateArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Restaurant(RestaurantCommand {
            command: RestaurantSubcommand::Create(args),
        }) => create_restaurant(args).await,
        Commands::Db(DbCommand {
            command: DbSubcommand::Migrate(args),
        }) => migrate(args).await,
    }
}

async fn create_restaurant(args: CreateRestaurantArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgRestaurantsService::new(pool);
    let uuid = args
        .restaurant_uuid
        .map_or_else(RestaurantId::new, RestaurantId::from_uuid);

    let restaurant = service
        .create_restaurant(NewRestaurant {
            uuid,
            name: args.name,
        })
        .await
        .map_err(|error| format!("failed to create restaurant: {error}"))?;

    println!("restaurant_uuid: {}", restaurant.uuid);
    println!("restaurant_name: {}", restaurant.name);

    Ok(())
}

async fn migrate(args: MigrateArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::run_migrations(&pool)
        .await
        .map_err(|error| format!("failed to run migrations: {error}"))?;

    println!("migrations applied");

    Ok(())
}
