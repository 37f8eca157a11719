#![deny(missing_docs)]
//! Ship registry command-line interface.
//!
//! Lists, counts and edits ships held by a running registry server.

mod client;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use client::{DEFAULT_SERVER_URL, PageQuery, RegistryClient};
use shipregistry_core::{Ship, ShipInput, ShipOrder, ShipQuery, ShipType, epoch_millis};
use std::fmt::Write;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "shipregistry", version, about = "Ship registry CLI")]
struct Cli {
    /// Base URL of the ship registry server.
    #[arg(long, global = true, env = "SHIPREGISTRY_API_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Clone, Debug, Default)]
struct FilterArgs {
    /// Name substring.
    #[arg(long)]
    name: Option<String>,
    /// Planet substring.
    #[arg(long)]
    planet: Option<String>,
    /// Ship type (transport, military or merchant).
    #[arg(long = "type", value_parser = parse_ship_type)]
    ship_type: Option<ShipType>,
    /// Produced at or after this instant (epoch millis or YYYY-MM-DD).
    #[arg(long, value_parser = parse_instant)]
    after: Option<i64>,
    /// Produced strictly before this instant (epoch millis or YYYY-MM-DD).
    #[arg(long, value_parser = parse_instant)]
    before: Option<i64>,
    /// Usage flag.
    #[arg(long)]
    used: Option<bool>,
    #[arg(long)]
    min_speed: Option<f64>,
    #[arg(long)]
    max_speed: Option<f64>,
    #[arg(long)]
    min_crew: Option<i32>,
    #[arg(long)]
    max_crew: Option<i32>,
    #[arg(long)]
    min_rating: Option<f64>,
    #[arg(long)]
    max_rating: Option<f64>,
}

impl From<FilterArgs> for ShipQuery {
    fn from(args: FilterArgs) -> Self {
        ShipQuery {
            name: args.name,
            planet: args.planet,
            ship_type: args.ship_type,
            after: args.after,
            before: args.before,
            is_used: args.used,
            min_speed: args.min_speed,
            max_speed: args.max_speed,
            min_crew_size: args.min_crew,
            max_crew_size: args.max_crew,
            min_rating: args.min_rating,
            max_rating: args.max_rating,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct PageArgs {
    /// Sort key (id, speed, date or rating).
    #[arg(long, value_parser = parse_order)]
    order: Option<ShipOrder>,
    /// Zero-based page index.
    #[arg(long)]
    page: Option<u32>,
    /// Records per page.
    #[arg(long)]
    page_size: Option<u32>,
}

impl From<PageArgs> for PageQuery {
    fn from(args: PageArgs) -> Self {
        PageQuery {
            order: args.order,
            page_number: args.page,
            page_size: args.page_size,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
struct ShipArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    planet: Option<String>,
    /// Ship type (transport, military or merchant).
    #[arg(long = "type", value_parser = parse_ship_type)]
    ship_type: Option<ShipType>,
    /// Production date (epoch millis or YYYY-MM-DD).
    #[arg(long, value_parser = parse_instant)]
    prod_date: Option<i64>,
    #[arg(long)]
    used: Option<bool>,
    #[arg(long)]
    speed: Option<f64>,
    #[arg(long)]
    crew_size: Option<i32>,
}

impl ShipArgs {
    fn into_input(self) -> CliResult<ShipInput> {
        let prod_date = match self.prod_date {
            Some(millis) => Some(
                epoch_millis::to_local(millis)
                    .ok_or_else(|| format!("production date {millis} is out of range"))?,
            ),
            None => None,
        };
        Ok(ShipInput {
            name: self.name,
            planet: self.planet,
            ship_type: self.ship_type,
            prod_date,
            is_used: self.used,
            speed: self.speed,
            crew_size: self.crew_size,
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of ships matching the filters.
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Count ships matching the filters.
    Count {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show one ship.
    Get { id: String },
    /// Register a ship; the server computes its rating.
    Create {
        #[command(flatten)]
        ship: ShipArgs,
    },
    /// Change the given fields of a ship.
    Update {
        id: String,
        #[command(flatten)]
        ship: ShipArgs,
    },
    /// Remove a ship.
    Delete { id: String },
}

fn parse_ship_type(raw: &str) -> Result<ShipType, String> {
    raw.parse()
}

fn parse_order(raw: &str) -> Result<ShipOrder, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "id" => Ok(ShipOrder::Id),
        "speed" => Ok(ShipOrder::Speed),
        "date" => Ok(ShipOrder::Date),
        "rating" => Ok(ShipOrder::Rating),
        other => Err(format!("unknown order {other:?}; expected id, speed, date or rating")),
    }
}

/// Epoch millis as given, or local midnight of a `YYYY-MM-DD` date.
fn parse_instant(raw: &str) -> Result<i64, String> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return Ok(millis);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("expected epoch millis or YYYY-MM-DD, got {raw:?}"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("invalid date {raw:?}"))?;
    Ok(epoch_millis::from_local(&midnight))
}

fn render_ship_line(output: &mut String, ship: &Ship) {
    let _ = writeln!(
        output,
        "{:>4}  {:<20} {:<12} {:<9} {}  used={:<5} speed={:.2} crew={} rating={:.2}",
        ship.id,
        ship.name,
        ship.planet,
        ship.ship_type,
        ship.prod_date.format("%Y-%m-%d"),
        ship.is_used,
        ship.speed,
        ship.crew_size,
        ship.rating
    );
}

fn render_ships(ships: &[Ship], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ships)?),
        OutputFormat::Text if ships.is_empty() => Ok("No ships found.".to_string()),
        OutputFormat::Text => {
            let mut output = String::new();
            for ship in ships {
                render_ship_line(&mut output, ship);
            }
            Ok(output.trim_end().to_string())
        }
    }
}

fn render_ship(ship: &Ship, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(ship)?),
        OutputFormat::Text => {
            let mut output = String::new();
            render_ship_line(&mut output, ship);
            Ok(output.trim_end().to_string())
        }
    }
}

/// Execute a parsed command against the server and render its outcome.
async fn run(cli: Cli) -> CliResult<String> {
    let client = RegistryClient::new(&cli.server_url)?;
    let format = cli.format;
    match cli.command {
        Commands::List { filters, page } => {
            let ships = client
                .list(&ShipQuery::from(filters), &PageQuery::from(page))
                .await?;
            render_ships(&ships, format)
        }
        Commands::Count { filters } => {
            let total = client.count(&ShipQuery::from(filters)).await?;
            Ok(total.to_string())
        }
        Commands::Get { id } => render_ship(&client.get(&id).await?, format),
        Commands::Create { ship } => render_ship(&client.create(&ship.into_input()?).await?, format),
        Commands::Update { id, ship } => {
            render_ship(&client.update(&id, &ship.into_input()?).await?, format)
        }
        Commands::Delete { id } => {
            client.delete(&id).await?;
            Ok(format!("Deleted ship {}.", id.trim()))
        }
    }
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    println!("{}", run(cli).await?);
    Ok(())
}

#[cfg(test)]
fn main() {}
