mod commands;
mod config;
mod logging;
mod report;

use clap::{Parser, Subcommand};
use commands::compare::Domains;
use tracing::debug;

use crate::config::{AppConfig, VALID_LOG_LEVELS};
use crate::logging::LoggingConfig;

#[derive(Parser)]
#[command(name = "nplus1")]
#[command(about = "Compare naive, join and batch retrieval of related records")]
#[command(version)]
struct Cli {
    /// Log level for this tool and the ORM (overrides LOG_LEVEL)
    #[arg(long, global = true, value_parser = clap::builder::PossibleValuesParser::new(VALID_LOG_LEVELS))]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Time every retrieval strategy and report the speed-up over N+1
    Compare {
        /// Order window in days
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i32).range(0..))]
        days: i32,

        /// Only compare the order strategies
        #[arg(long, conflicts_with = "employees_only")]
        orders_only: bool,

        /// Only compare the employee strategies
        #[arg(long)]
        employees_only: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a few assembled orders and employees
    Sample {
        /// Number of orders to show
        #[arg(long, default_value_t = 5)]
        orders: usize,

        /// Number of employees to show
        #[arg(long, default_value_t = 5)]
        employees: usize,

        /// Order window in days
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i32).range(0..))]
        days: i32,
    },

    /// Row counts of the demo tables
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e.into());
        }
    }

    let config = AppConfig::from_env()?;

    let mut logging = LoggingConfig::for_environment(config.environment);
    if let Some(level) = cli.log_level.as_deref().or(config.log_level.as_deref()) {
        logging = logging.with_level(level);
    }
    logging::init_logging(&logging)?;
    debug!(environment = %config.environment, "configuration loaded");

    let pool = commands::connect(&config).await?;

    let result = match cli.command {
        Commands::Compare {
            days,
            orders_only,
            employees_only,
            json,
        } => {
            let domains = Domains::from_flags(orders_only, employees_only);
            commands::compare::run(pool.clone(), days, domains, json).await
        }
        Commands::Sample {
            orders,
            employees,
            days,
        } => commands::sample::run(pool.as_ref(), orders, employees, days).await,
        Commands::Stats => commands::stats::run(pool.as_ref()).await,
    };

    commands::close(pool).await;
    result
}
