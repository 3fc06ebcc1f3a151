use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use famplan_db::{connection, schema};
use famplan_ledger::{datetime, Ledger, LedgerConfig, LedgerError};

#[derive(Parser, Debug)]
#[clap(name = "famplan-setup")]
struct Cli {
    /// Path of the members database
    #[clap(env = "FAMPLAN_DB", default_value = "members.sqlite3")]
    pub members_db: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the tables and set the initial plan cost
    Init {
        /// Monthly cost of the plan, if none is set yet
        #[clap(long, default_value_t = 20.0)]
        monthly_cost: f64,
        /// First day of the plan cost (YYYY-MM-DD)
        #[clap(long, default_value = "2024-01-01")]
        effective: String,
    },
}

/// Initialize the database
async fn db_init(filename: &str, monthly_cost: f64, effective: &str) -> Result<()> {
    let effective_date = datetime::parse_date(effective)?;

    let conn = connection::open(filename).await?;
    schema::install(&conn).await?;

    let ledger = Ledger::new(conn, LedgerConfig::default());
    match ledger.get_monthly_cost().await {
        Ok(plan) => {
            tracing::info!(
                monthly_cost = plan.monthly_cost,
                effective_date = %plan.effective_date,
                "plan cost already set"
            );
        }
        Err(LedgerError::PlanCostUnset) => {
            ledger.set_monthly_cost(monthly_cost, effective_date).await?;
            tracing::info!(monthly_cost, %effective_date, "initial plan cost set");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Init {
            monthly_cost,
            effective,
        } => db_init(&cli.members_db, monthly_cost, &effective).await?,
    }
    Ok(())
}
