use anyhow::Result;
use tracing_subscriber::EnvFilter;

use famplan_cli::cli::{Cli, Command};
use famplan_db::{connection, schema};
use famplan_ledger::Ledger;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr, stdout is for the rendered output
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::init();

    let conn = connection::open(&cli.members_db).await?;
    schema::install(&conn).await?;
    let ledger = Ledger::new(conn, cli.ledger_config());

    match cli.command {
        Command::Add(cmd) => cmd.run(&ledger).await,
        Command::Remove(cmd) => cmd.run(&ledger).await,
        Command::List(cmd) => cmd.run(&ledger).await,
        Command::Myself(cmd) => cmd.run(&ledger).await,
        Command::SetCost(cmd) => cmd.run(&ledger).await,
        Command::GetCost(cmd) => cmd.run(&ledger).await,
        Command::Renew(cmd) => cmd.run(&ledger).await,
        Command::Remind(cmd) => cmd.run(&ledger).await,
        Command::Watch(cmd) => cmd.run(&ledger).await,
    }?;

    Ok(())
}
