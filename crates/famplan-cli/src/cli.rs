use clap::{Parser, Subcommand};

use famplan_ledger::{
    ledger::{DEFAULT_DIVISOR, DEFAULT_LOOKAHEAD_DAYS},
    LedgerConfig,
};

use crate::commands::{
    AddMember, GetCost, ListMembers, Remind, RemoveMember, RenewMember, SetCost, ShowMember,
    Watch,
};

#[derive(Parser, Debug)]
#[clap(name = "famplan", version=env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[clap(long, env = "FAMPLAN_DB", default_value = "members.sqlite3")]
    pub members_db: String,

    /// Number of members sharing the plan price
    #[clap(
        long,
        env = "FAMPLAN_DIVISOR",
        default_value_t = DEFAULT_DIVISOR,
        value_parser = clap::value_parser!(u32).range(1..),
    )]
    pub divisor: u32,

    /// Days before the end of a term to send the renewal notice
    #[clap(long, env = "FAMPLAN_LOOKAHEAD_DAYS", default_value_t = DEFAULT_LOOKAHEAD_DAYS)]
    pub lookahead_days: u32,

    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }

    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            divisor: self.divisor,
            reminder_lookahead_days: self.lookahead_days,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a member to the plan
    #[clap(name = "add")]
    Add(AddMember),
    /// Remove a member from the plan
    #[clap(name = "remove")]
    Remove(RemoveMember),
    /// List all members
    #[clap(name = "list")]
    List(ListMembers),
    /// Show your own subscription
    #[clap(name = "myself")]
    Myself(ShowMember),
    /// Change the monthly cost of the plan
    #[clap(name = "set-cost")]
    SetCost(SetCost),
    /// Show the monthly cost of the plan
    #[clap(name = "get-cost")]
    GetCost(GetCost),
    /// Renew a subscription
    #[clap(name = "renew")]
    Renew(RenewMember),
    /// Send due renewal notices once
    #[clap(name = "remind")]
    Remind(Remind),
    /// Send renewal notices periodically
    #[clap(name = "watch")]
    Watch(Watch),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["famplan", "list"]).unwrap();
        assert_eq!(cli.members_db, "members.sqlite3");
        let config = cli.ledger_config();
        assert_eq!(config.divisor, 6);
        assert_eq!(config.reminder_lookahead_days, 14);
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "famplan", "--divisor", "4", "add", "Eris", "2024-01-01", "3", "--id", "23",
        ])
        .unwrap();
        assert_eq!(cli.divisor, 4);
        match cli.command {
            Command::Add(cmd) => {
                assert_eq!(cmd.name, "Eris");
                assert_eq!(cmd.start_date, "2024-01-01");
                assert_eq!(cmd.duration, 3);
                assert_eq!(cmd.id, Some(23));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_zero_divisor() {
        assert!(Cli::try_parse_from(["famplan", "--divisor", "0", "list"]).is_err());
    }
}
