use std::time::Duration;

use anyhow::Result;
use clap::Args;

use famplan_ledger::{datetime, Ledger, ReminderScheduler, ScanOutcome};

use crate::{formatting::render_error, notifier::StdoutNotifier};

#[derive(Args, Debug)]
pub struct Remind {
    /// Scan as of this day (YYYY-MM-DD), defaults to today
    #[clap(short, long)]
    pub today: Option<String>,
}

impl Remind {
    /// Run a single reminder scan
    pub async fn run(self, ledger: &Ledger) -> Result<()> {
        let today = match &self.today {
            Some(date) => datetime::parse_date(date).map_err(|e| render_error(e, date))?,
            None => datetime::today(),
        };
        let scheduler = ReminderScheduler::new(ledger.clone(), StdoutNotifier);
        match scheduler.run_once(today).await? {
            ScanOutcome::Completed(0) => println!("No renewal notices are due."),
            ScanOutcome::Completed(n) => println!("Sent renewal notices to {} member(s).", n),
            ScanOutcome::Skipped => println!("A reminder scan is already running."),
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct Watch {
    /// Hours between reminder scans
    #[clap(long, default_value_t = 24, value_parser = clap::value_parser!(u64).range(1..))]
    pub every_hours: u64,
}

impl Watch {
    /// Scan for due reminders until interrupted
    pub async fn run(self, ledger: &Ledger) -> Result<()> {
        let scheduler = ReminderScheduler::new(ledger.clone(), StdoutNotifier);
        let every = Duration::from_secs(self.every_hours * 60 * 60);
        tracing::info!(every_hours = self.every_hours, "watching for due renewals");

        tokio::select! {
            _ = scheduler.run(every) => {}
            res = tokio::signal::ctrl_c() => {
                res?;
                tracing::info!("stopped watching");
            }
        }
        Ok(())
    }
}
