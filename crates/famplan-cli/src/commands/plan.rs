use anyhow::Result;
use clap::Args;
use inquire::Confirm;

use famplan_ledger::{datetime, Ledger, LedgerError};

use crate::formatting::{render_error, PrintFormatted};

#[derive(Args, Debug)]
pub struct SetCost {
    /// New monthly cost of the plan
    #[clap(allow_negative_numbers = true)]
    pub cost: f64,
    /// First day of the new price (YYYY-MM-DD),
    /// defaults to the beginning of this month
    #[clap(short, long)]
    pub effective: Option<String>,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl SetCost {
    /// Run the command and change the plan cost
    pub async fn run(self, ledger: &Ledger) -> Result<()> {
        let effective_date = match &self.effective {
            Some(date) => datetime::parse_date(date).map_err(|e| render_error(e, date))?,
            None => datetime::first_of_month(datetime::today()),
        };

        if !self.yes {
            let message = format!(
                "Change the monthly cost to ${:.2} from {} on?",
                self.cost, effective_date
            );
            let confirm = Confirm::new(&message).with_default(true);
            if !confirm.prompt()? {
                return Ok(());
            }
        }

        let change = ledger
            .set_monthly_cost(self.cost, effective_date)
            .await
            .map_err(|e| render_error(e, ""))?;
        change.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct GetCost {}

impl GetCost {
    pub async fn run(self, ledger: &Ledger) -> Result<()> {
        match ledger.get_monthly_cost().await {
            Ok(plan) => plan.print_formatted(),
            Err(LedgerError::PlanCostUnset) => {
                println!("The monthly cost has not been set.");
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }
}
