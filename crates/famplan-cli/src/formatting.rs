use anyhow::anyhow;

use famplan_data::{AdjustmentKind, Member, PlanCost, PriceChange, ReminderBatch};
use famplan_ledger::LedgerError;

macro_rules! next_attr {
    ($old:ident, $new:ident) => {
        if $old != $new {
            format!(" -> {}", $new)
        } else {
            "".to_string()
        }
    };
    ($old:ident, $new:ident, $attr:ident) => {
        if $old.$attr != $new.$attr {
            format!(" -> {}", $new.$attr)
        } else {
            "".to_string()
        }
    };
}

pub trait PrintFormatted {
    fn print_formatted(&self);
}

fn status(member: &Member) -> &'static str {
    if member.paid {
        "Paid"
    } else {
        "Unpaid"
    }
}

impl PrintFormatted for Member {
    fn print_formatted(&self) {
        println!("  - Start Date: {}", self.start_date);
        println!("  - End Date: {}", self.end_date);
        println!("  - Duration: {} months", self.duration);
        println!("  - Cost: ${:.2}", self.cost);
        println!("  - Status: {}", status(self));
    }
}

impl PrintFormatted for (Member, Member) {
    fn print_formatted(&self) {
        let (old, new) = self;
        let status_old = status(old);
        let status_new = status(new);

        println!("{}", old.username);
        println!("  - Start Date: {}", old.start_date);
        let next_end_date = next_attr!(old, new, end_date);
        println!("  - End Date: {}{}", old.end_date, next_end_date);
        let next_duration = next_attr!(old, new, duration);
        println!("  - Duration: {} months{}", old.duration, next_duration);
        let next_cost = if old.cost != new.cost {
            format!(" -> ${:.2}", new.cost)
        } else {
            "".to_string()
        };
        println!("  - Cost: ${:.2}{}", old.cost, next_cost);
        let next_status = next_attr!(status_old, status_new);
        println!("  - Status: {}{}", status_old, next_status);
    }
}

impl PrintFormatted for Vec<Member> {
    fn print_formatted(&self) {
        println!("***Family Plan Members***");
        for member in self {
            println!("{}", member.username);
            member.print_formatted();
        }
    }
}

impl PrintFormatted for PlanCost {
    fn print_formatted(&self) {
        println!(
            "The current monthly cost of the family plan is ${:.2} (since {}).",
            self.monthly_cost, self.effective_date
        );
    }
}

impl PrintFormatted for PriceChange {
    fn print_formatted(&self) {
        if self.adjustments.is_empty() {
            println!("No adjustments are needed for current users.");
        } else {
            println!("**Price Adjustment Summary:**");
            for adj in &self.adjustments {
                match adj.kind() {
                    AdjustmentKind::Owes => println!(
                        "- {} (<@{}>) owes **${:.2}**.",
                        adj.username, adj.user_id, adj.amount
                    ),
                    AdjustmentKind::Refund => println!(
                        "- {} (<@{}>) is owed a refund of **${:.2}**.",
                        adj.username, adj.user_id, -adj.amount
                    ),
                    AdjustmentKind::Unchanged => println!(
                        "- {} (<@{}>) has no adjustment.",
                        adj.username, adj.user_id
                    ),
                }
            }
        }
        println!(
            "The monthly cost of the family plan has been updated to ${:.2}.",
            self.current.monthly_cost
        );
    }
}

/// The renewal notice posted for a batch
pub fn renewal_notice(batch: &ReminderBatch) -> String {
    let mentions = batch
        .members
        .iter()
        .map(|m| m.identity().mention())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{}, your subscriptions are ending on {}. \
        Renew your subscription with `renew <duration>` or cancel with `remove <name>`.",
        mentions, batch.end_date
    )
}

/// Turn a ledger error into the message shown to the user.
pub fn render_error(err: LedgerError, name: &str) -> anyhow::Error {
    match err {
        LedgerError::NotFound => anyhow!("User '{}' is not in the subscription list.", name),
        LedgerError::AlreadyEnrolled => anyhow!("User '{}' is already subscribed.", name),
        LedgerError::AmbiguousName(_) => anyhow!(
            "Multiple users found with the name '{}'. Please specify an id (--id) to clarify.",
            name
        ),
        LedgerError::PlanCostUnset => {
            anyhow!("Monthly cost is not set. Use `set-cost` to define it.")
        }
        LedgerError::InvalidDate(_) => anyhow!("Invalid date format. Please use YYYY-MM-DD."),
        LedgerError::InvalidDuration(d) => {
            anyhow!("Invalid duration {}. Please use a positive number of months.", d)
        }
        LedgerError::InvalidCost(c) => anyhow!("Invalid monthly cost {}.", c),
        err => anyhow!("An error occurred: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_renewal_notice() {
        let end_date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let batch = ReminderBatch {
            end_date,
            members: vec![
                Member {
                    user_id: 1,
                    username: "Eris".to_string(),
                    end_date,
                    ..Default::default()
                },
                Member {
                    user_id: 2,
                    username: "Discordia".to_string(),
                    end_date,
                    ..Default::default()
                },
            ],
        };
        assert_eq!(
            renewal_notice(&batch),
            "<@1>, <@2>, your subscriptions are ending on 2024-03-31. \
            Renew your subscription with `renew <duration>` or cancel with `remove <name>`."
        );
    }

    #[test]
    fn test_render_error() {
        assert_eq!(
            render_error(LedgerError::AlreadyEnrolled, "Eris").to_string(),
            "User 'Eris' is already subscribed."
        );
        assert_eq!(
            render_error(LedgerError::AmbiguousName(2), "Eris").to_string(),
            "Multiple users found with the name 'Eris'. Please specify an id (--id) to clarify."
        );
        assert_eq!(
            render_error(LedgerError::InvalidDate("tomorrow".into()), "").to_string(),
            "Invalid date format. Please use YYYY-MM-DD."
        );
    }
}
