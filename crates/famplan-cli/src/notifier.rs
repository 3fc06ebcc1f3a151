use async_trait::async_trait;

use famplan_data::ReminderBatch;
use famplan_ledger::Notifier;

use crate::formatting::renewal_notice;

/// Posts renewal notices to stdout.
pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn notify(&self, batch: &ReminderBatch) -> anyhow::Result<()> {
        println!("{}", renewal_notice(batch));
        Ok(())
    }
}
