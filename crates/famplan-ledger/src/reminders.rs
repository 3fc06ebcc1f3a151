use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::{sync::Mutex, time::MissedTickBehavior};

use famplan_data::ReminderBatch;

use crate::{datetime, error::Result, Ledger};

/// Delivers a renewal notice for a batch of members.
#[async_trait]
pub trait Notifier {
    async fn notify(&self, batch: &ReminderBatch) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Number of members that were reminded
    Completed(usize),
    /// Another scan was still running
    Skipped,
}

/// Periodically sends renewal notices for terms about to end.
pub struct ReminderScheduler<N> {
    ledger: Ledger,
    notifier: N,
    running: Mutex<()>,
}

impl<N> ReminderScheduler<N>
where
    N: Notifier + Send + Sync,
{
    pub fn new(ledger: Ledger, notifier: N) -> Self {
        Self {
            ledger,
            notifier,
            running: Mutex::new(()),
        }
    }

    /// Scan for due reminders, notify and mark the members.
    /// A batch that could not be delivered stays unmarked and
    /// shows up again on the next scan of the same day.
    pub async fn run_once(&self, today: NaiveDate) -> Result<ScanOutcome> {
        let Ok(_running) = self.running.try_lock() else {
            tracing::warn!("reminder scan still running, skipping");
            return Ok(ScanOutcome::Skipped);
        };

        let lookahead = self.ledger.config().reminder_lookahead_days;
        let batches = self.ledger.scan_due_reminders(today, lookahead).await?;

        let mut reminded = 0;
        for batch in batches {
            if let Err(err) = self.notifier.notify(&batch).await {
                tracing::warn!(
                    end_date = %batch.end_date,
                    error = %err,
                    "could not deliver renewal notice"
                );
                continue;
            }
            let members = self
                .ledger
                .mark_reminded(batch.end_date, &batch.user_ids())
                .await?;
            reminded += members.len();
        }

        Ok(ScanOutcome::Completed(reminded))
    }

    /// Scan every `every` until the task is dropped.
    /// Failed scans are logged and retried on the next tick.
    pub async fn run(&self, every: Duration) {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            match self.run_once(datetime::today()).await {
                Ok(ScanOutcome::Completed(reminded)) => {
                    tracing::info!(reminded, "reminder scan completed");
                }
                Ok(ScanOutcome::Skipped) => {}
                Err(err) => {
                    tracing::error!(error = %err, "reminder scan failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use anyhow::anyhow;

    use famplan_data::Identity;
    use famplan_db::connection::{self, TestHandle};

    use super::*;
    use crate::LedgerConfig;

    #[derive(Default)]
    struct Recorder {
        batches: StdMutex<Vec<ReminderBatch>>,
    }

    #[async_trait]
    impl Notifier for Recorder {
        async fn notify(&self, batch: &ReminderBatch) -> anyhow::Result<()> {
            self.batches.lock().unwrap().push(batch.clone());
            Ok(())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Notifier for Unreachable {
        async fn notify(&self, _batch: &ReminderBatch) -> anyhow::Result<()> {
            Err(anyhow!("general channel not found"))
        }
    }

    /// Changes the ledger while the notice is out
    struct Meddler {
        ledger: Ledger,
        renew: Option<i64>,
        remove: Option<i64>,
    }

    #[async_trait]
    impl Notifier for Meddler {
        async fn notify(&self, _batch: &ReminderBatch) -> anyhow::Result<()> {
            if let Some(user_id) = self.renew {
                self.ledger.renew(user_id, 1).await?;
            }
            if let Some(user_id) = self.remove {
                self.ledger.remove(user_id).await?;
            }
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Two members ending 2024-03-31, one ending 2024-04-30
    async fn ledger() -> (TestHandle, Ledger) {
        let (handle, db) = connection::open_test().await;
        let ledger = Ledger::new(db, LedgerConfig::default());
        ledger.set_monthly_cost(20.0, date(2024, 1, 1)).await.unwrap();
        for (id, name, months) in [(1, "Eris", 3), (2, "Discordia", 3), (3, "Hung Mung", 4)] {
            ledger
                .enroll(&Identity::new(id, name), date(2024, 1, 1), months)
                .await
                .unwrap();
        }
        (handle, ledger)
    }

    #[tokio::test]
    async fn test_run_once() {
        let (_handle, ledger) = ledger().await;
        let scheduler = ReminderScheduler::new(ledger.clone(), Recorder::default());

        let outcome = scheduler.run_once(date(2024, 3, 17)).await.unwrap();
        assert_eq!(outcome, ScanOutcome::Completed(2));

        let batches = scheduler.notifier.batches.lock().unwrap().clone();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].end_date, date(2024, 3, 31));
        assert_eq!(batches[0].user_ids(), vec![1, 2]);

        let member = ledger.get_self(1).await.unwrap();
        assert!(member.reminded);
        assert!(!member.paid);
        assert!(!ledger.get_self(3).await.unwrap().reminded);

        // Reminded only once
        let outcome = scheduler.run_once(date(2024, 3, 17)).await.unwrap();
        assert_eq!(outcome, ScanOutcome::Completed(0));
        assert_eq!(scheduler.notifier.batches.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_run_once_nothing_due() {
        let (_handle, ledger) = ledger().await;
        let scheduler = ReminderScheduler::new(ledger, Recorder::default());
        let outcome = scheduler.run_once(date(2024, 3, 1)).await.unwrap();
        assert_eq!(outcome, ScanOutcome::Completed(0));
        assert!(scheduler.notifier.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_once_delivery_failed() {
        let (_handle, ledger) = ledger().await;
        let scheduler = ReminderScheduler::new(ledger.clone(), Unreachable);

        let outcome = scheduler.run_once(date(2024, 3, 17)).await.unwrap();
        assert_eq!(outcome, ScanOutcome::Completed(0));

        let member = ledger.get_self(1).await.unwrap();
        assert!(!member.reminded);
        assert!(member.paid);
    }

    #[tokio::test]
    async fn test_run_once_skips_overlapping_scan() {
        let (_handle, ledger) = ledger().await;
        let scheduler = ReminderScheduler::new(ledger.clone(), Recorder::default());

        let running = scheduler.running.try_lock().unwrap();
        let outcome = scheduler.run_once(date(2024, 3, 17)).await.unwrap();
        assert_eq!(outcome, ScanOutcome::Skipped);
        drop(running);

        assert!(!ledger.get_self(1).await.unwrap().reminded);
        let outcome = scheduler.run_once(date(2024, 3, 17)).await.unwrap();
        assert_eq!(outcome, ScanOutcome::Completed(2));
    }

    #[tokio::test]
    async fn test_run_once_renewed_during_notice() {
        let (_handle, ledger) = ledger().await;
        let notifier = Meddler {
            ledger: ledger.clone(),
            renew: Some(1),
            remove: None,
        };
        let scheduler = ReminderScheduler::new(ledger.clone(), notifier);

        let outcome = scheduler.run_once(date(2024, 3, 17)).await.unwrap();
        assert_eq!(outcome, ScanOutcome::Completed(1));

        // The new term still needs its own notice
        let member = ledger.get_self(1).await.unwrap();
        assert_eq!(member.end_date, date(2024, 4, 30));
        assert!(!member.reminded);
        assert!(member.paid);
        assert!(ledger.get_self(2).await.unwrap().reminded);
    }

    #[tokio::test]
    async fn test_run_once_removed_during_notice() {
        let (_handle, ledger) = ledger().await;
        let notifier = Meddler {
            ledger: ledger.clone(),
            renew: None,
            remove: Some(2),
        };
        let scheduler = ReminderScheduler::new(ledger.clone(), notifier);

        let outcome = scheduler.run_once(date(2024, 3, 17)).await.unwrap();
        assert_eq!(outcome, ScanOutcome::Completed(1));

        let member = ledger.get_self(1).await.unwrap();
        assert!(member.reminded);
        assert!(!member.paid);
        assert!(matches!(
            ledger.get_self(2).await,
            Err(crate::LedgerError::NotFound)
        ));

        // No second notice for the same term
        let outcome = scheduler.run_once(date(2024, 3, 17)).await.unwrap();
        assert_eq!(outcome, ScanOutcome::Completed(0));
    }

    #[tokio::test]
    async fn test_run_once_lookahead_from_config() {
        let (handle, db) = connection::open_test().await;
        let ledger = Ledger::new(
            db,
            LedgerConfig {
                reminder_lookahead_days: 7,
                ..Default::default()
            },
        );
        ledger.set_monthly_cost(20.0, date(2024, 1, 1)).await.unwrap();
        ledger
            .enroll(&Identity::new(1, "Eris"), date(2024, 1, 1), 3)
            .await
            .unwrap();

        let scheduler = ReminderScheduler::new(ledger, Recorder::default());
        let outcome = scheduler.run_once(date(2024, 3, 17)).await.unwrap();
        assert_eq!(outcome, ScanOutcome::Completed(0));
        let outcome = scheduler.run_once(date(2024, 3, 24)).await.unwrap();
        assert_eq!(outcome, ScanOutcome::Completed(1));
        drop(handle);
    }
}
