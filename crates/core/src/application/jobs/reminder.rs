//! Reminder Job - daily digest fan-out
//!
//! Idle -> Fetching -> Formatting -> Sending -> Idle. A failed fetch ends the
//! run without sending anything; a failed send only skips that recipient.
//! Nothing records that a day was already sent, so re-running resends.

use crate::application::message::{format_broadcast, format_personal};
use crate::application::trigger::ScheduledJob;
use crate::application::window_service::MaintenanceWindowService;
use crate::port::{ContactProvider, Notifier};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Delivery counts for one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOut {
    pub sent: usize,
    pub failed: usize,
}

/// How a reminder run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderOutcome {
    ScheduleUnavailable,
    ContactsUnavailable,
    NoScheduleToday,
    Delivered { broadcast: FanOut, personal: FanOut },
}

pub struct ReminderJob {
    windows: Arc<MaintenanceWindowService>,
    contacts: Arc<dyn ContactProvider>,
    notifier: Arc<dyn Notifier>,
    concurrency: usize,
}

impl ReminderJob {
    /// `concurrency` bounds in-flight sends (minimum 1)
    pub fn new(
        windows: Arc<MaintenanceWindowService>,
        contacts: Arc<dyn ContactProvider>,
        notifier: Arc<dyn Notifier>,
        concurrency: usize,
    ) -> Self {
        Self {
            windows,
            contacts,
            notifier,
            concurrency: concurrency.max(1),
        }
    }

    pub async fn run_once(&self) -> ReminderOutcome {
        debug!(phase = "fetching", "Reminder run started");

        let schedule = match self.windows.find_todays_valid_schedule().await {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "Reminder aborted: could not fetch today's schedule");
                return ReminderOutcome::ScheduleUnavailable;
            }
        };

        let admins = match self.contacts.list_admins().await {
            Ok(a) => a,
            Err(e) => {
                error!(error = %e, "Reminder aborted: could not fetch admin contacts");
                return ReminderOutcome::ContactsUnavailable;
            }
        };

        if schedule.is_empty() {
            info!(weekday = %schedule.weekday, "No schedule today");
            return ReminderOutcome::NoScheduleToday;
        }

        debug!(phase = "formatting", entries = schedule.broadcast.len(), "Formatting digests");
        let broadcast_text: Arc<str> =
            Arc::from(format_broadcast(schedule.weekday, &schedule.broadcast));

        let admin_deliveries: Vec<(String, Arc<str>)> = admins
            .iter()
            .filter_map(|admin| {
                let target = admin.notification_target();
                if target.is_none() {
                    debug!(admin = %admin.display_name, "Admin has no verified chat id, skipped");
                }
                target.map(|id| (id.to_string(), Arc::clone(&broadcast_text)))
            })
            .collect();

        let personal_deliveries: Vec<(String, Arc<str>)> = schedule
            .personal
            .iter()
            .map(|(chat_id, entries)| {
                let text = format_personal(schedule.weekday, entries);
                (chat_id.clone(), Arc::from(text))
            })
            .collect();

        debug!(
            phase = "sending",
            admins = admin_deliveries.len(),
            technicians = personal_deliveries.len(),
            "Sending digests"
        );
        let broadcast = self.fan_out("broadcast", admin_deliveries).await;
        let personal = self.fan_out("personal", personal_deliveries).await;

        info!(
            weekday = %schedule.weekday,
            entries = schedule.broadcast.len(),
            broadcast_sent = broadcast.sent,
            broadcast_failed = broadcast.failed,
            personal_sent = personal.sent,
            personal_failed = personal.failed,
            "Reminder run completed"
        );
        ReminderOutcome::Delivered {
            broadcast,
            personal,
        }
    }

    /// Send every delivery independently; a failure never stops the others
    async fn fan_out(&self, kind: &'static str, deliveries: Vec<(String, Arc<str>)>) -> FanOut {
        let notifier = &self.notifier;

        let results: Vec<bool> = stream::iter(deliveries)
            .map(|(chat_id, text)| async move {
                match notifier.send(&chat_id, &text).await {
                    Ok(()) => {
                        debug!(kind, recipient = %chat_id, "Reminder delivered");
                        true
                    }
                    Err(e) => {
                        warn!(kind, recipient = %chat_id, error = %e, "Reminder delivery failed");
                        false
                    }
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let sent = results.iter().filter(|ok| **ok).count();
        FanOut {
            sent,
            failed: results.len() - sent,
        }
    }
}

#[async_trait]
impl ScheduledJob for ReminderJob {
    fn name(&self) -> &str {
        "reminder"
    }

    async fn run(&self) {
        self.run_once().await;
    }
}
