// Maintenance Window Service - conflict-checked writes and today's schedule

use crate::application::aggregator::DailySchedule;
use crate::application::conflict::find_conflict_in_slot;
use crate::domain::{
    AdminId, MaintenanceWindow, NewMaintenanceWindow, SlotKey, Weekday, WindowId, WindowSlot,
};
use crate::error::{AppError, Result};
use crate::port::{
    IdProvider, TimeProvider, TransactionalWindowRepository, WindowRepository,
    WindowRepositoryTransaction,
};
use chrono::Datelike;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maintenance Window Store
pub struct MaintenanceWindowService {
    tx_repo: Arc<dyn TransactionalWindowRepository>,
    window_repo: Arc<dyn WindowRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl MaintenanceWindowService {
    pub fn new(
        tx_repo: Arc<dyn TransactionalWindowRepository>,
        window_repo: Arc<dyn WindowRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            tx_repo,
            window_repo,
            id_provider,
            time_provider,
        }
    }

    /// Create a window after checking its slot for overlaps
    ///
    /// # Errors
    /// - `AppError::Validation` if placement or technician is blank
    /// - `AppError::Conflict` naming the overlapping window's times
    pub async fn create(
        &self,
        new_window: NewMaintenanceWindow,
        admin_id: &AdminId,
    ) -> Result<MaintenanceWindow> {
        validate_references(&new_window)?;

        let mut tx = self.tx_repo.begin_transaction().await?;

        let key = new_window.slot_key();
        let conflict =
            lookup_conflict(&mut tx, &key, new_window.start, new_window.end, None).await?;
        if let Some(existing) = conflict {
            tx.rollback().await?;
            return Err(conflict_error(&key, &existing));
        }

        let window = new_window.into_window(
            self.id_provider.generate_id(),
            admin_id.clone(),
            self.time_provider.now_millis(),
        );
        tx.insert(&window).await?;
        tx.commit().await?;

        info!(
            window_id = %window.id,
            placement_id = %window.placement_id,
            technician_id = %window.technician_id,
            weekday = %window.weekday,
            time = %window.time_range(),
            created_by = %window.created_by,
            "Maintenance window created"
        );
        Ok(window)
    }

    /// Replace weekday/start/end/notes of an existing window
    ///
    /// The window's own id is excluded from the overlap check.
    pub async fn update_by_id(
        &self,
        id: &WindowId,
        slot: WindowSlot,
    ) -> Result<MaintenanceWindow> {
        let mut tx = self.tx_repo.begin_transaction().await?;

        let Some(mut window) = tx.find_by_id(id).await? else {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!("Maintenance window {} not found", id)));
        };

        let key = SlotKey {
            placement_id: window.placement_id.clone(),
            technician_id: window.technician_id.clone(),
            weekday: slot.weekday,
        };
        let conflict = lookup_conflict(&mut tx, &key, slot.start, slot.end, Some(id)).await?;
        if let Some(existing) = conflict {
            tx.rollback().await?;
            return Err(conflict_error(&key, &existing));
        }

        window.apply_slot(slot, self.time_provider.now_millis());
        tx.update_slot(&window).await?;
        tx.commit().await?;

        info!(
            window_id = %window.id,
            weekday = %window.weekday,
            time = %window.time_range(),
            "Maintenance window updated"
        );
        Ok(window)
    }

    /// Hard delete; unknown ids are not an error
    pub async fn delete_by_id(&self, id: &WindowId) -> Result<()> {
        let removed = self.window_repo.delete_by_id(id).await?;
        if removed == 0 {
            debug!(window_id = %id, "Delete of unknown maintenance window ignored");
        } else {
            info!(window_id = %id, "Maintenance window deleted");
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: &WindowId) -> Result<Option<MaintenanceWindow>> {
        self.window_repo.find_by_id(id).await
    }

    /// Weekday of the deployment's wall clock
    pub fn today(&self) -> Weekday {
        Weekday::from(self.time_provider.local_now().weekday())
    }

    /// Today's windows joined with asset/technician data, grouped per recipient
    pub async fn find_todays_valid_schedule(&self) -> Result<DailySchedule> {
        let weekday = self.today();
        let entries = self.window_repo.find_schedule_for(weekday).await?;
        debug!(weekday = %weekday, entries = entries.len(), "Fetched today's schedule");
        Ok(DailySchedule::from_entries(weekday, entries))
    }
}

fn validate_references(new_window: &NewMaintenanceWindow) -> Result<()> {
    if new_window.placement_id.trim().is_empty() {
        return Err(AppError::Validation("placement_id cannot be empty".to_string()));
    }
    if new_window.technician_id.trim().is_empty() {
        return Err(AppError::Validation("technician_id cannot be empty".to_string()));
    }
    Ok(())
}

/// Overlapping window in the slot
///
/// `Ok(None)` when the slot is free; `Err` only when the lookup itself failed.
async fn lookup_conflict(
    tx: &mut Box<dyn WindowRepositoryTransaction>,
    key: &SlotKey,
    start: chrono::NaiveTime,
    end: chrono::NaiveTime,
    exclude: Option<&WindowId>,
) -> Result<Option<MaintenanceWindow>> {
    let existing = tx.find_by_slot(key).await?;
    Ok(find_conflict_in_slot(key.weekday, start, end, &existing, exclude).cloned())
}

fn conflict_error(key: &SlotKey, existing: &MaintenanceWindow) -> AppError {
    warn!(
        placement_id = %key.placement_id,
        technician_id = %key.technician_id,
        weekday = %key.weekday,
        existing_window = %existing.id,
        "Maintenance window rejected: overlaps existing window"
    );
    AppError::Conflict(format!(
        "technician already has a maintenance window on {} {} for this placement",
        key.weekday,
        existing.time_range()
    ))
}
