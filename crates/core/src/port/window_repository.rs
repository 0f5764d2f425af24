// Maintenance Window Repository Port (Interface)

use crate::domain::{MaintenanceWindow, ScheduleEntry, SlotKey, Weekday, WindowId};
use crate::error::Result;
use async_trait::async_trait;

/// Read/delete access to maintenance windows
#[async_trait]
pub trait WindowRepository: Send + Sync {
    /// Find window by ID
    async fn find_by_id(&self, id: &WindowId) -> Result<Option<MaintenanceWindow>>;

    /// All windows sharing (placement, technician, weekday), creation order
    async fn find_by_slot(&self, key: &SlotKey) -> Result<Vec<MaintenanceWindow>>;

    /// Hard delete (returns rows removed; 0 is not an error)
    async fn delete_by_id(&self, id: &WindowId) -> Result<u64>;

    /// Windows recurring on `weekday`, joined with asset and technician data
    async fn find_schedule_for(&self, weekday: Weekday) -> Result<Vec<ScheduleEntry>>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use crate::port::{Transaction, TransactionalWindowRepository, WindowRepositoryTransaction};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

    /// In-memory window store; one write transaction at a time
    #[derive(Default)]
    pub struct InMemoryWindowRepository {
        windows: Arc<AsyncMutex<Vec<MaintenanceWindow>>>,
        schedule: Mutex<HashMap<Weekday, Vec<ScheduleEntry>>>,
        schedule_unavailable: bool,
    }

    impl InMemoryWindowRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Schedule queries fail with UpstreamUnavailable
        pub fn new_unavailable() -> Self {
            Self {
                schedule_unavailable: true,
                ..Self::default()
            }
        }

        /// Pre-joined entries returned by `find_schedule_for(weekday)`
        pub fn set_schedule(&self, weekday: Weekday, entries: Vec<ScheduleEntry>) {
            self.schedule.lock().unwrap().insert(weekday, entries);
        }

        pub async fn count(&self) -> usize {
            self.windows.lock().await.len()
        }
    }

    #[async_trait]
    impl WindowRepository for InMemoryWindowRepository {
        async fn find_by_id(&self, id: &WindowId) -> Result<Option<MaintenanceWindow>> {
            Ok(self.windows.lock().await.iter().find(|w| &w.id == id).cloned())
        }

        async fn find_by_slot(&self, key: &SlotKey) -> Result<Vec<MaintenanceWindow>> {
            Ok(slot_members(&self.windows.lock().await, key))
        }

        async fn delete_by_id(&self, id: &WindowId) -> Result<u64> {
            let mut windows = self.windows.lock().await;
            let before = windows.len();
            windows.retain(|w| &w.id != id);
            Ok((before - windows.len()) as u64)
        }

        async fn find_schedule_for(&self, weekday: Weekday) -> Result<Vec<ScheduleEntry>> {
            if self.schedule_unavailable {
                return Err(AppError::UpstreamUnavailable(
                    "schedule store offline".to_string(),
                ));
            }
            Ok(self
                .schedule
                .lock()
                .unwrap()
                .get(&weekday)
                .cloned()
                .unwrap_or_default())
        }
    }

    #[async_trait]
    impl TransactionalWindowRepository for InMemoryWindowRepository {
        async fn begin_transaction(&self) -> Result<Box<dyn WindowRepositoryTransaction>> {
            let guard = Arc::clone(&self.windows).lock_owned().await;
            let staged = guard.clone();
            Ok(Box::new(InMemoryTransaction { guard, staged }))
        }
    }

    struct InMemoryTransaction {
        guard: OwnedMutexGuard<Vec<MaintenanceWindow>>,
        staged: Vec<MaintenanceWindow>,
    }

    #[async_trait]
    impl Transaction for InMemoryTransaction {
        async fn commit(self: Box<Self>) -> Result<()> {
            let InMemoryTransaction { mut guard, staged } = *self;
            *guard = staged;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl WindowRepositoryTransaction for InMemoryTransaction {
        async fn find_by_id(&mut self, id: &WindowId) -> Result<Option<MaintenanceWindow>> {
            Ok(self.staged.iter().find(|w| &w.id == id).cloned())
        }

        async fn find_by_slot(&mut self, key: &SlotKey) -> Result<Vec<MaintenanceWindow>> {
            Ok(slot_members(&self.staged, key))
        }

        async fn insert(&mut self, window: &MaintenanceWindow) -> Result<()> {
            self.staged.push(window.clone());
            Ok(())
        }

        async fn update_slot(&mut self, window: &MaintenanceWindow) -> Result<()> {
            match self.staged.iter_mut().find(|w| w.id == window.id) {
                Some(existing) => {
                    *existing = window.clone();
                    Ok(())
                }
                None => Err(AppError::NotFound(format!("Window {} not found", window.id))),
            }
        }
    }

    fn slot_members(windows: &[MaintenanceWindow], key: &SlotKey) -> Vec<MaintenanceWindow> {
        windows
            .iter()
            .filter(|w| &w.slot_key() == key)
            .cloned()
            .collect()
    }
}
