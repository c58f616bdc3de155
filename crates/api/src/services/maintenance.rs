//! Maintenance request service: intake and completion.
//!
//! Every change is a full read-modify-write of the ledger. Cycles inside this
//! process are serialized by `write_lock`; other processes sharing the same
//! workbook are not coordinated with.

use domain::models::{next_request_id, MaintenanceRequest, SubmitRequestForm};
use domain::services::{NewRequestNotice, NotificationResult, RequestNotifier};
use metrics::counter;
use persistence::{StoreError, WorkbookStore};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};
use validator::Validate;

/// Errors that can occur while handling maintenance requests.
#[derive(Debug, Error)]
pub enum MaintenanceError {
    #[error("Invalid request form")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Store task failed: {0}")]
    TaskFailed(String),
}

/// Orchestrates the record store and the technician notifier.
#[derive(Clone)]
pub struct MaintenanceService {
    store: WorkbookStore,
    notifier: Arc<dyn RequestNotifier>,
    write_lock: Arc<Mutex<()>>,
}

impl MaintenanceService {
    pub fn new(store: WorkbookStore, notifier: Arc<dyn RequestNotifier>) -> Self {
        Self {
            store,
            notifier,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &WorkbookStore {
        &self.store
    }

    /// Every request in ledger order.
    pub async fn list(&self) -> Result<Vec<MaintenanceRequest>, MaintenanceError> {
        self.load().await
    }

    /// Registers a new request and notifies the technician.
    ///
    /// The request is persisted before the notification is attempted, and a
    /// failed notification does not fail the call.
    pub async fn create(
        &self,
        form: SubmitRequestForm,
    ) -> Result<MaintenanceRequest, MaintenanceError> {
        form.validate()?;

        let request = {
            let _guard = self.write_lock.lock().await;
            let mut records = self.load().await?;
            let request =
                MaintenanceRequest::open(next_request_id(records.len()), form, shared::dates::today());
            records.push(request.clone());
            self.save(records).await?;
            request
        };

        counter!("maintenance_requests_created_total").increment(1);
        info!(
            id = request.id,
            equipment = %request.equipment,
            created_date = %request.created_date,
            "Maintenance request registered"
        );

        self.notify(&request).await;
        Ok(request)
    }

    /// Marks every request carrying `id` as completed, whatever its status.
    ///
    /// Returns how many requests changed status. An unknown id changes
    /// nothing and is not an error.
    pub async fn complete(&self, id: i64) -> Result<usize, MaintenanceError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let changed = records
            .iter_mut()
            .filter(|r| r.id == id)
            .map(|r| r.complete())
            .filter(|&changed| changed)
            .count();

        self.save(records).await?;

        if changed == 0 {
            debug!(id, "No pending request matched");
        } else {
            counter!("maintenance_requests_completed_total").increment(changed as u64);
            info!(id, changed, "Maintenance request completed");
        }
        Ok(changed)
    }

    async fn notify(&self, request: &MaintenanceRequest) {
        let notice = NewRequestNotice::from(request);
        match self.notifier.notify_new_request(&notice).await {
            NotificationResult::Sent => {
                counter!("notifications_sent_total").increment(1);
                info!(id = request.id, "Technician notified");
            }
            NotificationResult::Skipped => {
                debug!(id = request.id, "Technician notification skipped");
            }
            NotificationResult::Failed(reason) => {
                counter!("notifications_failed_total").increment(1);
                error!(id = request.id, reason = %reason, "Technician notification failed");
            }
        }
    }

    async fn load(&self) -> Result<Vec<MaintenanceRequest>, MaintenanceError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|e| MaintenanceError::TaskFailed(e.to_string()))?
            .map_err(MaintenanceError::from)
    }

    async fn save(&self, records: Vec<MaintenanceRequest>) -> Result<(), MaintenanceError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.save(&records))
            .await
            .map_err(|e| MaintenanceError::TaskFailed(e.to_string()))?
            .map_err(MaintenanceError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::RequestStatus;
    use domain::services::MockRequestNotifier;
    use shared::dates::is_created_date;

    fn form(name: &str, equipment: &str) -> SubmitRequestForm {
        SubmitRequestForm {
            requester_name: name.to_string(),
            requester_email: format!("{}@x.com", name.to_lowercase()),
            equipment: equipment.to_string(),
            description: "Jam".to_string(),
        }
    }

    fn service(notifier: MockRequestNotifier) -> (tempfile::TempDir, MaintenanceService) {
        let dir = tempfile::tempdir().unwrap();
        let store = WorkbookStore::new(dir.path().join("ledger.xlsx"));
        (dir, MaintenanceService::new(store, Arc::new(notifier)))
    }

    #[tokio::test]
    async fn test_create_appends_open_request() {
        let notifier = MockRequestNotifier::new();
        let (_dir, service) = service(notifier.clone());

        let created = service.create(form("Ana", "Printer-1")).await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.status, RequestStatus::Open);
        assert!(is_created_date(&created.created_date));
        assert_eq!(service.list().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_create_increments_count_by_one() {
        let (_dir, service) = service(MockRequestNotifier::new());
        service.create(form("Ana", "Printer-1")).await.unwrap();
        service.create(form("Bia", "Printer-2")).await.unwrap();

        let before = service.list().await.unwrap().len();
        let created = service.create(form("Caio", "Lathe")).await.unwrap();
        let after = service.list().await.unwrap();

        assert_eq!(after.len(), before + 1);
        assert_eq!(created.id, 3);
        assert_eq!(after.last().unwrap().status, RequestStatus::Open);
    }

    #[tokio::test]
    async fn test_create_notifies_with_requester_reply_to() {
        let notifier = MockRequestNotifier::new();
        let (_dir, service) = service(notifier.clone());

        service.create(form("Ana", "Printer-1")).await.unwrap();

        let received = notifier.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].requester_email, "ana@x.com");
        assert_eq!(received[0].equipment, "Printer-1");
    }

    #[tokio::test]
    async fn test_create_survives_notification_failure() {
        let notifier = MockRequestNotifier::failing();
        let (_dir, service) = service(notifier.clone());

        let created = service.create(form("Ana", "Printer-1")).await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(service.list().await.unwrap().len(), 1);
        assert_eq!(notifier.received().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_fields_without_touching_store() {
        let notifier = MockRequestNotifier::new();
        let (_dir, service) = service(notifier.clone());

        let result = service.create(form("Ana", "")).await;

        assert!(matches!(result, Err(MaintenanceError::Invalid(_))));
        assert!(!service.store().path().exists());
        assert!(notifier.received().is_empty());
    }

    #[tokio::test]
    async fn test_create_store_failure_skips_notification() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = MockRequestNotifier::new();
        // A directory cannot be written as a workbook.
        let service =
            MaintenanceService::new(WorkbookStore::new(dir.path()), Arc::new(notifier.clone()));

        let result = service.create(form("Ana", "Printer-1")).await;

        assert!(matches!(result, Err(MaintenanceError::Store(_))));
        assert!(notifier.received().is_empty());
    }

    #[tokio::test]
    async fn test_complete_changes_only_matching_request() {
        let (_dir, service) = service(MockRequestNotifier::new());
        service.create(form("Ana", "Printer-1")).await.unwrap();
        service.create(form("Bia", "Printer-2")).await.unwrap();
        service.create(form("Caio", "Lathe")).await.unwrap();
        let before = service.list().await.unwrap();

        let changed = service.complete(2).await.unwrap();

        assert_eq!(changed, 1);
        let after = service.list().await.unwrap();
        assert_eq!(after[1].status, RequestStatus::Completed);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
    }

    #[tokio::test]
    async fn test_complete_unknown_id_changes_nothing() {
        let (_dir, service) = service(MockRequestNotifier::new());
        service.create(form("Ana", "Printer-1")).await.unwrap();

        assert_eq!(service.complete(42).await.unwrap(), 0);
        assert!(service.list().await.unwrap()[0].is_open());
    }

    #[tokio::test]
    async fn test_complete_twice_reports_no_change() {
        let (_dir, service) = service(MockRequestNotifier::new());
        service.create(form("Ana", "Printer-1")).await.unwrap();

        assert_eq!(service.complete(1).await.unwrap(), 1);
        assert_eq!(service.complete(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_complete_overwrites_hand_edited_status() {
        let (_dir, service) = service(MockRequestNotifier::new());
        let mut pending = MaintenanceRequest::open(1, form("Ana", "A"), "01/01/2026".into());
        pending.status = RequestStatus::Other("Pendente".into());
        service.store().save(&[pending]).unwrap();

        assert_eq!(service.complete(1).await.unwrap(), 1);
        assert_eq!(service.list().await.unwrap()[0].status, RequestStatus::Completed);
    }

    #[tokio::test]
    async fn test_complete_duplicate_ids_completes_all() {
        let (_dir, service) = service(MockRequestNotifier::new());
        let first = MaintenanceRequest::open(1, form("Ana", "A"), "01/01/2026".into());
        let second = MaintenanceRequest::open(1, form("Bia", "B"), "01/01/2026".into());
        let third = MaintenanceRequest::open(2, form("Caio", "C"), "01/01/2026".into());
        service.store().save(&[first, second, third]).unwrap();

        assert_eq!(service.complete(1).await.unwrap(), 2);

        let after = service.list().await.unwrap();
        assert!(after[0].is_completed());
        assert!(after[1].is_completed());
        assert!(after[2].is_open());
    }

    #[tokio::test]
    async fn test_concurrent_creates_in_one_process_keep_every_record() {
        let (_dir, service) = service(MockRequestNotifier::new());

        let handles: Vec<_> = (0..5)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create(form(&format!("User{i}"), "Printer-1"))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let records = service.list().await.unwrap();
        assert_eq!(records.len(), 5);
        let mut ids: Vec<_> = records.iter().map(|r| r.id).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }
}
