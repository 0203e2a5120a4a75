use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Advisory per-employee locks serializing the read-modify-write paths
/// (accrual persist, ledger save) so concurrent runs cannot lose the
/// operator-edited fields.
#[derive(Clone, Default)]
pub struct EmployeeLocks {
    inner: Arc<StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl EmployeeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, employee_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self
                .inner
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            map.entry(employee_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
