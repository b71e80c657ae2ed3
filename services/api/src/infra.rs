use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;

use energymatch::workflows::intake::{EnergyProfile, ProfileStore, StoreError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Single-slot profile store standing in for device storage: one record
/// under the fixed key, last write wins.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileStore {
    record: Arc<Mutex<Option<String>>>,
}

impl ProfileStore for InMemoryProfileStore {
    fn save(&self, profile: &EnergyProfile) -> Result<(), StoreError> {
        let raw = serde_json::to_string(profile)?;
        let mut guard = self.record.lock().expect("profile store mutex poisoned");
        *guard = Some(raw);
        Ok(())
    }

    fn load(&self) -> Result<Option<EnergyProfile>, StoreError> {
        let guard = self.record.lock().expect("profile store mutex poisoned");
        guard
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(StoreError::from)
    }
}
