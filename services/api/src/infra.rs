use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use forms_portal::forms::session::{SessionId, SessionStore, SessionStoreError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// In-memory session store backing both forms while no external store is
/// wired in. Sessions do not survive a restart.
pub(crate) struct InMemorySessionStore<T> {
    sessions: Mutex<HashMap<SessionId, T>>,
}

impl<T> Default for InMemorySessionStore<T> {
    fn default() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone + Send + Sync> SessionStore<T> for InMemorySessionStore<T> {
    fn insert(&self, id: SessionId, state: T) -> Result<(), SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&id) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(id, state);
        Ok(())
    }

    fn update(&self, id: &SessionId, state: T) -> Result<(), SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if !guard.contains_key(id) {
            return Err(SessionStoreError::NotFound);
        }
        guard.insert(id.clone(), state);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<T>, SessionStoreError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<bool, SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}
