use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::forms::gateway::{
    GatewayError, JobApplicationGateway, JobApplicationReceipt, MockJobApplicationGateway,
};
use crate::forms::job_application::controller::JobApplicationForm;
use crate::forms::job_application::domain::{
    ExperiencePatch, JobApplicationInput, JobApplicationRecord, Position,
};
use crate::forms::job_application::service::JobApplicationService;
use crate::forms::session::{SessionId, SessionStore, SessionStoreError};

/// In-memory session store double shared by the job application tests.
#[derive(Clone)]
pub(super) struct MemoryStore {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, JobApplicationForm>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl SessionStore<JobApplicationForm> for MemoryStore {
    fn insert(&self, id: SessionId, state: JobApplicationForm) -> Result<(), SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&id) {
            return Err(SessionStoreError::Conflict);
        }
        guard.insert(id, state);
        Ok(())
    }

    fn update(&self, id: &SessionId, state: JobApplicationForm) -> Result<(), SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if !guard.contains_key(id) {
            return Err(SessionStoreError::NotFound);
        }
        guard.insert(id.clone(), state);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<JobApplicationForm>, SessionStoreError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn remove(&self, id: &SessionId) -> Result<bool, SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}

/// Gateway double resolving every submission with a fixed reference.
pub(super) struct ScriptedGateway {
    pub(super) reference: &'static str,
    pub(super) submissions: Mutex<Vec<JobApplicationRecord>>,
}

impl ScriptedGateway {
    pub(super) fn resolving(reference: &'static str) -> Self {
        Self {
            reference,
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn submissions(&self) -> Vec<JobApplicationRecord> {
        self.submissions
            .lock()
            .expect("submission log mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl JobApplicationGateway for ScriptedGateway {
    async fn submit_job_application(
        &self,
        record: &JobApplicationRecord,
    ) -> Result<JobApplicationReceipt, GatewayError> {
        self.submissions
            .lock()
            .expect("submission log mutex poisoned")
            .push(record.clone());
        Ok(JobApplicationReceipt {
            reference: self.reference.to_string(),
        })
    }
}

/// Gateway double rejecting every submission.
pub(super) struct RejectingGateway;

#[async_trait]
impl JobApplicationGateway for RejectingGateway {
    async fn submit_job_application(
        &self,
        _record: &JobApplicationRecord,
    ) -> Result<JobApplicationReceipt, GatewayError> {
        Err(GatewayError::Rejected("backend said no".to_string()))
    }
}

pub(super) type TestService = JobApplicationService<MemoryStore, MockJobApplicationGateway>;

pub(super) fn build_service() -> (
    Arc<TestService>,
    Arc<MemoryStore>,
    Arc<MockJobApplicationGateway>,
) {
    let store = Arc::new(MemoryStore::default());
    let gateway = Arc::new(MockJobApplicationGateway::new(Duration::ZERO));
    let service = Arc::new(JobApplicationService::new(store.clone(), gateway.clone()));
    (service, store, gateway)
}

/// A form filled with the reference on-site application: one experience
/// entry at a startup, London as the preferred location.
pub(super) fn filled_form() -> JobApplicationForm {
    let mut form = JobApplicationForm::new();
    let entry = form.record().experience[0].key;

    form.set_field(JobApplicationInput::FullName("Alice Engineer".to_string()))
        .expect("edit applies");
    form.set_field(JobApplicationInput::Position(Position::Fullstack))
        .expect("edit applies");
    form.set_field(JobApplicationInput::Skills(vec![
        "React".to_string(),
        "TypeScript".to_string(),
    ]))
    .expect("edit applies");
    form.set_field(JobApplicationInput::Remote(false))
        .expect("edit applies");
    form.set_field(JobApplicationInput::PreferredLocation(Some(
        "London".to_string(),
    )))
    .expect("edit applies");
    form.set_field(JobApplicationInput::Experience {
        key: entry,
        patch: ExperiencePatch::Company("StartUp Inc".to_string()),
    })
    .expect("edit applies");
    form.set_field(JobApplicationInput::Experience {
        key: entry,
        patch: ExperiencePatch::Role("Junior Dev".to_string()),
    })
    .expect("edit applies");
    form.set_field(JobApplicationInput::Experience {
        key: entry,
        patch: ExperiencePatch::StartDate("2020-01-01".to_string()),
    })
    .expect("edit applies");

    form
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
