use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::controller::{JobApplicationForm, SubmissionStatus, UnknownEntryKey};
use super::domain::{EntryKey, JobApplicationInput, Position};
use crate::forms::gateway::{JobApplicationGateway, JobApplicationReceipt};
use crate::forms::session::{SessionId, SessionStore, SessionStoreError};
use crate::forms::SubmitOutcome;

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("job-sess-{id:06}"))
}

/// Service facade over job application sessions.
pub struct JobApplicationService<S, G> {
    sessions: Arc<S>,
    gateway: Arc<G>,
}

/// Error raised by the job application service.
#[derive(Debug, thiserror::Error)]
pub enum JobApplicationServiceError {
    #[error("a submission is already in flight for this session")]
    SubmissionInFlight,
    #[error(transparent)]
    Store(#[from] SessionStoreError),
    #[error(transparent)]
    UnknownEntry(#[from] UnknownEntryKey),
}

impl<S, G> JobApplicationService<S, G>
where
    S: SessionStore<JobApplicationForm> + 'static,
    G: JobApplicationGateway + 'static,
{
    pub fn new(sessions: Arc<S>, gateway: Arc<G>) -> Self {
        Self { sessions, gateway }
    }

    pub fn create(&self) -> Result<JobApplicationView, JobApplicationServiceError> {
        let session_id = next_session_id();
        let form = JobApplicationForm::new();
        self.sessions.insert(session_id.clone(), form.clone())?;
        info!(%session_id, "job application session opened");
        Ok(JobApplicationView::for_session(session_id, &form))
    }

    pub fn view(
        &self,
        session_id: &SessionId,
    ) -> Result<JobApplicationView, JobApplicationServiceError> {
        let form = self.load(session_id)?;
        Ok(JobApplicationView::for_session(session_id.clone(), &form))
    }

    pub fn set_field(
        &self,
        session_id: &SessionId,
        input: JobApplicationInput,
    ) -> Result<JobApplicationView, JobApplicationServiceError> {
        let mut form = self.load(session_id)?;
        form.set_field(input)?;
        self.sessions.update(session_id, form.clone())?;
        Ok(JobApplicationView::for_session(session_id.clone(), &form))
    }

    pub fn append_experience(
        &self,
        session_id: &SessionId,
    ) -> Result<JobApplicationView, JobApplicationServiceError> {
        let mut form = self.load(session_id)?;
        form.append_experience();
        self.sessions.update(session_id, form.clone())?;
        Ok(JobApplicationView::for_session(session_id.clone(), &form))
    }

    pub fn remove_experience(
        &self,
        session_id: &SessionId,
        key: EntryKey,
    ) -> Result<JobApplicationView, JobApplicationServiceError> {
        let mut form = self.load(session_id)?;
        if !form.remove_experience(key) {
            return Err(UnknownEntryKey(key).into());
        }
        self.sessions.update(session_id, form.clone())?;
        Ok(JobApplicationView::for_session(session_id.clone(), &form))
    }

    /// Run the submit. The in-flight guard is published to the store
    /// before awaiting the gateway so overlapping submits are refused.
    pub async fn submit(
        &self,
        session_id: &SessionId,
    ) -> Result<(SubmitOutcome<JobApplicationReceipt>, JobApplicationView), JobApplicationServiceError>
    {
        let mut form = self.load(session_id)?;
        if form.is_submitting() {
            return Err(JobApplicationServiceError::SubmissionInFlight);
        }

        let mut guarded = form.clone();
        guarded.set_submitting(true);
        self.sessions.update(session_id, guarded)?;

        let outcome = form.submit(self.gateway.as_ref()).await;
        self.sessions.update(session_id, form.clone())?;

        if let SubmitOutcome::Success(receipt) = &outcome {
            info!(%session_id, reference = %receipt.reference, "job application accepted");
        }
        Ok((
            outcome,
            JobApplicationView::for_session(session_id.clone(), &form),
        ))
    }

    pub fn discard(&self, session_id: &SessionId) -> Result<(), JobApplicationServiceError> {
        if self.sessions.remove(session_id)? {
            Ok(())
        } else {
            Err(SessionStoreError::NotFound.into())
        }
    }

    fn load(&self, session_id: &SessionId) -> Result<JobApplicationForm, JobApplicationServiceError> {
        let form = self
            .sessions
            .fetch(session_id)?
            .ok_or(SessionStoreError::NotFound)?;
        Ok(form)
    }
}

/// Snapshot of a job application session for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationView {
    pub session_id: SessionId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub submitting: bool,
    pub errors: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_error: Option<String>,
    pub record: JobApplicationRecordView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationRecordView {
    pub full_name: String,
    pub position: Position,
    pub skills: Vec<String>,
    pub remote: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_location: Option<String>,
    pub experience: Vec<ExperienceEntryView>,
}

/// Experience row including its stable key, so clients can address edits
/// and removals without relying on positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntryView {
    pub key: EntryKey,
    pub company: String,
    pub role: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub current: bool,
}

impl JobApplicationView {
    pub fn for_session(session_id: SessionId, form: &JobApplicationForm) -> Self {
        let record = form.record();

        let errors = form
            .errors()
            .iter()
            .filter_map(|(field, message)| {
                field
                    .render_path(record)
                    .map(|path| (path, message.clone()))
            })
            .collect();

        let (reference, submit_error) = match form.status() {
            SubmissionStatus::Idle => (None, None),
            SubmissionStatus::Succeeded(receipt) => (Some(receipt.reference.clone()), None),
            SubmissionStatus::Failed(banner) => (None, Some(banner.clone())),
        };

        Self {
            session_id,
            status: form.status().label(),
            reference,
            submitting: form.is_submitting(),
            errors,
            submit_error,
            record: JobApplicationRecordView {
                full_name: record.full_name.clone(),
                position: record.position,
                skills: record.skills.clone(),
                remote: record.remote,
                preferred_location: record.preferred_location.clone(),
                experience: record
                    .experience
                    .iter()
                    .map(|entry| ExperienceEntryView {
                        key: entry.key,
                        company: entry.company.clone(),
                        role: entry.role.clone(),
                        start_date: entry.start_date.clone(),
                        end_date: entry.end_date.clone(),
                        current: entry.current,
                    })
                    .collect(),
            },
        }
    }
}
