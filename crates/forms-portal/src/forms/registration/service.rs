use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::domain::RegistrationInput;
use super::wizard::{RegistrationWizard, WizardState};
use crate::forms::gateway::{RegistrationGateway, RegistrationReceipt};
use crate::forms::session::{SessionId, SessionStore, SessionStoreError};
use crate::forms::SubmitOutcome;

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("reg-sess-{id:06}"))
}

/// Service facade over wizard sessions: one wizard instance per session,
/// stored behind the session-store trait, submitted through the gateway.
pub struct RegistrationService<S, G> {
    sessions: Arc<S>,
    gateway: Arc<G>,
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationServiceError {
    #[error("a submission is already in flight for this session")]
    SubmissionInFlight,
    #[error(transparent)]
    Store(#[from] SessionStoreError),
    #[error(transparent)]
    Wizard(#[from] super::wizard::WizardError),
}

impl<S, G> RegistrationService<S, G>
where
    S: SessionStore<RegistrationWizard> + 'static,
    G: RegistrationGateway + 'static,
{
    pub fn new(sessions: Arc<S>, gateway: Arc<G>) -> Self {
        Self { sessions, gateway }
    }

    /// Open a fresh wizard session at the account step.
    pub fn create(&self) -> Result<WizardView, RegistrationServiceError> {
        let session_id = next_session_id();
        let wizard = RegistrationWizard::new();
        self.sessions.insert(session_id.clone(), wizard.clone())?;
        info!(%session_id, "registration session opened");
        Ok(WizardView::for_session(session_id, &wizard))
    }

    pub fn view(&self, session_id: &SessionId) -> Result<WizardView, RegistrationServiceError> {
        let wizard = self.load(session_id)?;
        Ok(WizardView::for_session(session_id.clone(), &wizard))
    }

    pub fn set_field(
        &self,
        session_id: &SessionId,
        input: RegistrationInput,
    ) -> Result<WizardView, RegistrationServiceError> {
        let mut wizard = self.load(session_id)?;
        wizard.set_field(input)?;
        self.sessions.update(session_id, wizard.clone())?;
        Ok(WizardView::for_session(session_id.clone(), &wizard))
    }

    pub fn next(&self, session_id: &SessionId) -> Result<WizardView, RegistrationServiceError> {
        let mut wizard = self.load(session_id)?;
        wizard.next()?;
        self.sessions.update(session_id, wizard.clone())?;
        Ok(WizardView::for_session(session_id.clone(), &wizard))
    }

    pub fn back(&self, session_id: &SessionId) -> Result<WizardView, RegistrationServiceError> {
        let mut wizard = self.load(session_id)?;
        wizard.back()?;
        self.sessions.update(session_id, wizard.clone())?;
        Ok(WizardView::for_session(session_id.clone(), &wizard))
    }

    /// Run the final-step submit. The in-flight guard is published to the
    /// store before awaiting the gateway so overlapping submits for the
    /// same session are refused rather than duplicated.
    pub async fn submit(
        &self,
        session_id: &SessionId,
    ) -> Result<(SubmitOutcome<RegistrationReceipt>, WizardView), RegistrationServiceError> {
        let mut wizard = self.load(session_id)?;
        if wizard.is_submitting() {
            return Err(RegistrationServiceError::SubmissionInFlight);
        }

        let mut guarded = wizard.clone();
        guarded.set_submitting(true);
        self.sessions.update(session_id, guarded)?;

        let result = wizard.submit(self.gateway.as_ref()).await;

        // Publish the final state; this also releases the guard when the
        // wizard refused the call (wrong step, already complete).
        self.sessions.update(session_id, wizard.clone())?;

        let outcome = result?;
        if let SubmitOutcome::Success(receipt) = &outcome {
            info!(%session_id, registration_id = %receipt.id, "registration completed");
        }
        Ok((outcome, WizardView::for_session(session_id.clone(), &wizard)))
    }

    /// Full reset: discard the session entirely. Recreating is the only
    /// way out of the completed state.
    pub fn discard(&self, session_id: &SessionId) -> Result<(), RegistrationServiceError> {
        if self.sessions.remove(session_id)? {
            Ok(())
        } else {
            Err(SessionStoreError::NotFound.into())
        }
    }

    fn load(&self, session_id: &SessionId) -> Result<RegistrationWizard, RegistrationServiceError> {
        let wizard = self
            .sessions
            .fetch(session_id)?
            .ok_or(SessionStoreError::NotFound)?;
        Ok(wizard)
    }
}

/// Sanitized wizard snapshot for API responses. Passwords never leave the
/// session; the summary mirrors what the final step displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub session_id: SessionId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_step: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_label: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_id: Option<String>,
    pub submitting: bool,
    pub errors: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_error: Option<String>,
    pub summary: WizardSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSummary {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub notifications: bool,
    pub newsletter: bool,
}

impl WizardView {
    pub fn for_session(session_id: SessionId, wizard: &RegistrationWizard) -> Self {
        let record = wizard.form().record();
        let (status, active_step, step_label, registration_id) = match wizard.state() {
            WizardState::Step(step) => ("in_progress", Some(step.name()), Some(step.label()), None),
            WizardState::Complete(receipt) => ("complete", None, None, Some(receipt.id.clone())),
        };

        let errors = wizard
            .form()
            .errors()
            .iter()
            .map(|(field, message)| (field.path().to_string(), message.clone()))
            .collect();

        Self {
            session_id,
            status,
            active_step,
            step_label,
            registration_id,
            submitting: wizard.is_submitting(),
            errors,
            submit_error: wizard.submit_error().map(str::to_string),
            summary: WizardSummary {
                email: record.email.clone(),
                first_name: record.first_name.clone(),
                last_name: record.last_name.clone(),
                address: record.address.clone(),
                city: record.city.clone(),
                notifications: record.notifications,
                newsletter: record.newsletter,
            },
        }
    }
}
