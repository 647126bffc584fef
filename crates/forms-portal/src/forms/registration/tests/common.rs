use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::forms::gateway::MockRegistrationGateway;
use crate::forms::registration::domain::{RegistrationInput, RegistrationRecord};
use crate::forms::registration::service::RegistrationService;
use crate::forms::registration::wizard::{RegistrationWizard, WizardStep};
use crate::forms::session::{SessionId, SessionStore, SessionStoreError};

/// In-memory session store double shared by the registration tests.
#[derive(Clone)]
pub(super) struct MemoryStore<T> {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, T>>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<T: Clone + Send + Sync> SessionStore<T> for MemoryStore<T> {
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

/// Store double that is always offline, for the 500 paths.
pub(super) struct UnavailableStore<T>(pub(super) PhantomData<T>);

impl<T> Default for UnavailableStore<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: Send + Sync> SessionStore<T> for UnavailableStore<T> {
    fn insert(&self, _id: SessionId, _state: T) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::Unavailable("store offline".to_string()))
    }

    fn update(&self, _id: &SessionId, _state: T) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::Unavailable("store offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<T>, SessionStoreError> {
        Err(SessionStoreError::Unavailable("store offline".to_string()))
    }

    fn remove(&self, _id: &SessionId) -> Result<bool, SessionStoreError> {
        Err(SessionStoreError::Unavailable("store offline".to_string()))
    }
}

pub(super) type TestStore = MemoryStore<RegistrationWizard>;
pub(super) type TestService = RegistrationService<TestStore, MockRegistrationGateway>;

pub(super) fn build_service() -> (Arc<TestService>, Arc<TestStore>, Arc<MockRegistrationGateway>) {
    let store = Arc::new(TestStore::default());
    let gateway = Arc::new(MockRegistrationGateway::new(Duration::ZERO));
    let service = Arc::new(RegistrationService::new(store.clone(), gateway.clone()));
    (service, store, gateway)
}

/// A record that passes every rule.
pub(super) fn valid_record() -> RegistrationRecord {
    RegistrationRecord {
        email: "ada.lovelace@example.com".to_string(),
        password: "difference engine".to_string(),
        confirm_password: "difference engine".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        address: Some("12 St James's Square".to_string()),
        city: Some("London".to_string()),
        notifications: false,
        newsletter: true,
    }
}

/// Edits that fill the account step with matching credentials.
pub(super) fn account_inputs() -> Vec<RegistrationInput> {
    vec![
        RegistrationInput::Email("ada.lovelace@example.com".to_string()),
        RegistrationInput::Password("difference engine".to_string()),
        RegistrationInput::ConfirmPassword("difference engine".to_string()),
    ]
}

/// Edits that fill the personal step.
pub(super) fn personal_inputs() -> Vec<RegistrationInput> {
    vec![
        RegistrationInput::FirstName("Ada".to_string()),
        RegistrationInput::LastName("Lovelace".to_string()),
        RegistrationInput::Address(Some("12 St James's Square".to_string())),
        RegistrationInput::City(Some("London".to_string())),
    ]
}

/// Drive a fresh wizard through both gated steps to the preferences step.
pub(super) fn wizard_at_preferences() -> RegistrationWizard {
    let mut wizard = RegistrationWizard::new();
    for input in account_inputs() {
        wizard.set_field(input).expect("wizard is editable");
    }
    let step = wizard.next().expect("wizard is editable");
    assert_eq!(step, WizardStep::Personal, "account step should validate");
    for input in personal_inputs() {
        wizard.set_field(input).expect("wizard is editable");
    }
    let step = wizard.next().expect("wizard is editable");
    assert_eq!(step, WizardStep::Preferences, "personal step should validate");
    wizard
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
