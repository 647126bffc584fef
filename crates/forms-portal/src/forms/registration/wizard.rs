use serde::{Deserialize, Serialize};
use tracing::warn;

use super::controller::RegistrationForm;
use super::domain::{RegistrationField, RegistrationInput};
use crate::forms::gateway::{RegistrationGateway, RegistrationReceipt};
use crate::forms::SubmitOutcome;

/// Record-level banner shown when the gateway rejects a registration.
/// Distinct from the per-field messages in the controller's error map.
const SUBMIT_FAILED_BANNER: &str = "Failed to submit registration. Please try again.";

/// The wizard's linear step sequence. Each step declares the field subset
/// that gates forward progress out of it; `next()` is just "validate the
/// declared set, advance on success".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Account,
    Personal,
    Preferences,
}

const ACCOUNT_FIELDS: &[RegistrationField] = &[
    RegistrationField::Email,
    RegistrationField::Password,
    RegistrationField::ConfirmPassword,
];

const PERSONAL_FIELDS: &[RegistrationField] = &[
    RegistrationField::FirstName,
    RegistrationField::LastName,
    RegistrationField::Address,
    RegistrationField::City,
];

impl WizardStep {
    pub const SEQUENCE: [WizardStep; 3] = [
        WizardStep::Account,
        WizardStep::Personal,
        WizardStep::Preferences,
    ];

    /// Fields that must validate before leaving this step.
    pub const fn required_fields(self) -> &'static [RegistrationField] {
        match self {
            WizardStep::Account => ACCOUNT_FIELDS,
            WizardStep::Personal => PERSONAL_FIELDS,
            WizardStep::Preferences => &[],
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WizardStep::Account => "Account Details",
            WizardStep::Personal => "Personal Info",
            WizardStep::Preferences => "Preferences",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            WizardStep::Account => "account",
            WizardStep::Personal => "personal",
            WizardStep::Preferences => "preferences",
        }
    }

    const fn forward(self) -> Option<WizardStep> {
        match self {
            WizardStep::Account => Some(WizardStep::Personal),
            WizardStep::Personal => Some(WizardStep::Preferences),
            WizardStep::Preferences => None,
        }
    }

    const fn backward(self) -> Option<WizardStep> {
        match self {
            WizardStep::Account => None,
            WizardStep::Personal => Some(WizardStep::Account),
            WizardStep::Preferences => Some(WizardStep::Personal),
        }
    }
}

/// Where the wizard instance currently is. `Complete` is terminal and
/// carries the server-assigned id; the only exit is discarding the
/// instance and creating a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardState {
    Step(WizardStep),
    Complete(RegistrationReceipt),
}

/// Wizard operations rejected by the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("registration already completed")]
    Completed,
    #[error("submission is only allowed from the preferences step")]
    NotAtFinalStep,
}

/// Linear step navigator layered on the registration form controller.
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    form: RegistrationForm,
    state: WizardState,
    submit_error: Option<String>,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    pub fn new() -> Self {
        Self {
            form: RegistrationForm::new(),
            state: WizardState::Step(WizardStep::Account),
            submit_error: None,
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// The active step, or `None` once the wizard has completed.
    pub fn active_step(&self) -> Option<WizardStep> {
        match self.state {
            WizardState::Step(step) => Some(step),
            WizardState::Complete(_) => None,
        }
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.form.is_submitting()
    }

    pub(crate) fn set_submitting(&mut self, flag: bool) {
        self.form.set_submitting(flag);
    }

    pub fn set_field(&mut self, input: RegistrationInput) -> Result<(), WizardError> {
        match self.state {
            WizardState::Step(_) => {
                self.form.set_field(input);
                Ok(())
            }
            WizardState::Complete(_) => Err(WizardError::Completed),
        }
    }

    /// Validate the current step's declared field set and advance on
    /// success. On failure the step is unchanged and the field errors are
    /// left on the controller. A no-op at the final step.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.current_step()?;

        if !self.form.validate_subset(step.required_fields()) {
            return Ok(step);
        }

        if let Some(advanced) = step.forward() {
            self.state = WizardState::Step(advanced);
            return Ok(advanced);
        }

        Ok(step)
    }

    /// Move one step backwards. Never re-validates and never clears
    /// entered data. A no-op at the first step.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.current_step()?;
        let target = step.backward().unwrap_or(step);
        self.state = WizardState::Step(target);
        Ok(target)
    }

    /// Full-record submit, allowed only from the final step. Success is
    /// terminal; a gateway rejection keeps the step and the entered values
    /// and raises the record-level banner instead.
    pub async fn submit<G>(
        &mut self,
        gateway: &G,
    ) -> Result<SubmitOutcome<RegistrationReceipt>, WizardError>
    where
        G: RegistrationGateway + ?Sized,
    {
        let step = self.current_step()?;
        if step != WizardStep::Preferences {
            return Err(WizardError::NotAtFinalStep);
        }

        self.submit_error = None;
        let outcome = self.form.submit(gateway).await;

        match &outcome {
            SubmitOutcome::Success(receipt) => {
                self.state = WizardState::Complete(receipt.clone());
            }
            SubmitOutcome::Failure(reason) => {
                warn!(%reason, "registration submission rejected");
                self.submit_error = Some(SUBMIT_FAILED_BANNER.to_string());
            }
            SubmitOutcome::Invalid => {}
        }

        Ok(outcome)
    }

    fn current_step(&self) -> Result<WizardStep, WizardError> {
        self.active_step().ok_or(WizardError::Completed)
    }
}
