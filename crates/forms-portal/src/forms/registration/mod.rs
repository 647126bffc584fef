//! Registration wizard: a three-step account sign-up form with per-step
//! validation gating and a terminal completion state.

pub mod controller;
pub mod domain;
pub(crate) mod schema;
pub mod service;
pub mod wizard;
pub mod router;

#[cfg(test)]
mod tests;

pub use controller::RegistrationForm;
pub use domain::{RegistrationField, RegistrationInput, RegistrationRecord};
pub use router::registration_router;
pub use service::{RegistrationService, RegistrationServiceError, WizardView};
pub use wizard::{RegistrationWizard, WizardError, WizardState, WizardStep};
