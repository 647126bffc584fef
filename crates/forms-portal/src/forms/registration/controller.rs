use std::collections::BTreeMap;

use super::domain::{RegistrationField, RegistrationInput, RegistrationRecord};
use super::schema;
use crate::forms::gateway::{RegistrationGateway, RegistrationReceipt};
use crate::forms::SubmitOutcome;

/// Form state controller for the registration record: the mutable record,
/// the per-field error map, and the in-flight submission guard.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    record: RegistrationRecord,
    errors: BTreeMap<RegistrationField, String>,
    submitting: bool,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> &RegistrationRecord {
        &self.record
    }

    pub fn errors(&self) -> &BTreeMap<RegistrationField, String> {
        &self.errors
    }

    pub fn error(&self, field: RegistrationField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn set_submitting(&mut self, flag: bool) {
        self.submitting = flag;
    }

    /// Apply a single field edit. Validation is on-demand, not on-change:
    /// only the edited field's stale error is dropped here.
    pub fn set_field(&mut self, input: RegistrationInput) {
        let field = input.field();
        match input {
            RegistrationInput::Email(value) => self.record.email = value,
            RegistrationInput::Password(value) => self.record.password = value,
            RegistrationInput::ConfirmPassword(value) => self.record.confirm_password = value,
            RegistrationInput::FirstName(value) => self.record.first_name = value,
            RegistrationInput::LastName(value) => self.record.last_name = value,
            RegistrationInput::Address(value) => self.record.address = value,
            RegistrationInput::City(value) => self.record.city = value,
            RegistrationInput::Notifications(value) => self.record.notifications = value,
            RegistrationInput::Newsletter(value) => self.record.newsletter = value,
        }
        self.errors.remove(&field);
    }

    /// Validate only the named fields, refreshing exactly those error
    /// slots. The password cross-check runs when its designated field is
    /// part of the subset, so step gating still catches a mismatch.
    pub fn validate_subset(&mut self, fields: &[RegistrationField]) -> bool {
        let mut ok = true;

        for &field in fields {
            match schema::validate_field(&self.record, field) {
                Some(message) => {
                    self.errors.insert(field, message);
                    ok = false;
                }
                None => {
                    self.errors.remove(&field);
                }
            }
        }

        if fields.contains(&RegistrationField::ConfirmPassword) {
            let mut cross = BTreeMap::new();
            schema::apply_record_rules(&self.record, &mut cross);
            if let Some(message) = cross.remove(&RegistrationField::ConfirmPassword) {
                self.errors.insert(RegistrationField::ConfirmPassword, message);
                ok = false;
            }
        }

        ok
    }

    /// Whole-record validation; replaces the error map.
    pub fn validate_all(&mut self) -> bool {
        self.errors = schema::validate_record(&self.record);
        self.errors.is_empty()
    }

    /// Validate, then hand the record to the gateway. The only suspension
    /// point in the workflow; `submitting` is held across the await so the
    /// session service can refuse overlapping submits. On success the
    /// record is reset to defaults.
    pub async fn submit<G>(&mut self, gateway: &G) -> SubmitOutcome<RegistrationReceipt>
    where
        G: RegistrationGateway + ?Sized,
    {
        if !self.validate_all() {
            return SubmitOutcome::Invalid;
        }

        self.submitting = true;
        let result = gateway.submit_registration(&self.record).await;
        self.submitting = false;

        match result {
            Ok(receipt) => {
                self.record = RegistrationRecord::default();
                self.errors.clear();
                SubmitOutcome::Success(receipt)
            }
            Err(error) => SubmitOutcome::Failure(error.to_string()),
        }
    }
}
