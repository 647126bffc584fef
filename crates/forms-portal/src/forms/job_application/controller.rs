use std::collections::BTreeMap;

use tracing::warn;

use super::domain::{
    EntryKey, ExperiencePatch, JobApplicationField, JobApplicationInput, JobApplicationRecord,
};
use super::experience::{self, EntryKeyAllocator};
use super::schema;
use crate::forms::gateway::{JobApplicationGateway, JobApplicationReceipt};
use crate::forms::SubmitOutcome;

/// Record-level banner shown when the gateway rejects an application.
const SUBMIT_FAILED_BANNER: &str = "Something went wrong. Please try again.";

/// Outcome banner state, mirroring the dismissible success/error alert of
/// the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Idle,
    Succeeded(JobApplicationReceipt),
    Failed(String),
}

impl SubmissionStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            SubmissionStatus::Idle => "idle",
            SubmissionStatus::Succeeded(_) => "success",
            SubmissionStatus::Failed(_) => "error",
        }
    }
}

/// Raised when a field edit or removal addresses an experience entry that
/// is no longer part of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no experience entry with key {0}")]
pub struct UnknownEntryKey(pub EntryKey);

/// Form state controller for the job application: the mutable record, the
/// per-field error map keyed by stable entry identity, the submission
/// guard, and the outcome banner.
#[derive(Debug, Clone)]
pub struct JobApplicationForm {
    record: JobApplicationRecord,
    errors: BTreeMap<JobApplicationField, String>,
    keys: EntryKeyAllocator,
    status: SubmissionStatus,
    submitting: bool,
}

impl Default for JobApplicationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl JobApplicationForm {
    /// A fresh form starts with a single blank experience entry, ready to
    /// be filled in.
    pub fn new() -> Self {
        let mut keys = EntryKeyAllocator::default();
        let mut record = JobApplicationRecord::default();
        experience::append_blank(&mut record.experience, &mut keys);

        Self {
            record,
            errors: BTreeMap::new(),
            keys,
            status: SubmissionStatus::Idle,
            submitting: false,
        }
    }

    pub fn record(&self) -> &JobApplicationRecord {
        &self.record
    }

    pub fn errors(&self) -> &BTreeMap<JobApplicationField, String> {
        &self.errors
    }

    pub fn error(&self, field: JobApplicationField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn set_submitting(&mut self, flag: bool) {
        self.submitting = flag;
    }

    /// Dismiss the outcome banner.
    pub fn reset_status(&mut self) {
        self.status = SubmissionStatus::Idle;
    }

    /// Apply a single field edit. Only the edited slot's stale error is
    /// dropped; toggling `remote` also drops the location error, since
    /// that rule's applicability just changed.
    pub fn set_field(&mut self, input: JobApplicationInput) -> Result<(), UnknownEntryKey> {
        let field = input.field();
        match input {
            JobApplicationInput::FullName(value) => self.record.full_name = value,
            JobApplicationInput::Position(value) => self.record.position = value,
            JobApplicationInput::Skills(value) => self.record.skills = value,
            JobApplicationInput::Remote(value) => {
                self.record.remote = value;
                self.errors.remove(&JobApplicationField::PreferredLocation);
            }
            JobApplicationInput::PreferredLocation(value) => {
                self.record.preferred_location = value;
            }
            JobApplicationInput::Experience { key, patch } => {
                let entry = self.record.entry_mut(key).ok_or(UnknownEntryKey(key))?;
                match patch {
                    ExperiencePatch::Company(value) => entry.company = value,
                    ExperiencePatch::Role(value) => entry.role = value,
                    ExperiencePatch::StartDate(value) => entry.start_date = value,
                    ExperiencePatch::EndDate(value) => entry.end_date = value,
                    ExperiencePatch::Current(value) => entry.current = value,
                }
            }
        }
        self.errors.remove(&field);
        Ok(())
    }

    /// Append a blank experience entry, returning its key.
    pub fn append_experience(&mut self) -> EntryKey {
        experience::append_blank(&mut self.record.experience, &mut self.keys)
    }

    /// Remove the entry with the given key. Returns false when the key is
    /// not present.
    pub fn remove_experience(&mut self, key: EntryKey) -> bool {
        experience::remove_key(&mut self.record.experience, &mut self.errors, key)
    }

    /// Positional removal; later entries shift down by one. Returns the
    /// removed entry's key.
    pub fn remove_experience_at(&mut self, index: usize) -> Option<EntryKey> {
        let key = self.record.experience.get(index)?.key;
        self.remove_experience(key);
        Some(key)
    }

    /// Validate only the named fields, refreshing exactly those error
    /// slots. The location conditional runs when its designated field is
    /// part of the subset.
    pub fn validate_subset(&mut self, fields: &[JobApplicationField]) -> bool {
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

        if fields.contains(&JobApplicationField::PreferredLocation) {
            let mut cross = BTreeMap::new();
            schema::apply_record_rules(&self.record, &mut cross);
            if let Some(message) = cross.remove(&JobApplicationField::PreferredLocation) {
                self.errors
                    .insert(JobApplicationField::PreferredLocation, message);
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

    /// Validate, then hand the record to the gateway. On success the form
    /// resets to a fresh record (one blank entry) and raises the success
    /// banner; on rejection the entered data is kept for a retry.
    pub async fn submit<G>(&mut self, gateway: &G) -> SubmitOutcome<JobApplicationReceipt>
    where
        G: JobApplicationGateway + ?Sized,
    {
        if !self.validate_all() {
            return SubmitOutcome::Invalid;
        }

        self.submitting = true;
        let result = gateway.submit_job_application(&self.record).await;
        self.submitting = false;

        match result {
            Ok(receipt) => {
                self.record = JobApplicationRecord::default();
                experience::append_blank(&mut self.record.experience, &mut self.keys);
                self.errors.clear();
                self.status = SubmissionStatus::Succeeded(receipt.clone());
                SubmitOutcome::Success(receipt)
            }
            Err(error) => {
                warn!(reason = %error, "job application submission rejected");
                self.status = SubmissionStatus::Failed(SUBMIT_FAILED_BANNER.to_string());
                SubmitOutcome::Failure(error.to_string())
            }
        }
    }
}
