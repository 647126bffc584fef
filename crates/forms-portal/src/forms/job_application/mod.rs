//! Job application form: a single-page form with a skills multi-select, a
//! remote/location conditional rule, and an editable experience list.

pub mod controller;
pub mod domain;
pub(crate) mod experience;
pub(crate) mod schema;
pub mod service;
pub mod router;

#[cfg(test)]
mod tests;

pub use controller::{JobApplicationForm, SubmissionStatus, UnknownEntryKey};
pub use domain::{
    EntryKey, ExperienceEntry, ExperienceField, ExperiencePatch, JobApplicationField,
    JobApplicationInput, JobApplicationRecord, Position, SKILL_CATALOG,
};
pub use router::job_application_router;
pub use service::{JobApplicationService, JobApplicationServiceError, JobApplicationView};
