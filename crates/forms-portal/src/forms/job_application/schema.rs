//! Declarative validation rules for the job application record. The
//! remote/location conditional is a cross-field rule attached to
//! `preferredLocation`; everything else is a per-field rule.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::domain::{
    ExperienceField, JobApplicationField, JobApplicationRecord, SKILL_CATALOG,
};

const MIN_FULL_NAME_LEN: usize = 3;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Single-field rule. `None` means the field currently passes. An
/// experience address whose entry no longer exists passes vacuously.
pub(crate) fn validate_field(
    record: &JobApplicationRecord,
    field: JobApplicationField,
) -> Option<String> {
    match field {
        JobApplicationField::FullName => {
            if record.full_name.chars().count() >= MIN_FULL_NAME_LEN {
                None
            } else {
                Some("Full name is required".to_string())
            }
        }
        // The position set is closed by construction.
        JobApplicationField::Position => None,
        JobApplicationField::Skills => {
            if record.skills.is_empty() {
                return Some("Select at least one skill".to_string());
            }
            record
                .skills
                .iter()
                .find(|skill| !SKILL_CATALOG.contains(&skill.as_str()))
                .map(|unknown| format!("'{unknown}' is not an available skill"))
        }
        JobApplicationField::Remote => None,
        // Only conditionally required; handled by the cross-field rule.
        JobApplicationField::PreferredLocation => None,
        JobApplicationField::Experience { key, field } => {
            let entry = record.entry(key)?;
            match field {
                ExperienceField::Company => {
                    if entry.company.is_empty() {
                        Some("Company is required".to_string())
                    } else {
                        None
                    }
                }
                ExperienceField::Role => {
                    if entry.role.is_empty() {
                        Some("Role is required".to_string())
                    } else {
                        None
                    }
                }
                ExperienceField::StartDate => {
                    if entry.start_date.is_empty() {
                        Some("Start date is required".to_string())
                    } else if parse_date(&entry.start_date).is_none() {
                        Some("Start date must be a valid date (YYYY-MM-DD)".to_string())
                    } else {
                        None
                    }
                }
                ExperienceField::EndDate => match entry.end_date.as_deref() {
                    Some(raw) if !raw.is_empty() && parse_date(raw).is_none() => {
                        Some("End date must be a valid date (YYYY-MM-DD)".to_string())
                    }
                    _ => None,
                },
                ExperienceField::Current => None,
            }
        }
    }
}

/// Cross-field rules, each attached to its designated field.
pub(crate) fn apply_record_rules(
    record: &JobApplicationRecord,
    errors: &mut BTreeMap<JobApplicationField, String>,
) {
    let location_missing = record
        .preferred_location
        .as_deref()
        .map_or(true, str::is_empty);

    if !record.remote && location_missing {
        errors.insert(
            JobApplicationField::PreferredLocation,
            "Location is required for on-site roles".to_string(),
        );
    }
}

/// Whole-record validation: scalar rules, every entry's rules, and the
/// cross-field rules.
pub(crate) fn validate_record(
    record: &JobApplicationRecord,
) -> BTreeMap<JobApplicationField, String> {
    let mut errors = BTreeMap::new();

    for field in JobApplicationField::SCALARS {
        if let Some(message) = validate_field(record, field) {
            errors.insert(field, message);
        }
    }

    for entry in &record.experience {
        for field in ExperienceField::ALL {
            let address = JobApplicationField::Experience {
                key: entry.key,
                field,
            };
            if let Some(message) = validate_field(record, address) {
                errors.insert(address, message);
            }
        }
    }

    apply_record_rules(record, &mut errors);
    errors
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}
