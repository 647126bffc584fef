//! Declarative validation rules for the registration record. Field rules
//! are evaluated one field at a time during step navigation; the password
//! cross-check only runs with whole-record validation (or when the
//! designated field is part of the validated subset).

use std::collections::BTreeMap;

use super::domain::{RegistrationField, RegistrationRecord};

const MIN_PASSWORD_LEN: usize = 8;
const MIN_NAME_LEN: usize = 2;

/// Single-field rule. `None` means the field currently passes.
pub(crate) fn validate_field(
    record: &RegistrationRecord,
    field: RegistrationField,
) -> Option<String> {
    match field {
        RegistrationField::Email => {
            if is_email(&record.email) {
                None
            } else {
                Some("Invalid email address".to_string())
            }
        }
        RegistrationField::Password => {
            if record.password.chars().count() >= MIN_PASSWORD_LEN {
                None
            } else {
                Some("Password must be at least 8 characters".to_string())
            }
        }
        RegistrationField::FirstName => {
            if record.first_name.chars().count() >= MIN_NAME_LEN {
                None
            } else {
                Some("First name is required".to_string())
            }
        }
        RegistrationField::LastName => {
            if record.last_name.chars().count() >= MIN_NAME_LEN {
                None
            } else {
                Some("Last name is required".to_string())
            }
        }
        // confirmPassword only carries the cross-field mismatch rule;
        // the remaining fields are optional or boolean toggles.
        RegistrationField::ConfirmPassword
        | RegistrationField::Address
        | RegistrationField::City
        | RegistrationField::Notifications
        | RegistrationField::Newsletter => None,
    }
}

/// Cross-field rules, each attached to its designated field.
pub(crate) fn apply_record_rules(
    record: &RegistrationRecord,
    errors: &mut BTreeMap<RegistrationField, String>,
) {
    if record.password != record.confirm_password {
        errors.insert(
            RegistrationField::ConfirmPassword,
            "Passwords don't match".to_string(),
        );
    }
}

/// Whole-record validation: every field rule plus the cross-field rules.
pub(crate) fn validate_record(
    record: &RegistrationRecord,
) -> BTreeMap<RegistrationField, String> {
    let mut errors = BTreeMap::new();
    for field in RegistrationField::ALL {
        if let Some(message) = validate_field(record, field) {
            errors.insert(field, message);
        }
    }
    apply_record_rules(record, &mut errors);
    errors
}

/// Minimal address-shape check: one `@`, non-empty local part, and a
/// dotted domain with non-empty labels. No attempt to cover the full RFC.
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}
