use std::fmt;

use serde::{Deserialize, Serialize};

/// One registration form instance's backing record. Wire format is
/// camelCase to match the portal's existing JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub notifications: bool,
    pub newsletter: bool,
}

impl Default for RegistrationRecord {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            address: None,
            city: None,
            notifications: false,
            newsletter: true,
        }
    }
}

/// Closed set of addressable registration fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegistrationField {
    Email,
    Password,
    ConfirmPassword,
    FirstName,
    LastName,
    Address,
    City,
    Notifications,
    Newsletter,
}

impl RegistrationField {
    pub const ALL: [RegistrationField; 9] = [
        RegistrationField::Email,
        RegistrationField::Password,
        RegistrationField::ConfirmPassword,
        RegistrationField::FirstName,
        RegistrationField::LastName,
        RegistrationField::Address,
        RegistrationField::City,
        RegistrationField::Notifications,
        RegistrationField::Newsletter,
    ];

    /// Dotted wire path of the field.
    pub const fn path(self) -> &'static str {
        match self {
            RegistrationField::Email => "email",
            RegistrationField::Password => "password",
            RegistrationField::ConfirmPassword => "confirmPassword",
            RegistrationField::FirstName => "firstName",
            RegistrationField::LastName => "lastName",
            RegistrationField::Address => "address",
            RegistrationField::City => "city",
            RegistrationField::Notifications => "notifications",
            RegistrationField::Newsletter => "newsletter",
        }
    }
}

impl fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// A single field edit: field address and replacement value fused into one
/// typed payload, `{"field": "...", "value": ...}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum RegistrationInput {
    Email(String),
    Password(String),
    ConfirmPassword(String),
    FirstName(String),
    LastName(String),
    Address(Option<String>),
    City(Option<String>),
    Notifications(bool),
    Newsletter(bool),
}

impl RegistrationInput {
    pub const fn field(&self) -> RegistrationField {
        match self {
            RegistrationInput::Email(_) => RegistrationField::Email,
            RegistrationInput::Password(_) => RegistrationField::Password,
            RegistrationInput::ConfirmPassword(_) => RegistrationField::ConfirmPassword,
            RegistrationInput::FirstName(_) => RegistrationField::FirstName,
            RegistrationInput::LastName(_) => RegistrationField::LastName,
            RegistrationInput::Address(_) => RegistrationField::Address,
            RegistrationInput::City(_) => RegistrationField::City,
            RegistrationInput::Notifications(_) => RegistrationField::Notifications,
            RegistrationInput::Newsletter(_) => RegistrationField::Newsletter,
        }
    }
}
