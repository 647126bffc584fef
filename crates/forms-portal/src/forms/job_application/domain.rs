use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed skill catalog offered by the form. Skills outside this set
/// are validation failures, not runtime faults.
pub const SKILL_CATALOG: [&str; 8] = [
    "React",
    "TypeScript",
    "Node.js",
    "Python",
    "Java",
    "AWS",
    "Docker",
    "Kubernetes",
];

/// Closed set of positions a candidate can apply for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Frontend,
    Backend,
    Fullstack,
    DevOps,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Frontend,
        Position::Backend,
        Position::Fullstack,
        Position::DevOps,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Position::Frontend => "Frontend",
            Position::Backend => "Backend",
            Position::Fullstack => "Fullstack",
            Position::DevOps => "DevOps",
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::Frontend
    }
}

/// Stable opaque identity of one experience entry, assigned at creation
/// and never reused within a form instance. Error slots are keyed by this,
/// not by position, so removals cannot leave stale positional state.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntryKey(pub u64);

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One work-history row. The key is process-local identity and stays off
/// the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[serde(skip)]
    pub key: EntryKey,
    pub company: String,
    pub role: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub current: bool,
}

impl ExperienceEntry {
    pub fn blank(key: EntryKey) -> Self {
        Self {
            key,
            company: String::new(),
            role: String::new(),
            start_date: String::new(),
            end_date: None,
            current: false,
        }
    }
}

/// One job application form instance's backing record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationRecord {
    pub full_name: String,
    pub position: Position,
    pub skills: Vec<String>,
    pub remote: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_location: Option<String>,
    pub experience: Vec<ExperienceEntry>,
}

impl JobApplicationRecord {
    pub fn entry(&self, key: EntryKey) -> Option<&ExperienceEntry> {
        self.experience.iter().find(|entry| entry.key == key)
    }

    pub(crate) fn entry_mut(&mut self, key: EntryKey) -> Option<&mut ExperienceEntry> {
        self.experience.iter_mut().find(|entry| entry.key == key)
    }

    /// Current position of a key within the sequence, if it is still present.
    pub fn index_of(&self, key: EntryKey) -> Option<usize> {
        self.experience.iter().position(|entry| entry.key == key)
    }
}

/// Per-entry addressable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExperienceField {
    Company,
    Role,
    StartDate,
    EndDate,
    Current,
}

impl ExperienceField {
    pub const ALL: [ExperienceField; 5] = [
        ExperienceField::Company,
        ExperienceField::Role,
        ExperienceField::StartDate,
        ExperienceField::EndDate,
        ExperienceField::Current,
    ];

    pub const fn leaf(self) -> &'static str {
        match self {
            ExperienceField::Company => "company",
            ExperienceField::Role => "role",
            ExperienceField::StartDate => "startDate",
            ExperienceField::EndDate => "endDate",
            ExperienceField::Current => "current",
        }
    }
}

/// Closed set of addressable job-application fields. Experience slots are
/// addressed by entry key; positional paths are rendered only at the view
/// boundary, from the key's current index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum JobApplicationField {
    FullName,
    Position,
    Skills,
    Remote,
    PreferredLocation,
    Experience {
        key: EntryKey,
        field: ExperienceField,
    },
}

impl JobApplicationField {
    pub const SCALARS: [JobApplicationField; 5] = [
        JobApplicationField::FullName,
        JobApplicationField::Position,
        JobApplicationField::Skills,
        JobApplicationField::Remote,
        JobApplicationField::PreferredLocation,
    ];

    /// Dotted/indexed wire path, resolved against the record's current
    /// entry order. `None` when the addressed entry no longer exists.
    pub fn render_path(&self, record: &JobApplicationRecord) -> Option<String> {
        match self {
            JobApplicationField::FullName => Some("fullName".to_string()),
            JobApplicationField::Position => Some("position".to_string()),
            JobApplicationField::Skills => Some("skills".to_string()),
            JobApplicationField::Remote => Some("remote".to_string()),
            JobApplicationField::PreferredLocation => Some("preferredLocation".to_string()),
            JobApplicationField::Experience { key, field } => {
                let index = record.index_of(*key)?;
                Some(format!("experience[{index}].{}", field.leaf()))
            }
        }
    }
}

/// A single field edit, `{"field": "...", "value": ...}` on the wire.
/// Experience edits name the entry by key and carry a per-entry patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum JobApplicationInput {
    FullName(String),
    Position(Position),
    Skills(Vec<String>),
    Remote(bool),
    PreferredLocation(Option<String>),
    Experience { key: EntryKey, patch: ExperiencePatch },
}

impl JobApplicationInput {
    pub fn field(&self) -> JobApplicationField {
        match self {
            JobApplicationInput::FullName(_) => JobApplicationField::FullName,
            JobApplicationInput::Position(_) => JobApplicationField::Position,
            JobApplicationInput::Skills(_) => JobApplicationField::Skills,
            JobApplicationInput::Remote(_) => JobApplicationField::Remote,
            JobApplicationInput::PreferredLocation(_) => JobApplicationField::PreferredLocation,
            JobApplicationInput::Experience { key, patch } => JobApplicationField::Experience {
                key: *key,
                field: patch.field(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ExperiencePatch {
    Company(String),
    Role(String),
    StartDate(String),
    EndDate(Option<String>),
    Current(bool),
}

impl ExperiencePatch {
    pub const fn field(&self) -> ExperienceField {
        match self {
            ExperiencePatch::Company(_) => ExperienceField::Company,
            ExperiencePatch::Role(_) => ExperienceField::Role,
            ExperiencePatch::StartDate(_) => ExperienceField::StartDate,
            ExperiencePatch::EndDate(_) => ExperienceField::EndDate,
            ExperiencePatch::Current(_) => ExperienceField::Current,
        }
    }
}
