//! Editor operations over the experience sequence. Entries are identified
//! by stable keys; positions shift on removal but error slots never have
//! to be re-derived, only dropped for the removed key.

use std::collections::BTreeMap;

use super::domain::{EntryKey, ExperienceEntry, JobApplicationField};

/// Hands out entry keys for one form instance. Keys are never reused, so
/// a removed entry's identity cannot be resurrected by a later append.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct EntryKeyAllocator {
    next: u64,
}

impl EntryKeyAllocator {
    pub(crate) fn next_key(&mut self) -> EntryKey {
        self.next += 1;
        EntryKey(self.next)
    }
}

/// Append a zero-valued entry at the end of the sequence.
pub(crate) fn append_blank(
    entries: &mut Vec<ExperienceEntry>,
    keys: &mut EntryKeyAllocator,
) -> EntryKey {
    let key = keys.next_key();
    entries.push(ExperienceEntry::blank(key));
    key
}

/// Remove the entry with the given key, dropping every error slot that
/// belonged to it. Later entries shift down one position; their error
/// slots are keyed by entry, so they survive untouched.
pub(crate) fn remove_key(
    entries: &mut Vec<ExperienceEntry>,
    errors: &mut BTreeMap<JobApplicationField, String>,
    key: EntryKey,
) -> bool {
    let Some(index) = entries.iter().position(|entry| entry.key == key) else {
        return false;
    };

    entries.remove(index);
    errors.retain(|field, _| {
        !matches!(field, JobApplicationField::Experience { key: slot, .. } if *slot == key)
    });
    true
}
