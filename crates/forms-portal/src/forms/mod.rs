//! Form workflows backing the portal: per-form domain records, declarative
//! validation rules, stateful controllers, and the submission gateway seam.

pub mod gateway;
pub mod job_application;
pub mod registration;
pub mod session;

/// Terminal result of one submit attempt against a form's gateway.
///
/// `Invalid` means whole-record validation blocked the call before the
/// gateway was invoked; the controller's error map carries the field
/// details. `Failure` is the gateway rejecting an otherwise valid record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome<R> {
    Invalid,
    Success(R),
    Failure(String),
}
