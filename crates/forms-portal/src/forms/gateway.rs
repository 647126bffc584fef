use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::job_application::domain::JobApplicationRecord;
use super::registration::domain::RegistrationRecord;

/// Server-assigned identifier returned for an accepted registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationReceipt {
    pub id: String,
}

/// Server-assigned reference returned for an accepted job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobApplicationReceipt {
    #[serde(rename = "ref")]
    pub reference: String,
}

/// Error raised by a submission gateway.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("submission rejected: {0}")]
    Rejected(String),
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

/// Capability seam for registration submissions. The controllers assume
/// nothing about transport or encoding beyond "returns eventually".
#[async_trait]
pub trait RegistrationGateway: Send + Sync {
    async fn submit_registration(
        &self,
        record: &RegistrationRecord,
    ) -> Result<RegistrationReceipt, GatewayError>;
}

/// Capability seam for job-application submissions.
#[async_trait]
pub trait JobApplicationGateway: Send + Sync {
    async fn submit_job_application(
        &self,
        record: &JobApplicationRecord,
    ) -> Result<JobApplicationReceipt, GatewayError>;
}

/// Stand-in backend for registrations: fixed latency, then acceptance with
/// a sequential id. Any email containing "error" is rejected, simulating a
/// server-side refusal.
pub struct MockRegistrationGateway {
    latency: Duration,
    sequence: AtomicU64,
    submissions: Mutex<Vec<RegistrationRecord>>,
}

impl MockRegistrationGateway {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            sequence: AtomicU64::new(1),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Records handed to the gateway, in submission order.
    pub fn submissions(&self) -> Vec<RegistrationRecord> {
        self.submissions
            .lock()
            .expect("submission log mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl RegistrationGateway for MockRegistrationGateway {
    async fn submit_registration(
        &self,
        record: &RegistrationRecord,
    ) -> Result<RegistrationReceipt, GatewayError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.submissions
            .lock()
            .expect("submission log mutex poisoned")
            .push(record.clone());

        if record.email.contains("error") {
            return Err(GatewayError::Rejected("simulated server error".to_string()));
        }

        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        Ok(RegistrationReceipt {
            id: format!("reg-{id:06}"),
        })
    }
}

/// Stand-in backend for job applications: fixed latency, always accepts.
pub struct MockJobApplicationGateway {
    latency: Duration,
    sequence: AtomicU64,
    submissions: Mutex<Vec<JobApplicationRecord>>,
}

impl MockJobApplicationGateway {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            sequence: AtomicU64::new(1),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub fn submissions(&self) -> Vec<JobApplicationRecord> {
        self.submissions
            .lock()
            .expect("submission log mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl JobApplicationGateway for MockJobApplicationGateway {
    async fn submit_job_application(
        &self,
        record: &JobApplicationRecord,
    ) -> Result<JobApplicationReceipt, GatewayError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.submissions
            .lock()
            .expect("submission log mutex poisoned")
            .push(record.clone());

        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        Ok(JobApplicationReceipt {
            reference: format!("JOB-{id:04}"),
        })
    }
}
