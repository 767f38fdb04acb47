//! Mailer that keeps sent emails in memory.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use crate::report::{
    domain::SummaryEmail,
    ports::{MailerError, SummaryMailer},
};

/// Mailer that records every delivered email instead of sending it.
///
/// Addresses registered with [`RecordingMailer::reject`] fail delivery.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    outbox: Arc<Mutex<Outbox>>,
}

#[derive(Debug, Default)]
struct Outbox {
    sent: Vec<SummaryEmail>,
    rejected: BTreeSet<String>,
}

impl RecordingMailer {
    /// Creates a mailer with an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes future deliveries to `address` fail.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError`] when the outbox lock is poisoned.
    pub fn reject(&self, address: impl Into<String>) -> Result<(), MailerError> {
        let mut outbox = self.outbox.lock().map_err(lock_poisoned)?;
        outbox.rejected.insert(address.into());
        Ok(())
    }

    /// Returns the emails delivered so far, in delivery order.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError`] when the outbox lock is poisoned.
    pub fn sent(&self) -> Result<Vec<SummaryEmail>, MailerError> {
        let outbox = self.outbox.lock().map_err(lock_poisoned)?;
        Ok(outbox.sent.clone())
    }
}

fn lock_poisoned(err: impl ToString) -> MailerError {
    MailerError(err.to_string())
}

#[async_trait]
impl SummaryMailer for RecordingMailer {
    async fn send(&self, email: &SummaryEmail) -> Result<(), MailerError> {
        let mut outbox = self.outbox.lock().map_err(lock_poisoned)?;
        if outbox.rejected.contains(&email.to) {
            return Err(MailerError(format!("recipient {} rejected", email.to)));
        }
        outbox.sent.push(email.clone());
        Ok(())
    }
}
