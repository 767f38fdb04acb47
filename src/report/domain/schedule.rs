//! Per-owner summary delivery schedule.

use super::ReportDomainError;
use crate::task::domain::OwnerId;
use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Time of day after which a summary may be sent, unless configured.
pub const DEFAULT_SEND_AFTER: NaiveTime = match NaiveTime::from_hms_opt(22, 0, 0) {
    Some(time) => time,
    None => NaiveTime::MIN,
};

/// Minimum spacing between two summaries for the same owner.
const RESEND_INTERVAL: TimeDelta = TimeDelta::days(1);

/// Addressee of an owner's summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    username: String,
    email: String,
}

impl Recipient {
    /// Maximum username length in characters.
    pub const MAX_USERNAME_LEN: usize = 150;

    /// Creates a validated recipient.
    ///
    /// # Errors
    ///
    /// Returns [`ReportDomainError::EmptyUsername`] for a blank username,
    /// [`ReportDomainError::UsernameTooLong`] past
    /// [`Self::MAX_USERNAME_LEN`] characters, or
    /// [`ReportDomainError::InvalidEmail`] when the address lacks a local
    /// part or domain.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, ReportDomainError> {
        let raw_username: String = username.into();
        let raw_email: String = email.into();
        let trimmed_username = raw_username.trim();
        if trimmed_username.is_empty() {
            return Err(ReportDomainError::EmptyUsername);
        }
        let username_len = trimmed_username.chars().count();
        if username_len > Self::MAX_USERNAME_LEN {
            return Err(ReportDomainError::UsernameTooLong {
                max: Self::MAX_USERNAME_LEN,
                actual: username_len,
            });
        }

        let trimmed_email = raw_email.trim();
        let is_valid = trimmed_email
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            })
            && !trimmed_email.chars().any(char::is_whitespace);
        if !is_valid {
            return Err(ReportDomainError::InvalidEmail(raw_email));
        }

        Ok(Self {
            username: trimmed_username.to_owned(),
            email: trimmed_email.to_owned(),
        })
    }

    /// Returns the username greeted in summaries.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the delivery address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Daily summary schedule for one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSchedule {
    owner: OwnerId,
    recipient: Recipient,
    send_after: NaiveTime,
    last_sent_at: Option<DateTime<Utc>>,
}

impl ReportSchedule {
    /// Creates a schedule that has never been sent.
    #[must_use]
    pub const fn new(owner: OwnerId, recipient: Recipient, send_after: NaiveTime) -> Self {
        Self {
            owner,
            recipient,
            send_after,
            last_sent_at: None,
        }
    }

    /// Reconstructs a schedule from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        owner: OwnerId,
        recipient: Recipient,
        send_after: NaiveTime,
        last_sent_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            owner,
            recipient,
            send_after,
            last_sent_at,
        }
    }

    /// Returns the owner.
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Returns the recipient.
    #[must_use]
    pub const fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    /// Returns the time of day (UTC) after which sending is allowed.
    #[must_use]
    pub const fn send_after(&self) -> NaiveTime {
        self.send_after
    }

    /// Returns when the last summary went out, if ever.
    #[must_use]
    pub const fn last_sent_at(&self) -> Option<DateTime<Utc>> {
        self.last_sent_at
    }

    /// Returns `true` when a summary should go out at `now`.
    ///
    /// A summary is due once `now` is past the configured time of day and
    /// more than a day has passed since the previous one.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        let interval_elapsed = self.last_sent_at.is_none_or(|last| {
            last.checked_add_signed(RESEND_INTERVAL)
                .is_some_and(|next| now > next)
        });
        interval_elapsed && now.time() > self.send_after
    }

    /// Replaces recipient and time of day, keeping the send history.
    pub fn reconfigure(&mut self, recipient: Recipient, send_after: NaiveTime) {
        self.recipient = recipient;
        self.send_after = send_after;
    }

    /// Records a delivery at `sent_at`.
    pub const fn mark_sent(&mut self, sent_at: DateTime<Utc>) {
        self.last_sent_at = Some(sent_at);
    }
}
