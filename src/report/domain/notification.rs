//! In-app record of a delivered summary.

use super::ReportDomainError;
use crate::task::domain::OwnerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new random notification identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy of a sent summary kept for the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    owner: OwnerId,
    content: String,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Maximum stored content length in characters.
    pub const MAX_LEN: usize = 1024;

    /// Creates a notification.
    ///
    /// # Errors
    ///
    /// Returns [`ReportDomainError::NotificationTooLong`] when `content`
    /// exceeds [`Self::MAX_LEN`] characters.
    pub fn new(
        owner: OwnerId,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ReportDomainError> {
        let body: String = content.into();
        let actual = body.chars().count();
        if actual > Self::MAX_LEN {
            return Err(ReportDomainError::NotificationTooLong {
                max: Self::MAX_LEN,
                actual,
            });
        }
        Ok(Self {
            id: NotificationId::new(),
            owner,
            content: body,
            created_at,
        })
    }

    /// Reconstructs a notification from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: NotificationId,
        owner: OwnerId,
        content: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            content,
            created_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the owner.
    #[must_use]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Returns the stored content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
