//! Rendering of per-status task summaries.

use super::ReportDomainError;
use crate::task::domain::StatusTally;
use minijinja::Environment;
use serde_json::{Map, Value, json};

/// Subject line used for summary emails.
pub const SUMMARY_SUBJECT: &str = "Task Summary";

const SUMMARY_TEMPLATE: &str = "Hi {{ username }}\n\
Please find the below task summary :\n\
{% for tally in tallies %}{{ tally.status }} : {{ tally.total }}\n{% endfor %}";

/// Per-status counts for one recipient, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    username: String,
    tallies: Vec<StatusTally>,
}

impl TaskSummary {
    /// Creates a summary. Tallies are sorted by status name.
    #[must_use]
    pub fn new(username: impl Into<String>, mut tallies: Vec<StatusTally>) -> Self {
        tallies.sort_by_key(|tally| tally.status.as_str());
        Self {
            username: username.into(),
            tallies,
        }
    }

    /// Returns the greeted username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the per-status tallies.
    #[must_use]
    pub fn tallies(&self) -> &[StatusTally] {
        &self.tallies
    }

    /// Renders the plain-text email body.
    ///
    /// # Errors
    ///
    /// Returns [`ReportDomainError::Render`] when the template engine fails.
    pub fn render(&self) -> Result<String, ReportDomainError> {
        let environment = Environment::new();
        environment
            .render_str(SUMMARY_TEMPLATE, self.template_context())
            .map_err(|error| ReportDomainError::Render(error.to_string()))
    }

    fn template_context(&self) -> Map<String, Value> {
        let tallies = self
            .tallies
            .iter()
            .map(|tally| json!({ "status": tally.status.as_str(), "total": tally.total }))
            .collect();
        let mut context = Map::new();
        context.insert("username".to_owned(), Value::String(self.username.clone()));
        context.insert("tallies".to_owned(), Value::Array(tallies));
        context
    }
}

/// Outgoing summary email handed to a [`crate::report::ports::SummaryMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEmail {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}
