//! Scheduled per-owner task summaries.
//!
//! Each owner may configure a recipient and a time of day. Once a day after
//! that time, [`services::ReportService::dispatch_due`] mails the owner a
//! count of their tasks per status and keeps a copy as a notification.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
