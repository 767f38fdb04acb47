//! Services for configuring and dispatching task summaries.

mod dispatch;

pub use dispatch::{ReportService, ReportServiceError, ReportServiceResult};
