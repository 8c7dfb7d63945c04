// Port for the Groupware REST backend that serves the dashboard summaries.

use crate::shared::core::primitives::Document;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod http;
pub mod in_memory;

/// A dashboard summary as the backend sends it.
pub type DashboardSummary = Document;

#[derive(Debug, Error)]
pub enum GroupwareApiError {
    #[error("groupware api responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardEndpoint {
    ReportUser,
    AttendanceUser,
}

impl DashboardEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            DashboardEndpoint::ReportUser => "dashboard/report-user",
            DashboardEndpoint::AttendanceUser => "dashboard/attendance-user",
        }
    }
}

/// Response body of every dashboard endpoint. `data` is `None` when the body carries
/// `null` or no `data` at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardEnvelope {
    #[serde(default)]
    pub data: Option<DashboardSummary>,
    #[serde(flatten)]
    pub extra: Document,
}

#[async_trait]
pub trait GroupwareApi: Send + Sync {
    /// `GET {endpoint}`, with `?month=` only when a month is given.
    async fn get_dashboard(
        &self,
        endpoint: DashboardEndpoint,
        month: Option<&str>,
    ) -> Result<DashboardEnvelope, GroupwareApiError>;
}
