// State container for the per-month dashboard numbers.
//
// Responsibilities
// - Own `{ is_loading, items_report_user, items_attendance_user }` and publish every change.
// - Fetch the report summary and commit its `data` field.
// - Start the attendance fetch and commit the pending response without waiting for it.
//
// The attendance action clears `is_loading` before its response arrives and stores a handle
// to the whole response body rather than its `data` field. Consumers depending on this must
// resolve the handle themselves. Kept as is until product decides whether it should await.

use crate::shared::infrastructure::groupware_api::{
    DashboardEndpoint, DashboardEnvelope, DashboardSummary, GroupwareApi, GroupwareApiError,
};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::watch;
use tracing::{debug, warn};

pub type AttendanceResult = Result<DashboardEnvelope, Arc<GroupwareApiError>>;
pub type PendingAttendance = Shared<BoxFuture<'static, AttendanceResult>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardQuery {
    /// Passed through to the backend untouched.
    pub month: Option<String>,
}

impl DashboardQuery {
    pub fn month(month: impl Into<String>) -> Self {
        Self {
            month: Some(month.into()),
        }
    }
}

#[derive(Clone, Default)]
pub enum AttendanceItems {
    #[default]
    Empty,
    Pending(PendingAttendance),
}

impl AttendanceItems {
    pub fn is_pending(&self) -> bool {
        matches!(self, AttendanceItems::Pending(_))
    }

    /// The outcome if the request already finished.
    pub fn peek(&self) -> Option<AttendanceResult> {
        match self {
            AttendanceItems::Empty => None,
            AttendanceItems::Pending(pending) => pending.peek().cloned(),
        }
    }

    /// Waits for the request. `None` when nothing was ever requested.
    pub async fn resolve(&self) -> Option<AttendanceResult> {
        match self {
            AttendanceItems::Empty => None,
            AttendanceItems::Pending(pending) => Some(pending.clone().await),
        }
    }
}

impl fmt::Debug for AttendanceItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceItems::Empty => f.write_str("Empty"),
            AttendanceItems::Pending(pending) => match pending.peek() {
                Some(result) => f.debug_tuple("Pending").field(result).finish(),
                None => f.write_str("Pending(<unresolved>)"),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub is_loading: bool,
    /// `None` once the backend answered without report data.
    pub items_report_user: Option<DashboardSummary>,
    pub items_attendance_user: AttendanceItems,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            is_loading: true,
            items_report_user: Some(DashboardSummary::new()),
            items_attendance_user: AttendanceItems::Empty,
        }
    }
}

pub struct DashboardStore<TGroupwareApi>
where
    TGroupwareApi: GroupwareApi + ?Sized,
{
    api: Arc<TGroupwareApi>,
    state: watch::Sender<DashboardState>,
}

impl<TGroupwareApi> DashboardStore<TGroupwareApi>
where
    TGroupwareApi: GroupwareApi + ?Sized,
{
    pub fn new(api: Arc<TGroupwareApi>) -> Self {
        Self {
            api,
            state: watch::Sender::new(DashboardState::default()),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn items_report_user(&self) -> Option<DashboardSummary> {
        self.state.borrow().items_report_user.clone()
    }

    pub fn items_attendance_user(&self) -> AttendanceItems {
        self.state.borrow().items_attendance_user.clone()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    fn set_loading(&self, is_loading: bool) {
        self.state.send_modify(|state| state.is_loading = is_loading);
    }

    fn set_report_user(&self, summary: Option<DashboardSummary>) {
        self.state
            .send_modify(|state| state.items_report_user = summary);
    }

    fn set_attendance_user(&self, items: AttendanceItems) {
        self.state
            .send_modify(|state| state.items_attendance_user = items);
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_dashboard_report_user(
        &self,
        query: DashboardQuery,
    ) -> Result<(), GroupwareApiError> {
        self.set_loading(true);
        let envelope = self
            .api
            .get_dashboard(DashboardEndpoint::ReportUser, query.month.as_deref())
            .await?;
        let fields = envelope.data.as_ref().map(|data| data.len());
        debug!(?fields, "report summary loaded");
        self.set_report_user(envelope.data);
        self.set_loading(false);
        Ok(())
    }

    /// Starts the attendance request on the runtime and returns at once.
    ///
    /// `is_loading` is cleared before the response arrives and `items_attendance_user`
    /// holds the pending response envelope. Fails without touching the state when no
    /// Tokio runtime is running on this thread.
    #[tracing::instrument(skip(self))]
    pub fn get_dashboard_attendance_user(&self, query: DashboardQuery) -> Result<(), TryCurrentError>
    where
        TGroupwareApi: 'static,
    {
        let runtime = Handle::try_current()?;
        self.set_loading(true);
        let api = self.api.clone();
        let request = runtime.spawn(async move {
            api.get_dashboard(DashboardEndpoint::AttendanceUser, query.month.as_deref())
                .await
        });
        let pending = async move {
            match request.await {
                Ok(Ok(envelope)) => Ok(envelope),
                Ok(Err(error)) => {
                    warn!(%error, "attendance request failed");
                    Err(Arc::new(error))
                }
                Err(join) => Err(Arc::new(GroupwareApiError::Transport(format!(
                    "attendance request aborted: {join}"
                )))),
            }
        }
        .boxed()
        .shared();
        self.set_attendance_user(AttendanceItems::Pending(pending));
        self.set_loading(false);
        Ok(())
    }
}
