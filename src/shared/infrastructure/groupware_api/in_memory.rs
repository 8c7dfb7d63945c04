// In memory implementation of the GroupwareApi port.
//
// Responsibilities
// - Serve canned envelopes per (endpoint, month).
// - Record requests and optionally delay them, so store tests can observe in-flight state.

use crate::shared::infrastructure::groupware_api::{
    DashboardEndpoint, DashboardEnvelope, GroupwareApi, GroupwareApiError,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

#[derive(Default)]
pub struct InMemoryGroupwareApi {
    responses: RwLock<HashMap<(DashboardEndpoint, Option<String>), DashboardEnvelope>>,
    pub requests: Mutex<Vec<(DashboardEndpoint, Option<String>)>>,
    delay_ms: AtomicU64,
    is_offline: bool,
}

impl InMemoryGroupwareApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub fn set_delay_ms(&self, ms: u64) {
        self.delay_ms.store(ms, Ordering::SeqCst);
    }

    pub async fn respond(
        &self,
        endpoint: DashboardEndpoint,
        month: Option<&str>,
        envelope: DashboardEnvelope,
    ) {
        self.responses
            .write()
            .await
            .insert((endpoint, month.map(str::to_string)), envelope);
    }
}

#[async_trait::async_trait]
impl GroupwareApi for InMemoryGroupwareApi {
    async fn get_dashboard(
        &self,
        endpoint: DashboardEndpoint,
        month: Option<&str>,
    ) -> Result<DashboardEnvelope, GroupwareApiError> {
        let key = (endpoint, month.map(str::to_string));
        self.requests.lock().await.push(key.clone());
        if self.is_offline {
            return Err(GroupwareApiError::Transport("Groupware API offline".into()));
        }
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.responses
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| GroupwareApiError::Status {
                status: 404,
                body: format!("no canned response for {}", endpoint.path()),
            })
    }
}
