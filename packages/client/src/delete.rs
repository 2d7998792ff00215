use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use crate::api::{Api, ApiError, Resource};
use crate::{Alerter, Navigator};

pub const FAILED_MESSAGE: &str = "Failed to delete.";
pub const ERROR_MESSAGE: &str = "Error deleting.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePhase {
    Closed,
    /// Confirmation dialog visible.
    Open,
    /// Request in flight.
    Deleting,
}

impl DeletePhase {
    pub fn dialog_open(self) -> bool {
        self != DeletePhase::Closed
    }

    pub fn confirm_label(self) -> &'static str {
        match self {
            DeletePhase::Deleting => "Deleting...",
            _ => "Delete",
        }
    }

    pub fn confirm_disabled(self) -> bool {
        self == DeletePhase::Deleting
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Non-2xx answer; the user saw [`FAILED_MESSAGE`].
    Rejected,
    /// No answer; the user saw [`ERROR_MESSAGE`].
    Failed,
    /// Confirm while the dialog was not open.
    Ignored,
}

/// Delete button plus confirmation dialog for one entry.
pub struct DeleteFlow {
    api: Arc<dyn Api>,
    navigator: Arc<dyn Navigator>,
    alerter: Arc<dyn Alerter>,
    resource: Resource,
    id: Uuid,
    redirect: String,
    phase: watch::Sender<DeletePhase>,
}

impl DeleteFlow {
    pub fn new(
        api: Arc<dyn Api>,
        navigator: Arc<dyn Navigator>,
        alerter: Arc<dyn Alerter>,
        resource: Resource,
        id: Uuid,
    ) -> Self {
        let (phase, _) = watch::channel(DeletePhase::Closed);
        Self {
            api,
            navigator,
            alerter,
            resource,
            id,
            redirect: resource.index_page().to_string(),
            phase,
        }
    }

    /// Navigate somewhere other than the resource index after success.
    pub fn redirect_to(mut self, target: impl Into<String>) -> Self {
        self.redirect = target.into();
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<DeletePhase> {
        self.phase.subscribe()
    }

    pub fn phase(&self) -> DeletePhase {
        *self.phase.borrow()
    }

    pub fn open(&self) {
        self.phase.send_if_modified(|phase| {
            if *phase == DeletePhase::Closed {
                *phase = DeletePhase::Open;
                true
            } else {
                false
            }
        });
    }

    /// Cancel. Has no effect while the request is in flight.
    pub fn close(&self) {
        self.phase.send_if_modified(|phase| {
            if *phase == DeletePhase::Open {
                *phase = DeletePhase::Closed;
                true
            } else {
                false
            }
        });
    }

    pub async fn confirm(&self) -> DeleteOutcome {
        let started = self.phase.send_if_modified(|phase| {
            if *phase == DeletePhase::Open {
                *phase = DeletePhase::Deleting;
                true
            } else {
                false
            }
        });
        if !started {
            return DeleteOutcome::Ignored;
        }

        let outcome = match self.api.delete(self.resource, self.id).await {
            Ok(()) => {
                self.navigator.push(&self.redirect);
                self.navigator.refresh();
                DeleteOutcome::Deleted
            }
            Err(ApiError::Status { status, .. }) => {
                tracing::warn!(id = %self.id, status, "Delete rejected");
                self.alerter.alert(FAILED_MESSAGE);
                DeleteOutcome::Rejected
            }
            Err(e) => {
                tracing::error!(id = %self.id, "Delete failed: {e}");
                self.alerter.alert(ERROR_MESSAGE);
                DeleteOutcome::Failed
            }
        };

        self.phase.send_replace(DeletePhase::Closed);
        outcome
    }
}
