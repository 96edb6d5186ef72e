//! Send orchestration
//!
//! Drives the send lifecycle state machine:
//!
//! ```text
//! Idle -> Composing -> Dispatching -> {Succeeded, Failed} -> Idle
//! ```
//!
//! Terminal states linger briefly before auto-returning to idle. A
//! send while one is in flight is rejected with a busy error; the
//! in-flight send is unaffected. Validation failures never enter the
//! lifecycle at all.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::data::{Database, Draft, EntityId, HistoryEntry, SendPhase};
use crate::error::AppError;
use crate::hub::DispatchTransport;
use crate::metrics::{COMPOSE_TOTAL, DISPATCHES_TOTAL, DISPATCH_DURATION_SECONDS};
use crate::service::compose::{ComposedRequest, compose, compose_clear};
use crate::service::recipients::ResolvedTargets;

#[derive(Default)]
struct LifecycleState {
    phase: SendPhase,
    last_error: Option<String>,
}

/// Shared lifecycle cell; auto-return tasks hold their own handle
#[derive(Default)]
struct Lifecycle {
    state: Mutex<LifecycleState>,
    /// Bumped on every terminal transition; stale auto-return tasks
    /// compare against it and back off
    generation: AtomicU64,
}

impl Lifecycle {
    fn lock(&self) -> MutexGuard<'_, LifecycleState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Lifecycle phase plus the last dispatch error, for status reporting
#[derive(Debug, Clone, Serialize)]
pub struct SendStatus {
    pub phase: SendPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// What a successful send dispatched
#[derive(Debug, Clone, Serialize)]
pub struct SendReceipt {
    pub operation: String,
    pub target_count: usize,
}

/// Orchestrates compose + dispatch + history for the current draft
pub struct SendService {
    transport: Arc<dyn DispatchTransport>,
    db: Arc<Database>,
    /// How long a terminal phase lingers before returning to idle
    linger: Duration,
    history_limit: i64,
    lifecycle: Arc<Lifecycle>,
}

impl SendService {
    pub fn new(
        transport: Arc<dyn DispatchTransport>,
        db: Arc<Database>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            transport,
            db,
            linger: Duration::from_secs(config.success_linger_seconds),
            history_limit: config.history_limit,
            lifecycle: Arc::new(Lifecycle::default()),
        }
    }

    /// Current lifecycle status
    pub fn status(&self) -> SendStatus {
        let state = self.lifecycle.lock();
        SendStatus {
            phase: state.phase,
            last_error: state.last_error.clone(),
        }
    }

    /// Claim the lifecycle for a new dispatch
    fn begin(&self) -> Result<(), AppError> {
        let mut state = self.lifecycle.lock();
        match state.phase {
            SendPhase::Composing | SendPhase::Dispatching => Err(AppError::Busy),
            _ => {
                state.phase = SendPhase::Composing;
                state.last_error = None;
                Ok(())
            }
        }
    }

    /// Validation failures are not lifecycle transitions
    fn abort_compose(&self) {
        self.lifecycle.lock().phase = SendPhase::Idle;
    }

    fn enter_dispatching(&self) {
        self.lifecycle.lock().phase = SendPhase::Dispatching;
    }

    /// Enter a terminal phase and schedule the return to idle
    fn finish(&self, error: Option<&AppError>) {
        let generation = self.lifecycle.generation.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.lifecycle.lock();
            match error {
                None => state.phase = SendPhase::Succeeded,
                Some(error) => {
                    state.phase = SendPhase::Failed;
                    state.last_error = Some(error.to_string());
                }
            }
        }

        let lifecycle = Arc::clone(&self.lifecycle);
        let linger = self.linger;
        tokio::spawn(async move {
            tokio::time::sleep(linger).await;
            if lifecycle.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            let mut state = lifecycle.lock();
            if state.phase.is_terminal() {
                state.phase = SendPhase::Idle;
            }
        });
    }

    /// Compose and dispatch the draft to the resolved targets
    pub async fn send(
        &self,
        draft: &Draft,
        targets: &ResolvedTargets,
    ) -> Result<SendReceipt, AppError> {
        self.begin()?;

        let composed = match compose(draft, targets) {
            Ok(composed) => composed,
            Err(error) => {
                self.abort_compose();
                return Err(error);
            }
        };

        COMPOSE_TOTAL
            .with_label_values(&[draft.kind.as_str()])
            .inc();

        self.enter_dispatching();
        let outcome = self.dispatch(&composed).await;

        self.record_history(draft, &composed, targets.devices.len(), outcome.as_ref().err())
            .await;

        match outcome {
            Ok(()) => {
                self.finish(None);
                Ok(SendReceipt {
                    operation: composed.operation.as_str().to_string(),
                    target_count: targets.devices.len(),
                })
            }
            Err(error) => {
                self.finish(Some(&error));
                Err(error)
            }
        }
    }

    /// Dismiss delivered notifications, optionally by tag
    ///
    /// Runs the same lifecycle as a send but records no history; the
    /// draft is never touched.
    pub async fn clear(&self, tag: &str, targets: &ResolvedTargets) -> Result<(), AppError> {
        self.begin()?;
        self.enter_dispatching();

        let composed = compose_clear(tag, targets);
        let outcome = self.dispatch(&composed).await;

        match outcome {
            Ok(()) => {
                self.finish(None);
                Ok(())
            }
            Err(error) => {
                self.finish(Some(&error));
                Err(error)
            }
        }
    }

    async fn dispatch(&self, composed: &ComposedRequest) -> Result<(), AppError> {
        let operation = composed.operation.as_str();
        let timer = DISPATCH_DURATION_SECONDS
            .with_label_values(&[operation])
            .start_timer();

        let result = self
            .transport
            .invoke(operation, composed.request.clone())
            .await;

        timer.observe_duration();

        match &result {
            Ok(()) => {
                DISPATCHES_TOTAL.with_label_values(&[operation, "ok"]).inc();
                tracing::info!(operation, "Dispatch succeeded");
            }
            Err(error) => {
                DISPATCHES_TOTAL
                    .with_label_values(&[operation, "error"])
                    .inc();
                tracing::error!(operation, %error, "Dispatch failed");
            }
        }

        result
    }

    /// Record the dispatch in the capped history table
    ///
    /// Bookkeeping only. A history write failure is logged and never
    /// fails the send.
    async fn record_history(
        &self,
        draft: &Draft,
        composed: &ComposedRequest,
        target_count: usize,
        error: Option<&AppError>,
    ) {
        let entry = HistoryEntry {
            id: EntityId::new().0,
            operation: composed.operation.as_str().to_string(),
            title: composed
                .request
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            message: draft.message.clone(),
            target_count: target_count as i64,
            outcome: match error {
                None => "succeeded".to_string(),
                Some(_) => "failed".to_string(),
            },
            request: composed.request.to_string(),
            created_at: Utc::now(),
        };

        if let Err(error) = self.db.insert_history(&entry, self.history_limit).await {
            tracing::error!(%error, "Failed to record notification history");
        }
    }
}
