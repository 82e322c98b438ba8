use std::{
    str::FromStr,
    sync::{
        atomic::{AtomicU64, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use serde::Deserialize;
use shared::{error::ApiError, protocol::TransformRequest};
use tokio::{
    sync::{broadcast, Mutex, RwLock},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    api::TransformApi, clipboard::ClipboardWriter, error::ClientError, session::SessionState,
};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to transform";
pub const TRANSFORM_FAILED_MESSAGE: &str = "Transformation failed";
pub const COPY_CONFIRMATION_DURATION: Duration = Duration::from_secs(2);

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Which transform response wins when several are in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Every response is applied as it arrives; the last to resolve wins.
    #[default]
    LastResolved,
    /// Responses to anything but the most recently dispatched request are dropped.
    LatestDispatched,
}

impl FromStr for ResponseOrdering {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_resolved" => Ok(ResponseOrdering::LastResolved),
            "latest_dispatched" => Ok(ResponseOrdering::LatestDispatched),
            other => Err(format!("unknown response ordering '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub copy_confirmation: Duration,
    pub response_ordering: ResponseOrdering,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            copy_confirmation: COPY_CONFIRMATION_DURATION,
            response_ordering: ResponseOrdering::default(),
        }
    }
}

/// Notifications for a front-end that re-renders on state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    FunctionsLoaded { count: usize },
    FunctionsFailed(ApiError),
    TransformCompleted { function: String },
    TransformFailed(ApiError),
    Cleared,
    CopyConfirmed,
    CopyConfirmationCleared,
    /// Diagnostic only; never written to `error_message`.
    CopyFailed(ApiError),
}

/// Decrements the in-flight counter however the transform exits, including
/// panics and dropped futures.
struct SubmitGuard {
    in_flight: Arc<AtomicUsize>,
}

impl SubmitGuard {
    fn enter(in_flight: &Arc<AtomicUsize>) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self {
            in_flight: Arc::clone(in_flight),
        }
    }
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owns the session state and mediates every call to the transformation
/// service. Service failures never propagate to callers; they land in
/// `error_message`.
pub struct TransformController {
    api: Arc<dyn TransformApi>,
    clipboard: Arc<dyn ClipboardWriter>,
    options: ControllerOptions,
    state: Arc<RwLock<SessionState>>,
    in_flight: Arc<AtomicUsize>,
    dispatch_seq: AtomicU64,
    copy_revert: Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<ControllerEvent>,
}

impl TransformController {
    pub fn new(
        api_base_address: impl Into<String>,
        default_function: impl Into<String>,
        api: Arc<dyn TransformApi>,
        clipboard: Arc<dyn ClipboardWriter>,
        options: ControllerOptions,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            api,
            clipboard,
            options,
            state: Arc::new(RwLock::new(SessionState::new(
                api_base_address,
                default_function,
            ))),
            in_flight: Arc::new(AtomicUsize::new(0)),
            dispatch_seq: AtomicU64::new(0),
            copy_revert: Mutex::new(None),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionState {
        let mut state = self.state.read().await.clone();
        state.is_submitting = self.is_submitting();
        state
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn function_count(&self) -> usize {
        self.state.read().await.function_count()
    }

    /// Initial load against the configured address.
    pub async fn mount(&self) {
        self.load_functions().await;
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.state.write().await.input_text = text.into();
    }

    pub async fn select_function(&self, name: &str) -> Result<(), ClientError> {
        let mut state = self.state.write().await;
        if !state.available_functions.is_empty() && !state.has_function(name) {
            return Err(ClientError::UnknownFunction(name.to_string()));
        }
        state.selected_function = name.to_string();
        Ok(())
    }

    /// Updates the service address and reloads the function list when it
    /// actually changed. Returns whether a reload happened.
    pub async fn set_api_base(&self, address: &str) -> bool {
        let address = address.trim().trim_end_matches('/').to_string();
        {
            let mut state = self.state.write().await;
            if state.api_base_address == address {
                return false;
            }
            info!(%address, "api base address changed");
            state.api_base_address = address;
        }
        self.load_functions().await;
        true
    }

    pub async fn load_functions(&self) {
        let base = self.state.read().await.api_base_address.clone();
        let result = self.api.list_functions(&base).await;

        let mut state = self.state.write().await;
        match result {
            Ok(functions) => {
                state.apply_function_list(functions);
                let count = state.function_count();
                debug!(count, selected = %state.selected_function, "loaded transform functions");
                let _ = self.events.send(ControllerEvent::FunctionsLoaded { count });
            }
            Err(err) => {
                warn!(%base, error = %err, "failed to fetch transform functions");
                let error = ApiError::new(err.kind(), format!("Failed to connect to API: {err}"));
                state.set_error(error.clone());
                let _ = self.events.send(ControllerEvent::FunctionsFailed(error));
            }
        }
    }

    /// Submits the current input once. Never retries.
    pub async fn transform(&self) {
        let (request, base, seq, _guard) = {
            let mut state = self.state.write().await;
            if !state.has_submittable_input() {
                let error =
                    ApiError::from(&ClientError::Validation(EMPTY_INPUT_MESSAGE.to_string()));
                state.set_error(error.clone());
                let _ = self.events.send(ControllerEvent::TransformFailed(error));
                return;
            }
            state.begin_transform();
            let guard = SubmitGuard::enter(&self.in_flight);
            let seq = self.dispatch_seq.fetch_add(1, Ordering::SeqCst) + 1;
            (
                TransformRequest::new(state.selected_function.clone(), state.input_text.clone()),
                state.api_base_address.clone(),
                seq,
                guard,
            )
        };

        debug!(function = %request.function, seq, "dispatching transform");
        let result = self.api.transform(&base, &request).await;

        // Dispatch bumps the sequence under this lock, so checking here
        // cannot race a newer request clearing the output.
        let mut state = self.state.write().await;
        if self.is_superseded(seq) {
            debug!(seq, "discarding response from superseded transform");
            return;
        }
        match result {
            Ok(output) => {
                state.output_text = output;
                state.clear_error();
                let _ = self.events.send(ControllerEvent::TransformCompleted {
                    function: request.function,
                });
            }
            Err(err) => {
                warn!(function = %request.function, error = %err, "transform failed");
                let message = err
                    .reason()
                    .map(str::to_owned)
                    .unwrap_or_else(|| TRANSFORM_FAILED_MESSAGE.to_string());
                let error = ApiError::new(err.kind(), message);
                state.set_error(error.clone());
                let _ = self.events.send(ControllerEvent::TransformFailed(error));
            }
        }
    }

    fn is_superseded(&self, seq: u64) -> bool {
        self.options.response_ordering == ResponseOrdering::LatestDispatched
            && self.dispatch_seq.load(Ordering::SeqCst) != seq
    }

    /// Writes the output to the clipboard and raises the confirmation flag
    /// for a fixed interval. Returns whether anything was copied.
    pub async fn copy_output(&self) -> bool {
        let output = self.state.read().await.output_text.clone();
        if output.is_empty() {
            return false;
        }
        // Clipboard backends may block while they serve the selection.
        let clipboard = Arc::clone(&self.clipboard);
        let written = tokio::task::spawn_blocking(move || clipboard.write_text(&output))
            .await
            .unwrap_or_else(|err| Err(ClientError::Clipboard(err.to_string())));
        if let Err(err) = written {
            let error = ApiError::from(&err);
            if error.kind.is_user_visible() {
                self.state.write().await.set_error(error.clone());
            } else {
                warn!(error = %err, "failed to copy output to clipboard");
            }
            let _ = self.events.send(ControllerEvent::CopyFailed(error));
            return false;
        }

        let mut pending = self.copy_revert.lock().await;
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        self.state.write().await.copy_confirmation_active = true;
        let _ = self.events.send(ControllerEvent::CopyConfirmed);

        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        let delay = self.options.copy_confirmation;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.write().await.copy_confirmation_active = false;
            let _ = events.send(ControllerEvent::CopyConfirmationCleared);
        }));
        true
    }

    pub async fn clear(&self) {
        self.state.write().await.clear();
        let _ = self.events.send(ControllerEvent::Cleared);
    }
}

impl Drop for TransformController {
    fn drop(&mut self) {
        if let Some(pending) = self.copy_revert.get_mut().take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
