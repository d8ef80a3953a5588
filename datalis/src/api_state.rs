use datalis_api::DatalisApiError;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

const GENERIC_ERROR: &str = "An error occurred";

/// Data, loading flag and last error of one hook instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ApiState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Runs backend calls and records their outcome in an [`ApiState`].
///
/// Every call gets an increasing sequence number and only the most recently
/// issued call may write the state. A slow call that resolves after a newer
/// one still returns its result to its caller, but leaves the state alone.
pub struct ApiHandle<T> {
    state: watch::Sender<ApiState<T>>,
    issued: AtomicU64,
}

impl<T> Default for ApiHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ApiHandle<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ApiState::default());
        Self {
            state,
            issued: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ApiState<T>> {
        self.state.subscribe()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub async fn execute<R, F>(&self, call: F) -> Result<R, DatalisApiError>
    where
        F: Future<Output = Result<R, DatalisApiError>>,
        R: Clone + Into<T>,
    {
        let id = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let mut in_flight = InFlight {
            handle: self,
            id,
            settled: false,
        };
        let result = call.await;

        let written = in_flight.settle(|s| match &result {
            Ok(value) => s.data = Some(value.clone().into()),
            Err(e) => s.error = Some(error_message(e)),
        });

        if !written {
            tracing::debug!(call = id, "Dropping outcome of superseded call");
        }
        if let Err(e) = &result {
            tracing::warn!("Backend call failed: {}", e);
        }

        result
    }
}

/// One call's claim on the state. If the caller stops polling `execute`
/// before the call resolves, dropping this releases `loading`.
struct InFlight<'a, T> {
    handle: &'a ApiHandle<T>,
    id: u64,
    settled: bool,
}

impl<T> InFlight<'_, T> {
    /// Apply `write` and clear `loading`, unless a newer call was issued.
    fn settle(&mut self, write: impl FnOnce(&mut ApiState<T>)) -> bool {
        self.settled = true;
        // Checked under the channel lock so a newer call can't slip in between.
        self.handle.state.send_if_modified(|s| {
            if self.handle.issued.load(Ordering::SeqCst) != self.id {
                return false;
            }
            write(s);
            s.loading = false;
            true
        })
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.settled && self.settle(|_| {}) {
            tracing::debug!(call = self.id, "Call abandoned before it resolved");
        }
    }
}

impl<T: Clone> ApiHandle<T> {
    pub fn state(&self) -> ApiState<T> {
        self.state.borrow().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.borrow().data.clone()
    }
}

/// Message shown for a failed call: the backend's own message when there is
/// one, a generic line otherwise.
pub fn error_message(err: &DatalisApiError) -> String {
    err.api_error()
        .map(|api| api.message.clone())
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}
