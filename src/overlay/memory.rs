use std::sync::{Mutex, PoisonError};

use tokio::time::Instant;
use tracing::trace;

use super::{LayoutParams, OverlayHandle, OverlayService, ToastView};

/// Headless overlay that records every attach/detach instead of rendering.
/// Backs the demo's dry-run mode; tests assert against its event log.
#[derive(Default)]
pub struct InMemoryOverlay {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    events: Vec<OverlayEvent>,
    attached: usize,
    max_attached: usize,
}

#[derive(Clone, Debug)]
pub struct OverlayEvent {
    pub action: OverlayAction,
    pub view: ToastView,
    pub at: Instant,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OverlayAction {
    Presented,
    Dismissed,
}

impl InMemoryOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, in call order.
    #[must_use]
    pub fn events(&self) -> Vec<OverlayEvent> {
        self.lock().events.clone()
    }

    /// Number of views currently attached.
    #[must_use]
    pub fn attached(&self) -> usize {
        self.lock().attached
    }

    /// Highest number of views attached at the same time.
    #[must_use]
    pub fn max_attached(&self) -> usize {
        self.lock().max_attached
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, action: OverlayAction, view: &ToastView) {
        let mut state = self.lock();
        match action {
            OverlayAction::Presented => {
                state.attached += 1;
                state.max_attached = state.max_attached.max(state.attached);
            }
            OverlayAction::Dismissed => {
                state.attached = state.attached.saturating_sub(1);
            }
        }
        state.events.push(OverlayEvent {
            action,
            view: view.clone(),
            at: Instant::now(),
        });
    }
}

impl OverlayService for InMemoryOverlay {
    fn present(&self, _handle: &OverlayHandle, view: &ToastView, _layout: &LayoutParams) {
        trace!("in-memory overlay: view attached");
        self.record(OverlayAction::Presented, view);
    }

    fn dismiss(&self, _handle: &OverlayHandle, view: &ToastView) {
        trace!("in-memory overlay: view detached");
        self.record(OverlayAction::Dismissed, view);
    }
}
