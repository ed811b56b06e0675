use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use uuid::Uuid;

use crate::overlay::{LayoutParams, OverlayHandle, ToastView};

/// Invoked exactly once when the toast finishes being shown. Skipped when the
/// queue is torn down via `cancel_all`.
pub type DismissCallback = Box<dyn FnOnce(&ToastView) + Send>;

/// A single presentation request. Built by the caller, then handed to the
/// scheduler, which is the only writer of the showing flag.
pub struct ToastRequest {
    id: Uuid,
    view: ToastView,
    overlay: Option<OverlayHandle>,
    layout: LayoutParams,
    duration: Duration,
    showing: AtomicBool,
    on_dismiss: Mutex<Option<DismissCallback>>,
}

impl ToastRequest {
    #[must_use]
    pub fn new(view: ToastView, overlay: Option<OverlayHandle>, duration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            view,
            overlay,
            layout: LayoutParams::default(),
            duration,
            showing: AtomicBool::new(false),
            on_dismiss: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutParams) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn on_dismiss(self, callback: impl FnOnce(&ToastView) + Send + 'static) -> Self {
        *self
            .on_dismiss
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn view(&self) -> &ToastView {
        &self.view
    }

    #[must_use]
    pub fn overlay(&self) -> Option<&OverlayHandle> {
        self.overlay.as_ref()
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutParams {
        &self.layout
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// True exactly while the view is attached to the overlay.
    #[must_use]
    pub fn is_showing(&self) -> bool {
        self.showing.load(Ordering::Acquire)
    }

    pub(crate) fn set_showing(&self, showing: bool) {
        self.showing.store(showing, Ordering::Release);
    }

    pub(crate) fn take_dismiss_callback(&self) -> Option<DismissCallback> {
        self.on_dismiss
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl fmt::Debug for ToastRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastRequest")
            .field("id", &self.id)
            .field("duration", &self.duration)
            .field("showing", &self.is_showing())
            .field("has_overlay", &self.overlay.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::ToastRequest;
    use crate::overlay::ToastView;
    use std::time::Duration;

    #[test]
    fn dismiss_callback_is_taken_once() {
        let request = ToastRequest::new(ToastView::new("t"), None, Duration::from_secs(1))
            .on_dismiss(|_| {});
        assert!(request.take_dismiss_callback().is_some());
        assert!(request.take_dismiss_callback().is_none());
    }

    #[test]
    fn new_request_is_not_showing() {
        let request = ToastRequest::new(ToastView::new("t"), None, Duration::ZERO);
        assert!(!request.is_showing());
    }

    #[test]
    fn layout_defaults_until_overridden() {
        use crate::overlay::{Gravity, LayoutParams};

        let request = ToastRequest::new(ToastView::new("t"), None, Duration::from_secs(1));
        assert_eq!(request.layout().gravity, Gravity::Bottom);

        let request = request.with_layout(LayoutParams {
            gravity: Gravity::Top,
            x_offset: 0,
            y_offset: 48,
        });
        assert_eq!(request.layout().gravity, Gravity::Top);
        assert_eq!(request.layout().y_offset, 48);
    }
}
