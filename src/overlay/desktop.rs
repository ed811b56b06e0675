use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use notify_rust::{Notification, NotificationHandle, Timeout};
use tracing::{debug, warn};

use super::{LayoutParams, OverlayHandle, OverlayService, ToastView};

/// Payload a [`ToastView`] must carry to be shown as a desktop notification.
#[derive(Clone, Debug)]
pub struct DesktopToast {
    pub summary: String,
    pub body: String,
    pub appname: String,
    pub icon: Option<PathBuf>,
}

/// Bridges presentation onto freedesktop notifications. The notification is
/// created sticky; the scheduler owns the display lifetime and closes it on
/// dismiss.
#[derive(Default)]
pub struct DesktopOverlay {
    current: Mutex<Option<NotificationHandle>>,
}

impl DesktopOverlay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlayService for DesktopOverlay {
    fn present(&self, _handle: &OverlayHandle, view: &ToastView, _layout: &LayoutParams) {
        let Some(toast) = view.downcast_ref::<DesktopToast>() else {
            warn!("view payload is not a DesktopToast; nothing to present");
            return;
        };

        let mut builder = Notification::new();
        builder
            .summary(&toast.summary)
            .body(&toast.body)
            .appname(&toast.appname)
            .timeout(Timeout::Never);
        if let Some(icon) = &toast.icon {
            builder.icon(&icon.to_string_lossy());
        }

        match builder.show() {
            Ok(shown) => {
                debug!(summary = %toast.summary, "desktop notification displayed");
                *self
                    .current
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(shown);
            }
            Err(err) => {
                warn!(error = %err, "desktop notification failed");
            }
        }
    }

    fn dismiss(&self, _handle: &OverlayHandle, _view: &ToastView) {
        let shown = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(shown) = shown {
            shown.close();
        }
    }
}
