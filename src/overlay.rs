use std::any::Any;
use std::fmt;
use std::sync::Arc;

#[cfg(target_os = "linux")]
mod desktop;
mod memory;

#[cfg(target_os = "linux")]
pub use desktop::{DesktopOverlay, DesktopToast};
pub use memory::{InMemoryOverlay, OverlayAction, OverlayEvent};

/// Capability to attach a toast view to a platform surface and to detach it
/// again. The scheduler never consults a return value: presentation is
/// fire-and-forget, and `dismiss` must be safe to call on a view that is
/// already gone.
pub trait OverlayService: Send + Sync {
    fn present(&self, handle: &OverlayHandle, view: &ToastView, layout: &LayoutParams);
    fn dismiss(&self, handle: &OverlayHandle, view: &ToastView);
}

/// Opaque renderable content. The payload is whatever the overlay backend
/// understands; the scheduler only clones and forwards it.
#[derive(Clone)]
pub struct ToastView(Arc<dyn Any + Send + Sync>);

impl ToastView {
    pub fn new<T: Any + Send + Sync>(content: T) -> Self {
        Self(Arc::new(content))
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for ToastView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ToastView(..)")
    }
}

/// Opaque reference to the surface a toast is presented on.
#[derive(Clone)]
pub struct OverlayHandle(Arc<dyn Any + Send + Sync>);

impl OverlayHandle {
    pub fn new<T: Any + Send + Sync>(surface: T) -> Self {
        Self(Arc::new(surface))
    }

    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for OverlayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OverlayHandle(..)")
    }
}

/// Placement hints forwarded verbatim to `present`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LayoutParams {
    pub gravity: Gravity,
    pub x_offset: i32,
    pub y_offset: i32,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Gravity {
    Top,
    Center,
    #[default]
    Bottom,
}

#[cfg(test)]
mod tests {
    use super::ToastView;

    #[test]
    fn view_payload_downcasts_to_its_own_type() {
        let view = ToastView::new("hello");
        assert_eq!(view.downcast_ref::<&str>(), Some(&"hello"));
        assert!(view.downcast_ref::<u32>().is_none());
    }

    #[test]
    fn handle_payload_downcasts_to_its_own_type() {
        let handle = super::OverlayHandle::new(7_u32);
        assert_eq!(handle.downcast_ref::<u32>(), Some(&7));
    }
}
