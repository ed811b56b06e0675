use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_channel::{Receiver, Sender, unbounded};
use tracing::{debug, trace, warn};

use crate::overlay::OverlayService;
use crate::request::ToastRequest;

/// Margin added to the head's duration before a recheck fires, so the poll
/// never races the dismiss timer of the toast it is watching.
const RECHECK_GRACE: Duration = Duration::from_millis(1000);
/// Extra display time letting the show animation settle before removal.
const POST_DISPLAY_MARGIN: Duration = Duration::from_millis(500);
/// Pause between one toast leaving the screen and the next one appearing.
const INTER_TOAST_GAP: Duration = Duration::from_millis(500);

/// Serialized presentation scheduler: accepts requests to show a toast,
/// keeps at most one visible at a time, and drives show → auto-dismiss →
/// next-show transitions through delayed events on a single worker.
///
/// Cloning the handle is cheap; all clones feed the same worker. Once
/// spawned, the worker runs for the rest of the process — there is no
/// teardown, [`ToastScheduler::cancel_all`] resets it to empty without
/// destroying it.
#[derive(Clone)]
pub struct ToastScheduler {
    tx: Sender<Command>,
}

enum Command {
    Enqueue(Arc<ToastRequest>),
    CancelAll,
    Fire { epoch: u64, event: TimerEvent },
}

enum TimerEvent {
    Show(Arc<ToastRequest>),
    Dismiss(Arc<ToastRequest>),
    Recheck,
}

impl ToastScheduler {
    /// Spawns the scheduler worker on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a runtime, as `tokio::spawn` does.
    #[must_use]
    pub fn new(service: Arc<dyn OverlayService>) -> Self {
        let (tx, rx) = unbounded();
        let worker = Worker {
            queue: VecDeque::new(),
            epoch: 0,
            service,
            tx: tx.clone(),
        };
        tokio::spawn(worker.run(rx));
        Self { tx }
    }

    /// Process-wide scheduler, created on first access and living for the
    /// rest of the process. Later calls ignore `service`.
    pub fn shared(service: impl FnOnce() -> Arc<dyn OverlayService>) -> &'static Self {
        static SHARED: OnceLock<ToastScheduler> = OnceLock::new();
        SHARED.get_or_init(|| Self::new(service()))
    }

    /// Appends `request` to the tail of the queue. Shows it immediately when
    /// nothing else is on screen. Never fails: a scheduler whose worker is
    /// gone logs and drops the request.
    pub fn enqueue(&self, request: Arc<ToastRequest>) {
        self.send(Command::Enqueue(request));
    }

    /// Drops every outstanding event, force-detaches whatever is on screen
    /// without running its dismiss callback, and clears the queue.
    pub fn cancel_all(&self) {
        self.send(Command::CancelAll);
    }

    fn send(&self, command: Command) {
        if self.tx.try_send(command).is_err() {
            warn!("scheduler worker is gone; command dropped");
        }
    }
}

/// Owns all mutable state. Every transition happens inside `handle`, one
/// command at a time, which is what makes the guards in `show` and `dismiss`
/// sufficient without locking.
struct Worker {
    queue: VecDeque<Arc<ToastRequest>>,
    epoch: u64,
    service: Arc<dyn OverlayService>,
    tx: Sender<Command>,
}

impl Worker {
    async fn run(mut self, rx: Receiver<Command>) {
        while let Ok(command) = rx.recv().await {
            self.handle(command);
        }
        debug!("command channel closed, scheduler worker exiting");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Enqueue(request) => {
                debug!(
                    id = %request.id(),
                    duration_ms = u64::try_from(request.duration().as_millis()).unwrap_or(u64::MAX),
                    "toast enqueued"
                );
                self.queue.push_back(request);
                self.advance();
            }
            Command::CancelAll => self.cancel_all(),
            Command::Fire { epoch, event } => {
                if epoch != self.epoch {
                    trace!("timer event from a cancelled generation ignored");
                    return;
                }
                match event {
                    TimerEvent::Show(request) => self.show(&request),
                    TimerEvent::Dismiss(request) => self.dismiss(&request),
                    TimerEvent::Recheck => self.advance(),
                }
            }
        }
    }

    /// Decides what happens next for the head of the queue. Called after
    /// every enqueue and after every transition.
    fn advance(&mut self) {
        let Some(head) = self.queue.front() else {
            return;
        };
        if head.is_showing() {
            // Head is on screen; poll again once its lifetime has elapsed.
            let delay = head.duration() + RECHECK_GRACE;
            self.arm(delay, TimerEvent::Recheck);
        } else {
            self.arm(Duration::ZERO, TimerEvent::Show(Arc::clone(head)));
        }
    }

    fn show(&mut self, request: &Arc<ToastRequest>) {
        if request.is_showing() {
            trace!(id = %request.id(), "duplicate show event ignored");
            return;
        }
        let Some(handle) = request.overlay() else {
            // Nothing to attach and no dismiss timer to arm. The request
            // stays at the head and parks the queue until cancel_all; kept
            // that way on purpose, see DESIGN.md.
            debug!(id = %request.id(), "toast has no overlay handle, presentation skipped");
            return;
        };
        self.service.present(handle, request.view(), request.layout());
        request.set_showing(true);
        debug!(id = %request.id(), "toast presented");
        self.arm(
            request.duration() + POST_DISPLAY_MARGIN,
            TimerEvent::Dismiss(Arc::clone(request)),
        );
    }

    fn dismiss(&mut self, request: &Arc<ToastRequest>) {
        let Some(handle) = request.overlay() else {
            return;
        };
        let head_matches = self
            .queue
            .front()
            .is_some_and(|head| Arc::ptr_eq(head, request));
        if !head_matches {
            // A dismiss may only remove the head. Anything else is a stale
            // timer for a toast already gone.
            warn!(id = %request.id(), "dismiss event does not match the queue head, ignored");
            return;
        }
        self.queue.pop_front();
        self.service.dismiss(handle, request.view());
        request.set_showing(false);
        debug!(id = %request.id(), "toast dismissed");
        self.arm(INTER_TOAST_GAP, TimerEvent::Recheck);
        if let Some(callback) = request.take_dismiss_callback() {
            callback(request.view());
        }
    }

    fn cancel_all(&mut self) {
        // Bumping the generation voids every armed timer and every event
        // already sitting in the channel.
        self.epoch = self.epoch.wrapping_add(1);
        for request in self.queue.drain(..) {
            if request.is_showing() {
                if let Some(handle) = request.overlay() {
                    self.service.dismiss(handle, request.view());
                }
                request.set_showing(false);
            }
        }
        debug!("all queued toasts cancelled");
    }

    fn arm(&self, delay: Duration, event: TimerEvent) {
        let tx = self.tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let _ = tx.send(Command::Fire { epoch, event }).await;
        });
    }
}
