use std::path::PathBuf;
use std::sync::Arc;

use toastq::Result;
use toastq::config::Config;
use toastq::error::{ConfigError, Error as ToastError};
use toastq::overlay::{InMemoryOverlay, OverlayAction, OverlayHandle, OverlayService, ToastView};
use toastq::request::ToastRequest;
use toastq::scheduler::ToastScheduler;
use toastq::telemetry::init_tracing;

use async_channel::bounded;
use tokio::signal;
use tokio::time::sleep;
use tracing::info;

use super::cli::Cli;

const DEFAULT_CONFIG: &str = "config.toml";

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut config = Config::from_env_and_file(&config_path)?;

    if let Some(count) = cli.count {
        if !(1..=100).contains(&count) {
            return Err(ToastError::from(ConfigError::InvalidField {
                field: "cli.count",
                message: "value must be between 1 and 100".to_string(),
            }));
        }
        config.count = count;
    }
    if let Some(duration) = cli.duration {
        config.duration = duration;
    }
    if let Some(gap) = cli.gap {
        config.enqueue_gap = gap;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    // Without a desktop backend the demo can only record.
    let dry_run = config.dry_run || cfg!(not(target_os = "linux"));

    let recorder = dry_run.then(|| Arc::new(InMemoryOverlay::new()));
    let service: Arc<dyn OverlayService> = match &recorder {
        Some(overlay) => Arc::clone(overlay) as Arc<dyn OverlayService>,
        None => desktop_service(),
    };

    let scheduler = ToastScheduler::new(Arc::clone(&service));
    let surface = OverlayHandle::new("primary");
    let (done_tx, done_rx) = bounded::<()>(config.count);

    info!(count = config.count, dry_run, "enqueueing demonstration toasts");

    for index in 0..config.count {
        let view = if dry_run {
            ToastView::new(format!("toast #{}", index + 1))
        } else {
            desktop_view(&config, index)
        };
        let done = done_tx.clone();
        let request = Arc::new(
            ToastRequest::new(view, Some(surface.clone()), config.duration).on_dismiss(
                move |_| {
                    let _ = done.try_send(());
                },
            ),
        );
        info!(id = %request.id(), "demo toast queued");
        scheduler.enqueue(request);

        if index + 1 < config.count && !config.enqueue_gap.is_zero() {
            sleep(config.enqueue_gap).await;
        }
    }

    let mut dismissed = 0;
    while dismissed < config.count {
        tokio::select! {
            biased;
            _ = signal::ctrl_c() => {
                info!("shutdown signal received, cancelling pending toasts");
                scheduler.cancel_all();
                break;
            }
            received = done_rx.recv() => match received {
                Ok(()) => dismissed += 1,
                Err(_) => break,
            }
        }
    }

    if let Some(overlay) = &recorder {
        let events = overlay.events();
        info!(
            presented = events
                .iter()
                .filter(|e| e.action == OverlayAction::Presented)
                .count(),
            removed = events
                .iter()
                .filter(|e| e.action == OverlayAction::Dismissed)
                .count(),
            max_on_screen = overlay.max_attached(),
            "dry-run summary"
        );
    }

    info!(dismissed, "demo finished");
    Ok(())
}

#[cfg(target_os = "linux")]
fn desktop_service() -> Arc<dyn OverlayService> {
    Arc::new(toastq::overlay::DesktopOverlay::new())
}

#[cfg(not(target_os = "linux"))]
fn desktop_service() -> Arc<dyn OverlayService> {
    Arc::new(InMemoryOverlay::new())
}

#[cfg(target_os = "linux")]
fn desktop_view(config: &Config, index: usize) -> ToastView {
    ToastView::new(toastq::overlay::DesktopToast {
        summary: format!("{} {}/{}", config.notify.appname, index + 1, config.count),
        body: format!("Demonstration toast #{}", index + 1),
        appname: config.notify.appname.clone(),
        icon: config.notify.icon.clone(),
    })
}

#[cfg(not(target_os = "linux"))]
fn desktop_view(_config: &Config, index: usize) -> ToastView {
    ToastView::new(format!("toast #{}", index + 1))
}
