// Build outcome notification.
//
// Two surfaces: the host status bar (set immediately, cleared after the
// configured duration) and an optional desktop toast. Every host call here
// is best-effort; a notification that cannot render never fails the build
// pipeline.

use crate::host::coordinator::Coordinator;
use crate::host::{Host, ToastPresenter, ToastSeverity};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Renders build outcomes on the status bar and as desktop toasts.
pub struct NotificationService<H: Host> {
    coordinator: Coordinator<H>,
    toasts: Arc<dyn ToastPresenter>,
}

impl<H: Host> NotificationService<H> {
    pub fn new(coordinator: Coordinator<H>, toasts: Arc<dyn ToastPresenter>) -> Self {
        Self { coordinator, toasts }
    }

    /// Announce the outcome of the build named `display_name`.
    ///
    /// Sets the status bar immediately and schedules its clear after
    /// `duration`. The toast is rendered on a blocking worker when
    /// `toast_enabled`, with severity matching the outcome.
    pub async fn notify(
        &self,
        display_name: &str,
        succeeded: bool,
        duration: Duration,
        toast_enabled: bool,
    ) {
        let message = if succeeded {
            format!("{display_name} completed successfully!")
        } else {
            format!("{display_name} failed. Check the Output window for details.")
        };

        self.set_status(message.clone()).await;
        self.schedule_status_clear(duration);

        if toast_enabled {
            let severity = if succeeded {
                ToastSeverity::Info
            } else {
                ToastSeverity::Alarm
            };
            self.show_toast(message, severity, duration).await;
        }
    }

    async fn set_status(&self, message: String) {
        let outcome = self
            .coordinator
            .call(move |host| host.status_bar().set_text(&message))
            .await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("setting status bar text failed: {e}"),
            Err(e) => tracing::warn!("status bar update not delivered: {e}"),
        }
    }

    fn schedule_status_clear(&self, duration: Duration) {
        let coordinator = self.coordinator.clone();
        tokio::spawn(async move {
            sleep(duration).await;
            match coordinator.call(|host| host.status_bar().clear()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::debug!("clearing status bar failed: {e}"),
                Err(e) => tracing::debug!("status bar clear not delivered: {e}"),
            }
        });
    }

    async fn show_toast(&self, message: String, severity: ToastSeverity, duration: Duration) {
        let toasts = Arc::clone(&self.toasts);
        let rendered =
            tokio::task::spawn_blocking(move || toasts.show(&message, severity, duration)).await;

        match rendered {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("toast rendering failed: {e}"),
            Err(e) => tracing::warn!("toast task panicked: {e}"),
        }
    }
}
