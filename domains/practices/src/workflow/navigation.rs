//! Deferred navigation after a successful submission

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{NavigationReason, WorkflowEvent};

/// Timer task that signals navigation once its delay elapses
///
/// Dropping the timer cancels it, so a workflow torn down during the grace
/// period never navigates.
#[derive(Debug)]
pub struct NavigationTimer {
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl NavigationTimer {
    /// Spawn the timer on the current Tokio runtime
    pub fn schedule(delay: Duration, route: String, events: UnboundedSender<WorkflowEvent>) -> Self {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(%route, "Pending navigation cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    let event = WorkflowEvent::Navigate {
                        route: route.clone(),
                        reason: NavigationReason::Submitted,
                    };
                    if events.send(event).is_err() {
                        tracing::debug!(%route, "Workflow events receiver gone, navigation dropped");
                    } else {
                        tracing::info!(%route, "Navigating after submission");
                    }
                }
            }
        });

        Self {
            cancel_token,
            handle,
        }
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Whether the timer fired or was cancelled
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for NavigationTimer {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _timer = NavigationTimer::schedule(
            Duration::from_millis(1500),
            "/practices".to_string(),
            tx,
        );

        tokio::time::sleep(Duration::from_millis(1499)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(
            rx.try_recv().unwrap(),
            WorkflowEvent::Navigate {
                route: "/practices".to_string(),
                reason: NavigationReason::Submitted,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_navigation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = NavigationTimer::schedule(
            Duration::from_millis(1500),
            "/practices".to_string(),
            tx,
        );

        timer.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(timer.is_finished());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = NavigationTimer::schedule(
            Duration::from_millis(1500),
            "/practices".to_string(),
            tx,
        );

        drop(timer);
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(rx.recv().await.is_none());
    }
}
