//! Playback synchronization loop
//!
//! Runs until stopped or until the view reports it is gone. Two triggers
//! drive it: a fixed-period tick that reconciles the time-dependent state
//! the document store never pushes, and the store's change notifications.
//! Both end in the same incremental repaint.

use crate::controller::TransportController;
use crate::view::{PanelView, Renderer};
use soundboard_core::DocumentEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

/// Handle to a running sync loop
pub struct SyncHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Stop the loop and wait for it to finish.
    ///
    /// Document writes already in flight are not cancelled.
    pub async fn stop(self) {
        // Err only if the loop already exited
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            warn!("Sync loop ended abnormally: {}", e);
        }
    }

    /// Whether the loop has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns the per-panel synchronization loop
pub struct SyncLoop;

impl SyncLoop {
    /// Start syncing `view` with `controller` on the current tokio runtime.
    ///
    /// The notification subscription is taken before this returns, so no
    /// change made afterwards is missed.
    pub fn spawn(controller: Arc<TransportController>, view: Arc<dyn PanelView>) -> SyncHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let events = controller.subscribe();
        let period = Duration::from_millis(controller.config().poll_interval_ms.max(1));

        let task = tokio::spawn(run(controller, view, events, shutdown_rx, period));
        SyncHandle { shutdown, task }
    }
}

async fn run(
    controller: Arc<TransportController>,
    view: Arc<dyn PanelView>,
    mut events: broadcast::Receiver<DocumentEvent>,
    mut shutdown: watch::Receiver<bool>,
    period: Duration,
) {
    let mut renderer = Renderer::new();
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    debug!("Sync loop started ({:?} period)", period);

    loop {
        tokio::select! {
            biased;

            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }

            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if !view.is_alive() {
                            break;
                        }
                        controller.handle_event(&event).await;
                        if event.requires_full_render() {
                            renderer.invalidate();
                            view.request_render();
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // The next tick reconciles whatever was missed
                        warn!("Sync loop missed {} notifications", skipped);
                        renderer.invalidate();
                        view.request_render();
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
                renderer.paint(controller.frame(), view.as_ref(), controller.is_seeking());
            }

            _ = ticker.tick() => {
                if !view.is_alive() {
                    break;
                }
                controller.tick();
                renderer.paint(controller.frame(), view.as_ref(), controller.is_seeking());
            }
        }
    }

    debug!("Sync loop stopped");
}
